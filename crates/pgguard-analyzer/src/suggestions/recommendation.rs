//! Recommendation value types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Priority of a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Should be fixed before the query reaches production
    High,
    Medium,
    Low,
}

impl Priority {
    /// Returns true if this is a high-priority issue
    pub fn is_high(&self) -> bool {
        matches!(self, Self::High)
    }

    /// Returns the priority as a display string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category of detected issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    /// Large filtered sequential scan that an index could serve
    MissingIndex,
    /// Sort that spilled to disk
    DiskSort,
    /// Nested loop join over a large row count
    InefficientJoin,
}

impl RecommendationKind {
    /// Returns the categorical tag, e.g. `missing_index`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingIndex => "missing_index",
            Self::DiskSort => "disk_sort",
            Self::InefficientJoin => "inefficient_join",
        }
    }
}

impl fmt::Display for RecommendationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Managed infrastructure service a recommendation pertains to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelatedService {
    Postgresql,
    Kubernetes,
    Clickhouse,
    Kafka,
    Opensearch,
    InMemoryDb,
    Documentdb,
    Rabbitmq,
}

impl RelatedService {
    /// Every service in catalog order
    pub const ALL: [RelatedService; 8] = [
        Self::Postgresql,
        Self::Kubernetes,
        Self::Clickhouse,
        Self::Kafka,
        Self::Opensearch,
        Self::InMemoryDb,
        Self::Documentdb,
        Self::Rabbitmq,
    ];

    /// Returns the short tag used in serialized reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Postgresql => "postgresql",
            Self::Kubernetes => "kubernetes",
            Self::Clickhouse => "clickhouse",
            Self::Kafka => "kafka",
            Self::Opensearch => "opensearch",
            Self::InMemoryDb => "in_memory_db",
            Self::Documentdb => "documentdb",
            Self::Rabbitmq => "rabbitmq",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Postgresql => "Managed Service for PostgreSQL",
            Self::Kubernetes => "Managed Service for Kubernetes",
            Self::Clickhouse => "Managed Service for ClickHouse",
            Self::Kafka => "Managed Service for Kafka",
            Self::Opensearch => "Managed Service for OpenSearch",
            Self::InMemoryDb => "Managed Service for InmemoryDB",
            Self::Documentdb => "Managed Service for DocumentDB",
            Self::Rabbitmq => "Managed Service for RabbitMQ",
        }
    }
}

/// A single optimization recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    /// Human-readable description of the issue
    pub description: String,
    /// Action that should fix the issue
    pub suggested_action: String,
    pub priority: Priority,
    /// Free-text estimate of the gain, not a guaranteed bound
    pub estimated_improvement: String,
    /// Tables, operator groups or configuration areas involved
    pub affected_components: Vec<String>,
    pub related_service: Option<RelatedService>,
    /// Performance impact on a 1-10 scale
    pub impact_score: u8,
}

impl Recommendation {
    /// Creates a new recommendation with an impact of 5 and no components
    pub fn new(
        kind: RecommendationKind,
        priority: Priority,
        description: impl Into<String>,
        suggested_action: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            description: description.into(),
            suggested_action: suggested_action.into(),
            priority,
            estimated_improvement: String::new(),
            affected_components: Vec::new(),
            related_service: None,
            impact_score: 5,
        }
    }

    /// Sets the estimated improvement text
    pub fn with_improvement(mut self, improvement: impl Into<String>) -> Self {
        self.estimated_improvement = improvement.into();
        self
    }

    /// Appends an affected component
    pub fn with_component(mut self, component: impl Into<String>) -> Self {
        self.affected_components.push(component.into());
        self
    }

    /// Sets the related managed service
    pub fn with_service(mut self, service: RelatedService) -> Self {
        self.related_service = Some(service);
        self
    }

    /// Sets the impact score, clamped to 1..=10
    pub fn with_impact(mut self, impact: u8) -> Self {
        self.impact_score = impact.clamp(1, 10);
        self
    }
}
