//! Recommendation rule set
//!
//! A closed, ordered table of rules. Each rule scans the plan for one operator
//! signature and emits one recommendation per matching node; rules never
//! deduplicate and never suppress each other.

use crate::explain::{NodeType, PlanNode, find_nodes_by_type};
use crate::suggestions::recommendation::{
    Priority, Recommendation, RecommendationKind, RelatedService,
};
use indexmap::IndexSet;
use regex::Regex;
use std::sync::LazyLock;

/// Sequential scans estimating more rows than this are index candidates
pub const LARGE_SCAN_ROW_THRESHOLD: i64 = 10_000;

/// Nested loops estimating more rows than this are flagged
pub const NESTED_LOOP_ROW_THRESHOLD: i64 = 1_000;

/// Sort method reported for sorts that spilled to disk
pub const EXTERNAL_SORT_METHOD: &str = "external";

/// Placeholder used when no column can be read from a filter
pub const COLUMN_PLACEHOLDER: &str = "column_name";

static PARENTHESIZED_IDENT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((\w+)\)").expect("valid regex"));

/// The rules, in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    MissingIndex,
    DiskSort,
    InefficientJoin,
}

impl Rule {
    pub const ALL: [Rule; 3] = [Rule::MissingIndex, Rule::DiskSort, Rule::InefficientJoin];

    pub fn kind(&self) -> RecommendationKind {
        match self {
            Self::MissingIndex => RecommendationKind::MissingIndex,
            Self::DiskSort => RecommendationKind::DiskSort,
            Self::InefficientJoin => RecommendationKind::InefficientJoin,
        }
    }

    /// Evaluates this rule against the plan rooted at `root`.
    ///
    /// The query text is part of the rule contract even though none of the
    /// current rules read it.
    pub fn evaluate(&self, root: &PlanNode, _query: &str) -> Vec<Recommendation> {
        match self {
            Self::MissingIndex => find_nodes_by_type(root, NodeType::SeqScan.as_str())
                .into_iter()
                .filter(|scan| scan.rows_or_zero() > LARGE_SCAN_ROW_THRESHOLD && scan.has_filter())
                .map(missing_index)
                .collect(),
            Self::DiskSort => find_nodes_by_type(root, NodeType::Sort.as_str())
                .into_iter()
                .filter(|sort| sort.sort_method.as_deref() == Some(EXTERNAL_SORT_METHOD))
                .map(|_| disk_sort())
                .collect(),
            Self::InefficientJoin => find_nodes_by_type(root, NodeType::NestedLoop.as_str())
                .into_iter()
                .filter(|join| join.rows_or_zero() > NESTED_LOOP_ROW_THRESHOLD)
                .map(|_| inefficient_join())
                .collect(),
        }
    }
}

/// Runs every rule in order and concatenates their output
pub fn generate_recommendations(root: &PlanNode, query: &str) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();
    for rule in Rule::ALL {
        let found = rule.evaluate(root, query);
        if !found.is_empty() {
            tracing::debug!(rule = %rule.kind(), count = found.len(), "rule matched");
        }
        recommendations.extend(found);
    }
    recommendations
}

fn missing_index(scan: &PlanNode) -> Recommendation {
    let table = scan.relation.as_deref().unwrap_or("unknown");
    let columns = scan
        .filter
        .as_deref()
        .map(extract_filter_columns)
        .unwrap_or_else(|| COLUMN_PLACEHOLDER.to_string());

    Recommendation::new(
        RecommendationKind::MissingIndex,
        Priority::High,
        format!(
            "Full scan of large table {} ({} rows)",
            table,
            group_thousands(scan.rows_or_zero())
        ),
        format!("Create an index on {}({})", table, columns),
    )
    .with_improvement("80-95% faster")
    .with_component(table)
    .with_service(RelatedService::Postgresql)
    .with_impact(9)
}

fn disk_sort() -> Recommendation {
    Recommendation::new(
        RecommendationKind::DiskSort,
        Priority::Medium,
        "Sort is performed on disk (slow)",
        "Increase work_mem or optimize the ORDER BY clause",
    )
    .with_improvement("50-70% faster")
    .with_component("PostgreSQL Configuration")
    .with_service(RelatedService::Postgresql)
    .with_impact(6)
}

fn inefficient_join() -> Recommendation {
    Recommendation::new(
        RecommendationKind::InefficientJoin,
        Priority::Medium,
        "Inefficient nested loop join over a large data set",
        "Consider a Hash Join or Merge Join and add indexes on the join keys",
    )
    .with_improvement("30-60% faster")
    .with_component("Join Operations")
    .with_service(RelatedService::Postgresql)
    .with_impact(7)
}

/// Extracts the identifiers wrapped in parentheses from a filter expression,
/// e.g. `"(status)"` -> `status`. Duplicates are dropped, first occurrence
/// wins, and the placeholder is returned when nothing matches.
pub fn extract_filter_columns(filter: &str) -> String {
    let columns: IndexSet<&str> = PARENTHESIZED_IDENT_REGEX
        .captures_iter(filter)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect();

    if columns.is_empty() {
        COLUMN_PLACEHOLDER.to_string()
    } else {
        columns.into_iter().collect::<Vec<_>>().join(", ")
    }
}

/// Formats an integer with comma thousands separators
fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
