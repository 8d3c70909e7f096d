//! Analysis report and the top-level analyze operation

use crate::classify::{QueryType, classify};
use crate::error::Result;
use crate::explain::{NodeType, PlanNode, QueryPlan, find_nodes_by_type, parse_postgres_explain};
use crate::metrics::{QueryMetric, extract_metrics};
use crate::score::{ScoreGrade, is_critical, score};
use crate::suggestions::{Priority, Recommendation, detect_warnings, generate_recommendations};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The result of analyzing one query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub query: String,
    pub metrics: QueryMetric,
    /// In rule evaluation order
    pub recommendations: Vec<Recommendation>,
    pub warnings: Vec<String>,
    pub is_critical: bool,
    pub score: u8,
    pub query_type: QueryType,
    pub tables_affected: Vec<String>,
    /// `relation(index)` for every index scan in the plan
    pub indexes_used: Vec<String>,
    pub analyzed_at: DateTime<Utc>,
    /// Caller-supplied label, carried through untouched
    pub environment_tag: Option<String>,
}

impl AnalysisReport {
    pub fn grade(&self) -> ScoreGrade {
        ScoreGrade::from_score(self.score)
    }

    /// Returns recommendations of the given priority, in report order
    pub fn recommendations_with(&self, priority: Priority) -> impl Iterator<Item = &Recommendation> {
        self.recommendations
            .iter()
            .filter(move |r| r.priority == priority)
    }

    /// Pass/fail gate: no critical recommendation and total cost within
    /// `max_cost`
    pub fn passes_gate(&self, max_cost: f64) -> bool {
        !self.is_critical && self.metrics.total_cost <= max_cost
    }

    /// One-line summary of the analysis
    pub fn summary(&self) -> String {
        if self.recommendations.is_empty() && self.warnings.is_empty() {
            return format!("No issues detected. Score: {}/100", self.score);
        }
        let high = self.recommendations_with(Priority::High).count();
        format!(
            "{} recommendation(s) ({} high priority), {} warning(s). Score: {}/100",
            self.recommendations.len(),
            high,
            self.warnings.len(),
            self.score
        )
    }
}

/// Runs the full analysis pipeline over one plan
#[derive(Debug, Clone, Default)]
pub struct QueryAnalyzer {
    environment: Option<String>,
}

impl QueryAnalyzer {
    /// Creates an analyzer with no environment tag
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the environment tag stamped on every report
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    pub fn environment(&self) -> Option<&str> {
        self.environment.as_deref()
    }

    /// Analyzes `plan`, the execution plan of `query`.
    ///
    /// Fails with a malformed-plan error when the root node lacks a required
    /// estimate; no partial report is produced.
    #[tracing::instrument(skip(self, query, plan), fields(query_preview = %query.chars().take(100).collect::<String>()))]
    pub fn analyze(&self, query: &str, plan: &QueryPlan) -> Result<AnalysisReport> {
        let info = classify(query);

        let metrics = extract_metrics(plan).inspect_err(|e| {
            tracing::warn!(error = %e, "plan rejected");
        })?;

        let recommendations = generate_recommendations(&plan.root, query);
        let warnings = detect_warnings(&plan.root, query);
        let indexes_used = extract_indexes_used(&plan.root);

        let report = AnalysisReport {
            query: query.to_string(),
            score: score(&metrics, &recommendations),
            is_critical: is_critical(&recommendations),
            metrics,
            recommendations,
            warnings,
            query_type: info.query_type,
            tables_affected: info.tables,
            indexes_used,
            analyzed_at: Utc::now(),
            environment_tag: self.environment.clone(),
        };

        tracing::info!(
            score = report.score,
            critical = report.is_critical,
            recommendations = report.recommendations.len(),
            warnings = report.warnings.len(),
            "query analyzed"
        );

        Ok(report)
    }

    /// Parses EXPLAIN JSON and analyzes it
    pub fn analyze_json(&self, query: &str, explain_json: &str) -> Result<AnalysisReport> {
        let plan = parse_postgres_explain(explain_json)?;
        self.analyze(query, &plan)
    }
}

/// Lists `relation(index)` for every index scan in pre-order
pub fn extract_indexes_used(root: &PlanNode) -> Vec<String> {
    find_nodes_by_type(root, NodeType::IndexScan.as_str())
        .into_iter()
        .map(|scan| {
            format!(
                "{}({})",
                scan.relation.as_deref().unwrap_or("unknown"),
                scan.index_name.as_deref().unwrap_or("unknown")
            )
        })
        .collect()
}

#[cfg(test)]
mod tests;
