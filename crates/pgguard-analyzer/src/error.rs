//! Error types for plan analysis

use thiserror::Error;

/// Errors that abort the analysis of a query
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// The plan is missing a required field or structure
    #[error("Malformed plan: {0}")]
    MalformedPlan(String),

    /// The plan description is not valid JSON
    #[error("Malformed plan: invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Reserved for statements the classifier cannot handle
    #[error("Unsupported query shape: {0}")]
    UnsupportedQueryShape(String),

    /// The plan source could not supply a plan
    #[error("Plan source error: {0}")]
    PlanSource(String),
}

impl AnalyzerError {
    /// Returns true for every variant caused by a bad plan description
    pub fn is_malformed_plan(&self) -> bool {
        matches!(self, Self::MalformedPlan(_) | Self::InvalidJson(_))
    }

    pub(crate) fn missing(field: &str) -> Self {
        Self::MalformedPlan(format!("root node is missing required field '{field}'"))
    }
}

/// Result type for plan analysis
pub type Result<T> = std::result::Result<T, AnalyzerError>;
