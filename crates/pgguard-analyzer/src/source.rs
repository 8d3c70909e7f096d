//! Plan source boundary
//!
//! The analyzer is handed fully formed plans; obtaining one is the job of a
//! [`PlanSource`]. Only a file-backed source ships here.

use crate::error::{AnalyzerError, Result};
use crate::explain::{QueryPlan, parse_postgres_explain};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Supplies the execution plan for a query
#[async_trait]
pub trait PlanSource: Send + Sync {
    /// Returns the plan the database would use for `query`
    async fn fetch_plan(&self, query: &str) -> Result<QueryPlan>;

    /// Short human-readable name for logs
    fn describe(&self) -> String;
}

/// Reads a saved `EXPLAIN (FORMAT JSON)` document from disk.
///
/// The query text is not consulted: the file is assumed to hold the plan of
/// whatever query it is paired with.
#[derive(Debug, Clone)]
pub struct FilePlanSource {
    path: PathBuf,
}

impl FilePlanSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl PlanSource for FilePlanSource {
    async fn fetch_plan(&self, _query: &str) -> Result<QueryPlan> {
        let contents = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            AnalyzerError::PlanSource(format!("failed to read {}: {}", self.path.display(), e))
        })?;
        tracing::debug!(path = %self.path.display(), bytes = contents.len(), "loaded plan file");
        parse_postgres_explain(&contents)
    }

    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }
}
