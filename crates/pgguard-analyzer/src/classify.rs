//! Lexical query classification
//!
//! This is keyword scanning over the uppercased text, not SQL parsing. It
//! over-matches keyword-named columns and under-matches quoted identifiers and
//! subqueries; the recommendation thresholds were tuned against exactly this
//! behavior, so it is kept as is.

use indexmap::IndexSet;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

static TABLE_REFERENCE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(FROM|JOIN|INTO|UPDATE)\s+(\w+)").expect("valid regex")
});

/// Statement type determined from the query prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QueryType {
    Select,
    Insert,
    Update,
    Delete,
    Unknown,
}

impl QueryType {
    const PREFIXES: [(&'static str, QueryType); 4] = [
        ("SELECT", QueryType::Select),
        ("INSERT", QueryType::Insert),
        ("UPDATE", QueryType::Update),
        ("DELETE", QueryType::Delete),
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Select => "SELECT",
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse operation present in the query text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OperationFlag {
    Filter,
    Sort,
    Aggregate,
    Join,
}

impl OperationFlag {
    const MARKERS: [(&'static str, OperationFlag); 4] = [
        ("WHERE", OperationFlag::Filter),
        ("ORDER BY", OperationFlag::Sort),
        ("GROUP BY", OperationFlag::Aggregate),
        ("JOIN", OperationFlag::Join),
    ];
}

/// Result of classifying a query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryInfo {
    pub query_type: QueryType,
    /// Uppercased table identifiers in first-seen order, without duplicates
    pub tables: Vec<String>,
    pub operations: Vec<OperationFlag>,
}

impl QueryInfo {
    pub fn has_operation(&self, flag: OperationFlag) -> bool {
        self.operations.contains(&flag)
    }
}

/// Classifies raw query text. Never fails; unrecognized statements are
/// reported as [`QueryType::Unknown`].
pub fn classify(query: &str) -> QueryInfo {
    let upper = query.to_uppercase();

    // Prefix match is on the raw text: leading whitespace or comments
    // yield Unknown.
    let query_type = QueryType::PREFIXES
        .iter()
        .find(|(prefix, _)| upper.starts_with(prefix))
        .map(|(_, ty)| *ty)
        .unwrap_or(QueryType::Unknown);

    let tables: IndexSet<String> = TABLE_REFERENCE_REGEX
        .captures_iter(&upper)
        .map(|caps| caps[2].to_string())
        .collect();

    let operations = OperationFlag::MARKERS
        .iter()
        .filter(|(marker, _)| upper.contains(marker))
        .map(|(_, flag)| *flag)
        .collect();

    let info = QueryInfo {
        query_type,
        tables: tables.into_iter().collect(),
        operations,
    };
    tracing::trace!(query_type = %info.query_type, tables = ?info.tables, "classified query");
    info
}

#[cfg(test)]
mod tests;
