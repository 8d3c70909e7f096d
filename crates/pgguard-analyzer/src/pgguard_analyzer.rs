//! pgguard Analyzer - EXPLAIN plan analysis engine
//!
//! This crate provides functionality for:
//! - Parsing PostgreSQL `EXPLAIN (FORMAT JSON)` output into a plan tree
//! - Lexical classification of the analyzed query
//! - Metric extraction, optimization recommendations and warnings
//! - A 0-100 quality score and a criticality flag
//!
//! # Example
//!
//! ```
//! use pgguard_analyzer::QueryAnalyzer;
//!
//! let explain = r#"[{"Plan": {"Node Type": "Seq Scan", "Relation Name": "orders",
//!     "Startup Cost": 0.0, "Total Cost": 12000.0, "Plan Rows": 50000,
//!     "Plan Width": 64, "Filter": "(status)"}}]"#;
//!
//! let report = QueryAnalyzer::new()
//!     .analyze_json("SELECT * FROM orders WHERE status = 'new'", explain)
//!     .unwrap();
//! assert_eq!(report.score, 40);
//! assert!(report.is_critical);
//! ```

pub mod classify;
pub mod error;
pub mod explain;
pub mod metrics;
pub mod report;
pub mod score;
pub mod source;
pub mod suggestions;

pub use classify::{OperationFlag, QueryInfo, QueryType, classify};
pub use error::{AnalyzerError, Result};
pub use explain::*;
pub use metrics::{QueryMetric, extract_metrics};
pub use report::{AnalysisReport, QueryAnalyzer, extract_indexes_used};
pub use score::{ScoreGrade, is_critical, score};
pub use source::{FilePlanSource, PlanSource};
pub use suggestions::*;
