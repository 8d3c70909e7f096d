//! Query EXPLAIN Module
//!
//! Plan tree model, the PostgreSQL JSON parser that builds it, and the
//! traversal primitives every analysis pass is written against.
//!
//! # Example
//!
//! ```
//! use pgguard_analyzer::explain::{find_nodes_by_type, parse_postgres_explain};
//!
//! let json = r#"[{"Plan": {"Node Type": "Sort", "Sort Method": "external",
//!     "Plans": [{"Node Type": "Seq Scan", "Relation Name": "users"}]}}]"#;
//! let plan = parse_postgres_explain(json).unwrap();
//! assert_eq!(find_nodes_by_type(&plan.root, "Seq Scan").len(), 1);
//! ```

pub mod plan;
pub mod postgres;
pub mod traverse;

pub use plan::{NodeType, PlanNode, PlanNodeIterator, QueryPlan};
pub use postgres::{parse_explain_value, parse_postgres_explain};
pub use traverse::{collect_distinct_types, find_nodes, find_nodes_by_type};
