//! Tests for the top-level analyze operation

use super::*;
use crate::error::AnalyzerError;
use crate::suggestions::{CARTESIAN_JOIN_WARNING, RecommendationKind, UNBOUNDED_RESULT_WARNING};
use pretty_assertions::assert_eq;

fn analyzer() -> QueryAnalyzer {
    QueryAnalyzer::new().with_environment("stage")
}

#[test]
fn test_large_filtered_scan_scenario() {
    let root = PlanNode::of(NodeType::SeqScan)
        .with_relation("orders")
        .with_cost(0.0, 12_000.0)
        .with_rows(50_000)
        .with_width(64)
        .with_filter("(status)");

    let report = analyzer()
        .analyze("SELECT * FROM orders WHERE status = 'new' LIMIT 10", &QueryPlan::new(root))
        .expect("analysis");

    assert_eq!(report.recommendations.len(), 1);
    assert_eq!(report.recommendations[0].kind, RecommendationKind::MissingIndex);
    assert_eq!(report.recommendations[0].priority, Priority::High);
    assert_eq!(report.recommendations[0].impact_score, 9);
    assert_eq!(report.score, 40);
    assert!(report.is_critical);
    assert_eq!(report.grade(), ScoreGrade::Poor);
    assert!(!report.passes_gate(1_000_000.0));
}

#[test]
fn test_disk_sort_scenario() {
    let root = PlanNode::of(NodeType::SeqScan)
        .with_cost(0.0, 800.0)
        .with_rows(100)
        .with_width(16)
        .with_child(PlanNode::of(NodeType::Sort).with_sort_method("external"));

    let report = analyzer()
        .analyze("SELECT * FROM events ORDER BY id", &QueryPlan::new(root))
        .expect("analysis");

    assert_eq!(report.recommendations.len(), 1);
    assert_eq!(report.recommendations[0].kind, RecommendationKind::DiskSort);
    assert_eq!(report.recommendations[0].impact_score, 6);
    assert_eq!(report.score, 85);
    assert!(!report.is_critical);
    assert!(report.passes_gate(5_000.0));
    assert!(!report.passes_gate(500.0));
}

#[test]
fn test_warning_scenario() {
    let root = PlanNode::of(NodeType::NestedLoop)
        .with_cost(0.0, 900.0)
        .with_rows(50_000)
        .with_width(32)
        .with_child(
            PlanNode::of(NodeType::NestedLoop)
                .with_rows(10)
                .with_child(PlanNode::of(NodeType::NestedLoop).with_rows(10)),
        );

    let report = analyzer()
        .analyze("SELECT * FROM orders o", &QueryPlan::new(root))
        .expect("analysis");

    assert_eq!(
        report.warnings,
        vec![
            CARTESIAN_JOIN_WARNING.to_string(),
            UNBOUNDED_RESULT_WARNING.to_string()
        ]
    );
    // Only the root loop is large enough for a recommendation
    assert_eq!(report.recommendations.len(), 1);
    assert_eq!(report.score, 85);
}

#[test]
fn test_clean_leaf_plan() {
    let root = PlanNode::of(NodeType::IndexScan)
        .with_relation("users")
        .with_index("users_pkey")
        .with_cost(0.29, 8.3)
        .with_rows(1)
        .with_width(40);

    let report = analyzer()
        .analyze("SELECT * FROM users WHERE id = 1", &QueryPlan::new(root))
        .expect("analysis");

    assert!(report.recommendations.is_empty());
    assert!(report.warnings.is_empty());
    assert_eq!(report.score, 100);
    assert!(!report.is_critical);
    assert_eq!(report.query_type, QueryType::Select);
    assert_eq!(report.tables_affected, vec!["USERS".to_string()]);
    assert_eq!(report.indexes_used, vec!["users(users_pkey)".to_string()]);
    assert_eq!(report.environment_tag.as_deref(), Some("stage"));
    assert_eq!(report.grade(), ScoreGrade::Good);
    assert_eq!(report.summary(), "No issues detected. Score: 100/100");
}

#[test]
fn test_malformed_root_aborts() {
    let root = PlanNode::of(NodeType::SeqScan).with_rows(50_000).with_filter("(status)");
    let err = analyzer()
        .analyze("SELECT * FROM orders", &QueryPlan::new(root))
        .unwrap_err();
    assert!(matches!(err, AnalyzerError::MalformedPlan(_)));
}

#[test]
fn test_analyze_json() {
    let json = r#"[{"Plan": {"Node Type": "Seq Scan", "Relation Name": "orders",
        "Startup Cost": 0.0, "Total Cost": 12000.0, "Plan Rows": 50000,
        "Plan Width": 64, "Filter": "((status)::text = 'new'::text)"}}]"#;

    let report = QueryAnalyzer::new()
        .analyze_json("SELECT * FROM orders WHERE status = 'new'", json)
        .expect("analysis");

    assert_eq!(report.score, 40);
    assert_eq!(
        report.recommendations[0].suggested_action,
        "Create an index on orders(status)"
    );
    assert_eq!(report.warnings, vec![UNBOUNDED_RESULT_WARNING.to_string()]);
    assert!(report.environment_tag.is_none());
}

#[test]
fn test_analyze_json_rejects_garbage() {
    let err = QueryAnalyzer::new().analyze_json("SELECT 1", "{").unwrap_err();
    assert!(err.is_malformed_plan());
}

#[test]
fn test_extract_indexes_used_defaults() {
    let root = PlanNode::of(NodeType::Append)
        .with_child(PlanNode::of(NodeType::IndexScan).with_relation("a").with_index("a_idx"))
        .with_child(PlanNode::of(NodeType::IndexScan))
        .with_child(PlanNode::of(NodeType::IndexOnlyScan).with_index("ignored"));

    assert_eq!(
        extract_indexes_used(&root),
        vec!["a(a_idx)".to_string(), "unknown(unknown)".to_string()]
    );
}

#[test]
fn test_summary_counts() {
    let root = PlanNode::of(NodeType::NestedLoop)
        .with_cost(0.0, 100.0)
        .with_rows(2_000)
        .with_width(8)
        .with_child(
            PlanNode::of(NodeType::SeqScan)
                .with_relation("t")
                .with_rows(20_000)
                .with_filter("(x)"),
        );

    let report = QueryAnalyzer::new()
        .analyze("SELECT * FROM t LIMIT 5", &QueryPlan::new(root))
        .expect("analysis");

    assert_eq!(
        report.summary(),
        "2 recommendation(s) (1 high priority), 0 warning(s). Score: 55/100"
    );
    assert_eq!(report.recommendations_with(Priority::Medium).count(), 1);
}

#[test]
fn test_report_serializes() {
    let root = PlanNode::of(NodeType::Result).with_cost(0.0, 100.0).with_rows(1).with_width(4);
    let report = analyzer().analyze("SELECT 1", &QueryPlan::new(root)).expect("analysis");

    let json = serde_json::to_value(&report).expect("serialize");
    assert_eq!(json["query_type"], "SELECT");
    assert_eq!(json["score"], 100);
    assert_eq!(json["environment_tag"], "stage");
    assert_eq!(json["metrics"]["estimated_execution_time_ms"], 1.0);
}
