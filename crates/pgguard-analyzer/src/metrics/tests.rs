//! Tests for metric extraction

use super::*;
use crate::explain::{NodeType, PlanNode};
use pretty_assertions::assert_eq;

fn root() -> PlanNode {
    PlanNode::of(NodeType::HashJoin)
        .with_cost(12.5, 2500.0)
        .with_rows(4200)
        .with_width(72)
        .with_child(PlanNode::of(NodeType::SeqScan).with_relation("orders"))
        .with_child(
            PlanNode::of(NodeType::Hash).with_child(PlanNode::of(NodeType::SeqScan).with_relation("users")),
        )
}

#[test]
fn test_extract_metrics_from_root() {
    let plan = QueryPlan::new(root().with_buffers(120, 640).with_workers(4, 3)).with_planning_time(0.8);

    let metrics = extract_metrics(&plan).expect("metrics");

    let expected_types: BTreeSet<String> = ["Hash Join", "Seq Scan", "Hash"]
        .into_iter()
        .map(String::from)
        .collect();
    assert_eq!(
        metrics,
        QueryMetric {
            total_cost: 2500.0,
            startup_cost: 12.5,
            planning_time_ms: Some(0.8),
            estimated_execution_time_ms: 25.0,
            shared_hit_blocks: 120,
            shared_read_blocks: 640,
            plan_width_bytes: 72,
            estimated_total_rows: 4200,
            distinct_node_types: expected_types,
            total_workers: 4,
            parallel_workers_launched: 3,
        }
    );
}

#[test]
fn test_optional_fields_default_to_zero() {
    let plan = QueryPlan::new(
        PlanNode::of(NodeType::Result)
            .with_rows(1)
            .with_width(4)
            .with_cost(0.0, 0.01),
    );
    let metrics = extract_metrics(&plan).expect("metrics");

    assert_eq!(metrics.shared_hit_blocks, 0);
    assert_eq!(metrics.shared_read_blocks, 0);
    assert_eq!(metrics.total_workers, 0);
    assert_eq!(metrics.parallel_workers_launched, 0);
    assert_eq!(metrics.planning_time_ms, None);
}

#[test]
fn test_startup_cost_defaults_to_zero() {
    let mut node = PlanNode::of(NodeType::Result).with_rows(1).with_width(4);
    node.total_cost = Some(3.0);
    let metrics = extract_metrics(&QueryPlan::new(node)).expect("metrics");
    assert_eq!(metrics.startup_cost, 0.0);
}

#[test]
fn test_zero_cost_has_zero_execution_time() {
    let plan = QueryPlan::new(PlanNode::of(NodeType::Result).with_cost(0.0, 0.0).with_rows(1).with_width(4));
    let metrics = extract_metrics(&plan).expect("metrics");
    assert_eq!(metrics.estimated_execution_time_ms, 0.0);
}

#[test]
fn test_execution_time_is_linear_in_cost() {
    assert_eq!(estimate_execution_time_ms(12000.0), 12000.0 * ESTIMATED_MS_PER_COST_UNIT);
    assert_eq!(estimate_execution_time_ms(800.0), 800.0 * 0.01);
}

#[test]
fn test_negative_estimates_pass_through() {
    let plan = QueryPlan::new(PlanNode::of(NodeType::Result).with_cost(-1.0, -5.0).with_rows(-10).with_width(-1));
    let metrics = extract_metrics(&plan).expect("metrics");
    assert_eq!(metrics.total_cost, -5.0);
    assert_eq!(metrics.estimated_total_rows, -10);
    assert_eq!(metrics.plan_width_bytes, -1);
}

#[test]
fn test_missing_required_fields() {
    let no_cost = QueryPlan::new(PlanNode::of(NodeType::Result).with_rows(1).with_width(4));
    let err = extract_metrics(&no_cost).unwrap_err();
    assert!(matches!(err, AnalyzerError::MalformedPlan(ref msg) if msg.contains("Total Cost")));

    let no_width = QueryPlan::new(PlanNode::of(NodeType::Result).with_cost(0.0, 1.0).with_rows(1));
    let err = extract_metrics(&no_width).unwrap_err();
    assert!(matches!(err, AnalyzerError::MalformedPlan(ref msg) if msg.contains("Plan Width")));

    let no_rows = QueryPlan::new(PlanNode::of(NodeType::Result).with_cost(0.0, 1.0).with_width(4));
    let err = extract_metrics(&no_rows).unwrap_err();
    assert!(matches!(err, AnalyzerError::MalformedPlan(ref msg) if msg.contains("Plan Rows")));
}

#[test]
fn test_only_root_fields_are_required() {
    let plan = QueryPlan::new(
        PlanNode::of(NodeType::Limit)
            .with_cost(0.0, 1.0)
            .with_rows(10)
            .with_width(8)
            .with_child(PlanNode::of(NodeType::SeqScan)),
    );
    assert!(extract_metrics(&plan).is_ok());
}
