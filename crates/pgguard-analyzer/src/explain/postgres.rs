//! PostgreSQL EXPLAIN Parser
//!
//! Builds a [`QueryPlan`] from `EXPLAIN (FORMAT JSON)` output. Both the array
//! form PostgreSQL prints and a bare `{"Plan": ...}` object are accepted.
//!
//! # Examples
//!
//! ```
//! use pgguard_analyzer::explain::postgres::parse_postgres_explain;
//!
//! let json_output = r#"[
//!   {
//!     "Plan": {
//!       "Node Type": "Seq Scan",
//!       "Relation Name": "users",
//!       "Startup Cost": 0.0,
//!       "Total Cost": 10.0,
//!       "Plan Rows": 100,
//!       "Plan Width": 36
//!     }
//!   }
//! ]"#;
//!
//! let plan = parse_postgres_explain(json_output).unwrap();
//! assert_eq!(plan.root.node_type, "Seq Scan");
//! ```

use crate::error::{AnalyzerError, Result};
use crate::explain::plan::{PlanNode, QueryPlan};
use serde_json::Value;

const KNOWN_KEYS: &[&str] = &[
    "Node Type",
    "Plan Rows",
    "Plan Width",
    "Startup Cost",
    "Total Cost",
    "Relation Name",
    "Alias",
    "Index Name",
    "Index Cond",
    "Filter",
    "Join Type",
    "Sort Key",
    "Sort Method",
    "Workers Planned",
    "Workers Launched",
    "Shared Hit Blocks",
    "Shared Read Blocks",
    "Plans",
];

/// Parses PostgreSQL `EXPLAIN (FORMAT JSON)` output
pub fn parse_postgres_explain(json: &str) -> Result<QueryPlan> {
    let value: Value = serde_json::from_str(json.trim())?;
    parse_explain_value(&value)
}

/// Builds a plan from already-decoded EXPLAIN JSON
pub fn parse_explain_value(value: &Value) -> Result<QueryPlan> {
    // PostgreSQL JSON EXPLAIN wraps the plan in an array
    let wrapper = match value {
        Value::Array(arr) => arr.first().ok_or_else(|| {
            AnalyzerError::MalformedPlan("EXPLAIN output is an empty array".into())
        })?,
        other => other,
    };

    let plan_obj = wrapper
        .get("Plan")
        .ok_or_else(|| AnalyzerError::MalformedPlan("missing Plan object".into()))?;

    let root = parse_plan_node(plan_obj)?;
    let mut plan = QueryPlan::new(root);

    // Planning Time sits beside "Plan"; some tools inline it into the root node.
    plan.planning_time_ms = wrapper
        .get("Planning Time")
        .or_else(|| plan_obj.get("Planning Time"))
        .and_then(Value::as_f64);

    Ok(plan)
}

/// Parses a single plan node (and its children) from JSON
fn parse_plan_node(value: &Value) -> Result<PlanNode> {
    let obj = value
        .as_object()
        .ok_or_else(|| AnalyzerError::MalformedPlan("plan node is not an object".into()))?;

    let node_type = obj
        .get("Node Type")
        .and_then(Value::as_str)
        .ok_or_else(|| AnalyzerError::MalformedPlan("plan node is missing Node Type".into()))?;

    let mut node = PlanNode::new(node_type);

    // Estimates
    node.rows = obj.get("Plan Rows").and_then(as_integer);
    node.width = obj.get("Plan Width").and_then(as_integer);
    node.startup_cost = obj.get("Startup Cost").and_then(Value::as_f64);
    node.total_cost = obj.get("Total Cost").and_then(Value::as_f64);

    // Operator-specific attributes
    node.relation = string_field(value, "Relation Name");
    node.alias = string_field(value, "Alias");
    node.index_name = string_field(value, "Index Name");
    node.index_cond = string_field(value, "Index Cond");
    node.filter = string_field(value, "Filter");
    node.join_type = string_field(value, "Join Type");
    node.sort_method = string_field(value, "Sort Method");

    if let Some(keys) = obj.get("Sort Key").and_then(Value::as_array) {
        node.sort_keys = keys
            .iter()
            .filter_map(|k| k.as_str().map(String::from))
            .collect();
    }

    // Parallelism and buffers
    node.workers_planned = obj.get("Workers Planned").and_then(Value::as_u64);
    node.workers_launched = obj.get("Workers Launched").and_then(Value::as_u64);
    node.shared_hit_blocks = obj.get("Shared Hit Blocks").and_then(Value::as_u64);
    node.shared_read_blocks = obj.get("Shared Read Blocks").and_then(Value::as_u64);

    if let Some(plans) = obj.get("Plans") {
        let plans = plans
            .as_array()
            .ok_or_else(|| AnalyzerError::MalformedPlan("Plans is not an array".into()))?;
        for child_value in plans {
            node.children.push(parse_plan_node(child_value)?);
        }
    }

    for (key, val) in obj {
        if !KNOWN_KEYS.contains(&key.as_str()) {
            node.extra.insert(key.clone(), val.clone());
        }
    }

    Ok(node)
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(String::from)
}

/// Row and width estimates are integral in PostgreSQL, but other producers
/// emit floats; fractional parts are dropped.
fn as_integer(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| value.as_f64().map(|f| f as i64))
}
