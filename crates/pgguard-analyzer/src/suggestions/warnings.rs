//! Cheap heuristics for risky query shapes, independent of the rule set

use crate::explain::{NodeType, PlanNode, find_nodes_by_type};

pub const CARTESIAN_JOIN_WARNING: &str = "Possible cartesian product in JOIN operations";
pub const UNBOUNDED_RESULT_WARNING: &str = "Large result set without LIMIT - risk of high load";

/// More nested loops than this suggests a missing join condition
const MAX_NESTED_LOOPS: usize = 2;

/// Root row estimates above this are considered large result sets
const LARGE_RESULT_ROWS: i64 = 10_000;

/// Returns the warnings for a plan and its query text. Both checks always
/// run; the cartesian-join warning comes first when both fire.
pub fn detect_warnings(root: &PlanNode, query: &str) -> Vec<String> {
    let mut warnings = Vec::new();

    let nested_loops = find_nodes_by_type(root, NodeType::NestedLoop.as_str()).len();
    if nested_loops > MAX_NESTED_LOOPS {
        warnings.push(CARTESIAN_JOIN_WARNING.to_string());
    }

    let upper = query.to_uppercase();
    if upper.contains("SELECT") && !upper.contains("LIMIT") && root.rows_or_zero() > LARGE_RESULT_ROWS
    {
        warnings.push(UNBOUNDED_RESULT_WARNING.to_string());
    }

    warnings
}
