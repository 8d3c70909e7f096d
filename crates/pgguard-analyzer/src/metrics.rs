//! Normalized performance metrics taken from the root plan node

use crate::error::{AnalyzerError, Result};
use crate::explain::{QueryPlan, collect_distinct_types};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Milliseconds of estimated execution time per planner cost unit.
///
/// A fixed linear proxy with no calibration behind it; it is not a
/// measurement.
pub const ESTIMATED_MS_PER_COST_UNIT: f64 = 0.01;

/// Performance metrics for one analyzed plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryMetric {
    pub total_cost: f64,
    pub startup_cost: f64,
    pub planning_time_ms: Option<f64>,
    /// `total_cost * ESTIMATED_MS_PER_COST_UNIT`
    pub estimated_execution_time_ms: f64,
    pub shared_hit_blocks: u64,
    pub shared_read_blocks: u64,
    pub plan_width_bytes: i64,
    pub estimated_total_rows: i64,
    pub distinct_node_types: BTreeSet<String>,
    pub total_workers: u64,
    pub parallel_workers_launched: u64,
}

/// Derives the estimated execution time from a total cost
pub fn estimate_execution_time_ms(total_cost: f64) -> f64 {
    total_cost * ESTIMATED_MS_PER_COST_UNIT
}

/// Extracts metrics from the plan's root node.
///
/// Fails with [`AnalyzerError::MalformedPlan`] when the root lacks
/// `Total Cost`, `Plan Width` or `Plan Rows`. Values are otherwise passed
/// through unchecked.
pub fn extract_metrics(plan: &QueryPlan) -> Result<QueryMetric> {
    let root = &plan.root;

    let total_cost = root
        .total_cost
        .ok_or_else(|| AnalyzerError::missing("Total Cost"))?;
    let plan_width_bytes = root.width.ok_or_else(|| AnalyzerError::missing("Plan Width"))?;
    let estimated_total_rows = root.rows.ok_or_else(|| AnalyzerError::missing("Plan Rows"))?;

    Ok(QueryMetric {
        total_cost,
        startup_cost: root.startup_cost.unwrap_or(0.0),
        planning_time_ms: plan.planning_time_ms,
        estimated_execution_time_ms: estimate_execution_time_ms(total_cost),
        shared_hit_blocks: root.shared_hit_blocks.unwrap_or(0),
        shared_read_blocks: root.shared_read_blocks.unwrap_or(0),
        plan_width_bytes,
        estimated_total_rows,
        distinct_node_types: collect_distinct_types(root),
        total_workers: root.workers_planned.unwrap_or(0),
        parallel_workers_launched: root.workers_launched.unwrap_or(0),
    })
}

#[cfg(test)]
mod tests;
