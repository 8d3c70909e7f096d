//! Plan quality scoring

use crate::metrics::QueryMetric;
use crate::suggestions::{Priority, Recommendation};
use serde::{Deserialize, Serialize};

pub const MAX_SCORE: i64 = 100;

/// (exclusive lower bound, deduction), highest tier first
const COST_TIERS: [(f64, i64); 3] = [(10_000.0, 30), (5_000.0, 20), (1_000.0, 10)];
const READ_BLOCK_TIERS: [(u64, i64); 2] = [(1_000, 25), (500, 15)];

/// Deduction applied per recommendation of the given priority
pub fn priority_penalty(priority: Priority) -> i64 {
    match priority {
        Priority::High => 30,
        Priority::Medium => 15,
        Priority::Low => 0,
    }
}

fn cost_penalty(total_cost: f64) -> i64 {
    COST_TIERS
        .iter()
        .find(|(bound, _)| total_cost > *bound)
        .map_or(0, |(_, penalty)| *penalty)
}

fn read_block_penalty(shared_read_blocks: u64) -> i64 {
    READ_BLOCK_TIERS
        .iter()
        .find(|(bound, _)| shared_read_blocks > *bound)
        .map_or(0, |(_, penalty)| *penalty)
}

/// Computes the 0-100 quality score.
///
/// Deductions are summed from 100 and the result is clamped once at the end.
pub fn score(metrics: &QueryMetric, recommendations: &[Recommendation]) -> u8 {
    let deductions = cost_penalty(metrics.total_cost)
        + read_block_penalty(metrics.shared_read_blocks)
        + recommendations
            .iter()
            .map(|r| priority_penalty(r.priority))
            .sum::<i64>();

    (MAX_SCORE - deductions).clamp(0, MAX_SCORE) as u8
}

/// True iff at least one recommendation is high priority
pub fn is_critical(recommendations: &[Recommendation]) -> bool {
    recommendations.iter().any(|r| r.priority.is_high())
}

/// Coarse banding of a score for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreGrade {
    Good,
    Fair,
    Poor,
}

impl ScoreGrade {
    pub fn from_score(score: u8) -> Self {
        match score {
            80.. => Self::Good,
            60..=79 => Self::Fair,
            _ => Self::Poor,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
        }
    }
}
