//! Query Analysis Suggestions Module
//!
//! Turns operator patterns found in an execution plan into prioritized
//! recommendations, and flags risky query shapes as warnings.

mod recommendation;
pub mod rules;
pub mod warnings;

pub use recommendation::*;
pub use rules::{Rule, extract_filter_columns, generate_recommendations};
pub use warnings::{CARTESIAN_JOIN_WARNING, UNBOUNDED_RESULT_WARNING, detect_warnings};
