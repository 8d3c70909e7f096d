//! Terminal and JSON rendering of analysis reports

use comfy_table::{
    Cell, CellAlignment, Color, ContentArrangement, Table, modifiers::UTF8_ROUND_CORNERS,
    presets::UTF8_FULL,
};
use pgguard_analyzer::{AnalysisReport, Priority, QueryPlan, RelatedService, ScoreGrade};
use std::fmt::Write as _;

fn new_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(
        header
            .iter()
            .map(|h| Cell::new(h).fg(Color::Cyan).set_alignment(CellAlignment::Center)),
    );
    table
}

fn priority_cell(priority: Priority) -> Cell {
    let color = match priority {
        Priority::High => Color::Red,
        Priority::Medium => Color::Yellow,
        Priority::Low => Color::Green,
    };
    Cell::new(priority.as_str()).fg(color)
}

fn grade_color(grade: ScoreGrade) -> Color {
    match grade {
        ScoreGrade::Good => Color::Green,
        ScoreGrade::Fair => Color::Yellow,
        ScoreGrade::Poor => Color::Red,
    }
}

fn number_cell(value: impl ToString) -> Cell {
    Cell::new(value.to_string()).set_alignment(CellAlignment::Right)
}

/// Renders the human-readable report
pub fn render_text(report: &AnalysisReport, max_cost: f64) -> String {
    let mut out = String::new();
    let metrics = &report.metrics;

    let _ = writeln!(out, "Query: {}", report.query);
    let tables = if report.tables_affected.is_empty() {
        "-".to_string()
    } else {
        report.tables_affected.join(", ")
    };
    let _ = writeln!(out, "Type: {}  Tables: {}", report.query_type, tables);
    if let Some(env) = &report.environment_tag {
        let _ = writeln!(out, "Environment: {}", env);
    }
    let _ = writeln!(out);

    let mut table = new_table(&["Metric", "Value"]);
    table.add_row(vec![Cell::new("Total cost"), number_cell(format!("{:.2}", metrics.total_cost))]);
    table.add_row(vec![
        Cell::new("Startup cost"),
        number_cell(format!("{:.2}", metrics.startup_cost)),
    ]);
    table.add_row(vec![
        Cell::new("Planning time (ms)"),
        number_cell(
            metrics
                .planning_time_ms
                .map(|ms| format!("{:.3}", ms))
                .unwrap_or_else(|| "-".to_string()),
        ),
    ]);
    table.add_row(vec![
        Cell::new("Estimated execution (ms)"),
        number_cell(format!("{:.2}", metrics.estimated_execution_time_ms)),
    ]);
    table.add_row(vec![Cell::new("Estimated rows"), number_cell(metrics.estimated_total_rows)]);
    table.add_row(vec![Cell::new("Row width (bytes)"), number_cell(metrics.plan_width_bytes)]);
    table.add_row(vec![Cell::new("Shared hit blocks"), number_cell(metrics.shared_hit_blocks)]);
    table.add_row(vec![Cell::new("Shared read blocks"), number_cell(metrics.shared_read_blocks)]);
    table.add_row(vec![
        Cell::new("Workers (planned/launched)"),
        number_cell(format!(
            "{}/{}",
            metrics.total_workers, metrics.parallel_workers_launched
        )),
    ]);
    table.add_row(vec![
        Cell::new("Node types"),
        Cell::new(
            metrics
                .distinct_node_types
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", "),
        ),
    ]);
    if !report.indexes_used.is_empty() {
        table.add_row(vec![Cell::new("Indexes used"), Cell::new(report.indexes_used.join(", "))]);
    }
    let _ = writeln!(out, "{}", table);

    if !report.recommendations.is_empty() {
        let mut table = new_table(&["#", "Priority", "Impact", "Issue", "Suggested action", "Gain"]);
        for (i, rec) in report.recommendations.iter().enumerate() {
            table.add_row(vec![
                number_cell(i + 1),
                priority_cell(rec.priority),
                number_cell(format!("{}/10", rec.impact_score)),
                Cell::new(&rec.description),
                Cell::new(&rec.suggested_action),
                Cell::new(&rec.estimated_improvement),
            ]);
        }
        let _ = writeln!(out, "\nRecommendations");
        let _ = writeln!(out, "{}", table);
    }

    if !report.warnings.is_empty() {
        let _ = writeln!(out, "\nWarnings");
        for warning in &report.warnings {
            let _ = writeln!(out, "  ! {}", warning);
        }
    }

    let grade = report.grade();
    let mut verdict = new_table(&["Score", "Grade", "Critical", "Gate"]);
    let gate = if report.passes_gate(max_cost) {
        Cell::new("PASS").fg(Color::Green)
    } else {
        Cell::new("FAIL").fg(Color::Red)
    };
    verdict.add_row(vec![
        number_cell(format!("{}/100", report.score)),
        Cell::new(grade.as_str()).fg(grade_color(grade)),
        Cell::new(if report.is_critical { "yes" } else { "no" }),
        gate,
    ]);
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", verdict);
    let _ = write!(out, "{} (max cost {:.2})", report.summary(), max_cost);

    out
}

/// Renders the report as pretty-printed JSON
pub fn render_json(report: &AnalysisReport) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Renders an indented outline of the plan tree, one node per line
pub fn render_plan_outline(plan: &QueryPlan) -> String {
    let mut out = String::new();
    for (depth, node) in plan.root.walk() {
        let indent = "   ".repeat(depth);
        let arrow = if depth == 0 { "" } else { "-> " };
        let _ = write!(out, "{}{}{}", indent, arrow, node.node_type);
        if let Some(relation) = &node.relation {
            let _ = write!(out, " on {}", relation);
        }
        if let Some(index) = &node.index_name {
            let _ = write!(out, " using {}", index);
        }
        match (node.startup_cost, node.total_cost) {
            (Some(startup), Some(total)) => {
                let _ = write!(out, "  (cost={:.2}..{:.2} rows={})", startup, total, node.rows_or_zero());
            }
            _ => {
                let _ = write!(out, "  (rows={})", node.rows_or_zero());
            }
        }
        if let Some(filter) = &node.filter {
            let _ = write!(out, "\n{}   Filter: {}", indent, filter);
        }
        out.push('\n');
    }
    if let Some(ms) = plan.planning_time_ms {
        let _ = writeln!(out, "Planning Time: {:.3} ms", ms);
    }
    out
}

/// Renders the catalog of managed services recommendations can point to
pub fn render_services() -> String {
    let mut table = new_table(&["Tag", "Service"]);
    for service in RelatedService::ALL {
        table.add_row(vec![Cell::new(service.as_str()), Cell::new(service.display_name())]);
    }
    table.to_string()
}
