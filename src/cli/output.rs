//! Output formatting helpers for CLI commands

use crate::planner::{BudgetProfile, ProcessingMode, SelectionResult};
use crate::schedule::RequestPlan;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use serde::Serialize;
use serde_json::json;

/// View model for a single planning decision
#[derive(Debug, Clone, Serialize)]
pub struct PlanView {
    pub mode: ProcessingMode,
    pub total_words: f64,
    pub selection: SelectionResult,
    pub profiles: Vec<BudgetProfile>,
}

/// Format a plan as a summary line followed by the ranked channel table
pub fn format_plan_table(view: &PlanView) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Rank", "Channel", "Budget", "Reliability", "Effective", "Selected"]);

    for (rank, p) in view.profiles.iter().enumerate() {
        let selected = if view.selection.channels.contains(&p.channel) {
            "yes".green().to_string()
        } else {
            "-".to_string()
        };

        table.add_row(vec![
            Cell::new(rank + 1),
            Cell::new(p.channel.as_str()),
            Cell::new(format!("{:.0}", p.raw_budget)),
            Cell::new(reliability_label(p.reliability)),
            Cell::new(format!("{:.0}", p.effective_budget)),
            Cell::new(selected),
        ]);
    }

    format!(
        "{} words ({}) -> {} worker(s), ~{:.1}s, capacity {:.0}\n{}",
        view.total_words,
        view.mode,
        view.selection.worker_count,
        view.selection.estimated_seconds,
        view.selection.capacity,
        table
    )
}

/// Format a plan as JSON
pub fn format_plan_json(view: &PlanView) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(view)
}

/// Format request plans as a table
pub fn format_schedule_table(mode: ProcessingMode, plans: &[RequestPlan]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Request", "Items", "Words", "Workers", "Est.", "Assignment"]);

    for plan in plans {
        let items = match plan.trimmed_from {
            Some(original) => format!("{} (trimmed from {})", plan.item_count, original)
                .yellow()
                .to_string(),
            None => plan.item_count.to_string(),
        };
        let assignment = plan
            .chunks
            .iter()
            .map(|c| format!("{}: {} items / {} words", c.channel, c.items.len(), c.words))
            .collect::<Vec<_>>()
            .join("\n");

        table.add_row(vec![
            Cell::new(plan.index),
            Cell::new(items),
            Cell::new(plan.words),
            Cell::new(plan.selection.worker_count),
            Cell::new(format!("{:.1}s", plan.selection.estimated_seconds)),
            Cell::new(assignment),
        ]);
    }

    let total_words = plans
        .iter()
        .fold(0u64, |total, p| total.saturating_add(p.words));
    format!(
        "{} request(s), {} words ({})\n{}",
        plans.len(),
        total_words,
        mode,
        table
    )
}

/// Format request plans as JSON
pub fn format_schedule_json(
    mode: ProcessingMode,
    plans: &[RequestPlan],
) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&json!({
        "mode": mode,
        "requests": plans
    }))
}

fn reliability_label(reliability: f64) -> String {
    let text = format!("{:.2}", reliability);
    if reliability >= 0.9 {
        text.green().to_string()
    } else if reliability >= 0.6 {
        text.yellow().to_string()
    } else {
        text.red().to_string()
    }
}
