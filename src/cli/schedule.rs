//! Schedule command implementation

use crate::cli::output::{format_schedule_json, format_schedule_table};
use crate::cli::{load_config, read_snapshot, ScheduleArgs};
use crate::planner::Planner;
use crate::schedule::{BatchLimits, Scheduler, WorkItem};

/// Handle `paraplan schedule` command
pub fn handle_schedule(args: &ScheduleArgs) -> Result<String, Box<dyn std::error::Error>> {
    let mut config = load_config(&args.config)?;
    if let Some(max_words) = args.max_words {
        config.batching.max_words_per_request = max_words;
    }
    if let Some(max_items) = args.max_items {
        config.batching.max_items_per_request = max_items;
    }
    config.batching.validate()?;

    let scheduler = Scheduler::new(
        Planner::from(&config.planner),
        BatchLimits::from(&config.batching),
    );
    let mode = args.mode.unwrap_or(config.planner.default_mode);
    let snapshot = read_snapshot(args.snapshot.as_deref());

    let items: Vec<WorkItem> = args
        .word_counts
        .iter()
        .enumerate()
        .map(|(id, &words)| WorkItem::new(id, words))
        .collect();
    let plans = scheduler.schedule(&items, mode, snapshot.as_ref());

    if args.json {
        Ok(format_schedule_json(mode, &plans)?)
    } else {
        Ok(format_schedule_table(mode, &plans))
    }
}
