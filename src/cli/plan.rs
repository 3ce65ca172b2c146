//! Plan command implementation

use crate::cli::output::{format_plan_json, format_plan_table, PlanView};
use crate::cli::{load_config, read_snapshot, PlanArgs};
use crate::planner::Planner;

/// Handle `paraplan plan` command
pub fn handle_plan(args: &PlanArgs) -> Result<String, Box<dyn std::error::Error>> {
    let config = load_config(&args.config)?;
    let planner = Planner::from(&config.planner);
    let mode = args.mode.unwrap_or(config.planner.default_mode);
    let snapshot = read_snapshot(args.snapshot.as_deref());

    let view = PlanView {
        mode,
        total_words: args.words,
        selection: planner.choose_workers(args.words, mode, snapshot.as_ref()),
        profiles: planner.profiles(mode, snapshot.as_ref()),
    };

    if args.json {
        Ok(format_plan_json(&view)?)
    } else {
        Ok(format_plan_table(&view))
    }
}
