//! CLI module for paraplan
//!
//! Command-line interface definitions and handlers.
//!
//! # Commands
//!
//! - `plan` - Choose a worker plan for one job
//! - `schedule` - Slice a job into requests and plan each one
//! - `config` - Configuration utilities (init)
//! - `completions` - Generate shell completions
//!
//! # Example
//!
//! ```bash
//! # Plan a 4,000-word job against a captured health snapshot
//! paraplan plan --words 4000 --snapshot health.json
//!
//! # Schedule paragraphs of known size as JSON
//! paraplan schedule --word-counts 420,380,910,150 --json
//! ```

pub mod completions;
pub mod config;
pub mod output;
pub mod plan;
pub mod schedule;

pub use completions::handle_completions;
pub use config::handle_config_init;
pub use plan::handle_plan;
pub use schedule::handle_schedule;

use crate::config::ParaplanConfig;
use crate::planner::ProcessingMode;
use crate::telemetry::{load_snapshot, HealthSnapshot};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

/// paraplan - worker channel planner
#[derive(Parser, Debug)]
#[command(
    name = "paraplan",
    version,
    about = "Plans how many worker channels a text-processing job should use"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Choose a worker plan for one job
    Plan(PlanArgs),
    /// Slice a job into requests and plan each one
    Schedule(ScheduleArgs),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Total words in the job
    #[arg(short, long, allow_negative_numbers = true)]
    pub words: f64,

    /// Processing mode (dual, standard, ludicrous)
    #[arg(short, long)]
    pub mode: Option<ProcessingMode>,

    /// Health snapshot JSON file
    #[arg(short, long)]
    pub snapshot: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Path to configuration file
    #[arg(short, long, default_value = "paraplan.toml")]
    pub config: PathBuf,
}

#[derive(Args, Debug)]
pub struct ScheduleArgs {
    /// Word count of each work item, in order (comma separated)
    #[arg(long, value_delimiter = ',', required = true)]
    pub word_counts: Vec<u64>,

    /// Processing mode (dual, standard, ludicrous)
    #[arg(short, long)]
    pub mode: Option<ProcessingMode>,

    /// Health snapshot JSON file
    #[arg(short, long)]
    pub snapshot: Option<PathBuf>,

    /// Override the maximum words per request
    #[arg(long)]
    pub max_words: Option<u64>,

    /// Override the maximum items per request
    #[arg(long)]
    pub max_items: Option<usize>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Path to configuration file
    #[arg(short, long, default_value = "paraplan.toml")]
    pub config: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Initialize a new configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output file path
    #[arg(short, long, default_value = "paraplan.toml")]
    pub output: PathBuf,

    /// Overwrite existing file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

/// Load config from `path` if it exists, then apply environment overrides
/// and validate.
pub fn load_config(path: &Path) -> Result<ParaplanConfig, Box<dyn std::error::Error>> {
    let config = if path.exists() {
        ParaplanConfig::load(Some(path))?
    } else {
        tracing::debug!(path = %path.display(), "Config file not found, using defaults");
        ParaplanConfig::default()
    };
    let config = config.with_env_overrides();
    config.validate()?;
    Ok(config)
}

/// Read a snapshot file, treating an unreadable or malformed file as "no
/// telemetry" so planning can still proceed.
pub fn read_snapshot(path: Option<&Path>) -> Option<HealthSnapshot> {
    let path = path?;
    match load_snapshot(path) {
        Ok(snapshot) => Some(snapshot),
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "Ignoring unusable health snapshot"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_parse_plan_defaults() {
        let cli = Cli::try_parse_from(["paraplan", "plan", "--words", "1200"]).unwrap();
        match cli.command {
            Commands::Plan(args) => {
                assert_eq!(args.words, 1200.0);
                assert_eq!(args.config, PathBuf::from("paraplan.toml"));
                assert!(args.snapshot.is_none());
                assert!(!args.json);
            }
            _ => panic!("Expected Plan command"),
        }
    }

    #[test]
    fn test_cli_parse_plan_with_mode_alias() {
        let cli =
            Cli::try_parse_from(["paraplan", "plan", "-w", "500", "--mode", "std"]).unwrap();
        match cli.command {
            Commands::Plan(args) => assert_eq!(args.mode, Some(ProcessingMode::Standard)),
            _ => panic!("Expected Plan command"),
        }
    }

    #[test]
    fn test_cli_parse_plan_negative_words() {
        let cli = Cli::try_parse_from(["paraplan", "plan", "--words", "-10"]).unwrap();
        match cli.command {
            Commands::Plan(args) => assert_eq!(args.words, -10.0),
            _ => panic!("Expected Plan command"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_mode() {
        let result = Cli::try_parse_from(["paraplan", "plan", "-w", "500", "-m", "turbo"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parse_schedule_word_counts() {
        let cli = Cli::try_parse_from([
            "paraplan",
            "schedule",
            "--word-counts",
            "120,340,80",
            "--max-words",
            "1000",
        ])
        .unwrap();
        match cli.command {
            Commands::Schedule(args) => {
                assert_eq!(args.word_counts, vec![120, 340, 80]);
                assert_eq!(args.max_words, Some(1000));
                assert!(args.max_items.is_none());
            }
            _ => panic!("Expected Schedule command"),
        }
    }

    #[test]
    fn test_cli_schedule_requires_word_counts() {
        assert!(Cli::try_parse_from(["paraplan", "schedule"]).is_err());
    }

    #[test]
    fn test_cli_parse_config_init() {
        let cli = Cli::try_parse_from(["paraplan", "config", "init", "--force"]).unwrap();
        match cli.command {
            Commands::Config(ConfigCommands::Init(args)) => assert!(args.force),
            _ => panic!("Expected Config Init command"),
        }
    }

    #[test]
    fn test_read_snapshot_ignores_malformed_file() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(temp.path(), "not json").unwrap();
        assert!(read_snapshot(Some(temp.path())).is_none());
    }

    #[test]
    fn test_read_snapshot_none_without_path() {
        assert!(read_snapshot(None).is_none());
    }

    #[test]
    fn test_load_config_missing_file_uses_defaults() {
        let config = load_config(Path::new("/nonexistent/paraplan.toml")).unwrap();
        assert!(!config.planner.channels.is_empty());
    }

    #[test]
    fn test_load_config_rejects_invalid_file() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(temp.path(), "[batching]\nmax_items_per_request = 0").unwrap();
        assert!(load_config(temp.path()).is_err());
    }
}
