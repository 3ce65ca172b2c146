use clap::Parser;
use paraplan::cli::{
    handle_completions, handle_config_init, handle_plan, handle_schedule, load_config, Cli,
    Commands, ConfigCommands,
};
use paraplan::config::ParaplanConfig;
use paraplan::logging::init_tracing;
use std::path::Path;

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Plan(args) => {
            start_tracing(&args.config);
            handle_plan(&args)
        }
        Commands::Schedule(args) => {
            start_tracing(&args.config);
            handle_schedule(&args)
        }
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::Init(args) => handle_config_init(&args),
        },
        Commands::Completions(args) => {
            handle_completions(&args);
            Ok(String::new())
        }
    };

    match result {
        Ok(output) if !output.is_empty() => println!("{}", output),
        Ok(_) => {}
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Install logging from the config file; config errors surface later from the
/// command handler itself.
fn start_tracing(config_path: &Path) {
    let logging = load_config(config_path)
        .unwrap_or_else(|_| ParaplanConfig::default().with_env_overrides())
        .logging;
    if let Err(e) = init_tracing(&logging) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }
}
