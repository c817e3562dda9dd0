//! rangewatch: IPv4 Range Reachability Monitor
//!
//! Entry point for the rangewatch application.

use rangewatch::config::{
    Cli, Command, MonitorEntry, ValidatedConfig, add_monitor_to_file, defaults,
    remove_monitor_from_file, write_default_config,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

mod app;
mod run;

use app::{exit_code, print_config_hint, setup_tracing};

/// Main entry point.
///
/// Excluded from coverage as it's the thin wrapper around testable components.
#[cfg(not(tarpaulin_include))]
fn main() -> ExitCode {
    let cli = Cli::parse_args();
    let config_path = || {
        cli.config
            .clone()
            .unwrap_or_else(|| PathBuf::from(defaults::CONFIG_FILE))
    };

    match &cli.command {
        Some(Command::Init { output }) => return handle_init(output),
        Some(Command::Add {
            start,
            end,
            interval,
            comment,
        }) => {
            let entry = MonitorEntry {
                start: start.clone(),
                end: end.clone(),
                interval: *interval,
                comment: comment.clone(),
            };
            return handle_add(&config_path(), entry);
        }
        Some(Command::Remove { start, end }) => {
            let end = end.as_deref().unwrap_or(start);
            return handle_remove(&config_path(), start, end);
        }
        None => {}
    }

    // Load and validate configuration
    let config = match ValidatedConfig::load(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            print_config_hint(&e);
            return exit_code::CONFIG_ERROR;
        }
    };

    // Setup logging and run
    setup_tracing(config.verbose);
    tracing::info!("{config}");

    run_application(config)
}

/// Handles the `init` subcommand.
fn handle_init(output: &Path) -> ExitCode {
    match write_default_config(output) {
        Ok(()) => {
            println!("Configuration template written to: {}", output.display());
            exit_code::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            exit_code::CONFIG_ERROR
        }
    }
}

/// Handles the `add` subcommand.
fn handle_add(path: &Path, entry: MonitorEntry) -> ExitCode {
    match add_monitor_to_file(path, entry) {
        Ok(settings) => {
            println!("Added {settings} to {}", path.display());
            exit_code::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            print_config_hint(&e);
            exit_code::CONFIG_ERROR
        }
    }
}

/// Handles the `remove` subcommand.
fn handle_remove(path: &Path, start: &str, end: &str) -> ExitCode {
    match remove_monitor_from_file(path, start, end) {
        Ok(entry) => {
            println!(
                "Removed {} - {} from {}",
                entry.start,
                entry.end_or_start(),
                path.display()
            );
            exit_code::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            print_config_hint(&e);
            exit_code::CONFIG_ERROR
        }
    }
}

/// Runs the main application with the given configuration.
///
/// Excluded from coverage - requires async runtime.
#[cfg(not(tarpaulin_include))]
fn run_application(config: ValidatedConfig) -> ExitCode {
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Failed to create Tokio runtime: {e}");
            return exit_code::runtime_error();
        }
    };

    match runtime.block_on(run::execute(config)) {
        Ok(()) => exit_code::SUCCESS,
        Err(e) => {
            tracing::error!("Application error: {e}");
            exit_code::runtime_error()
        }
    }
}
