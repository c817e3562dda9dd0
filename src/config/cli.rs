//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// rangewatch: IPv4 Range Reachability Monitor
///
/// Periodically probes every host of the configured address ranges and
/// reports a rolling quality signal per host.
#[derive(Debug, Parser)]
#[command(name = "rangewatch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to configuration file
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Range to monitor as START or START-END (can be specified multiple times)
    #[arg(long = "range", value_name = "START[-END]")]
    pub ranges: Vec<String>,

    /// Probe interval in seconds for ranges given with --range
    #[arg(long)]
    pub interval: Option<u64>,

    /// Seconds between status reports
    #[arg(long = "report-interval")]
    pub report_interval: Option<u64>,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// Subcommands for rangewatch
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = "rangewatch.toml")]
        output: PathBuf,
    },

    /// Validate a new range and append it to the configuration file
    Add {
        /// First address of the range
        start: String,

        /// Last address of the range (defaults to START)
        end: Option<String>,

        /// Probe interval in seconds
        #[arg(long)]
        interval: Option<u64>,

        /// Free-form description shown in reports
        #[arg(long)]
        comment: Option<String>,
    },

    /// Remove a configured range from the configuration file
    Remove {
        /// First address of the range
        start: String,

        /// Last address of the range (defaults to START)
        end: Option<String>,
    },
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }
}
