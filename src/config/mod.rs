//! Configuration layer for rangewatch.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`])
//! - TOML configuration file parsing and writing ([`TomlConfig`])
//! - Validated configuration ([`ValidatedConfig`], [`MonitorSettings`])
//! - Configuration file generation and editing ([`write_default_config`],
//!   [`add_monitor_to_file`], [`remove_monitor_from_file`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! Configuration values are resolved with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments** - Values explicitly passed via command line
//! 2. **TOML config file** - Values from the configuration file
//! 3. **Built-in defaults** - Hardcoded default values
//!
//! Ranges given with `--range` **replace** the `[[monitor]]` entries of the
//! config file entirely (not merged). `--interval` only applies to CLI ranges;
//! file entries carry their own interval.
//!
//! # Range Rules
//!
//! Every range must consist of two valid dotted-quad addresses with
//! `start <= end`, its interval must lie within
//! [`defaults::MIN_INTERVAL_SECS`]..=[`defaults::MAX_INTERVAL_SECS`], and no
//! two ranges may be equal, overlap, or contain one another. A single range
//! spans at most [`defaults::MAX_RANGE_HOSTS`] addresses.

mod cli;
pub mod defaults;
mod error;
mod toml;
mod validated;

#[cfg(test)]
mod toml_tests;

pub use cli::{Cli, Command};
pub use error::{ConfigError, field};
pub use toml::{MonitorEntry, SettingsSection, TomlConfig, default_config_template};
pub use validated::{
    MonitorSettings, ValidatedConfig, add_monitor_to_file, remove_monitor_from_file,
    write_default_config,
};
