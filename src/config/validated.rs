//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configuration that is used
//! by the application. All validation is performed during construction.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use crate::host::{AddressRange, parse_ipv4};

use super::cli::Cli;
use super::defaults;
use super::error::{ConfigError, field};
use super::toml::{MonitorEntry, TomlConfig};

/// One validated range ready to be turned into a monitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorSettings {
    /// Inclusive address range, `start <= end`
    pub range: AddressRange,

    /// Probe interval in seconds, within the accepted bounds
    pub interval: u64,

    /// Free-form description, possibly empty
    pub comment: String,
}

impl MonitorSettings {
    /// Validates a range given as text bounds.
    ///
    /// # Errors
    ///
    /// Returns an error if either bound is not an IPv4 address, if
    /// `start > end`, if the range spans more than
    /// [`defaults::MAX_RANGE_HOSTS`] hosts, or if the interval is out of bounds.
    pub fn parse(start: &str, end: &str, interval: u64, comment: &str) -> Result<Self, ConfigError> {
        let range = parse_range(start, end)?;
        validate_size(range)?;
        validate_interval(range, interval)?;

        Ok(Self {
            range,
            interval,
            comment: comment.to_string(),
        })
    }

    /// Validates one `[[monitor]]` entry of the config file.
    ///
    /// # Errors
    ///
    /// See [`MonitorSettings::parse`].
    pub fn from_entry(entry: &MonitorEntry) -> Result<Self, ConfigError> {
        Self::parse(
            &entry.start,
            entry.end_or_start(),
            entry.interval.unwrap_or(defaults::INTERVAL_SECS),
            entry.comment.as_deref().unwrap_or_default(),
        )
    }

    /// Textual first address.
    #[must_use]
    pub fn start(&self) -> String {
        self.range.start().to_string()
    }

    /// Textual last address.
    #[must_use]
    pub fn end(&self) -> String {
        self.range.end().to_string()
    }
}

impl fmt::Display for MonitorSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} every {}s", self.range, self.interval)?;
        if !self.comment.is_empty() {
            write!(f, " ({})", self.comment)?;
        }
        Ok(())
    }
}

/// Fully validated configuration ready for use by the application.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and optional TOML config.
/// The function validates all inputs and returns errors for invalid configurations.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// Ranges to monitor, in configuration order, pairwise disjoint
    pub monitors: Vec<MonitorSettings>,

    /// Period between status reports
    pub report_interval: Duration,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hosts: u64 = self.monitors.iter().map(|m| m.range.host_count()).sum();

        write!(
            f,
            "Config {{ ranges: {}, hosts: {}, report_interval: {}s }}",
            self.monitors.len(),
            hosts,
            self.report_interval.as_secs(),
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and optional TOML config.
    ///
    /// CLI arguments take precedence over TOML config values. Ranges given on
    /// the command line replace those of the file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - An address is malformed or a range is reversed
    /// - An interval is out of bounds
    /// - Two ranges are equal, overlap, or contain one another
    /// - No range is configured
    /// - The report interval is zero
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let candidates = Self::resolve_monitors(cli, toml)?;

        let mut monitors: Vec<MonitorSettings> = Vec::with_capacity(candidates.len());
        for settings in candidates {
            check_conflicts(&monitors, settings.range)?;
            monitors.push(settings);
        }

        if monitors.is_empty() {
            return Err(ConfigError::NoRanges {
                hint: "Use --range or add [[monitor]] entries to the config file",
            });
        }

        let report_interval = Self::resolve_report_interval(cli, toml)?;

        Ok(Self {
            monitors,
            report_interval,
            verbose: cli.verbose,
        })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// If `cli.config` is set, loads the TOML file from that path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = if let Some(ref path) = cli.config {
            Some(TomlConfig::load(path)?)
        } else {
            None
        };

        Self::from_raw(cli, toml.as_ref())
    }

    fn resolve_monitors(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<Vec<MonitorSettings>, ConfigError> {
        // CLI ranges replace file ranges
        if !cli.ranges.is_empty() {
            let interval = cli.interval.unwrap_or(defaults::INTERVAL_SECS);
            return cli
                .ranges
                .iter()
                .map(|arg| {
                    let (start, end) = split_range_arg(arg);
                    MonitorSettings::parse(start, end, interval, "")
                })
                .collect();
        }

        toml.map_or_else(
            || Ok(Vec::new()),
            |t| t.monitor.iter().map(MonitorSettings::from_entry).collect(),
        )
    }

    fn resolve_report_interval(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<Duration, ConfigError> {
        let secs = cli
            .report_interval
            .or_else(|| toml.and_then(|t| t.settings.report_interval))
            .unwrap_or(defaults::REPORT_INTERVAL_SECS);

        if secs == 0 {
            return Err(ConfigError::InvalidDuration {
                field: field::REPORT_INTERVAL,
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(Duration::from_secs(secs))
    }
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Validates `entry` against the ranges of the file at `path` and appends it.
///
/// A missing file is treated as an empty configuration and created.
/// Existing entries are validated too, so a broken file is never extended.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed or written, if any
/// entry is invalid, or if the new range collides with a configured one.
pub fn add_monitor_to_file(path: &Path, entry: MonitorEntry) -> Result<MonitorSettings, ConfigError> {
    let mut config = if path.exists() {
        TomlConfig::load(path)?
    } else {
        TomlConfig::default()
    };

    let existing = config
        .monitor
        .iter()
        .map(MonitorSettings::from_entry)
        .collect::<Result<Vec<_>, _>>()?;

    let settings = MonitorSettings::from_entry(&entry)?;
    check_conflicts(&existing, settings.range)?;

    config.monitor.push(entry);
    config.save(path)?;

    Ok(settings)
}

/// Removes the entry covering exactly `start`..=`end` from the file at `path`.
///
/// Entries are matched by their parsed bounds, so `10.0.0.1` and
/// `10.0.0.1-10.0.0.1` name the same range. Returns the removed entry.
///
/// # Errors
///
/// Returns an error if the bounds are invalid, if the file cannot be read,
/// parsed or written, or if no entry matches.
pub fn remove_monitor_from_file(
    path: &Path,
    start: &str,
    end: &str,
) -> Result<MonitorEntry, ConfigError> {
    let target = parse_range(start, end)?;
    let mut config = TomlConfig::load(path)?;

    let position = config
        .monitor
        .iter()
        .position(|entry| parse_range(&entry.start, entry.end_or_start()).ok() == Some(target))
        .ok_or(ConfigError::RangeNotConfigured(target))?;

    let removed = config.monitor.remove(position);
    config.save(path)?;

    Ok(removed)
}

// Helper functions

fn parse_range(start: &str, end: &str) -> Result<AddressRange, ConfigError> {
    let first = parse_ipv4(start).ok_or_else(|| ConfigError::address(field::START, start))?;
    let last = parse_ipv4(end).ok_or_else(|| ConfigError::address(field::END, end))?;

    AddressRange::new(first, last).ok_or_else(|| ConfigError::InvalidRange {
        value: format!("{start}-{end}"),
        reason: "start address is after end address",
    })
}

/// Splits `START-END` into its bounds; a bare address is a single-host range.
fn split_range_arg(arg: &str) -> (&str, &str) {
    arg.split_once('-')
        .map_or((arg.trim(), arg.trim()), |(start, end)| (start.trim(), end.trim()))
}

fn validate_size(range: AddressRange) -> Result<(), ConfigError> {
    let hosts = range.host_count();
    if hosts > defaults::MAX_RANGE_HOSTS {
        return Err(ConfigError::RangeTooLarge {
            range,
            hosts,
            max: defaults::MAX_RANGE_HOSTS,
        });
    }
    Ok(())
}

fn validate_interval(range: AddressRange, interval: u64) -> Result<(), ConfigError> {
    if (defaults::MIN_INTERVAL_SECS..=defaults::MAX_INTERVAL_SECS).contains(&interval) {
        Ok(())
    } else {
        Err(ConfigError::InvalidInterval {
            range,
            value: interval,
            min: defaults::MIN_INTERVAL_SECS,
            max: defaults::MAX_INTERVAL_SECS,
        })
    }
}

/// Rejects `range` if it shares any address with one of `existing`.
fn check_conflicts(existing: &[MonitorSettings], range: AddressRange) -> Result<(), ConfigError> {
    let Some(collision) = existing
        .iter()
        .map(|settings| settings.range)
        .find(|other| other.overlaps(&range))
    else {
        return Ok(());
    };

    if collision == range {
        Err(ConfigError::DuplicateRange(range))
    } else if collision.contains_range(&range) || range.contains_range(&collision) {
        Err(ConfigError::ContainedRange {
            range,
            existing: collision,
        })
    } else {
        Err(ConfigError::OverlappingRange {
            range,
            existing: collision,
        })
    }
}
