//! Default values for configuration options.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

use std::time::Duration;

/// Default probe interval of a range in seconds.
pub const INTERVAL_SECS: u64 = 30;

/// Smallest accepted probe interval in seconds.
pub const MIN_INTERVAL_SECS: u64 = 10;

/// Largest accepted probe interval in seconds.
pub const MAX_INTERVAL_SECS: u64 = 300;

/// Largest number of hosts a single range may span.
pub const MAX_RANGE_HOSTS: u64 = 65_536;

/// Default period between status reports in seconds.
pub const REPORT_INTERVAL_SECS: u64 = 60;

/// Default config file name used by `init` and `add`.
pub const CONFIG_FILE: &str = "rangewatch.toml";

/// Default status report period as Duration.
#[must_use]
pub const fn report_interval() -> Duration {
    Duration::from_secs(REPORT_INTERVAL_SECS)
}
