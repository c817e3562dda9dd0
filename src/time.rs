//! Time abstraction for testability.
//!
//! This module provides a [`Clock`] trait that allows injecting mock clocks
//! in tests while using the real system clock in production, plus the
//! calendar formatting shared by probes and status reports.

use std::time::{Duration, SystemTime};

use chrono::{DateTime, Local};

/// Seconds between 1900-01-01 and the Unix epoch (RFC 868).
pub const SECONDS_1900_TO_1970: u64 = 2_208_988_800;

/// Abstraction over wall-clock time for testability.
///
/// Only display timestamps come from a [`Clock`]. Scheduling uses the
/// monotonic tokio clock so that paused-time tests stay deterministic.
///
/// # Example
///
/// ```
/// use rangewatch::time::{Clock, SystemClock};
///
/// let clock = SystemClock;
/// let now = clock.now();
/// assert!(now >= std::time::SystemTime::UNIX_EPOCH);
/// ```
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> SystemTime;
}

/// Production clock using actual system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Formats a timestamp as local `YYYY-MM-DD HH:MM:SS`.
#[must_use]
pub fn format_timestamp(time: SystemTime) -> String {
    DateTime::<Local>::from(time)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// Converts an RFC 868 time value (seconds since 1900) to a [`SystemTime`].
///
/// Returns `None` for values before the Unix epoch.
#[must_use]
pub fn from_rfc868(seconds_since_1900: u32) -> Option<SystemTime> {
    u64::from(seconds_since_1900)
        .checked_sub(SECONDS_1900_TO_1970)
        .map(|secs| SystemTime::UNIX_EPOCH + Duration::from_secs(secs))
}
