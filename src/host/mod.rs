//! Host layer: monitored addresses and their reachability state.
//!
//! This module provides:
//! - A single monitored address with rolling state ([`Host`])
//! - The saturating reliability counter ([`Quality`])
//! - Read-only views for display ([`HostState`], [`HostSnapshot`])
//! - IPv4 range parsing and expansion ([`AddressRange`], [`expand_range`])

mod range;

#[cfg(test)]
mod range_tests;

pub use range::{AddressRange, expand_range, parse_ipv4};

use std::fmt;
use std::hash::{Hash, Hasher};
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime};

use tokio::sync::watch;
use tokio::time::Instant;

/// Interval applied when a host is given a non-positive interval.
pub const DEFAULT_INTERVAL_SECS: u64 = 5;

/// Bounded reliability signal in `0..=Quality::MAX`.
///
/// Raised by one on every successful probe round, lowered by one on every
/// failed round. Saturates at both ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quality(u8);

impl Quality {
    /// Upper saturation level.
    pub const MAX: u8 = 10;

    /// Returns the raw value.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Returns the quality raised by one, capped at [`Self::MAX`].
    #[must_use]
    pub const fn raised(self) -> Self {
        if self.0 < Self::MAX {
            Self(self.0 + 1)
        } else {
            self
        }
    }

    /// Returns the quality lowered by one, floored at zero.
    #[must_use]
    pub const fn lowered(self) -> Self {
        Self(self.0.saturating_sub(1))
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0, Self::MAX)
    }
}

/// Mutable reachability state of a [`Host`].
///
/// Only the scheduler owning the host writes it; everyone else observes
/// copies through [`Host::state`] or [`Host::subscribe`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostState {
    /// Wall-clock time the most recent probe round began.
    pub last_probe: SystemTime,
    /// Outcome of the most recent probe round.
    pub last_result: bool,
    /// Rolling reliability signal.
    pub quality: Quality,
    /// Name of the check that succeeded last round, empty when none did.
    pub last_technique: String,
    /// Monotonic start of the most recent round, `None` before the first.
    pub(crate) probe_started: Option<Instant>,
}

/// Point-in-time copy of a host for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostSnapshot {
    pub address: Ipv4Addr,
    pub interval: Duration,
    pub last_probe: SystemTime,
    pub last_result: bool,
    pub quality: Quality,
    pub last_technique: String,
}

/// One monitored IPv4 address.
///
/// Identity (equality and hashing) is the address alone.
#[derive(Debug)]
pub struct Host {
    address: Ipv4Addr,
    interval_secs: AtomicU64,
    state: watch::Sender<HostState>,
}

impl Host {
    /// Creates a host probed every `interval_secs` seconds.
    ///
    /// A zero interval is replaced by [`DEFAULT_INTERVAL_SECS`]. The last
    /// probe time starts one interval in the past so the first scheduling
    /// check is due immediately.
    #[must_use]
    pub fn new(address: Ipv4Addr, interval_secs: u64) -> Self {
        let interval_secs = normalize_interval(address, interval_secs);
        let now = SystemTime::now();
        let last_probe = now
            .checked_sub(Duration::from_secs(interval_secs))
            .unwrap_or(now);

        let (state, _) = watch::channel(HostState {
            last_probe,
            last_result: false,
            quality: Quality::default(),
            last_technique: String::new(),
            probe_started: None,
        });

        Self {
            address,
            interval_secs: AtomicU64::new(interval_secs),
            state,
        }
    }

    /// Returns the monitored address.
    #[must_use]
    pub const fn address(&self) -> Ipv4Addr {
        self.address
    }

    /// Returns the current probe interval.
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.load(Ordering::Acquire))
    }

    /// Changes the probe interval; zero falls back to the default.
    ///
    /// A running scheduler picks the new value up on its next evaluation.
    pub fn set_interval(&self, interval_secs: u64) {
        let interval_secs = normalize_interval(self.address, interval_secs);
        self.interval_secs.store(interval_secs, Ordering::Release);
    }

    /// Returns a copy of the current state.
    #[must_use]
    pub fn state(&self) -> HostState {
        self.state.borrow().clone()
    }

    /// Returns a receiver that is notified after every probe round.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<HostState> {
        self.state.subscribe()
    }

    /// Returns a copy of the host including its address and interval.
    #[must_use]
    pub fn snapshot(&self) -> HostSnapshot {
        let state = self.state.borrow();
        HostSnapshot {
            address: self.address,
            interval: self.interval(),
            last_probe: state.last_probe,
            last_result: state.last_result,
            quality: state.quality,
            last_technique: state.last_technique.clone(),
        }
    }

    /// Returns how long until the next round is due, or `None` if it is due now.
    pub(crate) fn due_in(&self, now: Instant) -> Option<Duration> {
        let started = self.state.borrow().probe_started?;
        let elapsed = now.saturating_duration_since(started);
        self.interval().checked_sub(elapsed).filter(|d| !d.is_zero())
    }

    /// Records the outcome of one probe round.
    ///
    /// `technique` is the name of the succeeding check, or `None` when every
    /// check failed. Timestamps are those of the round's start.
    pub(crate) fn record_round(
        &self,
        started: Instant,
        started_at: SystemTime,
        technique: Option<&str>,
    ) {
        self.state.send_modify(|state| {
            state.last_result = technique.is_some();
            let technique = technique.unwrap_or_default();

            state.probe_started = Some(started);
            state.last_probe = started_at;
            state.quality = if technique.is_empty() {
                state.quality.lowered()
            } else {
                state.quality.raised()
            };
            state.last_technique = technique.to_string();
        });
    }
}

impl PartialEq for Host {
    fn eq(&self, other: &Self) -> bool {
        self.address == other.address
    }
}

impl Eq for Host {}

impl Hash for Host {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.address.hash(state);
    }
}

fn normalize_interval(address: Ipv4Addr, interval_secs: u64) -> u64 {
    if interval_secs == 0 {
        tracing::warn!(
            "Interval 0 for {address} is invalid, using default of {DEFAULT_INTERVAL_SECS}s"
        );
        DEFAULT_INTERVAL_SECS
    } else {
        interval_secs
    }
}
