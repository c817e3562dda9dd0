//! Ordered fallback across reachability checks.

use std::net::Ipv4Addr;

use tokio::time::Instant;

use super::{Reachability, ReachabilityCheck};
use crate::host::Host;
use crate::time::{Clock, SystemClock};

/// Tries each check in order until one succeeds, then records the round.
///
/// # Type Parameters
///
/// * `R` - The check type (defaults to [`ReachabilityCheck`])
/// * `C` - The [`Clock`] stamping each round (defaults to [`SystemClock`])
///
/// # Example
///
/// ```ignore
/// use rangewatch::host::Host;
/// use rangewatch::probe::ProbeWaterfall;
///
/// let waterfall = ProbeWaterfall::new();
/// let host = Host::new("192.168.1.10".parse().unwrap(), 30);
/// let reachable = waterfall.run(&host).await;
/// ```
#[derive(Debug)]
pub struct ProbeWaterfall<R = ReachabilityCheck, C = SystemClock> {
    checks: Vec<R>,
    clock: C,
}

impl ProbeWaterfall<ReachabilityCheck, SystemClock> {
    /// Creates a waterfall over [`ReachabilityCheck::default_order`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_checks(ReachabilityCheck::default_order())
    }
}

impl Default for ProbeWaterfall<ReachabilityCheck, SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> ProbeWaterfall<R, SystemClock> {
    /// Creates a waterfall over `checks`, tried in the given order.
    #[must_use]
    pub const fn with_checks(checks: Vec<R>) -> Self {
        Self::with_clock(checks, SystemClock)
    }
}

impl<R, C> ProbeWaterfall<R, C> {
    /// Creates a waterfall with a custom clock for round timestamps.
    #[must_use]
    pub const fn with_clock(checks: Vec<R>, clock: C) -> Self {
        Self { checks, clock }
    }

    /// Returns the checks in resolution order.
    #[must_use]
    pub fn checks(&self) -> &[R] {
        &self.checks
    }
}

impl<R, C> ProbeWaterfall<R, C>
where
    R: Reachability,
    C: Clock,
{
    /// Runs one round against `host` and records its outcome.
    ///
    /// Stops at the first succeeding check. The host's last probe time is
    /// the moment the round began, so intervals are measured start to start.
    /// Returns whether any check succeeded.
    pub async fn run(&self, host: &Host) -> bool {
        let started = Instant::now();
        let started_at = self.clock.now();
        let address = host.address();

        let technique = self.first_success(address).await;
        host.record_round(started, started_at, technique);

        let quality = host.state().quality;
        match technique {
            Some(name) => tracing::debug!("{name} <{address}> reachable, quality={quality}"),
            None => tracing::debug!("<{address}> unreachable, quality={quality}"),
        }

        technique.is_some()
    }

    async fn first_success(&self, address: Ipv4Addr) -> Option<&str> {
        for check in &self.checks {
            if check.attempt(address).await {
                return Some(check.name());
            }
        }
        None
    }
}
