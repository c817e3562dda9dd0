//! Shared test fixtures for monitor tests.

use std::net::Ipv4Addr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, SystemTime};

use tokio::time::Instant;

use crate::probe::{ProbeWaterfall, Reachability};
use crate::time::Clock;

/// Check with a fixed outcome and optional latency, counting its attempts.
pub struct CountingCheck {
    succeeds: bool,
    latency: Duration,
    calls: Arc<AtomicUsize>,
}

impl CountingCheck {
    pub fn new(succeeds: bool) -> (Self, Arc<AtomicUsize>) {
        Self::slow(succeeds, Duration::ZERO)
    }

    pub fn slow(succeeds: bool, latency: Duration) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let check = Self {
            succeeds,
            latency,
            calls: Arc::clone(&calls),
        };
        (check, calls)
    }
}

impl Reachability for CountingCheck {
    fn name(&self) -> &str {
        "CountingCheck"
    }

    async fn attempt(&self, _address: Ipv4Addr) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.succeeds
    }
}

/// Wall clock that follows tokio's (possibly paused) clock.
pub struct TokioClock {
    wall: SystemTime,
    base: Instant,
}

impl TokioClock {
    pub fn new() -> Self {
        Self {
            wall: SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000),
            base: Instant::now(),
        }
    }
}

impl Clock for TokioClock {
    fn now(&self) -> SystemTime {
        self.wall + Instant::now().duration_since(self.base)
    }
}

/// Waterfall over a single counting check stamped by [`TokioClock`].
pub fn counting_waterfall(
    succeeds: bool,
) -> (ProbeWaterfall<CountingCheck, TokioClock>, Arc<AtomicUsize>) {
    let (check, calls) = CountingCheck::new(succeeds);
    (ProbeWaterfall::with_clock(vec![check], TokioClock::new()), calls)
}

pub fn calls(counter: &AtomicUsize) -> usize {
    counter.load(Ordering::SeqCst)
}
