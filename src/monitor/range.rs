//! Monitor owning every host of one address range.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::runtime::Handle;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use super::scheduler::HostScheduler;
use crate::host::{Host, HostSnapshot, expand_range};
use crate::probe::{ProbeWaterfall, Reachability, ReachabilityCheck};
use crate::time::{Clock, SystemClock};

static NEXT_POOL_ID: AtomicU64 = AtomicU64::new(1);

/// Workers launched by one `start`, torn down together by `stop`.
struct WorkerPool {
    id: u64,
    cancel: CancellationToken,
    tasks: JoinSet<()>,
}

/// Point-in-time copy of a monitor for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorSnapshot {
    pub start: String,
    pub end: String,
    pub interval: u64,
    pub comment: String,
    pub running: bool,
    pub hosts: Vec<HostSnapshot>,
}

/// Probes every host of an inclusive IPv4 range, one worker per host.
///
/// Hosts are built once at construction and survive `stop`/`start` cycles,
/// so their quality keeps accumulating across restarts of the same monitor.
///
/// # Type Parameters
///
/// * `R` - The check type used by the waterfall (defaults to [`ReachabilityCheck`])
/// * `C` - The [`Clock`] stamping probe rounds (defaults to [`SystemClock`])
///
/// # Example
///
/// ```ignore
/// use rangewatch::monitor::RangeMonitor;
///
/// let mut monitor = RangeMonitor::new("192.168.1.1", "192.168.1.20", 30, "office");
/// monitor.start();
/// // ... read monitor.snapshot() periodically ...
/// monitor.stop().await;
/// ```
pub struct RangeMonitor<R = ReachabilityCheck, C = SystemClock> {
    start: String,
    end: String,
    interval: u64,
    comment: String,
    hosts: Vec<Arc<Host>>,
    waterfall: Arc<ProbeWaterfall<R, C>>,
    pool: Option<WorkerPool>,
}

impl RangeMonitor<ReachabilityCheck, SystemClock> {
    /// Creates a monitor using the default check order.
    ///
    /// Malformed or reversed bounds produce a monitor without hosts.
    #[must_use]
    pub fn new(start: &str, end: &str, interval: u64, comment: &str) -> Self {
        Self::with_waterfall(start, end, interval, comment, ProbeWaterfall::new())
    }

    /// Creates a monitor for a single address.
    #[must_use]
    pub fn single(address: &str, interval: u64, comment: &str) -> Self {
        Self::new(address, address, interval, comment)
    }
}

impl<R, C> RangeMonitor<R, C> {
    /// Creates a monitor probing with a custom waterfall.
    #[must_use]
    pub fn with_waterfall(
        start: &str,
        end: &str,
        interval: u64,
        comment: &str,
        waterfall: ProbeWaterfall<R, C>,
    ) -> Self {
        let hosts: Vec<_> = expand_range(start, end)
            .into_iter()
            .map(|address| Arc::new(Host::new(address, interval)))
            .collect();

        if hosts.is_empty() {
            tracing::error!("Range {start} - {end} does not resolve to any host");
        }

        Self {
            start: start.to_string(),
            end: end.to_string(),
            interval,
            comment: comment.to_string(),
            hosts,
            waterfall: Arc::new(waterfall),
            pool: None,
        }
    }

    #[must_use]
    pub fn start_address(&self) -> &str {
        &self.start
    }

    #[must_use]
    pub fn end_address(&self) -> &str {
        &self.end
    }

    #[must_use]
    pub const fn interval(&self) -> u64 {
        self.interval
    }

    #[must_use]
    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// Returns the hosts in ascending address order.
    #[must_use]
    pub fn hosts(&self) -> &[Arc<Host>] {
        &self.hosts
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.pool.is_some()
    }

    /// Updates the interval of the monitor and of every host.
    ///
    /// Running schedulers pick up the change on their next evaluation.
    pub fn set_interval(&mut self, interval: u64) {
        self.interval = interval;
        for host in &self.hosts {
            host.set_interval(interval);
        }
    }

    /// Returns a copy of the monitor and all of its hosts.
    #[must_use]
    pub fn snapshot(&self) -> MonitorSnapshot {
        MonitorSnapshot {
            start: self.start.clone(),
            end: self.end.clone(),
            interval: self.interval,
            comment: self.comment.clone(),
            running: self.is_running(),
            hosts: self.hosts.iter().map(|host| host.snapshot()).collect(),
        }
    }

    /// Cancels every worker and waits for all of them to finish.
    ///
    /// Safe to call when not running. Host state is left untouched.
    pub async fn stop(&mut self) {
        let Some(mut pool) = self.pool.take() else {
            tracing::debug!("Monitor {self} is not running");
            return;
        };

        tracing::debug!("Stopping monitor {self}");
        pool.cancel.cancel();

        while let Some(joined) = pool.tasks.join_next().await {
            if let Err(e) = joined {
                tracing::warn!("Worker of monitor {self} ended abnormally: {e}");
            }
        }

        tracing::info!("Stopped monitor {self}");
    }
}

impl<R, C> RangeMonitor<R, C>
where
    R: Reachability + 'static,
    C: Clock + 'static,
{
    /// Launches one scheduler per host.
    ///
    /// Does nothing when the range has no hosts, when the monitor is already
    /// running, or when called outside a Tokio runtime. Returns whether
    /// workers are running afterwards.
    pub fn start(&mut self) -> bool {
        if self.hosts.is_empty() {
            tracing::info!("Monitor {self} has no hosts, nothing to start");
            return false;
        }

        if self.pool.is_some() {
            tracing::debug!("Monitor {self} is already running");
            return true;
        }

        let Ok(handle) = Handle::try_current() else {
            tracing::error!("Monitor {self} cannot start outside a Tokio runtime");
            return false;
        };

        let cancel = CancellationToken::new();
        let mut tasks = JoinSet::new();

        for host in &self.hosts {
            let scheduler =
                HostScheduler::new(Arc::clone(host), Arc::clone(&self.waterfall), cancel.child_token());
            tasks.spawn_on(scheduler.run(), &handle);
        }

        let id = NEXT_POOL_ID.fetch_add(1, Ordering::Relaxed);
        tracing::info!("Started monitor {self} with {} workers", tasks.len());
        self.pool = Some(WorkerPool { id, cancel, tasks });

        true
    }
}

impl<R, C> fmt::Display for RangeMonitor<R, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} - {}, {}s", self.start, self.end, self.interval)?;
        if !self.comment.is_empty() {
            write!(f, ", {}", self.comment)?;
        }
        f.write_str("]")
    }
}

impl<R, C> fmt::Debug for RangeMonitor<R, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RangeMonitor")
            .field("start", &self.start)
            .field("end", &self.end)
            .field("interval", &self.interval)
            .field("comment", &self.comment)
            .field("hosts", &self.hosts.len())
            .field("pool", &self.pool.as_ref().map(|pool| pool.id))
            .finish()
    }
}

/// Equal when bounds, interval and comment match and both share the same
/// worker pool, so a running monitor never equals a stopped one.
impl<R, C> PartialEq for RangeMonitor<R, C> {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start
            && self.end == other.end
            && self.interval == other.interval
            && self.comment == other.comment
            && self.pool.as_ref().map(|pool| pool.id) == other.pool.as_ref().map(|pool| pool.id)
    }
}

#[cfg(test)]
#[path = "range_tests.rs"]
mod tests;
