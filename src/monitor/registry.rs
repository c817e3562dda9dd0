//! Process-wide registry of range monitors.

use tokio::sync::Mutex;

use super::range::{MonitorSnapshot, RangeMonitor};
use crate::host::HostSnapshot;
use crate::probe::{Reachability, ReachabilityCheck};
use crate::time::{Clock, SystemClock};

/// Owns the monitors of the process behind one coarse lock.
///
/// Adding, enumerating, starting and stopping all serialize on the same
/// mutex, so callers on different tasks never observe a half-updated list.
/// The lock is held across `stop_all`'s awaits on purpose: no monitor can be
/// added while the registry is draining.
pub struct MonitorRegistry<R = ReachabilityCheck, C = SystemClock> {
    monitors: Mutex<Vec<RangeMonitor<R, C>>>,
}

impl<R, C> Default for MonitorRegistry<R, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R, C> MonitorRegistry<R, C> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            monitors: Mutex::new(Vec::new()),
        }
    }

    /// Registers a monitor, running or not.
    pub async fn add(&self, monitor: RangeMonitor<R, C>) {
        tracing::debug!("Registering monitor {monitor}");
        self.monitors.lock().await.push(monitor);
    }

    pub async fn len(&self) -> usize {
        self.monitors.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.monitors.lock().await.is_empty()
    }

    /// Returns copies of every registered monitor that is currently running.
    pub async fn running(&self) -> Vec<MonitorSnapshot> {
        self.monitors
            .lock()
            .await
            .iter()
            .filter(|monitor| monitor.is_running())
            .map(RangeMonitor::snapshot)
            .collect()
    }

    /// Returns copies of all hosts of all registered monitors, in registration order.
    pub async fn snapshots(&self) -> Vec<HostSnapshot> {
        self.monitors
            .lock()
            .await
            .iter()
            .flat_map(|monitor| monitor.hosts().iter().map(|host| host.snapshot()))
            .collect()
    }

    /// Applies `interval` to every registered monitor.
    pub async fn set_interval_all(&self, interval: u64) {
        for monitor in self.monitors.lock().await.iter_mut() {
            monitor.set_interval(interval);
        }
    }

    /// Stops every monitor and removes all of them from the registry.
    pub async fn stop_all(&self) {
        let mut monitors = self.monitors.lock().await;
        tracing::info!("Stopping {} monitor(s)", monitors.len());

        for mut monitor in monitors.drain(..) {
            monitor.stop().await;
        }

        tracing::info!("All monitors stopped");
    }
}

impl<R, C> MonitorRegistry<R, C>
where
    R: Reachability + 'static,
    C: Clock + 'static,
{
    /// Starts every registered monitor and returns how many are running.
    pub async fn start_all(&self) -> usize {
        let mut monitors = self.monitors.lock().await;
        let running = monitors
            .iter_mut()
            .map(RangeMonitor::start)
            .filter(|&started| started)
            .count();

        tracing::info!("{running} of {} monitor(s) running", monitors.len());
        running
    }
}
