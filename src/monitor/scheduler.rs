//! Self-paced probing loop for a single host.

use std::fmt;
use std::sync::Arc;

use tokio::time::{Instant, sleep};
use tokio_util::sync::CancellationToken;

use crate::host::Host;
use crate::probe::{ProbeWaterfall, Reachability, ReachabilityCheck};
use crate::time::{Clock, SystemClock};

/// Lifecycle state of a [`HostScheduler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Waiting for the next round to become due.
    Idle,
    /// A round is due and will run on the next step.
    Probing,
    /// Cancelled; terminal.
    Stopped,
}

impl fmt::Display for SchedulerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Probing => "probing",
            Self::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

/// Decides when to probe one host and reacts to cancellation.
///
/// There is no central clock: each step recomputes how long ago the last
/// round started, so interval changes take effect on the next evaluation.
/// Cancellation interrupts a pending wait immediately, but a round in flight
/// always completes first; each check's own timeout bounds that delay.
pub struct HostScheduler<R = ReachabilityCheck, C = SystemClock> {
    host: Arc<Host>,
    waterfall: Arc<ProbeWaterfall<R, C>>,
    cancel: CancellationToken,
    state: SchedulerState,
}

impl<R, C> HostScheduler<R, C>
where
    R: Reachability,
    C: Clock,
{
    #[must_use]
    pub const fn new(
        host: Arc<Host>,
        waterfall: Arc<ProbeWaterfall<R, C>>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            host,
            waterfall,
            cancel,
            state: SchedulerState::Idle,
        }
    }

    #[must_use]
    pub const fn state(&self) -> SchedulerState {
        self.state
    }

    #[must_use]
    pub fn host(&self) -> &Host {
        &self.host
    }

    /// Advances the state machine by one transition and returns the new state.
    pub async fn step(&mut self) -> SchedulerState {
        self.state = match self.state {
            SchedulerState::Stopped => SchedulerState::Stopped,
            SchedulerState::Probing => {
                self.waterfall.run(&self.host).await;
                self.after_round()
            }
            SchedulerState::Idle => self.wait_until_due().await,
        };
        self.state
    }

    /// Steps until cancelled.
    pub async fn run(mut self) {
        let address = self.host.address();
        tracing::debug!("Scheduler for <{address}> started");

        while self.step().await != SchedulerState::Stopped {}

        tracing::debug!("Scheduler for <{address}> stopped");
    }

    fn after_round(&self) -> SchedulerState {
        if self.cancel.is_cancelled() {
            SchedulerState::Stopped
        } else {
            SchedulerState::Idle
        }
    }

    async fn wait_until_due(&self) -> SchedulerState {
        if self.cancel.is_cancelled() {
            return SchedulerState::Stopped;
        }

        let Some(remaining) = self.host.due_in(Instant::now()) else {
            return SchedulerState::Probing;
        };

        tracing::trace!(
            "<{}> next round in {}ms",
            self.host.address(),
            remaining.as_millis()
        );

        tokio::select! {
            biased;

            () = self.cancel.cancelled() => SchedulerState::Stopped,
            () = sleep(remaining) => SchedulerState::Idle,
        }
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
