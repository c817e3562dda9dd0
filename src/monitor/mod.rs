//! Monitor layer: per-host scheduling and per-range worker pools.
//!
//! This module provides:
//! - The per-host probing loop ([`HostScheduler`], [`SchedulerState`])
//! - Range monitors with start/stop lifecycle ([`RangeMonitor`], [`MonitorSnapshot`])
//! - The shared registry of monitors ([`MonitorRegistry`])

mod range;
mod registry;
mod scheduler;

#[cfg(test)]
mod test_fixtures;

pub use range::{MonitorSnapshot, RangeMonitor};
pub use registry::MonitorRegistry;
pub use scheduler::{HostScheduler, SchedulerState};
