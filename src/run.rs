//! Application execution logic.
//!
//! This module builds one range monitor per configured range, starts them,
//! and reports the state of every host until a shutdown signal arrives.

use std::fmt::Write as _;
use std::future::Future;
use std::io;
use std::time::Duration;

use thiserror::Error;
use tokio::signal;
use tokio::time::MissedTickBehavior;

use rangewatch::config::{MonitorSettings, ValidatedConfig};
use rangewatch::host::HostSnapshot;
use rangewatch::monitor::{MonitorRegistry, MonitorSnapshot, RangeMonitor};
use rangewatch::time::format_timestamp;

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// None of the configured monitors could be started.
    #[error("None of the {configured} configured range(s) could be started")]
    NothingStarted {
        /// Number of configured ranges
        configured: usize,
    },

    /// Failed to install a shutdown signal handler.
    #[error("Failed to install signal handler: {0}")]
    Signal(#[source] io::Error),
}

/// Runtime options extracted from validated config.
#[derive(Debug)]
struct RuntimeOptions {
    report_interval: Duration,
}

impl From<&ValidatedConfig> for RuntimeOptions {
    fn from(config: &ValidatedConfig) -> Self {
        Self {
            report_interval: config.report_interval,
        }
    }
}

/// Executes the main application loop.
///
/// This function:
/// 1. Registers one monitor per configured range
/// 2. Starts every monitor
/// 3. Logs a status table every report interval until shutdown (Ctrl+C / SIGTERM)
/// 4. Stops every monitor and waits for its workers
///
/// # Errors
///
/// Returns an error if no monitor could be started or if the shutdown
/// signal handler cannot be installed.
///
/// # Coverage Note
///
/// This function is excluded from coverage because it requires real
/// probes and OS signal handling.
#[cfg(not(tarpaulin_include))]
pub async fn execute(config: ValidatedConfig) -> Result<(), RunError> {
    let options = RuntimeOptions::from(&config);

    let registry: MonitorRegistry = MonitorRegistry::new();
    for settings in &config.monitors {
        registry.add(build_monitor(settings)).await;
    }

    let started = registry.start_all().await;
    if started == 0 {
        return Err(RunError::NothingStarted {
            configured: config.monitors.len(),
        });
    }

    tracing::info!(
        "Monitoring {started} range(s), reporting every {}s",
        options.report_interval.as_secs()
    );

    let result = report_until(&registry, options.report_interval, shutdown_signal()).await;

    registry.stop_all().await;
    result
}

/// Builds the monitor for one validated range.
fn build_monitor(settings: &MonitorSettings) -> RangeMonitor {
    RangeMonitor::new(&settings.start(), &settings.end(), settings.interval, &settings.comment)
}

/// Logs a status table every `period` until `shutdown` completes.
///
/// The first report is written one period after start, once every host has
/// had the chance to complete a round.
async fn report_until<R, C, F>(
    registry: &MonitorRegistry<R, C>,
    period: Duration,
    shutdown: F,
) -> Result<(), RunError>
where
    F: Future<Output = io::Result<()>>,
{
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately.
    ticker.tick().await;

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            biased;

            result = &mut shutdown => {
                result.map_err(RunError::Signal)?;
                tracing::info!("Shutdown signal received, stopping...");
                return Ok(());
            }

            _ = ticker.tick() => {
                let monitors = registry.running().await;
                tracing::info!(
                    "Status of {} running monitor(s):\n{}",
                    monitors.len(),
                    render_report(&monitors)
                );
            }
        }
    }
}

/// Renders running monitors and their hosts as an aligned text table.
///
/// Each monitor opens a group with its label, interval and an up/down
/// summary, followed by one row per host.
fn render_report(monitors: &[MonitorSnapshot]) -> String {
    let mut table = format!(
        "  {:<15}  {:<6}  {:>7}  {:<16}  {}",
        "ADDRESS", "RESULT", "QUALITY", "TECHNIQUE", "LAST PROBE"
    );
    let mut reachable = 0;
    let mut total = 0;

    for (index, monitor) in monitors.iter().enumerate() {
        let up = monitor.hosts.iter().filter(|host| host.last_result).count();
        let count = monitor.hosts.len();
        reachable += up;
        total += count;

        let summary = if up == count {
            "all up".to_string()
        } else {
            format!("{} of {count} down", count - up)
        };

        let _ = write!(
            table,
            "\n{} ({}s): {summary}",
            monitor_label(monitors, index),
            monitor.interval
        );

        for host in &monitor.hosts {
            write_host_row(&mut table, host);
        }
    }

    let _ = write!(table, "\n{reachable}/{total} reachable");

    table
}

/// Names a monitor by its comment, or by its bounds when the comment is
/// empty or shared with another running monitor.
fn monitor_label(monitors: &[MonitorSnapshot], index: usize) -> String {
    let monitor = &monitors[index];
    let shared = monitors
        .iter()
        .enumerate()
        .any(|(other, m)| other != index && m.comment == monitor.comment);

    if monitor.comment.is_empty() || shared {
        format!("{} - {}", monitor.start, monitor.end)
    } else {
        monitor.comment.clone()
    }
}

fn write_host_row(table: &mut String, host: &HostSnapshot) {
    let result = if host.last_result { "up" } else { "down" };
    let technique = if host.last_technique.is_empty() {
        "-"
    } else {
        host.last_technique.as_str()
    };

    let _ = write!(
        table,
        "\n  {:<15}  {:<6}  {:>7}  {:<16}  {}",
        host.address.to_string(),
        result,
        host.quality.to_string(),
        technique,
        format_timestamp(host.last_probe),
    );
}

/// Returns a future that completes when a shutdown signal is received.
///
/// Excluded from coverage - requires OS signal handling.
#[cfg(not(tarpaulin_include))]
async fn shutdown_signal() -> io::Result<()> {
    #[cfg(unix)]
    {
        let mut terminate = signal::unix::signal(signal::unix::SignalKind::terminate())?;

        tokio::select! {
            result = signal::ctrl_c() => result,
            _ = terminate.recv() => Ok(()),
        }
    }

    #[cfg(not(unix))]
    {
        signal::ctrl_c().await
    }
}
