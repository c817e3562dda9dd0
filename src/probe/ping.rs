//! Reachability via the platform `ping` command.

use std::net::Ipv4Addr;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::process::Command;

use super::{ATTEMPT_TIMEOUT, ProbeError, within};

/// Output fragments that mark a failed ping, matched case-insensitively.
///
/// Covers English and German Windows/Unix wording.
pub const FAILURE_KEYWORDS: &[&str] = &[
    "nicht erreichbar",
    "not reachable",
    "berschreitung",
    "timeout",
];

/// Runs one `ping` request and scans its output for failure keywords.
///
/// The child process is killed if the attempt times out or is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PingProbe {
    timeout: Duration,
}

impl PingProbe {
    /// Name recorded on success.
    pub const NAME: &'static str = "PingProbe";

    #[must_use]
    pub const fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub(super) async fn check(&self, address: Ipv4Addr) -> Result<(), ProbeError> {
        within(self.timeout, async {
            let mut child = ping_command(address)
                .stdout(Stdio::piped())
                .stderr(Stdio::null())
                .kill_on_drop(true)
                .spawn()?;

            let failure = match child.stdout.take() {
                Some(stdout) => first_failure_line(BufReader::new(stdout)).await?,
                None => None,
            };

            child.wait().await?;

            failure.map_or(Ok(()), |line| Err(ProbeError::PingFailed { line }))
        })
        .await
    }
}

impl Default for PingProbe {
    fn default() -> Self {
        Self::new(ATTEMPT_TIMEOUT)
    }
}

fn ping_command(address: Ipv4Addr) -> Command {
    let count_flag = if cfg!(windows) { "-n" } else { "-c" };

    let mut command = Command::new("ping");
    command.args([count_flag, "1", &address.to_string()]);
    command
}

async fn first_failure_line<R>(reader: R) -> Result<Option<String>, ProbeError>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        tracing::trace!("ping: {line}");
        if contains_failure_keyword(&line) {
            return Ok(Some(line));
        }
    }
    Ok(None)
}

/// Returns `true` if `line` contains any of [`FAILURE_KEYWORDS`].
#[must_use]
pub fn contains_failure_keyword(line: &str) -> bool {
    let line = line.to_lowercase();
    FAILURE_KEYWORDS
        .iter()
        .any(|keyword| line.contains(&keyword.to_lowercase()))
}
