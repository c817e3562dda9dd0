//! Error types for the probe layer.

use std::time::Duration;

use thiserror::Error;

/// Why a single check attempt did not succeed.
///
/// These never leave the probe layer: [`super::ReachabilityCheck`] logs them
/// and reports the attempt as failed.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The attempt did not finish within its time limit.
    #[error("timed out after {}ms", after.as_millis())]
    Timeout {
        /// The limit that expired
        after: Duration,
    },

    /// Socket, stream or process I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The ICMP echo exchange failed.
    #[error("ICMP error: {0}")]
    Icmp(#[from] surge_ping::SurgeError),

    /// The `ping` command reported the host as unreachable.
    #[error("ping reported failure: {line}")]
    PingFailed {
        /// Output line containing the failure keyword
        line: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;
    use std::io;

    #[test]
    fn timeout_displays_milliseconds() {
        let error = ProbeError::Timeout {
            after: Duration::from_millis(5000),
        };
        assert_eq!(error.to_string(), "timed out after 5000ms");
    }

    #[test]
    fn io_error_preserves_source() {
        let error: ProbeError = io::Error::new(io::ErrorKind::ConnectionRefused, "refused").into();

        assert!(matches!(error, ProbeError::Io(_)));
        assert!(error.source().is_some());
        assert!(error.to_string().contains("refused"));
    }

    #[test]
    fn ping_failure_includes_line() {
        let error = ProbeError::PingFailed {
            line: "Request timeout for icmp_seq 0".to_string(),
        };
        assert!(error.to_string().contains("icmp_seq"));
    }
}
