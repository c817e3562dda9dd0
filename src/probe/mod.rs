//! Probe layer: reachability checks and the fallback waterfall.
//!
//! This module provides:
//! - The reachability seam ([`Reachability`])
//! - The closed set of concrete checks ([`ReachabilityCheck`])
//! - Individual techniques ([`ServerPortProbe`], [`EchoProbe`],
//!   [`TimeServerProbe`], [`PingProbe`])
//! - Ordered fallback across checks ([`ProbeWaterfall`])
//!
//! Every check is total from the caller's point of view: I/O failures are
//! logged and reported as `false`, never as errors.

mod echo;
mod error;
mod ping;
mod server_port;
mod time_server;
mod waterfall;


pub use echo::EchoProbe;
pub use error::ProbeError;
pub use ping::PingProbe;
pub use server_port::ServerPortProbe;
pub use time_server::TimeServerProbe;
pub use waterfall::ProbeWaterfall;

use std::future::Future;
use std::net::Ipv4Addr;
use std::time::Duration;

/// Upper bound on a single check attempt.
pub const ATTEMPT_TIMEOUT: Duration = Duration::from_millis(5000);

/// A technique for testing whether a host answers.
///
/// # Implementation Notes
///
/// - `attempt` must not block longer than the implementation's timeout
/// - Any socket, stream or child process must be released before returning
/// - Failures are reported as `false`, never propagated
pub trait Reachability: Send + Sync {
    /// Name recorded as the host's last technique when this check succeeds.
    fn name(&self) -> &str;

    /// Tests whether `address` answers.
    fn attempt(&self, address: Ipv4Addr) -> impl Future<Output = bool> + Send;
}

/// The closed set of reachability techniques.
#[derive(Debug)]
pub enum ReachabilityCheck {
    ServerPort(ServerPortProbe),
    Echo(EchoProbe),
    TimeServer(TimeServerProbe),
    /// Legacy; not part of [`ReachabilityCheck::default_order`].
    Ping(PingProbe),
}

impl ReachabilityCheck {
    /// The checks used by a monitor unless told otherwise, in resolution order.
    #[must_use]
    pub fn default_order() -> Vec<Self> {
        vec![
            Self::ServerPort(ServerPortProbe::default()),
            Self::Echo(EchoProbe::default()),
            Self::TimeServer(TimeServerProbe::default()),
        ]
    }
}

impl Reachability for ReachabilityCheck {
    fn name(&self) -> &str {
        match self {
            Self::ServerPort(_) => ServerPortProbe::NAME,
            Self::Echo(_) => EchoProbe::NAME,
            Self::TimeServer(_) => TimeServerProbe::NAME,
            Self::Ping(_) => PingProbe::NAME,
        }
    }

    async fn attempt(&self, address: Ipv4Addr) -> bool {
        let outcome = match self {
            Self::ServerPort(probe) => probe.check(address).await,
            Self::Echo(probe) => probe.check(address).await,
            Self::TimeServer(probe) => probe.check(address).await,
            Self::Ping(probe) => probe.check(address).await,
        };

        match outcome {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!("{} <{address}> failed: {e}", self.name());
                false
            }
        }
    }
}

/// Runs `future` under `limit`, mapping expiry to [`ProbeError::Timeout`].
async fn within<T, F>(limit: Duration, future: F) -> Result<T, ProbeError>
where
    F: Future<Output = Result<T, ProbeError>>,
{
    tokio::time::timeout(limit, future)
        .await
        .map_err(|_| ProbeError::Timeout { after: limit })?
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncWriteExt;
    use tokio::net::TcpListener;

    #[test]
    fn default_order_is_port_echo_time() {
        let names: Vec<_> = ReachabilityCheck::default_order()
            .iter()
            .map(|check| check.name().to_string())
            .collect();

        assert_eq!(names, ["ServerPortProbe", "EchoProbe", "TimeServerProbe"]);
    }

    #[test]
    fn ping_is_not_in_default_order() {
        assert!(
            ReachabilityCheck::default_order()
                .iter()
                .all(|check| !matches!(check, ReachabilityCheck::Ping(_)))
        );
    }

    #[test]
    fn ping_variant_reports_its_name() {
        let check = ReachabilityCheck::Ping(PingProbe::default());
        assert_eq!(check.name(), "PingProbe");
    }

    async fn closed_port() -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap().port()
    }

    #[tokio::test]
    async fn refused_connection_is_reported_as_unreachable() {
        let check = ReachabilityCheck::ServerPort(ServerPortProbe::new(
            closed_port().await,
            Duration::from_secs(1),
        ));

        assert!(!check.attempt(Ipv4Addr::LOCALHOST).await);
    }

    #[tokio::test]
    async fn short_time_reply_is_reported_as_unreachable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let _ = socket.write_all(&[0xE9, 0x5A]).await;
        });

        let check =
            ReachabilityCheck::TimeServer(TimeServerProbe::new(port, Duration::from_secs(1)));

        assert!(!check.attempt(Ipv4Addr::LOCALHOST).await);
    }

    #[tokio::test]
    async fn open_port_is_reported_as_reachable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let check =
            ReachabilityCheck::ServerPort(ServerPortProbe::new(port, Duration::from_secs(1)));

        assert!(check.attempt(Ipv4Addr::LOCALHOST).await);
    }

    #[test]
    fn attempt_timeout_is_five_seconds() {
        assert_eq!(ATTEMPT_TIMEOUT, Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn within_maps_expiry_to_timeout() {
        let result: Result<(), _> = within(Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(())
        })
        .await;

        assert!(matches!(result, Err(ProbeError::Timeout { .. })));
    }

    #[tokio::test]
    async fn within_passes_inner_result_through() {
        let result = within(Duration::from_secs(1), async { Ok::<_, ProbeError>(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }
}
