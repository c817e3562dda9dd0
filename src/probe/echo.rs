//! ICMP echo reachability.

use std::fmt;
use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicU16, Ordering};
use std::time::Duration;

use surge_ping::{Client, Config, PingIdentifier, PingSequence};
use tokio::net::TcpStream;
use tokio::sync::OnceCell;

use super::{ATTEMPT_TIMEOUT, ProbeError, within};

/// TCP echo service port, used when ICMP sockets are unavailable.
const ECHO_PORT: u16 = 7;

const PAYLOAD: [u8; 56] = [0; 56];

static NEXT_IDENTIFIER: AtomicU16 = AtomicU16::new(1);

/// Succeeds when the host answers an ICMP echo request.
///
/// The ICMP client is opened lazily on first use and shared by every attempt.
/// If the process may not open ICMP sockets, the probe degrades to a TCP
/// connect on the echo port, where a refused connection still proves the
/// host is up.
pub struct EchoProbe {
    timeout: Duration,
    client: OnceCell<Option<Client>>,
}

impl EchoProbe {
    /// Name recorded on success.
    pub const NAME: &'static str = "EchoProbe";

    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            client: OnceCell::new(),
        }
    }

    pub(super) async fn check(&self, address: Ipv4Addr) -> Result<(), ProbeError> {
        match self.client().await {
            Some(client) => self.icmp_echo(client, address).await,
            None => self.tcp_echo(address).await,
        }
    }

    async fn client(&self) -> Option<&Client> {
        self.client
            .get_or_init(|| async {
                match Client::new(&Config::default()) {
                    Ok(client) => Some(client),
                    Err(e) => {
                        tracing::warn!(
                            "ICMP unavailable ({e}), falling back to TCP port {ECHO_PORT}"
                        );
                        None
                    }
                }
            })
            .await
            .as_ref()
    }

    async fn icmp_echo(&self, client: &Client, address: Ipv4Addr) -> Result<(), ProbeError> {
        let identifier = PingIdentifier(NEXT_IDENTIFIER.fetch_add(1, Ordering::Relaxed));
        let mut pinger = client.pinger(IpAddr::V4(address), identifier).await;
        pinger.timeout(self.timeout);

        let (_, rtt) = pinger.ping(PingSequence(0), &PAYLOAD).await?;
        tracing::trace!("Echo <{address}> rtt={}ms", rtt.as_millis());
        Ok(())
    }

    async fn tcp_echo(&self, address: Ipv4Addr) -> Result<(), ProbeError> {
        let target = SocketAddr::from((address, ECHO_PORT));

        within(self.timeout, async {
            match TcpStream::connect(target).await {
                Ok(_) => Ok(()),
                Err(e) if e.kind() == io::ErrorKind::ConnectionRefused => Ok(()),
                Err(e) => Err(e.into()),
            }
        })
        .await
    }
}

impl Default for EchoProbe {
    fn default() -> Self {
        Self::new(ATTEMPT_TIMEOUT)
    }
}

impl fmt::Debug for EchoProbe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EchoProbe")
            .field("timeout", &self.timeout)
            .field("icmp", &self.client.get().map(Option::is_some))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_reports_uninitialized_client() {
        let probe = EchoProbe::default();
        let debug = format!("{probe:?}");

        assert!(debug.contains("EchoProbe"));
        assert!(debug.contains("icmp: None"));
    }

    #[tokio::test]
    async fn tcp_fallback_treats_refusal_as_reachable() {
        // Nothing listens on the echo port of the loopback in test environments.
        let probe = EchoProbe::new(Duration::from_secs(2));
        let result = probe.tcp_echo(Ipv4Addr::LOCALHOST).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn client_is_resolved_once() {
        let probe = EchoProbe::default();
        let first = probe.client().await.is_some();
        let second = probe.client().await.is_some();

        assert_eq!(first, second);
        assert!(probe.client.initialized());
    }
}
