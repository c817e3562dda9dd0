//! TCP connect to a well-known application port.

use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use tokio::net::TcpStream;

use super::{ATTEMPT_TIMEOUT, ProbeError, within};

/// Succeeds when a TCP connection to the configured port is established.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerPortProbe {
    port: u16,
    timeout: Duration,
}

impl ServerPortProbe {
    /// Name recorded on success.
    pub const NAME: &'static str = "ServerPortProbe";

    /// Port probed by default.
    pub const DEFAULT_PORT: u16 = 8001;

    #[must_use]
    pub const fn new(port: u16, timeout: Duration) -> Self {
        Self { port, timeout }
    }

    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    pub(super) async fn check(&self, address: Ipv4Addr) -> Result<(), ProbeError> {
        let target = SocketAddr::from((address, self.port));

        // The stream is dropped (closed) as soon as it is established.
        within(self.timeout, async {
            TcpStream::connect(target).await?;
            Ok(())
        })
        .await
    }
}

impl Default for ServerPortProbe {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PORT, ATTEMPT_TIMEOUT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[test]
    fn defaults_to_port_8001() {
        assert_eq!(ServerPortProbe::default().port(), 8001);
    }

    #[tokio::test]
    async fn succeeds_when_port_accepts() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let probe = ServerPortProbe::new(port, Duration::from_secs(2));

        assert!(probe.check(Ipv4Addr::LOCALHOST).await.is_ok());
    }

    #[tokio::test]
    async fn fails_when_port_is_closed() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap().port()
        };
        let probe = ServerPortProbe::new(port, Duration::from_secs(2));

        let result = probe.check(Ipv4Addr::LOCALHOST).await;
        assert!(matches!(result, Err(ProbeError::Io(_))));
    }
}
