//! RFC 868 time protocol handshake.

use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;

use super::{ATTEMPT_TIMEOUT, ProbeError, within};
use crate::time::{format_timestamp, from_rfc868};

/// Succeeds when the host's time service sends its 4-byte answer.
///
/// The received time is decoded for the debug log only; its value does not
/// affect the outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeServerProbe {
    port: u16,
    timeout: Duration,
}

impl TimeServerProbe {
    /// Name recorded on success.
    pub const NAME: &'static str = "TimeServerProbe";

    /// The time protocol port.
    pub const DEFAULT_PORT: u16 = 37;

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

        let raw = within(self.timeout, async {
            let mut stream = TcpStream::connect(target).await?;
            let mut buf = [0u8; 4];
            stream.read_exact(&mut buf).await?;
            Ok(u32::from_be_bytes(buf))
        })
        .await?;

        match from_rfc868(raw) {
            Some(time) => tracing::debug!("Time server <{address}> reports {}", format_timestamp(time)),
            None => tracing::debug!("Time server <{address}> reports pre-1970 value {raw}"),
        }

        Ok(())
    }
}

impl Default for TimeServerProbe {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PORT, ATTEMPT_TIMEOUT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncWriteExt;
    use tokio::net::TcpListener;

    async fn serve_once(payload: &'static [u8]) -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let _ = socket.write_all(payload).await;
        });

        port
    }

    #[test]
    fn defaults_to_port_37() {
        assert_eq!(TimeServerProbe::default().port(), 37);
    }

    #[tokio::test]
    async fn succeeds_after_four_bytes() {
        let port = serve_once(&[0xE9, 0x5A, 0x3C, 0x00]).await;
        let probe = TimeServerProbe::new(port, Duration::from_secs(2));

        assert!(probe.check(Ipv4Addr::LOCALHOST).await.is_ok());
    }

    #[tokio::test]
    async fn value_is_irrelevant_to_success() {
        let port = serve_once(&[0, 0, 0, 0]).await;
        let probe = TimeServerProbe::new(port, Duration::from_secs(2));

        assert!(probe.check(Ipv4Addr::LOCALHOST).await.is_ok());
    }

    #[tokio::test]
    async fn short_answer_fails() {
        let port = serve_once(&[1, 2]).await;
        let probe = TimeServerProbe::new(port, Duration::from_secs(2));

        let result = probe.check(Ipv4Addr::LOCALHOST).await;
        assert!(matches!(result, Err(ProbeError::Io(_))));
    }

    #[tokio::test]
    async fn silent_server_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let probe = TimeServerProbe::new(port, Duration::from_millis(100));

        // Accepted by the kernel backlog but never answered.
        let result = probe.check(Ipv4Addr::LOCALHOST).await;
        assert!(matches!(result, Err(ProbeError::Timeout { .. })));
        drop(listener);
    }
}
