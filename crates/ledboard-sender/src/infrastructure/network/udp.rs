//! UDP socket sink for the display controller.
//!
//! The host name is resolved once when the sink is created; every datagram is
//! then sent to that address with `send_to`.  The socket belongs to the sink
//! and is closed when the sink is dropped.

use std::io;
use std::net::SocketAddr;

use async_trait::async_trait;
use tokio::net::UdpSocket;
use tracing::{debug, info};

use super::transport::TransportError;
use super::DatagramSink;

/// Production [`DatagramSink`] backed by a Tokio UDP socket.
#[derive(Debug)]
pub struct UdpDatagramSink {
    socket: UdpSocket,
    target: SocketAddr,
}

impl UdpDatagramSink {
    /// Resolves `host:port` and binds an ephemeral local socket of the same
    /// address family.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Resolve`] if the host does not resolve to any
    /// address and [`TransportError::Bind`] if no local socket can be bound.
    pub async fn connect(host: &str, port: u16) -> Result<Self, TransportError> {
        let target_name = format!("{host}:{port}");
        let target = tokio::net::lookup_host((host, port))
            .await
            .map_err(|source| TransportError::Resolve {
                target: target_name.clone(),
                source,
            })?
            .next()
            .ok_or_else(|| TransportError::Resolve {
                target: target_name.clone(),
                source: io::Error::new(io::ErrorKind::NotFound, "no addresses returned"),
            })?;
        debug!("{target_name} resolved to {target}");

        let local = if target.is_ipv4() { "0.0.0.0:0" } else { "[::]:0" };
        let socket = UdpSocket::bind(local)
            .await
            .map_err(|source| TransportError::Bind {
                addr: local.to_string(),
                source,
            })?;

        info!("sending frames to {target}");
        Ok(Self { socket, target })
    }

    pub fn target(&self) -> SocketAddr {
        self.target
    }

    /// Address of the local socket.
    ///
    /// # Errors
    ///
    /// Propagates the OS error if the socket address cannot be read.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }
}

#[async_trait]
impl DatagramSink for UdpDatagramSink {
    async fn send_datagram(&self, datagram: &[u8]) -> io::Result<usize> {
        self.socket.send_to(datagram, self.target).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_to_loopback_binds_ipv4_socket() {
        let sink = UdpDatagramSink::connect("127.0.0.1", 1337).await.unwrap();
        assert_eq!(sink.target(), "127.0.0.1:1337".parse::<SocketAddr>().unwrap());
        assert!(sink.local_addr().unwrap().is_ipv4());
    }

    #[tokio::test]
    async fn test_datagram_arrives_at_receiver() {
        // Arrange
        let receiver = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let port = receiver.local_addr().unwrap().port();
        let sink = UdpDatagramSink::connect("127.0.0.1", port).await.unwrap();

        // Act
        let written = sink.send_datagram(&[0x80, 1, 2, 3]).await.unwrap();

        // Assert
        let mut buf = [0u8; 16];
        let (len, _) = receiver.recv_from(&mut buf).await.unwrap();
        assert_eq!(written, 4);
        assert_eq!(&buf[..len], &[0x80, 1, 2, 3]);
    }

    #[tokio::test]
    async fn test_unresolvable_host_is_a_resolve_error() {
        let result = UdpDatagramSink::connect("host.invalid", 1337).await;
        assert!(matches!(result, Err(TransportError::Resolve { .. })));
    }
}
