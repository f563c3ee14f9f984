//! Stand-in receiver for bring-up without a board.
//!
//! Binds the controller port, reassembles incoming datagrams with
//! [`FrameAssembler`] and logs every completed frame.  Pointing the sender at
//! a machine running the monitor shows whether frames arrive whole and in
//! order.
//!
//! # Shutdown
//!
//! `recv_from` is wrapped in a short timeout.  On each timeout the `running`
//! flag is checked; once it is cleared the loop exits cleanly.

use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use ledboard_core::FrameAssembler;
use tokio::net::UdpSocket;
use tracing::{debug, error, info};

use super::transport::TransportError;

/// How long one `recv_from` may block before the shutdown flag is polled.
const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Room for any UDP datagram, so no configured chunk size gets truncated.
const RECV_BUFFER_SIZE: usize = 65_536;

/// UDP listener that rebuilds frames of a known size.
pub struct FrameMonitor {
    socket: UdpSocket,
    assembler: FrameAssembler,
    frames: u64,
}

impl FrameMonitor {
    /// Binds `addr` and expects frames of `frame_len` payload bytes.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Bind`] if the socket cannot be bound.
    pub async fn bind(addr: SocketAddr, frame_len: usize) -> Result<Self, TransportError> {
        let socket = UdpSocket::bind(addr)
            .await
            .map_err(|source| TransportError::Bind {
                addr: addr.to_string(),
                source,
            })?;
        Ok(Self {
            socket,
            assembler: FrameAssembler::new(frame_len),
            frames: 0,
        })
    }

    /// The bound address, useful when binding port 0.
    ///
    /// # Errors
    ///
    /// Propagates the OS error if the socket address cannot be read.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Completed frames so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Waits for the next complete frame.
    ///
    /// # Errors
    ///
    /// Propagates socket receive errors.
    pub async fn recv_frame(&mut self) -> std::io::Result<Vec<u8>> {
        let mut buf = vec![0u8; RECV_BUFFER_SIZE];
        loop {
            let (len, src) = self.socket.recv_from(&mut buf).await?;
            if let Some(frame) = self.accept(&buf[..len], src) {
                return Ok(frame);
            }
        }
    }

    /// Receives and logs frames until `running` is cleared.
    ///
    /// Returns the number of frames completed.
    pub async fn run(&mut self, running: Arc<AtomicBool>) -> u64 {
        let mut buf = vec![0u8; RECV_BUFFER_SIZE];
        match self.socket.local_addr() {
            Ok(addr) => info!("frame monitor listening on UDP {addr}"),
            Err(e) => debug!("frame monitor address unavailable: {e}"),
        }

        while running.load(Ordering::Relaxed) {
            let (len, src) =
                match tokio::time::timeout(POLL_INTERVAL, self.socket.recv_from(&mut buf)).await {
                    Err(_elapsed) => continue,
                    Ok(Ok(pair)) => pair,
                    Ok(Err(e)) => {
                        error!("monitor recv error: {e}");
                        continue;
                    }
                };

            if let Some(frame) = self.accept(&buf[..len], src) {
                let lit = frame.iter().filter(|b| **b != 0).count();
                info!(
                    "frame {} from {src}: {} bytes, {lit} non-zero",
                    self.frames,
                    frame.len()
                );
            }
        }

        info!("frame monitor stopped after {} frames", self.frames);
        self.frames
    }

    fn accept(&mut self, datagram: &[u8], src: SocketAddr) -> Option<Vec<u8>> {
        debug!("{} byte datagram from {src}", datagram.len());
        let frame = self.assembler.push(datagram)?;
        self.frames += 1;
        Some(frame)
    }
}
