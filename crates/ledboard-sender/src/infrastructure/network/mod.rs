//! Network infrastructure for the sender.
//!
//! # Sub-modules
//!
//! - **`transport`** – [`FrameTransport`]: encodes a frame, cuts it into
//!   marker-prefixed datagrams and emits them with a pacing delay in between.
//!   Generic over the [`DatagramSink`] seam so tests never need a socket.
//!
//! - **`udp`** – [`UdpDatagramSink`], the production sink.  Resolves the
//!   controller host once and owns the outbound socket.
//!
//! - **`monitor`** – [`FrameMonitor`], a stand-in receiver that reassembles
//!   frames the way the controller does.  Handy during bring-up when no board
//!   is attached.
//!
//! - **`mock`** – [`RecordingSink`], an in-memory sink for tests.

pub mod mock;
pub mod monitor;
pub mod transport;
pub mod udp;

use std::io;

use async_trait::async_trait;

pub use mock::RecordingSink;
pub use monitor::FrameMonitor;
pub use transport::{
    ChunkFailure, FrameTransport, SendPolicy, SendReport, TransportError, TransportSettings,
};
pub use udp::UdpDatagramSink;

/// Anything that can carry one datagram towards the controller.
#[async_trait]
pub trait DatagramSink: Send + Sync {
    /// Sends one datagram, returning the number of bytes written.
    async fn send_datagram(&self, datagram: &[u8]) -> io::Result<usize>;
}
