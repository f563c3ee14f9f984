//! Chunked, paced frame transmission.
//!
//! # Why pace the datagrams? (for beginners)
//!
//! The controller is a small microcontroller with a tiny receive buffer.  If a
//! whole 4.6 KB frame arrives as nine back-to-back UDP packets, the later ones
//! are dropped before the firmware has copied the earlier ones out.  Waiting a
//! few milliseconds between datagrams gives it time to drain.
//!
//! The wait is an async timer (`tokio::time::sleep`), not a blocking sleep, so
//! other tasks on the runtime keep running while a frame is in flight.  There
//! is no wait after the last datagram; the render loop owns frame timing.

use std::io;
use std::time::Duration;

use ledboard_core::protocol::{
    chunk_payload, encode_frame, ProtocolError, DEFAULT_MAX_CHUNK_SIZE, DEFAULT_PACING,
};
use ledboard_core::Frame;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, warn};

use super::DatagramSink;

/// Error type for frame transmission.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The controller host name could not be resolved.
    #[error("failed to resolve {target}: {source}")]
    Resolve {
        target: String,
        #[source]
        source: io::Error,
    },

    /// A local socket could not be bound.
    #[error("failed to bind UDP socket on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    /// The frame could not be turned into datagrams.
    #[error("failed to encode frame: {0}")]
    Encode(#[from] ProtocolError),

    /// A datagram could not be sent; the rest of the frame was abandoned.
    #[error("failed to send datagram {chunk} of {total}: {source}")]
    Send {
        chunk: usize,
        total: usize,
        #[source]
        source: io::Error,
    },
}

/// What to do when one datagram of a frame fails to send.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SendPolicy {
    /// Stop at the first failure and report it as an error.
    #[default]
    #[serde(rename = "abort")]
    AbortOnError,
    /// Attempt every datagram and list the failures in the [`SendReport`].
    #[serde(rename = "best-effort")]
    BestEffort,
}

/// Tunables for [`FrameTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportSettings {
    /// Largest payload per datagram, marker excluded.
    pub max_chunk_size: usize,
    /// Pause between two datagrams of one frame.
    pub pacing_interval: Duration,
    pub send_policy: SendPolicy,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            max_chunk_size: DEFAULT_MAX_CHUNK_SIZE,
            pacing_interval: DEFAULT_PACING,
            send_policy: SendPolicy::default(),
        }
    }
}

/// A datagram that failed under [`SendPolicy::BestEffort`].
#[derive(Debug)]
pub struct ChunkFailure {
    /// Zero-based index of the datagram within the frame.
    pub chunk: usize,
    pub error: io::Error,
}

/// Outcome of one frame transmission.
#[derive(Debug, Default)]
pub struct SendReport {
    /// Datagrams the frame was split into.
    pub datagrams: usize,
    /// Datagrams handed to the sink successfully.
    pub sent: usize,
    /// Bytes written, markers included.
    pub bytes: usize,
    pub failures: Vec<ChunkFailure>,
}

impl SendReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && self.sent == self.datagrams
    }
}

/// Sends frames to one destination through a [`DatagramSink`].
pub struct FrameTransport<S> {
    sink: S,
    settings: TransportSettings,
}

impl<S: DatagramSink> FrameTransport<S> {
    pub fn new(sink: S, settings: TransportSettings) -> Self {
        Self { sink, settings }
    }

    pub fn settings(&self) -> &TransportSettings {
        &self.settings
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Encodes `frame` and sends it as one chunked, paced burst.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Encode`] if a component does not fit in a
    /// byte or the chunk size is zero, and under [`SendPolicy::AbortOnError`]
    /// [`TransportError::Send`] for the first datagram that fails.
    pub async fn send_frame(&self, frame: &Frame) -> Result<SendReport, TransportError> {
        let bytes = encode_frame(frame)?;
        self.send_bytes(&bytes).await
    }

    /// Sends an already encoded payload.
    ///
    /// # Errors
    ///
    /// See [`FrameTransport::send_frame`].
    pub async fn send_bytes(&self, payload: &[u8]) -> Result<SendReport, TransportError> {
        let datagrams = chunk_payload(payload, self.settings.max_chunk_size)?;
        let total = datagrams.len();
        let mut report = SendReport {
            datagrams: total,
            ..SendReport::default()
        };

        for (chunk, datagram) in datagrams.iter().enumerate() {
            if chunk > 0 && !self.settings.pacing_interval.is_zero() {
                tokio::time::sleep(self.settings.pacing_interval).await;
            }

            match self.sink.send_datagram(datagram).await {
                Ok(written) => {
                    if written != datagram.len() {
                        warn!("datagram {chunk}: short write of {written}/{} bytes", datagram.len());
                    }
                    report.sent += 1;
                    report.bytes += written;
                }
                Err(source) => match self.settings.send_policy {
                    SendPolicy::AbortOnError => {
                        error!("aborting frame at datagram {chunk} of {total}: {source}");
                        return Err(TransportError::Send {
                            chunk,
                            total,
                            source,
                        });
                    }
                    SendPolicy::BestEffort => {
                        warn!("datagram {chunk} of {total} failed: {source}");
                        report.failures.push(ChunkFailure {
                            chunk,
                            error: source,
                        });
                    }
                },
            }
        }

        debug!(
            "frame sent: {} of {total} datagrams, {} bytes",
            report.sent, report.bytes
        );
        Ok(report)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
