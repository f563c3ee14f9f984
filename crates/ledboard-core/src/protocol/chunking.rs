//! Datagram framing for the controller link.
//!
//! Wire format of one datagram:
//! ```text
//! [marker:1][payload:1..=max_chunk_size]
//! ```
//! The first datagram of a frame carries [`FRAME_START_MARKER`], every other
//! one [`CONTINUATION_MARKER`].  The controller resets its write cursor on the
//! start marker and appends continuation payloads after it, so a frame is
//! only correct if its datagrams arrive in order.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::protocol::codec::ProtocolError;

/// Marker byte opening a new frame.
pub const FRAME_START_MARKER: u8 = 0x80;

/// Marker byte of every datagram after the first.
pub const CONTINUATION_MARKER: u8 = 0x00;

/// Largest payload carried by one datagram, marker excluded.
pub const DEFAULT_MAX_CHUNK_SIZE: usize = 512;

/// Largest UDP payload over IPv4, marker included.
pub const MAX_DATAGRAM_SIZE: usize = 65_507;

/// Largest chunk that still fits one datagram after the marker byte.
pub const MAX_CHUNK_SIZE: usize = MAX_DATAGRAM_SIZE - 1;

/// UDP port the controller listens on.
pub const DEFAULT_PORT: u16 = 1337;

/// Pause between two datagrams of the same frame.
pub const DEFAULT_PACING: Duration = Duration::from_millis(20);

/// Host name of the reference controller.
pub const DEFAULT_HOST: &str = "ledboard";

/// Where frames are sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    pub host: String,
    pub port: u16,
}

impl Destination {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl Default for Destination {
    fn default() -> Self {
        Self::new(DEFAULT_HOST, DEFAULT_PORT)
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Splits an encoded frame into marker-prefixed datagrams.
///
/// Every byte of `payload` appears exactly once, in order; the trailing
/// partial chunk is always emitted.  A payload that fits in one chunk yields a
/// single start-marked datagram, and an empty payload yields just the marker.
///
/// # Errors
///
/// Returns [`ProtocolError::InvalidChunkSize`] if `max_chunk_size` is zero.
///
/// # Examples
///
/// ```rust
/// use ledboard_core::chunk_payload;
///
/// let datagrams = chunk_payload(&[1u8; 1030], 512).unwrap();
/// assert_eq!(datagrams.len(), 3);
/// assert_eq!(datagrams[0][0], 0x80);
/// assert_eq!(datagrams[2].len(), 1 + 6);
/// ```
pub fn chunk_payload(payload: &[u8], max_chunk_size: usize) -> Result<Vec<Vec<u8>>, ProtocolError> {
    if max_chunk_size == 0 {
        return Err(ProtocolError::InvalidChunkSize(max_chunk_size));
    }
    if payload.is_empty() {
        return Ok(vec![vec![FRAME_START_MARKER]]);
    }

    let datagrams: Vec<Vec<u8>> = payload
        .chunks(max_chunk_size)
        .enumerate()
        .map(|(index, chunk)| {
            let marker = if index == 0 {
                FRAME_START_MARKER
            } else {
                CONTINUATION_MARKER
            };
            let mut datagram = Vec::with_capacity(chunk.len() + 1);
            datagram.push(marker);
            datagram.extend_from_slice(chunk);
            datagram
        })
        .collect();

    debug!(
        "{} payload bytes split into {} datagrams of at most {max_chunk_size}",
        payload.len(),
        datagrams.len()
    );
    Ok(datagrams)
}

/// Receiver-side reassembly of chunked frames.
///
/// Mirrors what the controller does: a start marker opens a fresh frame,
/// continuation datagrams append while a frame is open, and the frame is
/// complete once `expected_len` payload bytes have arrived.
#[derive(Debug, Clone)]
pub struct FrameAssembler {
    expected_len: usize,
    buffer: Vec<u8>,
    open: bool,
}

impl FrameAssembler {
    pub fn new(expected_len: usize) -> Self {
        Self {
            expected_len,
            buffer: Vec::with_capacity(expected_len),
            open: false,
        }
    }

    pub fn expected_len(&self) -> usize {
        self.expected_len
    }

    /// Bytes collected for the frame in progress.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Feeds one datagram.  Returns the payload once a frame is complete.
    ///
    /// Datagrams with an unknown marker, continuation datagrams with no open
    /// frame, and frames that overrun `expected_len` are dropped.
    pub fn push(&mut self, datagram: &[u8]) -> Option<Vec<u8>> {
        let (&marker, payload) = datagram.split_first()?;
        match marker {
            FRAME_START_MARKER => {
                if self.open && !self.buffer.is_empty() {
                    debug!(
                        "discarding partial frame of {} bytes on new start marker",
                        self.buffer.len()
                    );
                }
                self.buffer.clear();
                self.open = true;
            }
            CONTINUATION_MARKER if self.open => {}
            other => {
                trace!("ignoring datagram with marker 0x{other:02X}");
                return None;
            }
        }

        self.buffer.extend_from_slice(payload);
        if self.buffer.len() > self.expected_len {
            debug!(
                "discarding overlong frame: {} bytes, expected {}",
                self.buffer.len(),
                self.expected_len
            );
            self.buffer.clear();
            self.open = false;
            return None;
        }
        if self.buffer.len() == self.expected_len {
            self.open = false;
            return Some(std::mem::replace(
                &mut self.buffer,
                Vec::with_capacity(self.expected_len),
            ));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_chunk_payload_gets_start_marker() {
        let datagrams = chunk_payload(&[1, 2, 3], 512).unwrap();
        assert_eq!(datagrams, vec![vec![0x80, 1, 2, 3]]);
    }

    #[test]
    fn test_exact_multiple_has_no_empty_tail() {
        let datagrams = chunk_payload(&[7u8; 1024], 512).unwrap();
        assert_eq!(datagrams.len(), 2);
        assert!(datagrams.iter().all(|d| d.len() == 513));
        assert_eq!(datagrams[1][0], CONTINUATION_MARKER);
    }

    #[test]
    fn test_trailing_partial_chunk_is_flushed() {
        let payload: Vec<u8> = (0..=255).cycle().take(1100).collect();
        let datagrams = chunk_payload(&payload, 512).unwrap();

        assert_eq!(datagrams.len(), 3);
        assert_eq!(datagrams[2].len(), 1 + 76);
        let rejoined: Vec<u8> = datagrams.iter().flat_map(|d| d[1..].iter().copied()).collect();
        assert_eq!(rejoined, payload);
    }

    #[test]
    fn test_zero_chunk_size_is_rejected() {
        assert_eq!(chunk_payload(&[1], 0), Err(ProtocolError::InvalidChunkSize(0)));
    }

    #[test]
    fn test_empty_payload_is_a_bare_start_marker() {
        assert_eq!(chunk_payload(&[], 512).unwrap(), vec![vec![FRAME_START_MARKER]]);
    }

    #[test]
    fn test_destination_default_and_display() {
        let dest = Destination::default();
        assert_eq!(dest.to_string(), "ledboard:1337");
    }

    // ── FrameAssembler ────────────────────────────────────────────────────────

    #[test]
    fn test_assembler_rebuilds_chunked_frame() {
        let payload: Vec<u8> = (0..200u8).collect();
        let mut assembler = FrameAssembler::new(payload.len());

        let mut completed = None;
        for datagram in chunk_payload(&payload, 64).unwrap() {
            completed = assembler.push(&datagram);
        }

        assert_eq!(completed, Some(payload));
        assert_eq!(assembler.pending(), 0);
    }

    #[test]
    fn test_assembler_ignores_continuation_without_start() {
        let mut assembler = FrameAssembler::new(2);
        assert_eq!(assembler.push(&[CONTINUATION_MARKER, 1, 2]), None);
        assert_eq!(assembler.pending(), 0);
    }

    #[test]
    fn test_assembler_restarts_on_new_start_marker() {
        let mut assembler = FrameAssembler::new(4);
        assert_eq!(assembler.push(&[FRAME_START_MARKER, 1, 2]), None);
        assert_eq!(assembler.push(&[FRAME_START_MARKER, 5, 6]), None);
        assert_eq!(assembler.push(&[CONTINUATION_MARKER, 7, 8]), Some(vec![5, 6, 7, 8]));
    }

    #[test]
    fn test_assembler_discards_overlong_frame() {
        let mut assembler = FrameAssembler::new(3);
        assert_eq!(assembler.push(&[FRAME_START_MARKER, 1, 2]), None);
        assert_eq!(assembler.push(&[CONTINUATION_MARKER, 3, 4]), None);
        assert_eq!(assembler.pending(), 0);
        assert_eq!(assembler.push(&[CONTINUATION_MARKER, 5, 6, 7]), None);
    }

    #[test]
    fn test_assembler_ignores_empty_and_unknown_datagrams() {
        let mut assembler = FrameAssembler::new(1);
        assert_eq!(assembler.push(&[]), None);
        assert_eq!(assembler.push(&[0x42, 1]), None);
        assert_eq!(assembler.push(&[FRAME_START_MARKER, 1]), Some(vec![1]));
    }
}
