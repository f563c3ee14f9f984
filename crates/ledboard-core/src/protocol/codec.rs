//! Byte codec between a [`Frame`] and the raw controller payload.
//!
//! Wire format:
//! ```text
//! [c0 of pixel 0]..[c(arity-1) of pixel 0][c0 of pixel 1]...
//! ```
//! One unsigned byte per colour component, pixels in frame order.  There is
//! no header: the receiver knows the board geometry up front.

use thiserror::Error;

use crate::domain::frame::Frame;

/// Errors that can occur while encoding or chunking a frame.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    /// A component does not fit into one byte.
    #[error("component {value} at index {index} does not fit in a byte")]
    ComponentOverflow { index: usize, value: u16 },

    /// A chunk size of zero can never make progress.
    #[error("invalid chunk size: {0}")]
    InvalidChunkSize(usize),

    /// The byte stream is not a whole number of pixel tuples.
    #[error("payload of {len} bytes is not a multiple of arity {arity}")]
    PartialTuple { len: usize, arity: usize },
}

/// Encodes a frame as one byte per component.
///
/// # Errors
///
/// Returns [`ProtocolError::ComponentOverflow`] for a component above 255,
/// which only happens when the colour depth exceeds 8 bits.
///
/// # Examples
///
/// ```rust
/// use ledboard_core::{encode_frame, Frame};
///
/// let frame = Frame::from_components(1, vec![0x00, 0x7f]).unwrap();
/// assert_eq!(encode_frame(&frame).unwrap(), vec![0x00, 0x7f]);
/// ```
pub fn encode_frame(frame: &Frame) -> Result<Vec<u8>, ProtocolError> {
    frame
        .components()
        .iter()
        .enumerate()
        .map(|(index, &value)| {
            u8::try_from(value).map_err(|_| ProtocolError::ComponentOverflow { index, value })
        })
        .collect()
}

/// Decodes a raw payload back into a frame of the given arity.
///
/// # Errors
///
/// Returns [`ProtocolError::PartialTuple`] if `arity` is zero or the payload
/// length is not a multiple of it.
pub fn decode_frame(bytes: &[u8], arity: usize) -> Result<Frame, ProtocolError> {
    let components = bytes.iter().map(|&b| u16::from(b)).collect();
    Frame::from_components(arity, components).ok_or(ProtocolError::PartialTuple {
        len: bytes.len(),
        arity,
    })
}
