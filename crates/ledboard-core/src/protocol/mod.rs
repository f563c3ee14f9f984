//! Protocol module: frame byte encoding and datagram chunking.

pub mod chunking;
pub mod codec;

pub use chunking::{
    chunk_payload, Destination, FrameAssembler, CONTINUATION_MARKER, DEFAULT_HOST,
    DEFAULT_MAX_CHUNK_SIZE, DEFAULT_PACING, DEFAULT_PORT, FRAME_START_MARKER, MAX_CHUNK_SIZE,
    MAX_DATAGRAM_SIZE,
};
pub use codec::{decode_frame, encode_frame, ProtocolError};
