//! # ledboard-core
//!
//! Shared library for the LED board sender containing the pixel surface,
//! the panel-composition layer, rasterization primitives and the chunked
//! frame protocol.
//!
//! This crate has zero dependencies on OS APIs or network sockets.  The
//! sender crate owns the UDP socket; everything here is pure and can be
//! tested on any machine without a board attached.
//!
//! # Architecture overview (for beginners)
//!
//! The physical display is a 96×48 LED matrix built from nine 32×16 panels.
//! The panels are daisy-chained with cables, so the controller expects the
//! pixel bytes in *cable order*, not in the order a human reads the screen.
//!
//! - **`domain`** – The drawing model.  A [`PixelSurface`] is a grid of colour
//!   tuples, a [`LedBoard`] splits a logical canvas into panels and flattens
//!   them into the wire order, and a [`Frame`] is that flattened result.
//!
//! - **`graphics`** – Lines, rectangles and circles built only on top of the
//!   [`PixelSink`] trait, so they work the same on a bare surface or a board.
//!
//! - **`protocol`** – How a frame becomes bytes and datagrams: one byte per
//!   colour component, cut into chunks of at most 512 bytes, each chunk
//!   prefixed by a one-byte marker (`0x80` for frame start, `0x00` after).

pub mod domain;
pub mod graphics;
pub mod protocol;

pub use domain::board::{BoardConfig, BoardError, LedBoard, PanelOrder, PanelPos, PANEL_COLUMNS};
pub use domain::frame::Frame;
pub use domain::surface::{
    PixelSurface, PixelValue, ScrollDirection, SurfaceError, MAX_COLOR_ARITY,
};
pub use domain::PixelSink;
pub use graphics::Graphics;
pub use protocol::chunking::{chunk_payload, Destination, FrameAssembler};
pub use protocol::codec::{decode_frame, encode_frame, ProtocolError};
