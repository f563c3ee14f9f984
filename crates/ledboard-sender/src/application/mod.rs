//! Application layer use cases for the sender.
//!
//! # Sub-modules
//!
//! - **`patterns`** – Things to draw: the reference diagonals, a sine wave per
//!   panel, a wiring check that lights each panel by its cable position, a
//!   solid fill and a scrolling variant of the diagonals.
//!
//! - **`render`** – [`render::RenderLoop`]: owns one board and one transport,
//!   draws a pattern, flattens the board and sends the frame, once per tick.
//!   Transport failures are logged and the loop moves on to the next frame.

pub mod patterns;
pub mod render;
