//! Domain entities for the LED board.
//!
//! This module contains pure drawing and layout logic with no infrastructure
//! dependencies.
//!
//! # Why a `PixelSink` trait? (for beginners)
//!
//! Two types in this crate can be drawn on: a plain [`surface::PixelSurface`]
//! and a [`board::LedBoard`], which routes each pixel to one of its panels.
//! Rasterization code (see [`crate::graphics`]) should not care which one it
//! is talking to.  Instead of one type inheriting drawing, storage and panel
//! routing at once, both types implement the small `PixelSink` capability and
//! the drawing code is generic over it.

pub mod board;
pub mod frame;
pub mod surface;

use surface::{PixelValue, SurfaceError};

/// The write/read contract every drawable canvas provides.
///
/// Writes are *bounds-tolerant*: coordinates outside the canvas are ignored
/// and component values are clamped into `[0, color_depth]`.  Reads are
/// *bounds-checked* and fail with [`SurfaceError::OutOfBounds`].  Drawing code
/// relies on this asymmetry to draw shapes that partially leave the canvas.
pub trait PixelSink {
    /// Canvas width in pixels.
    fn width(&self) -> u32;

    /// Canvas height in pixels.
    fn height(&self) -> u32;

    /// Writes one pixel.  Never fails.
    fn set_pixel(&mut self, x: i32, y: i32, value: PixelValue);

    /// Reads one pixel.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::OutOfBounds`] if `(x, y)` is outside the canvas.
    fn get_pixel(&self, x: i32, y: i32) -> Result<&[u16], SurfaceError>;

    /// Returns `true` if `(x, y)` lies on the canvas.
    fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as i64) < self.width() as i64 && (y as i64) < self.height() as i64
    }
}
