//! Addressable pixel surface domain entity.
//!
//! A [`PixelSurface`] is a `width × height` grid where every pixel holds the
//! same number of colour components (`color_arity`), each in
//! `[0, color_depth]`.  A monochrome LED panel uses arity 1, an RGB canvas
//! uses arity 3.
//!
//! Writes never fail: off-canvas coordinates are ignored and component
//! values are clamped.  Reads are bounds-checked.

use thiserror::Error;

use crate::domain::frame::Frame;
use crate::domain::PixelSink;

/// Largest supported number of components per pixel (RGBA).
pub const MAX_COLOR_ARITY: usize = 4;

/// Default maximum component value.
pub const DEFAULT_COLOR_DEPTH: u16 = 0xFF;

/// Errors that can occur when creating or reading a surface.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SurfaceError {
    /// Width or height is zero.
    #[error("invalid surface dimensions {width}x{height}: both must be positive")]
    InvalidDimension { width: u32, height: u32 },

    /// The number of components per pixel is zero or above [`MAX_COLOR_ARITY`].
    #[error("invalid color arity {0}: must be between 1 and {}", MAX_COLOR_ARITY)]
    InvalidColorArity(usize),

    /// A bounds-checked read addressed a pixel outside the surface.
    #[error("pixel ({x}, {y}) is outside the {width}x{height} surface")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },

    /// Bulk input does not match the surface shape.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),
}

/// Direction of a one-pixel wrap-around scroll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrollDirection {
    Up,
    Down,
    Left,
    Right,
}

/// A colour value as written by callers.
///
/// Holds up to [`MAX_COLOR_ARITY`] signed components so that out-of-range
/// values (negative, or above the colour depth) can be clamped on write
/// instead of overflowing at the call site.  A scalar is a 1-tuple.
///
/// # Examples
///
/// ```rust
/// use ledboard_core::PixelValue;
///
/// let grey = PixelValue::from(0x7f);
/// assert_eq!(grey.components(), &[0x7f]);
///
/// let red = PixelValue::from([255, 0, 0]);
/// assert_eq!(red.components(), &[255, 0, 0]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelValue {
    components: [i32; MAX_COLOR_ARITY],
    len: usize,
}

impl PixelValue {
    /// A single-component value.
    pub fn scalar(value: i32) -> Self {
        let mut components = [0; MAX_COLOR_ARITY];
        components[0] = value;
        Self { components, len: 1 }
    }

    /// Builds a value from a component slice.  Components past
    /// [`MAX_COLOR_ARITY`] are dropped.
    pub fn from_components(values: &[i32]) -> Self {
        let len = values.len().min(MAX_COLOR_ARITY);
        let mut components = [0; MAX_COLOR_ARITY];
        components[..len].copy_from_slice(&values[..len]);
        Self { components, len }
    }

    /// The components as written.
    pub fn components(&self) -> &[i32] {
        &self.components[..self.len]
    }

    /// Fits the value to `arity` components clamped into `[0, depth]`.
    ///
    /// Missing components are zero, surplus components are ignored.
    pub(crate) fn fit(&self, arity: usize, depth: u16) -> [u16; MAX_COLOR_ARITY] {
        let mut out = [0u16; MAX_COLOR_ARITY];
        for (slot, value) in out.iter_mut().zip(self.components()).take(arity) {
            *slot = (*value).clamp(0, depth as i32) as u16;
        }
        out
    }
}

impl From<i32> for PixelValue {
    fn from(value: i32) -> Self {
        Self::scalar(value)
    }
}

impl From<u8> for PixelValue {
    fn from(value: u8) -> Self {
        Self::scalar(value as i32)
    }
}

impl From<u16> for PixelValue {
    fn from(value: u16) -> Self {
        Self::scalar(value as i32)
    }
}

impl<const N: usize> From<[i32; N]> for PixelValue {
    fn from(values: [i32; N]) -> Self {
        Self::from_components(&values)
    }
}

impl From<&[i32]> for PixelValue {
    fn from(values: &[i32]) -> Self {
        Self::from_components(values)
    }
}

impl From<&[u16]> for PixelValue {
    fn from(values: &[u16]) -> Self {
        let len = values.len().min(MAX_COLOR_ARITY);
        let mut components = [0; MAX_COLOR_ARITY];
        for (slot, value) in components.iter_mut().zip(values) {
            *slot = *value as i32;
        }
        Self { components, len }
    }
}

/// A 2-D grid of colour tuples.
///
/// Components are stored flat in row-major order (`y` outer, `x` inner),
/// `color_arity` consecutive values per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelSurface {
    width: u32,
    height: u32,
    color_arity: usize,
    color_depth: u16,
    data: Vec<u16>,
}

impl PixelSurface {
    /// Creates a monochrome surface (arity 1, depth 255) with every pixel 0.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::InvalidDimension`] if width or height is zero.
    pub fn new(width: u32, height: u32) -> Result<Self, SurfaceError> {
        Self::with_format(width, height, 1, DEFAULT_COLOR_DEPTH)
    }

    /// Creates a surface with an explicit colour format, every pixel zeroed.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::InvalidDimension`] if width or height is zero and
    /// [`SurfaceError::InvalidColorArity`] if `color_arity` is not in
    /// `1..=MAX_COLOR_ARITY`.
    pub fn with_format(
        width: u32,
        height: u32,
        color_arity: usize,
        color_depth: u16,
    ) -> Result<Self, SurfaceError> {
        if width == 0 || height == 0 {
            return Err(SurfaceError::InvalidDimension { width, height });
        }
        if color_arity == 0 || color_arity > MAX_COLOR_ARITY {
            return Err(SurfaceError::InvalidColorArity(color_arity));
        }
        Ok(Self::zeroed(width, height, color_arity, color_depth))
    }

    /// Zero-filled surface for a format the caller has already validated.
    pub(crate) fn zeroed(width: u32, height: u32, color_arity: usize, color_depth: u16) -> Self {
        debug_assert!(width > 0 && height > 0);
        debug_assert!((1..=MAX_COLOR_ARITY).contains(&color_arity));
        let pixels = width as usize * height as usize;
        Self {
            width,
            height,
            color_arity,
            color_depth,
            data: vec![0; pixels * color_arity],
        }
    }

    /// Rebuilds a surface from a frame produced by [`PixelSurface::serialize`].
    ///
    /// Components above `color_depth` are clamped.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::ShapeMismatch`] if the frame does not hold
    /// exactly `width × height` tuples, plus the errors of
    /// [`PixelSurface::with_format`].
    pub fn from_frame(
        width: u32,
        height: u32,
        color_depth: u16,
        frame: &Frame,
    ) -> Result<Self, SurfaceError> {
        let mut surface = Self::with_format(width, height, frame.arity(), color_depth)?;
        if frame.len() != surface.len() {
            return Err(SurfaceError::ShapeMismatch(format!(
                "frame holds {} pixels, a {width}x{height} surface needs {}",
                frame.len(),
                surface.len()
            )));
        }
        for (slot, value) in surface.data.iter_mut().zip(frame.components()) {
            *slot = (*value).min(color_depth);
        }
        Ok(surface)
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Components per pixel.
    pub fn color_arity(&self) -> usize {
        self.color_arity
    }

    /// Largest component value a pixel may hold.
    pub fn color_depth(&self) -> u16 {
        self.color_depth
    }

    /// Number of pixels (`width × height`).
    pub fn len(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Always `false`: a surface has at least one pixel.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Writes one pixel.
    ///
    /// Off-canvas coordinates are a silent no-op.  Each component is clamped
    /// into `[0, color_depth]`; a value with fewer components than the
    /// surface arity is zero-padded.
    pub fn set_pixel(&mut self, x: i32, y: i32, value: impl Into<PixelValue>) {
        let Some(offset) = self.offset(x, y) else {
            return;
        };
        let fitted = value.into().fit(self.color_arity, self.color_depth);
        self.data[offset..offset + self.color_arity].copy_from_slice(&fitted[..self.color_arity]);
    }

    /// Reads one pixel.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::OutOfBounds`] if `(x, y)` is outside the surface.
    pub fn get_pixel(&self, x: i32, y: i32) -> Result<&[u16], SurfaceError> {
        let offset = self.offset(x, y).ok_or(SurfaceError::OutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        })?;
        Ok(&self.data[offset..offset + self.color_arity])
    }

    /// Sets every pixel to `value`, with the same clamping as `set_pixel`.
    pub fn fill(&mut self, value: impl Into<PixelValue>) {
        let fitted = value.into().fit(self.color_arity, self.color_depth);
        for pixel in self.data.chunks_exact_mut(self.color_arity) {
            pixel.copy_from_slice(&fitted[..self.color_arity]);
        }
    }

    /// Flattens the surface into a [`Frame`], row-major (`y` outer, `x` inner).
    pub fn serialize(&self) -> Frame {
        Frame::from_parts(self.color_arity, self.data.clone())
    }

    /// Iterates `((x, y), components)` in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = ((u32, u32), &[u16])> + '_ {
        let width = self.width;
        self.data
            .chunks_exact(self.color_arity)
            .enumerate()
            .map(move |(i, px)| (((i as u32) % width, (i as u32) / width), px))
    }

    /// Returns the components of row `y`, `width × color_arity` values.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    pub(crate) fn row(&self, y: u32) -> &[u16] {
        let stride = self.width as usize * self.color_arity;
        let start = y as usize * stride;
        &self.data[start..start + stride]
    }

    /// Mutable access to the components of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    pub(crate) fn row_mut(&mut self, y: u32) -> &mut [u16] {
        let stride = self.width as usize * self.color_arity;
        let start = y as usize * stride;
        &mut self.data[start..start + stride]
    }

    /// All components, flat and row-major.
    pub(crate) fn components(&self) -> &[u16] {
        &self.data
    }

    /// Rotates the contents by one pixel with wrap-around.
    ///
    /// `Down` moves the bottom row to the top, `Right` moves the rightmost
    /// column to the left edge; `Up` and `Left` are the inverses.
    pub fn scroll(&mut self, direction: ScrollDirection) {
        let row_stride = self.width as usize * self.color_arity;
        match direction {
            ScrollDirection::Down => self.data.rotate_right(row_stride),
            ScrollDirection::Up => self.data.rotate_left(row_stride),
            ScrollDirection::Right => {
                for row in self.data.chunks_exact_mut(row_stride) {
                    row.rotate_right(self.color_arity);
                }
            }
            ScrollDirection::Left => {
                for row in self.data.chunks_exact_mut(row_stride) {
                    row.rotate_left(self.color_arity);
                }
            }
        }
    }

    /// Adds two surfaces component by component, saturating at `color_depth`.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::ShapeMismatch`] if the surfaces differ in size
    /// or arity.
    pub fn saturating_add(&self, other: &PixelSurface) -> Result<PixelSurface, SurfaceError> {
        if !self.same_shape(other) {
            return Err(SurfaceError::ShapeMismatch(format!(
                "cannot add {} to {}",
                other.describe(),
                self.describe()
            )));
        }
        let mut sum = self.clone();
        for (slot, value) in sum.data.iter_mut().zip(&other.data) {
            *slot = slot.saturating_add(*value).min(self.color_depth);
        }
        Ok(sum)
    }

    /// Returns `true` if `other` has the same width, height and arity.
    pub fn same_shape(&self, other: &PixelSurface) -> bool {
        self.width == other.width
            && self.height == other.height
            && self.color_arity == other.color_arity
    }

    /// Short shape description used in error messages.
    pub(crate) fn describe(&self) -> String {
        format!("{}x{}x{}", self.width, self.height, self.color_arity)
    }

    fn offset(&self, x: i32, y: i32) -> Option<usize> {
        if !self.contains(x, y) {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * self.color_arity)
    }
}

impl PixelSink for PixelSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn set_pixel(&mut self, x: i32, y: i32, value: PixelValue) {
        PixelSurface::set_pixel(self, x, y, value);
    }

    fn get_pixel(&self, x: i32, y: i32) -> Result<&[u16], SurfaceError> {
        PixelSurface::get_pixel(self, x, y)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb(width: u32, height: u32) -> PixelSurface {
        PixelSurface::with_format(width, height, 3, 0xFF).unwrap()
    }

    // ── Construction ──────────────────────────────────────────────────────────

    #[test]
    fn test_new_surface_is_zero_filled() {
        let surface = PixelSurface::new(4, 3).unwrap();
        assert_eq!(surface.len(), 12);
        assert!(surface.pixels().all(|(_, px)| px == [0]));
    }

    #[test]
    fn test_new_rejects_zero_width() {
        assert_eq!(
            PixelSurface::new(0, 3),
            Err(SurfaceError::InvalidDimension { width: 0, height: 3 })
        );
    }

    #[test]
    fn test_new_rejects_zero_height() {
        assert!(matches!(
            PixelSurface::new(3, 0),
            Err(SurfaceError::InvalidDimension { .. })
        ));
    }

    #[test]
    fn test_with_format_rejects_zero_and_oversized_arity() {
        assert_eq!(
            PixelSurface::with_format(2, 2, 0, 255),
            Err(SurfaceError::InvalidColorArity(0))
        );
        assert_eq!(
            PixelSurface::with_format(2, 2, MAX_COLOR_ARITY + 1, 255),
            Err(SurfaceError::InvalidColorArity(MAX_COLOR_ARITY + 1))
        );
    }

    // ── set_pixel / get_pixel ─────────────────────────────────────────────────

    #[test]
    fn test_set_then_get_returns_written_value() {
        let mut surface = rgb(3, 3);
        surface.set_pixel(2, 1, [10, 20, 30]);
        assert_eq!(surface.get_pixel(2, 1).unwrap(), &[10, 20, 30]);
    }

    #[test]
    fn test_set_pixel_clamps_components_to_depth_and_zero() {
        // Arrange
        let mut surface = PixelSurface::with_format(2, 2, 3, 0x7f).unwrap();

        // Act
        surface.set_pixel(0, 0, [300, -5, 0x40]);

        // Assert
        assert_eq!(surface.get_pixel(0, 0).unwrap(), &[0x7f, 0, 0x40]);
    }

    #[test]
    fn test_scalar_is_a_one_tuple() {
        let mut surface = rgb(2, 2);
        surface.set_pixel(1, 1, 99);
        assert_eq!(surface.get_pixel(1, 1).unwrap(), &[99, 0, 0]);
    }

    #[test]
    fn test_surplus_components_are_ignored() {
        let mut surface = PixelSurface::new(2, 2).unwrap();
        surface.set_pixel(0, 1, [5, 6, 7]);
        assert_eq!(surface.get_pixel(0, 1).unwrap(), &[5]);
    }

    #[test]
    fn test_set_pixel_out_of_bounds_is_a_no_op() {
        // Arrange
        let mut surface = rgb(3, 2);
        surface.set_pixel(1, 1, [1, 2, 3]);
        let before = surface.clone();

        // Act
        for (x, y) in [(-1, 0), (0, -1), (3, 0), (0, 2), (i32::MAX, i32::MIN)] {
            surface.set_pixel(x, y, [255, 255, 255]);
        }

        // Assert
        assert_eq!(surface, before);
    }

    #[test]
    fn test_get_pixel_out_of_bounds_fails() {
        let surface = PixelSurface::new(3, 2).unwrap();
        assert_eq!(
            surface.get_pixel(3, 0),
            Err(SurfaceError::OutOfBounds { x: 3, y: 0, width: 3, height: 2 })
        );
        assert!(surface.get_pixel(-1, 1).is_err());
    }

    // ── fill ──────────────────────────────────────────────────────────────────

    #[test]
    fn test_fill_sets_every_pixel_with_clamping() {
        let mut surface = PixelSurface::with_format(3, 3, 1, 100).unwrap();
        surface.fill(1000);
        assert!(surface.pixels().all(|(_, px)| px == [100]));
    }

    // ── serialize / from_frame ────────────────────────────────────────────────

    #[test]
    fn test_serialize_is_row_major() {
        // Arrange
        let mut surface = PixelSurface::new(2, 2).unwrap();
        surface.set_pixel(0, 0, 1);
        surface.set_pixel(1, 0, 2);
        surface.set_pixel(0, 1, 3);
        surface.set_pixel(1, 1, 4);

        // Act
        let frame = surface.serialize();

        // Assert
        assert_eq!(frame.components(), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_serialize_then_from_frame_reproduces_surface() {
        let mut surface = rgb(5, 4);
        surface.set_pixel(0, 0, [1, 2, 3]);
        surface.set_pixel(4, 3, [250, 0, 7]);
        surface.set_pixel(2, 2, [9, 9, 9]);

        let restored = PixelSurface::from_frame(5, 4, 0xFF, &surface.serialize()).unwrap();

        assert_eq!(restored, surface);
    }

    #[test]
    fn test_from_frame_rejects_wrong_length() {
        let frame = PixelSurface::new(3, 3).unwrap().serialize();
        assert!(matches!(
            PixelSurface::from_frame(4, 3, 0xFF, &frame),
            Err(SurfaceError::ShapeMismatch(_))
        ));
    }

    // ── pixels ────────────────────────────────────────────────────────────────

    #[test]
    fn test_pixels_yields_coordinates_row_major() {
        let surface = PixelSurface::new(3, 2).unwrap();
        let coords: Vec<(u32, u32)> = surface.pixels().map(|(pos, _)| pos).collect();
        assert_eq!(coords, vec![(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (2, 1)]);
    }

    // ── saturating_add ────────────────────────────────────────────────────────

    #[test]
    fn test_saturating_add_sums_and_caps_at_depth() {
        // Arrange
        let mut a = PixelSurface::with_format(2, 1, 1, 0x7f).unwrap();
        let mut b = a.clone();
        a.set_pixel(0, 0, 0x70);
        b.set_pixel(0, 0, 0x20);
        a.set_pixel(1, 0, 1);
        b.set_pixel(1, 0, 1);

        // Act
        let sum = a.saturating_add(&b).unwrap();

        // Assert
        assert_eq!(sum.get_pixel(0, 0).unwrap(), &[0x7f]);
        assert_eq!(sum.get_pixel(1, 0).unwrap(), &[2]);
    }

    #[test]
    fn test_saturating_add_rejects_different_shapes() {
        let a = PixelSurface::new(2, 2).unwrap();
        let b = rgb(2, 2);
        assert!(matches!(a.saturating_add(&b), Err(SurfaceError::ShapeMismatch(_))));
    }

    // ── scroll ────────────────────────────────────────────────────────────────

    fn numbered(width: u32, height: u32) -> PixelSurface {
        let mut surface = PixelSurface::new(width, height).unwrap();
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                surface.set_pixel(x, y, y * 10 + x);
            }
        }
        surface
    }

    #[test]
    fn test_scroll_down_moves_last_row_to_top() {
        let mut surface = numbered(3, 3);
        surface.scroll(ScrollDirection::Down);
        assert_eq!(surface.serialize().components(), &[20, 21, 22, 0, 1, 2, 10, 11, 12]);
    }

    #[test]
    fn test_scroll_left_then_right_restores_surface() {
        let original = numbered(4, 2);
        let mut surface = original.clone();
        surface.scroll(ScrollDirection::Left);
        assert_eq!(surface.get_pixel(0, 0).unwrap(), &[1]);
        assert_eq!(surface.get_pixel(3, 0).unwrap(), &[0]);
        surface.scroll(ScrollDirection::Right);
        assert_eq!(surface, original);
    }

    #[test]
    fn test_scroll_right_keeps_multi_component_pixels_intact() {
        let mut surface = PixelSurface::with_format(2, 1, 3, 0xFF).unwrap();
        surface.set_pixel(0, 0, [1, 2, 3]);
        surface.set_pixel(1, 0, [4, 5, 6]);
        surface.scroll(ScrollDirection::Right);
        assert_eq!(surface.get_pixel(0, 0).unwrap(), &[4, 5, 6]);
        assert_eq!(surface.get_pixel(1, 0).unwrap(), &[1, 2, 3]);
    }

    // ── PixelValue ────────────────────────────────────────────────────────────

    #[test]
    fn test_pixel_value_truncates_past_max_arity() {
        let value = PixelValue::from([1, 2, 3, 4, 5, 6]);
        assert_eq!(value.components(), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_pixel_value_from_u16_slice_round_trips_components() {
        let stored: &[u16] = &[7, 8, 9];
        assert_eq!(PixelValue::from(stored).components(), &[7, 8, 9]);
    }
}
