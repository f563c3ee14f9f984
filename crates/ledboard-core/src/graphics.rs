//! Rasterization primitives.
//!
//! Everything here is written against [`PixelSink`] only: shapes are plotted
//! one pixel at a time through the bounds-tolerant `set_pixel`, so a shape that
//! runs off the canvas is simply cut off.

use crate::domain::surface::PixelValue;
use crate::domain::PixelSink;

/// Drawing helper borrowing any [`PixelSink`].
///
/// ```
/// use ledboard_core::{Graphics, LedBoard};
///
/// let mut board = LedBoard::new(96, 48, 0x7f, 9).unwrap();
/// Graphics::new(&mut board).draw_line(2, 2, 45, 45, 0x7f);
/// assert_eq!(board.get_pixel(45, 45).unwrap(), &[0x7f]);
/// ```
pub struct Graphics<'a, S: PixelSink + ?Sized> {
    sink: &'a mut S,
}

impl<'a, S: PixelSink + ?Sized> Graphics<'a, S> {
    pub fn new(sink: &'a mut S) -> Self {
        Self { sink }
    }

    /// Gives the borrowed canvas back, e.g. for reads between draws.
    pub fn sink(&mut self) -> &mut S {
        self.sink
    }

    pub fn draw_pixel(&mut self, x: i32, y: i32, value: impl Into<PixelValue>) {
        self.sink.set_pixel(x, y, value.into());
    }

    /// Draws a line between two inclusive end points (Bresenham).
    ///
    /// The line is clipped to the canvas before it is stepped, so end points
    /// anywhere in the `i32` range cost no more than an on-canvas line.
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, value: impl Into<PixelValue>) {
        self.line(x0.into(), y0.into(), x1.into(), y1.into(), value.into());
    }

    /// Outline of a `w × h` rectangle whose top-left corner is `(x, y)`.
    pub fn draw_rect(&mut self, x: i32, y: i32, w: u32, h: u32, value: impl Into<PixelValue>) {
        if w == 0 || h == 0 {
            return;
        }
        let value = value.into();
        let (x, y) = (i64::from(x), i64::from(y));
        let (right, bottom) = (x + i64::from(w) - 1, y + i64::from(h) - 1);
        self.line(x, y, right, y, value);
        self.line(x, bottom, right, bottom, value);
        self.line(x, y, x, bottom, value);
        self.line(right, y, right, bottom, value);
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, value: impl Into<PixelValue>) {
        let value = value.into();
        // Clip first so huge rectangles do not walk millions of no-op writes.
        let x_start = x.max(0);
        let y_start = y.max(0);
        let x_end = (x as i64 + w as i64).min(self.sink.width() as i64) as i32;
        let y_end = (y as i64 + h as i64).min(self.sink.height() as i64) as i32;
        for py in y_start..y_end {
            for px in x_start..x_end {
                self.sink.set_pixel(px, py, value);
            }
        }
    }

    /// Circle outline around `(cx, cy)` (midpoint algorithm).
    pub fn draw_circle(&mut self, cx: i32, cy: i32, radius: u32, value: impl Into<PixelValue>) {
        let value = value.into();
        let (cx, cy, r) = (i64::from(cx), i64::from(cy), i64::from(radius));
        let (w, h) = (i64::from(self.sink.width()), i64::from(self.sink.height()));
        if cx + r < 0 || cx - r >= w || cy + r < 0 || cy - r >= h {
            return;
        }
        // Canvas wholly inside the ring: the outline never touches it.
        let far_x = i128::from(cx.abs_diff(0).max(cx.abs_diff(w - 1)));
        let far_y = i128::from(cy.abs_diff(0).max(cy.abs_diff(h - 1)));
        let inner = i128::from(r - 2);
        if inner > 0 && far_x * far_x + far_y * far_y < inner * inner {
            return;
        }

        let mut x = r;
        let mut y = 0i64;
        let mut err = 1 - x;
        while x >= y {
            for (dx, dy) in [
                (x, y),
                (y, x),
                (-y, x),
                (-x, y),
                (-x, -y),
                (-y, -x),
                (y, -x),
                (x, -y),
            ] {
                self.plot(cx + dx, cy + dy, value);
            }
            y += 1;
            if err < 0 {
                err += 2 * y + 1;
            } else {
                x -= 1;
                err += 2 * (y - x) + 1;
            }
        }
    }

    /// Sets every pixel of the canvas.
    pub fn fill(&mut self, value: impl Into<PixelValue>) {
        let (w, h) = (self.sink.width(), self.sink.height());
        self.fill_rect(0, 0, w, h, value);
    }

    fn plot(&mut self, x: i64, y: i64, value: PixelValue) {
        if let (Ok(x), Ok(y)) = (i32::try_from(x), i32::try_from(y)) {
            self.sink.set_pixel(x, y, value);
        }
    }

    fn line(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, value: PixelValue) {
        let (w, h) = (i64::from(self.sink.width()), i64::from(self.sink.height()));
        let Some((x0, y0, x1, y1)) = clip_line(x0, y0, x1, y1, w, h) else {
            return;
        };

        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (x0, y0);

        loop {
            self.plot(x, y, value);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }
}

/// Cuts a segment down to the part inside a `w × h` canvas (Liang-Barsky).
///
/// A segment already inside comes back unchanged; one that misses the canvas
/// returns `None`.
fn clip_line(x0: i64, y0: i64, x1: i64, y1: i64, w: i64, h: i64) -> Option<(i64, i64, i64, i64)> {
    if w <= 0 || h <= 0 {
        return None;
    }
    let inside = |x: i64, y: i64| (0..w).contains(&x) && (0..h).contains(&y);
    if inside(x0, y0) && inside(x1, y1) {
        return Some((x0, y0, x1, y1));
    }

    let (dx, dy) = ((x1 - x0) as f64, (y1 - y0) as f64);
    let (mut t0, mut t1) = (0.0f64, 1.0f64);
    for (p, q) in [
        (-dx, x0 as f64),
        (dx, (w - 1 - x0) as f64),
        (-dy, y0 as f64),
        (dy, (h - 1 - y0) as f64),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }

    let at = |t: f64| {
        let x = (x0 as f64 + t * dx).round() as i64;
        let y = (y0 as f64 + t * dy).round() as i64;
        (x.clamp(0, w - 1), y.clamp(0, h - 1))
    };
    let (cx0, cy0) = at(t0);
    let (cx1, cy1) = at(t1);
    Some((cx0, cy0, cx1, cy1))
}
