//! Test patterns for bringing up a board.

use std::f64::consts::TAU;

use ledboard_core::{Graphics, LedBoard, PanelPos, ScrollDirection};

/// Something that can be drawn once per frame.
pub trait Pattern: Send {
    /// Short name used in log lines.
    fn name(&self) -> &'static str;

    /// Draws frame number `frame` (starting at 0) onto `board`.
    fn draw(&mut self, board: &mut LedBoard, frame: u64);
}

/// Two parallel diagonals, one per half of the board, at full brightness.
///
/// On the reference board this is the pixel set `(i, i)` and `(i + 48, i)`
/// for `i` in `2..46`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Diagonals;

impl Diagonals {
    fn paint(board: &mut LedBoard) {
        let value = i32::from(board.color_depth());
        let height = board.height() as i32;
        let half = board.width() as i32 / 2;
        board.fill(0);
        let mut gfx = Graphics::new(board);
        gfx.draw_line(2, 2, height - 3, height - 3, value);
        gfx.draw_line(2 + half, 2, height - 3 + half, height - 3, value);
    }
}

impl Pattern for Diagonals {
    fn name(&self) -> &'static str {
        "diagonals"
    }

    fn draw(&mut self, board: &mut LedBoard, _frame: u64) {
        Self::paint(board);
    }
}

/// One period of a sine wave across every panel, drifting one step per frame.
#[derive(Debug, Default, Clone, Copy)]
pub struct PanelSine;

impl Pattern for PanelSine {
    fn name(&self) -> &'static str {
        "panel-sine"
    }

    fn draw(&mut self, board: &mut LedBoard, frame: u64) {
        let value = i32::from(board.color_depth());
        let (pw, ph) = (board.panel_width(), board.panel_height());
        let (cols, rows) = board.grid();
        let amplitude = (f64::from(ph) - 1.0) / 2.0;
        let phase = frame as f64 * TAU / f64::from(pw);

        board.fill(0);
        for row in 0..rows {
            for col in 0..cols {
                let (ox, oy) = ((col * pw) as i32, (row * ph) as i32);
                for x in 0..pw {
                    let angle = f64::from(x) * TAU / f64::from(pw) + phase;
                    let y = (amplitude - angle.sin() * amplitude).round() as i32;
                    board.set_pixel(ox + x as i32, oy + y, value);
                }
            }
        }
    }
}

/// Lights each panel with a brightness proportional to its position in the
/// wiring order and outlines it, so a miswired chain is obvious at a glance.
#[derive(Debug, Default, Clone, Copy)]
pub struct PanelIndex;

impl Pattern for PanelIndex {
    fn name(&self) -> &'static str {
        "panel-index"
    }

    fn draw(&mut self, board: &mut LedBoard, _frame: u64) {
        let depth = i32::from(board.color_depth());
        let (pw, ph) = (board.panel_width(), board.panel_height());
        let order: Vec<PanelPos> = board.panel_order().positions().to_vec();
        let slots = order.len() as i32;

        let mut gfx = Graphics::new(board);
        for (slot, pos) in order.iter().enumerate() {
            let (x, y) = ((pos.col * pw) as i32, (pos.row * ph) as i32);
            let level = depth * (slot as i32 + 1) / slots;
            gfx.fill_rect(x, y, pw, ph, level);
            gfx.draw_rect(x, y, pw, ph, depth);
        }
    }
}

/// Every pixel set to one value.
#[derive(Debug, Clone, Copy)]
pub struct Fill {
    pub value: i32,
}

impl Pattern for Fill {
    fn name(&self) -> &'static str {
        "fill"
    }

    fn draw(&mut self, board: &mut LedBoard, _frame: u64) {
        board.fill(self.value);
    }
}

/// The diagonals, rotated one pixel further every frame.
#[derive(Debug, Clone, Copy)]
pub struct Scroll {
    pub direction: ScrollDirection,
}

impl Pattern for Scroll {
    fn name(&self) -> &'static str {
        "scroll"
    }

    fn draw(&mut self, board: &mut LedBoard, frame: u64) {
        if frame == 0 {
            Diagonals::paint(board);
        } else {
            board.scroll(self.direction);
        }
    }
}
