//! LED board domain entity: panel composition and wire ordering.
//!
//! A board is a logical canvas (96×48 on the reference hardware) made of
//! equally sized panels arranged in a grid with [`PANEL_COLUMNS`] columns.
//! Every board pixel belongs to exactly one panel:
//!
//! ```text
//!   panel_pos = (x / panel_width, y / panel_height)
//!   local     = (x % panel_width, y % panel_height)
//! ```
//!
//! # Why a traversal order? (for beginners)
//!
//! The panels are chained with ribbon cables, and the controller shifts
//! bytes through the chain in cable order.  On the reference board the cable
//! starts at the top-right panel, runs down the right column, back up the
//! middle column and down the left column:
//!
//! ```text
//!   col:  0   1   2
//!   row0  7   6   1
//!   row1  8   5   2
//!   row2  9   4   3
//! ```
//!
//! That order has nothing to do with how a program draws, so it is kept as
//! data ([`PanelOrder`]) and only applied when the board is flattened by
//! [`LedBoard::get_surface`].

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::domain::frame::Frame;
use crate::domain::surface::{PixelSurface, PixelValue, ScrollDirection, SurfaceError};
use crate::domain::PixelSink;

/// Number of panel columns on a board.
pub const PANEL_COLUMNS: u32 = 3;

/// Panel count of the reference board (3×3).
pub const DEFAULT_NUM_PANELS: u32 = 9;

/// Colour depth of the reference board (7-bit brightness).
pub const DEFAULT_BOARD_COLOR_DEPTH: u16 = 0x7f;

/// Errors that can occur when building or bulk-loading a board.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    /// The board cannot be split into equally sized panels.
    #[error("invalid panel geometry: {0}")]
    InvalidPanelGeometry(String),

    /// The traversal order does not cover every panel exactly once.
    #[error("invalid panel order: {0}")]
    InvalidPanelOrder(String),

    /// A bulk-loaded buffer does not match the board dimensions.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// The underlying panel surface rejected its format.
    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

/// Position of a panel in the panel grid.
///
/// Serialized as a two-element `[col, row]` array so wiring tables read
/// naturally in TOML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "(u32, u32)", into = "(u32, u32)")]
pub struct PanelPos {
    /// Panel column, counted from the left.
    pub col: u32,
    /// Panel row, counted from the top.
    pub row: u32,
}

impl PanelPos {
    pub const fn new(col: u32, row: u32) -> Self {
        Self { col, row }
    }
}

impl From<(u32, u32)> for PanelPos {
    fn from((col, row): (u32, u32)) -> Self {
        Self { col, row }
    }
}

impl From<PanelPos> for (u32, u32) {
    fn from(pos: PanelPos) -> Self {
        (pos.col, pos.row)
    }
}

impl fmt::Display for PanelPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

/// The physical wiring order of the panels: one entry per panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PanelOrder(Vec<PanelPos>);

impl PanelOrder {
    /// Wraps an explicit list of panel positions.  Validated when the board
    /// is built.
    pub fn new(positions: Vec<PanelPos>) -> Self {
        Self(positions)
    }

    /// Column-serpentine order starting at the top-right panel: down the
    /// rightmost column, up the next one, and so on.
    ///
    /// `serpentine(3, 3)` is the wiring of the reference board.
    pub fn serpentine(cols: u32, rows: u32) -> Self {
        let mut positions = Vec::with_capacity((cols * rows) as usize);
        for (i, col) in (0..cols).rev().enumerate() {
            if i % 2 == 0 {
                positions.extend((0..rows).map(|row| PanelPos::new(col, row)));
            } else {
                positions.extend((0..rows).rev().map(|row| PanelPos::new(col, row)));
            }
        }
        Self(positions)
    }

    /// Plain reading order (`row` outer, `col` inner).
    pub fn row_major(cols: u32, rows: u32) -> Self {
        Self(
            (0..rows)
                .flat_map(|row| (0..cols).map(move |col| PanelPos::new(col, row)))
                .collect(),
        )
    }

    pub fn positions(&self) -> &[PanelPos] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Checks that the order lists every position of a `cols × rows` grid
    /// exactly once.
    fn validate(&self, cols: u32, rows: u32) -> Result<(), BoardError> {
        let expected = (cols * rows) as usize;
        if self.0.len() != expected {
            return Err(BoardError::InvalidPanelOrder(format!(
                "{} entries for {expected} panels",
                self.0.len()
            )));
        }
        let mut seen = vec![false; expected];
        for pos in &self.0 {
            if pos.col >= cols || pos.row >= rows {
                return Err(BoardError::InvalidPanelOrder(format!(
                    "panel {pos} is outside the {cols}x{rows} grid"
                )));
            }
            let index = (pos.row * cols + pos.col) as usize;
            if seen[index] {
                return Err(BoardError::InvalidPanelOrder(format!("panel {pos} listed twice")));
            }
            seen[index] = true;
        }
        Ok(())
    }
}

impl Default for PanelOrder {
    fn default() -> Self {
        Self::serpentine(PANEL_COLUMNS, DEFAULT_NUM_PANELS / PANEL_COLUMNS)
    }
}

/// Everything needed to build a [`LedBoard`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Board width in pixels.
    #[serde(default = "default_width")]
    pub width: u32,
    /// Board height in pixels.
    #[serde(default = "default_height")]
    pub height: u32,
    /// Largest component value.
    #[serde(default = "default_color_depth")]
    pub color_depth: u16,
    /// Components per pixel.
    #[serde(default = "default_color_arity")]
    pub color_arity: usize,
    /// Total number of panels; a positive multiple of [`PANEL_COLUMNS`].
    #[serde(default = "default_num_panels")]
    pub num_panels: u32,
    /// Wiring order.  `None` means [`PanelOrder::serpentine`] for the grid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub panel_order: Option<PanelOrder>,
}

fn default_width() -> u32 {
    96
}
fn default_height() -> u32 {
    48
}
fn default_color_depth() -> u16 {
    DEFAULT_BOARD_COLOR_DEPTH
}
fn default_color_arity() -> usize {
    1
}
fn default_num_panels() -> u32 {
    DEFAULT_NUM_PANELS
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            color_depth: default_color_depth(),
            color_arity: default_color_arity(),
            num_panels: default_num_panels(),
            panel_order: None,
        }
    }
}

/// A logical canvas split into panels that are flattened in wiring order.
#[derive(Debug, Clone)]
pub struct LedBoard {
    width: u32,
    height: u32,
    num_panels: u32,
    panel_width: u32,
    panel_height: u32,
    panel_rows: u32,
    color_arity: usize,
    color_depth: u16,
    panels: HashMap<PanelPos, PixelSurface>,
    order: PanelOrder,
}

impl LedBoard {
    /// Creates a monochrome board with the serpentine wiring order.
    ///
    /// # Errors
    ///
    /// See [`LedBoard::from_config`].
    pub fn new(
        width: u32,
        height: u32,
        color_depth: u16,
        num_panels: u32,
    ) -> Result<Self, BoardError> {
        Self::from_config(&BoardConfig {
            width,
            height,
            color_depth,
            color_arity: 1,
            num_panels,
            panel_order: None,
        })
    }

    /// Builds a board from a configuration.
    ///
    /// The panel grid is always [`PANEL_COLUMNS`] wide and `num_panels / 3`
    /// tall, so each panel is `width / 3` by `height / (num_panels / 3)`
    /// pixels.  For the 9-panel board that is a 3x3 grid of 32x16 panels.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::InvalidPanelGeometry`] if `num_panels` is not a
    /// positive multiple of [`PANEL_COLUMNS`] or the board does not divide
    /// into whole panels, [`BoardError::InvalidPanelOrder`] if the wiring
    /// order does not cover the grid exactly once, and
    /// [`BoardError::Surface`] for an unsupported colour arity.
    pub fn from_config(config: &BoardConfig) -> Result<Self, BoardError> {
        let num_panels = config.num_panels;
        if num_panels == 0 || num_panels % PANEL_COLUMNS != 0 {
            return Err(BoardError::InvalidPanelGeometry(format!(
                "{num_panels} panels is not a positive multiple of {PANEL_COLUMNS}"
            )));
        }
        let panel_rows = num_panels / PANEL_COLUMNS;
        let (width, height) = (config.width, config.height);
        if width == 0 || height == 0 || width % PANEL_COLUMNS != 0 || height % panel_rows != 0 {
            return Err(BoardError::InvalidPanelGeometry(format!(
                "{width}x{height} does not split into {PANEL_COLUMNS}x{panel_rows} whole panels"
            )));
        }
        let panel_width = width / PANEL_COLUMNS;
        let panel_height = height / panel_rows;

        let order = config
            .panel_order
            .clone()
            .unwrap_or_else(|| PanelOrder::serpentine(PANEL_COLUMNS, panel_rows));
        order.validate(PANEL_COLUMNS, panel_rows)?;

        let mut panels = HashMap::with_capacity(num_panels as usize);
        for row in 0..panel_rows {
            for col in 0..PANEL_COLUMNS {
                let panel = PixelSurface::with_format(
                    panel_width,
                    panel_height,
                    config.color_arity,
                    config.color_depth,
                )?;
                panels.insert(PanelPos::new(col, row), panel);
            }
        }

        debug!(
            "led board {width}x{height} split into {num_panels} panels of {panel_width}x{panel_height}"
        );

        Ok(Self {
            width,
            height,
            num_panels,
            panel_width,
            panel_height,
            panel_rows,
            color_arity: config.color_arity,
            color_depth: config.color_depth,
            panels,
            order,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn num_panels(&self) -> u32 {
        self.num_panels
    }

    pub fn panel_width(&self) -> u32 {
        self.panel_width
    }

    pub fn panel_height(&self) -> u32 {
        self.panel_height
    }

    /// Panel grid size as `(columns, rows)`.
    pub fn grid(&self) -> (u32, u32) {
        (PANEL_COLUMNS, self.panel_rows)
    }

    pub fn color_arity(&self) -> usize {
        self.color_arity
    }

    pub fn color_depth(&self) -> u16 {
        self.color_depth
    }

    pub fn panel_order(&self) -> &PanelOrder {
        &self.order
    }

    /// Number of pixels on the board.
    pub fn len(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The surface of the panel at `pos`, if the grid has one there.
    pub fn panel(&self, pos: PanelPos) -> Option<&PixelSurface> {
        self.panels.get(&pos)
    }

    /// Maps a board coordinate to its panel and panel-local coordinate.
    ///
    /// Returns `None` when `(x, y)` is off the board.
    pub fn locate(&self, x: i32, y: i32) -> Option<(PanelPos, i32, i32)> {
        if !self.contains(x, y) {
            return None;
        }
        let (x, y) = (x as u32, y as u32);
        let pos = PanelPos::new(x / self.panel_width, y / self.panel_height);
        Some((
            pos,
            (x % self.panel_width) as i32,
            (y % self.panel_height) as i32,
        ))
    }

    /// Writes one pixel, routing it to the owning panel.
    ///
    /// Off-board coordinates are a silent no-op; components are clamped
    /// into `[0, color_depth]` by the panel surface.
    pub fn set_pixel(&mut self, x: i32, y: i32, value: impl Into<PixelValue>) {
        let Some((pos, local_x, local_y)) = self.locate(x, y) else {
            return;
        };
        if let Some(panel) = self.panels.get_mut(&pos) {
            panel.set_pixel(local_x, local_y, value);
        }
    }

    /// Reads one pixel in board coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::OutOfBounds`] if `(x, y)` is off the board.
    pub fn get_pixel(&self, x: i32, y: i32) -> Result<&[u16], SurfaceError> {
        let out_of_bounds = || SurfaceError::OutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        };
        let (pos, local_x, local_y) = self.locate(x, y).ok_or_else(out_of_bounds)?;
        self.panels
            .get(&pos)
            .ok_or_else(out_of_bounds)?
            .get_pixel(local_x, local_y)
    }

    /// Sets every pixel on every panel.
    pub fn fill(&mut self, value: impl Into<PixelValue>) {
        let value = value.into();
        for panel in self.panels.values_mut() {
            panel.fill(value);
        }
    }

    /// Flattens the board into the wire payload.
    ///
    /// Panels are visited in the configured traversal order; each panel
    /// contributes its pixels row-major.  The frame always holds
    /// `width × height` tuples.
    pub fn get_surface(&self) -> Frame {
        let mut frame = Frame::with_capacity(self.color_arity, self.len());
        for pos in self.order.positions() {
            if let Some(panel) = self.panels.get(pos) {
                frame.extend_from_components(panel.components());
            }
        }
        frame
    }

    /// Copies the board into a board-sized surface in logical (drawing)
    /// coordinates.  This is the buffer shape [`LedBoard::set_surface`]
    /// accepts.
    pub fn capture(&self) -> PixelSurface {
        let mut surface = self.blank_surface();
        let arity = self.color_arity;
        for (pos, panel) in &self.panels {
            let x_start = (pos.col * self.panel_width) as usize * arity;
            let x_end = x_start + self.panel_width as usize * arity;
            for local_y in 0..self.panel_height {
                let y = pos.row * self.panel_height + local_y;
                surface.row_mut(y)[x_start..x_end].copy_from_slice(panel.row(local_y));
            }
        }
        surface
    }

    /// Bulk-loads a board-sized buffer back into the panels.
    ///
    /// Components above the board colour depth are clamped.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::ShapeMismatch`] if the buffer's width, height or
    /// arity differ from the board's.  The board is left untouched.
    pub fn set_surface(&mut self, surface: &PixelSurface) -> Result<(), BoardError> {
        if surface.width() != self.width
            || surface.height() != self.height
            || surface.color_arity() != self.color_arity
        {
            return Err(BoardError::ShapeMismatch(format!(
                "buffer is {}, board is {}x{}x{}",
                surface.describe(),
                self.width,
                self.height,
                self.color_arity
            )));
        }
        self.load(surface);
        Ok(())
    }

    /// Rotates the board contents by one pixel with wrap-around.
    pub fn scroll(&mut self, direction: ScrollDirection) {
        let mut surface = self.capture();
        surface.scroll(direction);
        self.load(&surface);
    }

    fn load(&mut self, surface: &PixelSurface) {
        let arity = self.color_arity;
        let depth = self.color_depth;
        for (pos, panel) in self.panels.iter_mut() {
            let x_start = (pos.col * self.panel_width) as usize * arity;
            let x_end = x_start + self.panel_width as usize * arity;
            for local_y in 0..self.panel_height {
                let y = pos.row * self.panel_height + local_y;
                let src = &surface.row(y)[x_start..x_end];
                for (dst, value) in panel.row_mut(local_y).iter_mut().zip(src) {
                    *dst = (*value).min(depth);
                }
            }
        }
    }

    fn blank_surface(&self) -> PixelSurface {
        // Geometry and arity were validated in `from_config`.
        PixelSurface::zeroed(self.width, self.height, self.color_arity, self.color_depth)
    }
}

impl PixelSink for LedBoard {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn set_pixel(&mut self, x: i32, y: i32, value: PixelValue) {
        LedBoard::set_pixel(self, x, y, value);
    }

    fn get_pixel(&self, x: i32, y: i32) -> Result<&[u16], SurfaceError> {
        LedBoard::get_pixel(self, x, y)
    }
}

impl fmt::Display for LedBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<LedBoard {}x{} size={} depth={} panels={} ({}x{})>",
            self.width,
            self.height,
            self.len(),
            self.color_depth,
            self.num_panels,
            self.panel_width,
            self.panel_height
        )
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
