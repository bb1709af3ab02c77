use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::PiecesError;

/// Range of the per-piece stagger seed, inclusive on both ends.
pub const DELAY_SEED_MIN: i32 = -25;
pub const DELAY_SEED_MAX: i32 = 25;

/// Number of pieces laid out as rows x columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub rows: u32,
    pub columns: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig {
            rows: 14,
            columns: 10,
        }
    }
}

impl GridConfig {
    pub fn new(rows: u32, columns: u32) -> Result<Self, PiecesError> {
        GridConfig { rows, columns }.validate()
    }

    pub fn validate(self) -> Result<Self, PiecesError> {
        if self.rows == 0 || self.columns == 0 {
            return Err(PiecesError::EmptyGrid {
                rows: self.rows,
                columns: self.columns,
            });
        }
        if self.checked_len().is_none() {
            return Err(PiecesError::TooManyPieces {
                rows: self.rows,
                columns: self.columns,
            });
        }
        Ok(self)
    }

    fn checked_len(&self) -> Option<usize> {
        usize::try_from(self.rows)
            .ok()?
            .checked_mul(usize::try_from(self.columns).ok()?)
    }

    /// Saturates for counts that [`GridConfig::validate`] rejects.
    pub fn len(&self) -> usize {
        self.checked_len().unwrap_or(usize::MAX)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Rendered box size in CSS pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Size { width, height }
    }

    fn is_usable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Piece and container dimensions derived from a container box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridLayout {
    pub piece_width: f64,
    pub piece_height: f64,
    /// Width of the scaled source image so `columns` pieces span it exactly.
    pub background_width: f64,
    /// Container size snapped to whole pieces.
    pub container: Size,
}

impl GridLayout {
    /// Layout of a grid that has not been measured yet.
    pub fn unmeasured() -> Self {
        GridLayout {
            piece_width: 0.0,
            piece_height: 0.0,
            background_width: 0.0,
            container: Size::default(),
        }
    }

    pub fn compute(container: Size, config: GridConfig) -> Result<Self, PiecesError> {
        let config = config.validate()?;
        if !container.is_usable() {
            return Err(PiecesError::EmptyContainer {
                width: container.width,
                height: container.height,
            });
        }
        let cols = config.columns as f64;
        let rows = config.rows as f64;
        let w = (container.width / cols).round();
        let h = (container.height / rows).round();
        if w < 1.0 || h < 1.0 {
            return Err(PiecesError::ContainerTooSmall {
                rows: config.rows,
                columns: config.columns,
                width: container.width,
                height: container.height,
            });
        }
        Ok(GridLayout {
            piece_width: w,
            piece_height: h,
            background_width: w * cols,
            container: Size::new(w * cols, h * rows),
        })
    }
}

/// One cell of the sliced image.
#[derive(Clone, Debug, PartialEq)]
pub struct Piece {
    pub row: u32,
    pub column: u32,
    pub delay_seed: i32,
    pub width: f64,
    pub height: f64,
}

impl Piece {
    /// Background offset in percent; reveals this cell of the source image.
    pub fn background_position(&self) -> (f64, f64) {
        (-100.0 * self.column as f64, -100.0 * self.row as f64)
    }
}

/// The ordered (row-major) piece sequence together with its current layout.
#[derive(Clone, Debug)]
pub struct PieceGrid {
    config: GridConfig,
    layout: GridLayout,
    pieces: Vec<Piece>,
}

impl PieceGrid {
    pub fn build<R: Rng + ?Sized>(
        container: Size,
        config: GridConfig,
        rng: &mut R,
    ) -> Result<Self, PiecesError> {
        let layout = GridLayout::compute(container, config)?;
        let mut pieces = Vec::with_capacity(config.len());
        for row in 0..config.rows {
            for column in 0..config.columns {
                pieces.push(Piece {
                    row,
                    column,
                    delay_seed: rng.random_range(DELAY_SEED_MIN..=DELAY_SEED_MAX),
                    width: layout.piece_width,
                    height: layout.piece_height,
                });
            }
        }
        Ok(PieceGrid {
            config,
            layout,
            pieces,
        })
    }

    /// A grid with no pieces yet, waiting for a container it can measure.
    pub fn unmeasured(config: GridConfig) -> Self {
        PieceGrid {
            config,
            layout: GridLayout::unmeasured(),
            pieces: Vec::new(),
        }
    }

    /// Recompute sizes for a new container box. On a degenerate box the
    /// previous layout is kept and the error is returned.
    pub fn resize(&mut self, container: Size) -> Result<GridLayout, PiecesError> {
        let layout = GridLayout::compute(container, self.config)?;
        for piece in &mut self.pieces {
            piece.width = layout.piece_width;
            piece.height = layout.piece_height;
        }
        self.layout = layout;
        Ok(layout)
    }

    pub fn config(&self) -> GridConfig {
        self.config
    }

    pub fn layout(&self) -> GridLayout {
        self.layout
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Pieces left of the vertical center line.
    pub fn is_left_half(&self, piece: &Piece) -> bool {
        (piece.column as f64) < self.config.columns as f64 / 2.0
    }
}
