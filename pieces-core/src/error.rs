use thiserror::Error;

#[derive(Debug, Error)]
pub enum PiecesError {
    #[error("grid needs at least one row and one column (got {rows}x{columns})")]
    EmptyGrid { rows: u32, columns: u32 },
    #[error("container has no usable size ({width}x{height})")]
    EmptyContainer { width: f64, height: f64 },
    #[error("{rows}x{columns} pieces do not fit in a {width}x{height} container")]
    ContainerTooSmall {
        rows: u32,
        columns: u32,
        width: f64,
        height: f64,
    },
    #[error("{rows}x{columns} is too many pieces")]
    TooManyPieces { rows: u32, columns: u32 },
    #[error("animation was cancelled before it completed")]
    Cancelled,
    #[error("invalid options: {0}")]
    Options(#[from] serde_json::Error),
}

impl PiecesError {
    /// The container box cannot hold the grid right now; a later layout pass
    /// may succeed.
    pub fn is_layout(&self) -> bool {
        matches!(
            self,
            PiecesError::EmptyContainer { .. } | PiecesError::ContainerTooSmall { .. }
        )
    }
}
