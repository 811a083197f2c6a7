// error.rs - Failure modes of stereogram synthesis
//
// Configuration problems are caught before any pixel is written.
// A shift that points outside the already-filled part of a row aborts
// the whole synthesis.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StereoError {
    #[error("tile density must be a positive integer")]
    InvalidTileDensity,

    #[error("quantization levels must be a positive integer")]
    InvalidQuantLevels,

    #[error("focal length must be finite, got {0}")]
    InvalidFocalLength(f32),

    #[error("tile density {density} yields a degenerate {height}x{width} pattern tile")]
    DegenerateTile { height: usize, width: usize, density: usize },

    #[error("pattern tile values must lie in [0, 1)")]
    PatternRange,

    #[error("depth map is empty")]
    EmptyDepthMap,

    #[error("depth sample at ({row}, {col}) is not finite")]
    NonFiniteDepth { row: usize, col: usize },

    #[error("depth buffer holds {actual} samples, expected {expected}")]
    DepthShape { expected: usize, actual: usize },

    /// Lookup index fell outside `[0, col)`; the fill would read an
    /// unwritten or out-of-range cell.
    #[error("shift at ({row}, {col}) reads column {index}, outside the filled range")]
    ShiftOutOfRange { row: usize, col: usize, index: isize },

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StereoError>;
