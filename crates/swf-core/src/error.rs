//! Error types for the spherical wavelet panner

use thiserror::Error;

/// Core SWF errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SwfError {
    // Parameter errors
    #[error("Invalid lifting coefficients: 2a + 2b + 4c = {sum}, expected 1")]
    InvalidParameters { sum: f64 },

    #[error("Invalid subdivision depth: {0}")]
    InvalidDepth(usize),

    #[error("Invalid hop size: must be at least 1")]
    InvalidHopSize,

    // Mesh errors
    #[error("Invalid topology: {0}")]
    InvalidTopology(String),

    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    // Operator errors
    #[error("Level {level} out of range for depth {depth}")]
    LevelOutOfRange { level: usize, depth: usize },

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    // Payload errors
    #[error("Buffer too short: expected {expected}, got {actual}")]
    BufferTooShort { expected: usize, actual: usize },

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),
}

/// Result type for SWF operations
pub type SwfResult<T> = Result<T, SwfError>;
