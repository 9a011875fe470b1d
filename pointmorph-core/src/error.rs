//! Error types for pointmorph

use thiserror::Error;

/// Main error type for pointmorph operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Two arrays or geometries that must line up component for component do not.
    #[error("Length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Algorithm error: {0}")]
    Algorithm(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

impl Error {
    /// Shorthand for a [`Error::LengthMismatch`]
    pub fn length_mismatch(expected: usize, actual: usize) -> Self {
        Error::LengthMismatch { expected, actual }
    }
}

/// Result type alias for pointmorph operations
pub type Result<T> = std::result::Result<T, Error>;
