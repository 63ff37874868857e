//! Error types for imgseq core types.

use thiserror::Error;

/// Errors raised while building core values from text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid frame rate: {0:?} (expected N/D with non-zero terms)")]
    InvalidFrameRate(String),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
