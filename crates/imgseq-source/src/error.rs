//! Error types for the sequence source.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration problems found while activating a source.
///
/// These are caller mistakes or bad inputs on disk; fixing the
/// configuration and activating again is the only remedy.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Start/stop indices outside the resolved location list.
    #[error("Invalid bounds: start {start}, stop {stop:?} for {len} unit(s)")]
    InvalidBounds {
        start: u32,
        stop: Option<u32>,
        len: usize,
    },

    /// Nothing to play.
    #[error("No units found for {location}")]
    EmptySequence { location: String },

    /// Playlist could not be read or contains a malformed record.
    #[error("Invalid playlist {path}: {reason}")]
    InvalidPlaylist { path: PathBuf, reason: String },

    /// Location pattern has a broken or ambiguous placeholder.
    #[error("Invalid location pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// Rate with a zero term.
    #[error("Invalid frame rate {numerator}/{denominator}")]
    InvalidRate { numerator: u32, denominator: u32 },
}

/// Errors surfaced by a running source.
#[derive(Debug, Error)]
pub enum SequenceError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A unit could not be read. Fatal for the stream; the cursor still
    /// points at the failing unit.
    #[error("Error while reading from file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source has no resolved sequence.
    #[error("Source is not active, call activate() first")]
    NotActive,
}

impl SequenceError {
    /// True for errors raised by activation.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

/// Result type alias for configuration and resolution.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for source operations.
pub type SequenceResult<T> = std::result::Result<T, SequenceError>;
