//! Error types for the mazeq crate

use std::path::PathBuf;

use thiserror::Error;

use crate::maze::{Direction, Vec2};

/// Main error type for the mazeq crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("direction {absolute:?} has no relative counterpart under heading {heading:?}")]
    InvalidDirection {
        heading: Direction,
        absolute: Direction,
    },

    #[error("action selection requested with no candidate actions in state {state}")]
    EmptyActionSet { state: String },

    #[error("points {start} and {end} do not share an axis-aligned edge")]
    DegenerateGeometry { start: Vec2, end: Vec2 },

    #[error("node {node} does not exist in the maze graph")]
    UnknownNode { node: usize },

    #[error("invalid layout at line {line}: {message}")]
    InvalidLayout { line: usize, message: String },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("no saved policy matching '{prefix}*' in {directory:?}")]
    NoSavedPolicy { directory: PathBuf, prefix: String },

    #[error("unsupported policy format version {found} (expected {expected})")]
    UnsupportedPolicyVersion { found: u32, expected: u32 },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to {operation}: {message}")]
    SerializationContext { operation: String, message: String },

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
