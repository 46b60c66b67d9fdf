//! Error types for taskrecon
//!
//! Messages name the offending file, field or sample so a failed run can be
//! traced back to its input.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// taskrecon error types
#[derive(Error, Debug)]
pub enum Error {
    /// Trace file content could not be parsed into integers
    #[error("Malformed trace file {}: {reason}", path.display())]
    MalformedTraceFile {
        /// Offending file
        path: PathBuf,
        /// What was wrong with its content
        reason: String,
    },

    /// Filename does not follow the `size<N>rep<M>.<ext>` convention
    #[error("Invalid label filename: {0}\nExpected the form size<N>rep<M>.<ext>")]
    InvalidLabelFilename(String),

    /// Label-matrix construction was given windows of unequal length
    #[error("Inconsistent window shape at sample {index}: expected length {expected}, found {found}")]
    InconsistentWindowShape {
        /// Length of the first window in the batch
        expected: usize,
        /// Length of the offending window
        found: usize,
        /// Position of the offending window
        index: usize,
    },

    /// Invalid argument to a pipeline stage
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Trainer or predictor failure
    #[error("Model error: {0}")]
    ModelError(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
