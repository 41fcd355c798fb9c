//! The `error` module creates a library-specific Error type `ReconstructionError`, and an alias
//! for Result using the `ReconstructionError`, called `ReconstructionResult`.
//!
//! Per-segment and per-ward failures are not represented here: those are recorded as diagnostic
//! fields on the stage's own result value (see [`crate::model`], [`crate::matcher`]), never thrown.
//! This type exists for the one genuinely fatal condition in the pipeline: a malformed golden
//! vector document that cannot be deserialized at all.
use thiserror::Error;

/// The `ReconstructionError` enum represents the library-specific Error type.
#[derive(Error, Debug)]
pub enum ReconstructionError {
    /// A golden-vector document failed to deserialize, or was missing a required field.
    #[error("Golden vector deserialization failed: {0}")]
    GoldenVector(String),
    /// Error conversion type for [`serde_json::Error`].
    #[error("JSON error.")]
    Json(#[from] serde_json::Error),
    /// Error conversion type for [`std::io::Error`].
    #[error("Input/output error from std.")]
    Io(#[from] std::io::Error),
}

/// Alias for the Result type using the local Error type.
pub type ReconstructionResult<T> = Result<T, ReconstructionError>;
