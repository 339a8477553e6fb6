//! Error types for target matrix operations.

use std::path::PathBuf;

/// Errors that can occur while building or loading a target matrix.
#[derive(Debug, thiserror::Error)]
pub enum TargetError {
    /// A raw value does not belong to the closed set of a dimension.
    ///
    /// This signals a programming error (a value added without updating a
    /// mapping, or a hand-built bit pattern) and is never retried.
    #[error("unsupported {dimension} value: {value}")]
    UnsupportedValue {
        /// Dimension the value was checked against.
        dimension: &'static str,
        /// The offending value, rendered for diagnostics.
        value: String,
    },

    /// A template dimension has no values, so expansion would produce nothing.
    #[error("template dimension '{dimension}' is empty")]
    EmptyDimension {
        /// Name of the empty dimension.
        dimension: &'static str,
    },

    /// Two targets in one list resolve to the same intermediate directory.
    #[error("directory '{directory}' is produced by more than one target")]
    DirectoryCollision {
        /// The colliding directory name.
        directory: String,
    },

    /// TOML deserialization error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error reading/writing matrix files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Matrix file not found.
    #[error("matrix file not found: {}", path.display())]
    NotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// Validation error in a matrix definition.
    #[error("validation error: {detail}")]
    Validation {
        /// Description of the validation failure.
        detail: String,
    },
}

/// Result type for target matrix operations.
pub type Result<T> = std::result::Result<T, TargetError>;
