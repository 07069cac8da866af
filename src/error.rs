//! Error types for corazon operations.
//!
//! Provides rich error context for pipeline consumers.

use std::fmt;

/// Main error type for corazon operations.
///
/// Covers the training/inference contract failures (schema mismatches,
/// missing features, artifact problems) plus ambient I/O and
/// serialization failures.
///
/// # Examples
///
/// ```
/// use corazon::error::CorazonError;
///
/// let err = CorazonError::MissingFeature {
///     name: "oldpeak".to_string(),
/// };
/// assert!(err.to_string().contains("oldpeak"));
/// ```
#[derive(Debug)]
pub enum CorazonError {
    /// Feature vector doesn't match the fitted scaler's expected width.
    SchemaMismatch {
        /// Number of features expected by the fitted state
        expected: usize,
        /// Number of features actually supplied
        actual: usize,
    },

    /// A named feature is absent from the input record.
    MissingFeature {
        /// Name of the missing feature
        name: String,
    },

    /// An artifact file is missing or unreadable.
    ArtifactLoad {
        /// Artifact file name
        file: String,
        /// Underlying failure description
        reason: String,
    },

    /// Malformed input from the caller.
    InvalidInput {
        /// Failure description
        message: String,
    },

    /// I/O error (file not found, permission denied, etc.).
    Io(std::io::Error),

    /// Serialization/deserialization error.
    Serialization(String),

    /// Generic error with string message.
    Other(String),
}

impl fmt::Display for CorazonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorazonError::SchemaMismatch { expected, actual } => {
                write!(
                    f,
                    "Feature schema mismatch: expected {expected} features, got {actual}"
                )
            }
            CorazonError::MissingFeature { name } => {
                write!(f, "Missing required feature: '{name}'")
            }
            CorazonError::ArtifactLoad { file, reason } => {
                write!(f, "Failed to load artifact '{file}': {reason}")
            }
            CorazonError::InvalidInput { message } => {
                write!(f, "Invalid input: {message}")
            }
            CorazonError::Io(e) => write!(f, "I/O error: {e}"),
            CorazonError::Serialization(msg) => write!(f, "Serialization error: {msg}"),
            CorazonError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for CorazonError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CorazonError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CorazonError {
    fn from(err: std::io::Error) -> Self {
        CorazonError::Io(err)
    }
}

impl From<&str> for CorazonError {
    fn from(msg: &str) -> Self {
        CorazonError::Other(msg.to_string())
    }
}

impl From<String> for CorazonError {
    fn from(msg: String) -> Self {
        CorazonError::Other(msg)
    }
}

/// Result type alias for corazon operations.
pub type Result<T> = std::result::Result<T, CorazonError>;
