//! Centralized error types for mailcompose.

use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the mailcompose library.
#[derive(Error, Debug)]
pub enum ComposeError {
    /// The file's MIME type is not on the attachment allow-list.
    #[error("Unsupported file type for '{name}': {mime_type}")]
    UnsupportedType { name: String, mime_type: String },

    /// Adding the file would push the session over its attachment cap.
    #[error("Attachment quota exceeded for '{name}' ({remaining} bytes remaining)")]
    QuotaExceeded { name: String, remaining: u64 },

    /// The file could not be read or encoded.
    #[error("Failed to encode '{name}': {reason}")]
    Encoding { name: String, reason: String },

    /// The assembled payload broke one of its own presence rules.
    #[error("Assembled payload is inconsistent: {0}")]
    AssemblyInvariant(String),

    /// The remote delivery service rejected the request or was unreachable.
    #[error("Transmission failed: {message}")]
    Transmission {
        status: Option<u16>,
        message: String,
    },

    /// I/O error with the associated file path.
    #[error("I/O error reading '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A remove/rename addressed an entry that does not exist.
    #[error("No entry at index {index} (collection holds {len})")]
    InvalidIndex { index: usize, len: usize },

    /// Configuration could not be resolved.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience alias for `Result<T, ComposeError>`.
pub type Result<T> = std::result::Result<T, ComposeError>;

impl ComposeError {
    /// Create an `Io` variant from a path and an `io::Error`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create an `Encoding` variant for the named file.
    pub fn encoding(name: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::Encoding {
            name: name.into(),
            reason: reason.to_string(),
        }
    }

    /// `true` for errors that reject a single file but leave the batch running.
    pub fn is_per_file(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedType { .. } | Self::QuotaExceeded { .. } | Self::Encoding { .. }
        )
    }
}
