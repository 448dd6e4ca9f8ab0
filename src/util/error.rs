//! Error types for the bridge library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for container, scene and bridge operations.
#[derive(Error, Debug)]
pub enum Error {
    /// File does not exist or cannot be accessed
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// A field's declared length runs past the end of the stream
    #[error("Unexpected end of stream reading {field} at position {pos}")]
    UnexpectedEof { field: &'static str, pos: u64 },

    /// Property type tag has no known value kind
    #[error("Unknown property type '{0}'")]
    UnknownType(String),

    /// Record marker byte is not one of 'G', 'M', 'I'
    #[error("Unknown record marker 0x{marker:02x} at position {pos}")]
    UnknownMarker { marker: u8, pos: u64 },

    /// Record carries an empty owner name
    #[error("Record at position {pos} has an empty owner name")]
    EmptyOwner { pos: u64 },

    /// Declared type tag disagrees with the value being written
    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    /// Field is too large for its 32-bit length prefix
    #[error("{field} is too large to encode ({len} bytes)")]
    TooLarge { field: &'static str, len: usize },

    /// Invalid data structure in a container or scene file
    #[error("Invalid file structure: {0}")]
    InvalidStructure(String),

    /// No scene writer is registered for the requested output
    #[error("No scene writer available (tried: {0})")]
    NoSceneWriter(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// UTF-8 conversion error
    #[error("Invalid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Scene or settings JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an "other" error from a string.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Create an invalid structure error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidStructure(msg.into())
    }

    /// True for errors caused by a stream that ended inside a record.
    pub fn is_truncation(&self) -> bool {
        matches!(self, Self::UnexpectedEof { .. })
    }
}

/// Result type alias for bridge operations.
pub type Result<T> = std::result::Result<T, Error>;
