//! Error types for LazyKV
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

use crate::format::Key;

/// Result type alias using LazyError
pub type Result<T> = std::result::Result<T, LazyError>;

/// Unified error type for LazyKV operations
#[derive(Debug, Error)]
pub enum LazyError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Corruption Errors
    // -------------------------------------------------------------------------
    #[error("Database may be corrupted: {0}")]
    Corruption(String),

    #[error("Encountered a problem while indexing at offset {offset}: {reason}. Your database may be corrupted")]
    Indexing { offset: u64, reason: String },

    // -------------------------------------------------------------------------
    // Key Errors
    // -------------------------------------------------------------------------
    #[error("Key not found: {0}")]
    KeyNotFound(Key),

    #[error("Key {0} is already in the database")]
    DuplicateKey(Key),

    // -------------------------------------------------------------------------
    // Codec Errors
    // -------------------------------------------------------------------------
    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Value {value} does not fit in {width} byte(s)")]
    ValueTooLarge { value: u128, width: usize },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl LazyError {
    /// True for every error that means the file's framing can't be trusted.
    pub fn is_corruption(&self) -> bool {
        matches!(self, LazyError::Corruption(_) | LazyError::Indexing { .. })
    }

    /// Map a short read onto `Corruption`, leaving other I/O failures alone.
    pub(crate) fn truncated(err: std::io::Error, what: &str) -> Self {
        if err.kind() == std::io::ErrorKind::UnexpectedEof {
            LazyError::Corruption(format!("unexpected end of file while reading {}", what))
        } else {
            LazyError::Io(err)
        }
    }
}
