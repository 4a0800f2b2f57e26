//! Error types for the ingestion pipeline.
//!
//! This module defines all error types that can occur while preparing a
//! manuscript for cataloguing. Conflict findings are deliberately *not*
//! errors; see [`crate::conflicts`].

/// Result type alias for ingestion pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during manuscript ingestion.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// External converter failed (nonzero status or unusable output)
    #[error("Conversion failed: {0}")]
    Conversion(String),

    /// External converter ran out of memory under its ceiling; retryable
    #[error("Conversion exhausted resources")]
    ConversionResources,

    /// Malformed table-of-contents line
    #[error("Table-of-contents line {line}: {reason}")]
    Toc {
        /// 1-based line number within the buffer
        line: usize,
        /// Reason the line was rejected
        reason: String,
    },

    /// Session is locked by another editor whose lock has not expired
    #[error("Session is locked by {holder}")]
    Locked {
        /// Identity of the current lock holder
        holder: String,
    },

    /// JSON encoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
