//! Error types for document parsing.

use thiserror::Error;

/// Errors that can occur when decoding a request document.
#[derive(Debug, Error)]
pub enum Error {
    /// The payload is not valid JSON or does not match the schema.
    #[error("invalid request document: {0}")]
    Json(#[from] serde_json::Error),

    /// Unknown rig type value in the settings block.
    #[error("unknown rig type: {0}")]
    InvalidRigType(i64),
}

/// Result type for document operations.
pub type Result<T> = std::result::Result<T, Error>;
