//! Error types for the payload codec
//!
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.

use std::io;
use thiserror::Error;

/// Result type alias for codec operations
pub type Result<T> = std::result::Result<T, CodecError>;

/// Errors produced while encoding or decoding payloads
#[derive(Debug, Error)]
pub enum CodecError {
    /// Malformed JSON, or a value serde_json refuses to encode
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The payload decoded fine but its top level is not an object
    #[error("expected a JSON object, found {found}")]
    NotAnObject {
        /// Type name of the top-level value that was found
        found: &'static str,
    },

    /// Reader failure while streaming a payload
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
