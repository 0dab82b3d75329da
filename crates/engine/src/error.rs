//! Error types for the store
//!
//! All failures surface through [`Error`]. Engine errors are passed through
//! unchanged; the store never retries and never downgrades an error to a
//! log line, apart from cleanup paths (compaction on close, rollback of a
//! read transaction) which are logged and swallowed.

use crate::document::Document;
use docstore_core::CodecError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the store
#[derive(Debug, Error)]
pub enum Error {
    /// Get or Put was called with no items
    #[error("items is empty")]
    EmptyBatch,

    /// The revision gate rejected a write
    ///
    /// Carries the row that is currently stored, so the caller can reconcile
    /// and retry with a higher revision without another query.
    #[error("document conflict: {:?} at rev {}", .0.pk, .0.rev)]
    DocumentConflict(Box<Document>),

    /// An upsert affected no rows, yet the row was gone on re-read
    #[error("failed to get conflicted document {pk:?}")]
    GetConflicted {
        /// Primary key of the write that was rejected
        pk: String,
    },

    /// Store name is not usable as a table identifier
    #[error("invalid store name {name:?}: {reason}")]
    InvalidName {
        /// The rejected name
        name: String,
        /// Which rule it broke
        reason: &'static str,
    },

    /// Document cannot be written or modified as requested
    #[error("invalid document: {reason}")]
    InvalidDocument {
        /// What was wrong
        reason: String,
    },

    /// Operation requires an open store
    #[error("store is not open")]
    NotOpen,

    /// `open()` on a store that is already open
    #[error("store is already open")]
    AlreadyOpen,

    /// `open()` on a store that has been closed
    #[error("store has been closed")]
    Closed,

    /// The smoke-test read performed by `open()` failed
    #[error("open check failed: {0}")]
    OpenCheck(#[source] Box<Error>),

    /// Configuration file could not be read or parsed
    #[error("config error in '{}': {reason}", .path.display())]
    Config {
        /// Path of the offending file
        path: PathBuf,
        /// Underlying problem
        reason: String,
    },

    /// Error from the embedded engine
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Payload encode/decode error
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),
}

impl Error {
    /// The stored winning row, if this is a [`Error::DocumentConflict`]
    pub fn conflicting_document(&self) -> Option<&Document> {
        match self {
            Error::DocumentConflict(doc) => Some(doc),
            _ => None,
        }
    }

    /// Check if this error is a revision-gate rejection
    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::DocumentConflict(_))
    }
}
