//! Error types for the larder-core library.

use thiserror::Error;

/// Main error type for the larder library.
#[derive(Error, Debug)]
pub enum LarderError {
    /// Persistence collaborator error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by the persistence collaborator.
///
/// A lookup that finds nothing is not an error: absence of a duplicate or of
/// a supplier match is a normal outcome and is modeled as `Option`/enum
/// variants at the call sites. These variants cover genuine failures only.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A record referenced by id does not exist.
    #[error("unknown invoice: {0}")]
    UnknownInvoice(String),

    /// The backing store failed.
    #[error("backend failure: {0}")]
    Backend(String),

    /// I/O failure while reading or writing store files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored data could not be (de)serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for the larder library.
pub type Result<T> = std::result::Result<T, LarderError>;
