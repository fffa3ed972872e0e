//! Unified error types for binp.
//!
//! "Not found" is never an error here: lookups return `Option`. Everything
//! below is either a storage failure or an input problem raised by an outer
//! surface.

use rmcp::model::{ErrorCode, ErrorData as McpError};
use tokio_rusqlite::rusqlite;

/// Unified error types for the snippet store.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., empty or oversized text).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// A generated identifier already exists in the durable store.
    #[error("IDENTIFIER_COLLISION: {0}")]
    IdentifierCollision(String),

    /// Every identifier generated for a single create collided.
    #[error("STORAGE_ERROR: no unique identifier after {0} attempts")]
    IdentifiersExhausted(u32),

    /// Database operation failed.
    #[error("STORAGE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("STORAGE_ERROR: migration failed: {0}")]
    MigrationFailed(String),

    /// A store call did not finish before its deadline.
    #[error("STORAGE_TIMEOUT: {0}")]
    Timeout(String),
}

impl Error {
    /// Whether this error originates from the backing store.
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            Error::Database(_) | Error::MigrationFailed(_) | Error::Timeout(_) | Error::IdentifiersExhausted(_)
        )
    }
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let (code, message) = match &err {
            Error::InvalidInput(msg) => (-32602, msg.clone()),
            Error::IdentifierCollision(id) => (-32020, format!("identifier collision: {id}")),
            Error::IdentifiersExhausted(_) => (-32021, err.to_string()),
            Error::Database(e) => (-32021, e.to_string()),
            Error::MigrationFailed(msg) => (-32021, msg.clone()),
            Error::Timeout(msg) => (-32022, msg.clone()),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}
