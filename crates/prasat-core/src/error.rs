//! Error types for the prasat persistence layer.

use thiserror::Error;

/// Result type alias using prasat's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for prasat operations.
///
/// The taxonomy distinguishes deterministic failures (validation,
/// uniqueness, referential integrity) from storage unavailability;
/// only the latter class is a candidate for retry.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Input failed a required-field, format, or dimension check
    /// before any storage operation was attempted
    #[error("Validation error: {0}")]
    Validation(String),

    /// Unique constraint violated (duplicate username, email, keyword,
    /// link-table pair, ...)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Foreign key references a nonexistent parent row
    #[error("Referential integrity error: {0}")]
    ForeignKey(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// SQLSTATE classes surfaced as distinct error variants.
const SQLSTATE_UNIQUE_VIOLATION: &str = "23505";
const SQLSTATE_FOREIGN_KEY_VIOLATION: &str = "23503";
const SQLSTATE_NOT_NULL_VIOLATION: &str = "23502";
const SQLSTATE_CHECK_VIOLATION: &str = "23514";

/// Map a SQLSTATE code to a domain error, if the code belongs to a
/// class the caller can act on. Pure so it can be tested without a
/// live database.
pub fn classify_sqlstate(code: &str, message: &str) -> Option<Error> {
    match code {
        SQLSTATE_UNIQUE_VIOLATION => Some(Error::Conflict(message.to_string())),
        SQLSTATE_FOREIGN_KEY_VIOLATION => Some(Error::ForeignKey(message.to_string())),
        SQLSTATE_NOT_NULL_VIOLATION | SQLSTATE_CHECK_VIOLATION => {
            Some(Error::Validation(message.to_string()))
        }
        _ => None,
    }
}

impl Error {
    /// Classify a sqlx error from a write path, surfacing integrity
    /// violations as their domain variants.
    pub fn from_sqlx(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db) = e {
            if let Some(code) = db.code() {
                if let Some(err) = classify_sqlstate(code.as_ref(), db.message()) {
                    return err;
                }
            }
        }
        Error::Database(e)
    }

    /// Whether this error belongs to the storage-unavailability class
    /// that a caller may retry with backoff. Validation and integrity
    /// failures are deterministic and never retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::Database(
                sqlx::Error::Io(_)
                    | sqlx::Error::PoolTimedOut
                    | sqlx::Error::PoolClosed
                    | sqlx::Error::WorkerCrashed
            )
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
