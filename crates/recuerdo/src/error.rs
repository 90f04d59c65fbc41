//! Error types for date parsing and reminder persistence.

use thiserror::Error;

/// Errors raised while parsing user-supplied calendar values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    #[error("Invalid date '{0}'. Expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid month '{0}'. Expected YYYY-MM")]
    InvalidMonth(String),

    #[error("Invalid weekday '{0}'")]
    InvalidWeekday(String),
}

/// Errors raised by the storage backends.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Failed to apply migration {version}: {source}")]
    Migration {
        version: &'static str,
        source: rusqlite::Error,
    },
}

pub type StoreResult<T> = Result<T, StoreError>;
