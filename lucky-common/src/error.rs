//! Common error types for Lucky Wheel

use std::path::PathBuf;
use thiserror::Error;

/// Common result type for Lucky Wheel operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy shared by the store, repository, draw engine and session manager
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed create/update input (caller mistake, never retried)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Unknown group identifier
    #[error("Not found: {0}")]
    NotFound(String),

    /// Missing, invalid or expired admin token, or bad login
    #[error("Unauthorized")]
    Unauthorized,

    /// Draw engine called with an unusable weight list
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Database operation error (wraps sqlx::Error)
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Store file exists but could not be parsed
    #[error("Corrupt store file {}: {source}", path.display())]
    CorruptStore {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Serialization of a record failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// True for failures of the underlying persistence layer
    pub fn is_store_error(&self) -> bool {
        match self {
            #[cfg(feature = "sqlx")]
            Error::Database(_) => true,
            Error::Io(_) | Error::CorruptStore { .. } | Error::Serialization(_) => true,
            _ => false,
        }
    }

    pub(crate) fn group_not_found(id: impl std::fmt::Display) -> Self {
        Error::NotFound(format!("group {}", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_classification() {
        let io = Error::Io(std::io::Error::new(std::io::ErrorKind::Other, "disk gone"));
        assert!(io.is_store_error());

        assert!(!Error::Unauthorized.is_store_error());
        assert!(!Error::Validation("bad".to_string()).is_store_error());
        assert!(!Error::group_not_found("abc").is_store_error());
    }

    #[test]
    fn test_not_found_message_names_group() {
        let err = Error::group_not_found("1234");
        assert_eq!(err.to_string(), "Not found: group 1234");
    }
}
