//! Error types for autolinker.
//!
//! The linking transform itself never fails. [`Error`] covers the surfaces
//! around it: reading title lists, loading and validating configuration.

use std::io;
use std::path::PathBuf;
use thiserror::Error as ThisError;

/// The error type for host-facing autolinker operations.
#[derive(ThisError, Debug)]
pub enum Error {
    /// File system error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// File not found
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Invalid configuration
    #[error("Configuration error: {reason}")]
    ConfigError { reason: String },

    /// Title list could not be used as given
    #[error("Invalid titles: {reason}")]
    InvalidTitles { reason: String },

    /// Config or report (de)serialization failed
    #[error("Serialization error: {reason}")]
    Serialization { reason: String },
}

/// Convenient Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a file not found error
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Error::FileNotFound { path: path.into() }
    }

    /// Create a configuration error
    pub fn config_error(reason: impl Into<String>) -> Self {
        Error::ConfigError {
            reason: reason.into(),
        }
    }

    /// Create an invalid titles error
    pub fn invalid_titles(reason: impl Into<String>) -> Self {
        Error::InvalidTitles {
            reason: reason.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(reason: impl Into<String>) -> Self {
        Error::Serialization {
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::serialization(err.to_string())
    }
}
