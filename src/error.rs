//! Unified error types for newsgate.
//!
//! Rejections are not errors: every classification outcome is a value
//! (`RejectReason`). Errors here cover malformed configuration, unreadable
//! input, and items that refuse an annotation write. The last kind is
//! handled fail-open: the gate logs it and keeps going.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for newsgate operations.
#[derive(Error, Debug)]
pub enum GateError {
    /// I/O errors while reading items or config files.
    #[error("storage error at {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// JSON or TOML parsing/serialization errors.
    #[error("serialization error: {message}")]
    Serde { message: String },

    /// Invalid configuration (empty level list, bad keyword, ...).
    #[error("config error: {message}")]
    Config { message: String },

    /// An item could not accept a gate annotation.
    #[error("annotation error on item {item_id}: {message}")]
    Annotation { item_id: String, message: String },
}

/// A specialized Result type for newsgate operations.
pub type Result<T> = std::result::Result<T, GateError>;

impl GateError {
    /// Create a storage error from an I/O error.
    pub fn storage(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source,
        }
    }

    /// Create a serialization error.
    pub fn serde(message: impl Into<String>) -> Self {
        Self::Serde {
            message: message.into(),
        }
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an annotation error.
    pub fn annotation(item_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Annotation {
            item_id: item_id.into(),
            message: message.into(),
        }
    }
}

impl From<io::Error> for GateError {
    fn from(err: io::Error) -> Self {
        Self::Storage {
            path: PathBuf::new(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for GateError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde {
            message: err.to_string(),
        }
    }
}

/// Trait for fail-open error handling.
///
/// Logs the error as a warning and substitutes a safe value.
pub trait FailOpen<T> {
    /// Handle an error by logging a warning and returning the default value.
    fn fail_open_default(self, context: &str) -> T
    where
        T: Default;
}

impl<T> FailOpen<T> for Result<T> {
    fn fail_open_default(self, context: &str) -> T
    where
        T: Default,
    {
        match self {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("{}: {} (fail-open: using default)", context, err);
                T::default()
            }
        }
    }
}

/// Exit codes for the newsgate CLI.
pub mod exit_codes {
    /// Command completed.
    pub const SUCCESS: u8 = 0;

    /// Command failed (bad input or config).
    pub const FAILURE: u8 = 1;
}
