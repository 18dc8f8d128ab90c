//! Global error handling for mdcollect
//!
//! This module provides a centralized error type that can represent errors
//! from all modules in the project.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Global error type for mdcollect operations
#[derive(Error, Debug)]
pub enum MdCollectError {
    /// File system errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON processing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// A directory could not be listed or an entry could not be inspected
    #[error("Scan error at {}: {source}", path.display())]
    Scan {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A selected file could not be read while generating output
    #[error("Read error at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Path not found
    #[error("Path not found: {0}")]
    PathNotFound(String),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Unexpected error
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Specialized Result type for mdcollect operations
pub type Result<T> = std::result::Result<T, MdCollectError>;

/// Creates a MdCollectError with a formatted message
#[macro_export]
macro_rules! error {
    ($error_type:ident, $($arg:tt)*) => {
        $crate::error::MdCollectError::$error_type(format!($($arg)*))
    };
}

/// Returns an error result with a formatted message
#[macro_export]
macro_rules! bail {
    ($error_type:ident, $($arg:tt)*) => {
        return Err($crate::error!($error_type, $($arg)*))
    };
}

/// Ensures a condition is true, otherwise returns an error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $error_type:ident, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($error_type, $($arg)*)
        }
    };
}

/// Extension trait for adding context to errors
pub trait ResultExt<T, E> {
    /// Add additional context to an error
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: std::fmt::Display;
}

impl<T, E: std::error::Error + 'static> ResultExt<T, E> for std::result::Result<T, E> {
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: std::fmt::Display,
    {
        self.map_err(|e| {
            let context = f();
            MdCollectError::Unexpected(format!("{}: {}", context, e))
        })
    }
}

// The binary reports failures through io::Error at its entry point
impl From<MdCollectError> for io::Error {
    fn from(err: MdCollectError) -> Self {
        let kind = match &err {
            MdCollectError::Io(e) => e.kind(),
            MdCollectError::PathNotFound(_) => io::ErrorKind::NotFound,
            MdCollectError::InvalidArgument(_) => io::ErrorKind::InvalidInput,
            _ => io::ErrorKind::Other,
        };
        io::Error::new(kind, err.to_string())
    }
}
