//! Item bank store error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while taking an item bank snapshot.
#[derive(Debug, Error)]
pub enum BankError {
    /// The configured file or directory does not exist.
    #[error("item bank not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The file extension does not name a supported format.
    #[error("unsupported item bank format: {} (expected .json or .toml)", .0.display())]
    UnsupportedFormat(PathBuf),

    /// The file exists but its contents could not be parsed.
    #[error("failed to parse item bank {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// Reading from disk failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The store is deliberately or temporarily out of service.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
