//! Engine error types.
//!
//! Nothing here reaches the caller as a fault: the request boundary turns
//! every variant into an `{ "error": ... }` response.

use thiserror::Error;

/// Errors raised while handling a single request.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The payload was not valid JSON or did not match any command.
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    /// The item bank store could not produce a snapshot.
    #[error("item bank unavailable: {0}")]
    BankUnavailable(String),
}

impl EngineError {
    /// Returns `true` if retrying the same request could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, EngineError::BankUnavailable(_))
    }
}
