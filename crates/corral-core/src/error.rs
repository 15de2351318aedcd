//! Error types for Corral.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("codec error: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether this error signals a fault in the handler rather than a
    /// rejected request.
    pub fn is_internal(&self) -> bool {
        matches!(self, Error::Internal(_) | Error::Codec(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
