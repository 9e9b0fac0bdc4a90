//! Domain-specific error types and error handling.

mod types;


// Re-export all error types
pub use types::{AuthError, TokenError, ValidationError};

use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    /// A store call failed or exceeded its deadline. Never retried.
    #[error("Storage error: {message}")]
    Storage { message: String },

    /// Unusable startup configuration, such as an empty signing secret
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    ValidationErr(#[from] ValidationError),
}

impl DomainError {
    /// Shorthand for a store failure
    pub fn storage(message: impl Into<String>) -> Self {
        DomainError::Storage {
            message: message.into(),
        }
    }

    /// True when the error came from a signature, algorithm or token structure check
    pub fn is_invalid_token(&self) -> bool {
        matches!(self, DomainError::Token(_))
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
