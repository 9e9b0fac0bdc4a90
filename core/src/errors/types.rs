//! Error types for authentication, token handling and input validation
//!
//! The display strings of `AuthError` are the exact messages surfaced to
//! clients by the gateway; the other enums are mapped to generic messages there.

use thiserror::Error;

/// Authentication and account errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown user or wrong password on login; the two are never distinguished.
    #[error("Invalid Username or Password")]
    InvalidCredentials,

    /// Refresh pairing rejected: missing record, mismatched or expired refresh
    /// token, or a lost rotation race. The cause is deliberately not exposed.
    #[error("Invalid client request")]
    InvalidClientRequest,

    /// No token record exists for the caller
    #[error("User not found")]
    UserNotFound,

    /// Password change requested for a username that does not exist
    #[error("User with the username \"{username}\" does not exist.")]
    UnknownUser { username: String },

    #[error("Incorrect password detected.")]
    IncorrectPassword,

    #[error("Something went wrong... Please try again later.")]
    PasswordChangeFailed,

    /// Registration with a username that is already taken
    #[error("Invalid Username")]
    UsernameTaken,

    #[error("Something went wrong... Try again later")]
    RegistrationFailed,

    #[error("Insufficient permissions")]
    InsufficientPermissions,
}

/// Token errors
///
/// Every variant is fatal for the request that produced it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token format")]
    InvalidTokenFormat,

    #[error("Invalid signature")]
    InvalidSignature,

    /// Header algorithm differs from the pinned signing algorithm
    #[error("Invalid algorithm")]
    InvalidAlgorithm,

    #[error("Invalid claims")]
    InvalidClaims,

    #[error("Token generation failed")]
    TokenGenerationFailed,

    /// The operating system could not supply random bytes
    #[error("Entropy source unavailable")]
    EntropyUnavailable,

    #[error("Missing claim: {claim}")]
    MissingClaim { claim: String },
}

/// Validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Password does not satisfy policy: {reason}")]
    PasswordPolicy { reason: String },

    #[error("Duplicate value: {field}")]
    DuplicateValue { field: String },
}
