//! # Infrastructure Layer
//!
//! Concrete implementations of the two stores the token lifecycle service
//! depends on.
//!
//! ## Architecture
//!
//! - **Identity**: users, bcrypt password hashes and role membership
//! - **Token records**: one refresh token record per username with
//!   compare-and-swap rotation
//! - **Database**: MySQL implementations of both using SQLx
//!
//! ## Features
//!
//! - `mysql`: Enable MySQL database support (default). Without it only the
//!   in-memory stores are available.

use ts_core::errors::DomainError;

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

/// Identity store implementations
pub mod identity;

/// Token record store implementations
pub mod token;

pub use identity::{InMemoryIdentityRepository, PasswordHasher};
pub use token::InMemoryTokenRecordRepository;

#[cfg(feature = "mysql")]
pub use database::{DatabasePool, MySqlIdentityRepository, MySqlTokenRecordRepository};

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection or query error
    #[cfg(feature = "mysql")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration error
    #[cfg(feature = "mysql")]
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Password hashing error
    #[error("Password hashing error: {0}")]
    Hashing(#[from] bcrypt::BcryptError),

    /// Blocking task was cancelled or panicked
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// Stored data could not be mapped back to an entity
    #[error("Corrupt record: {0}")]
    CorruptRecord(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<InfrastructureError> for DomainError {
    fn from(error: InfrastructureError) -> Self {
        tracing::error!(error = %error, "infrastructure failure");
        DomainError::storage(error.to_string())
    }
}
