//! Token record repository trait defining the interface for refresh token persistence.

use async_trait::async_trait;

use crate::domain::entities::token::TokenRecord;
use crate::errors::DomainError;

/// Precondition attached to a record write
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteCondition {
    /// Insert or overwrite whatever is stored (login, revoke)
    Unconditional,

    /// Overwrite only if a record exists for the username and its current
    /// refresh token equals this value (rotation)
    RefreshTokenEquals(String),
}

/// Repository trait for TokenRecord persistence operations
///
/// Holds at most one record per username. There is no delete operation;
/// revocation is a write of a record whose refresh token is cleared.
///
/// # Concurrency
/// A conditional write must compare and replace atomically: of two writers
/// presenting the same expected refresh token, at most one may succeed.
#[async_trait]
pub trait TokenRecordRepository: Send + Sync {
    /// Find the record for a username
    ///
    /// # Arguments
    /// * `username` - The unique record key
    ///
    /// # Returns
    /// * `Ok(Some(TokenRecord))` - Record found
    /// * `Ok(None)` - The user has never logged in
    /// * `Err(DomainError::Storage)` - Store unavailable
    async fn find_by_username(&self, username: &str) -> Result<Option<TokenRecord>, DomainError>;

    /// Write a record keyed by its username
    ///
    /// # Arguments
    /// * `record` - Full replacement record
    /// * `condition` - Precondition on the currently stored value
    ///
    /// # Returns
    /// * `Ok(true)` - Record written
    /// * `Ok(false)` - Condition did not hold, nothing written
    /// * `Err(DomainError::Storage)` - Store unavailable
    async fn upsert(&self, record: &TokenRecord, condition: WriteCondition) -> Result<bool, DomainError>;
}
