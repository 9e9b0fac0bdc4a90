//! Mock implementation of TokenRecordRepository for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::token::TokenRecord;
use crate::errors::DomainError;

use super::r#trait::{TokenRecordRepository, WriteCondition};

/// Mock token record repository for testing
#[derive(Clone, Default)]
pub struct MockTokenRecordRepository {
    records: Arc<RwLock<HashMap<String, TokenRecord>>>,
    failing: Arc<AtomicBool>,
}

impl MockTokenRecordRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with a storage error
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Seed a record directly, bypassing any condition
    pub async fn insert(&self, record: TokenRecord) {
        self.records.write().await.insert(record.username.clone(), record);
    }

    pub async fn get(&self, username: &str) -> Option<TokenRecord> {
        self.records.read().await.get(username).cloned()
    }

    fn check_available(&self) -> Result<(), DomainError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DomainError::storage("token store unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl TokenRecordRepository for MockTokenRecordRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<TokenRecord>, DomainError> {
        self.check_available()?;
        Ok(self.records.read().await.get(username).cloned())
    }

    async fn upsert(&self, record: &TokenRecord, condition: WriteCondition) -> Result<bool, DomainError> {
        self.check_available()?;
        let mut records = self.records.write().await;

        if let WriteCondition::RefreshTokenEquals(expected) = &condition {
            let current = records
                .get(&record.username)
                .and_then(|r| r.refresh_token.as_deref());
            if current != Some(expected.as_str()) {
                return Ok(false);
            }
        }

        records.insert(record.username.clone(), record.clone());
        Ok(true)
    }
}
