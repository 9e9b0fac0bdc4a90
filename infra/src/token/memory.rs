//! In-memory token record store

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use ts_core::domain::entities::token::TokenRecord;
use ts_core::errors::DomainError;
use ts_core::repositories::{TokenRecordRepository, WriteCondition};

/// Token records keyed by username
///
/// Conditional writes compare and replace under one write lock.
#[derive(Default)]
pub struct InMemoryTokenRecordRepository {
    records: RwLock<HashMap<String, TokenRecord>>,
}

impl InMemoryTokenRecordRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenRecordRepository for InMemoryTokenRecordRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<TokenRecord>, DomainError> {
        Ok(self.records.read().await.get(username).cloned())
    }

    async fn upsert(&self, record: &TokenRecord, condition: WriteCondition) -> Result<bool, DomainError> {
        let mut records = self.records.write().await;

        if let WriteCondition::RefreshTokenEquals(expected) = condition {
            let matches = records
                .get(&record.username)
                .and_then(|current| current.refresh_token.as_deref())
                .is_some_and(|current| current == expected);
            if !matches {
                tracing::debug!(username = %record.username, "conditional token record write skipped");
                return Ok(false);
            }
        }

        records.insert(record.username.clone(), record.clone());
        Ok(true)
    }
}
