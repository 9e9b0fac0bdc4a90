//! MySQL implementation of the TokenRecordRepository trait.
//!
//! One row per username in `token_records`. Rotation is a conditional
//! `UPDATE` whose `WHERE` clause carries the expected refresh token, so the
//! database decides which of two racing rotations wins.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};

use ts_core::domain::entities::token::TokenRecord;
use ts_core::errors::DomainError;
use ts_core::repositories::{TokenRecordRepository, WriteCondition};

use crate::InfrastructureError;

/// MySQL implementation of TokenRecordRepository
pub struct MySqlTokenRecordRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlTokenRecordRepository {
    /// Create a new MySQL token record repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_record(row: &sqlx::mysql::MySqlRow) -> Result<TokenRecord, InfrastructureError> {
        Ok(TokenRecord {
            username: row.try_get("username")?,
            refresh_token: row.try_get::<Option<String>, _>("refresh_token")?,
            refresh_token_expiry: row.try_get::<DateTime<Utc>, _>("refresh_token_expiry")?,
        })
    }
}

#[async_trait]
impl TokenRecordRepository for MySqlTokenRecordRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<TokenRecord>, DomainError> {
        let query = r#"
            SELECT username, refresh_token, refresh_token_expiry
            FROM token_records
            WHERE username = ?
            LIMIT 1
        "#;

        let row = sqlx::query(query)
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(InfrastructureError::from)?;

        match row {
            Some(row) => Ok(Some(Self::row_to_record(&row)?)),
            None => Ok(None),
        }
    }

    async fn upsert(&self, record: &TokenRecord, condition: WriteCondition) -> Result<bool, DomainError> {
        let result = match condition {
            WriteCondition::Unconditional => {
                let query = r#"
                    INSERT INTO token_records (username, refresh_token, refresh_token_expiry)
                    VALUES (?, ?, ?)
                    ON DUPLICATE KEY UPDATE
                        refresh_token = VALUES(refresh_token),
                        refresh_token_expiry = VALUES(refresh_token_expiry)
                "#;
                sqlx::query(query)
                    .bind(&record.username)
                    .bind(&record.refresh_token)
                    .bind(record.refresh_token_expiry)
                    .execute(&self.pool)
                    .await
                    .map_err(InfrastructureError::from)?;
                return Ok(true);
            }
            WriteCondition::RefreshTokenEquals(expected) => {
                let query = r#"
                    UPDATE token_records
                    SET refresh_token = ?, refresh_token_expiry = ?
                    WHERE username = ? AND refresh_token = ?
                "#;
                sqlx::query(query)
                    .bind(&record.refresh_token)
                    .bind(record.refresh_token_expiry)
                    .bind(&record.username)
                    .bind(expected)
                    .execute(&self.pool)
                    .await
                    .map_err(InfrastructureError::from)?
            }
        };

        Ok(result.rows_affected() == 1)
    }
}
