//! MySQL implementation of the IdentityRepository trait.
//!
//! Users live in `users`, role names in `roles` and membership in
//! `user_roles`. Passwords are stored as bcrypt hashes only.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use ts_core::domain::entities::user::{NewUser, User};
use ts_core::domain::value_objects::PasswordPolicy;
use ts_core::errors::{AuthError, DomainError, ValidationError};
use ts_core::repositories::IdentityRepository;

use crate::identity::{normalize_username, PasswordHasher};
use crate::InfrastructureError;

const USER_COLUMNS: &str =
    "id, username, email, name, password_hash, security_stamp, created_at, updated_at";

/// MySQL implementation of IdentityRepository
pub struct MySqlIdentityRepository {
    /// Database connection pool
    pool: MySqlPool,
    hasher: PasswordHasher,
    policy: PasswordPolicy,
}

impl MySqlIdentityRepository {
    /// Create a new MySQL identity repository
    ///
    /// # Arguments
    /// * `pool` - MySQL connection pool from SQLx
    /// * `hasher` - bcrypt work factor
    /// * `policy` - Rules applied to new passwords
    pub fn new(pool: MySqlPool, hasher: PasswordHasher, policy: PasswordPolicy) -> Self {
        Self { pool, hasher, policy }
    }

    /// Convert a `users` row to the entity and its password hash
    fn row_to_user(row: &sqlx::mysql::MySqlRow) -> Result<(User, String), InfrastructureError> {
        let id: String = row.try_get("id")?;
        let user = User {
            id: Uuid::parse_str(&id)
                .map_err(|e| InfrastructureError::CorruptRecord(format!("invalid user id {id}: {e}")))?,
            username: row.try_get("username")?,
            email: row.try_get("email")?,
            name: row.try_get::<Option<String>, _>("name")?,
            security_stamp: row.try_get("security_stamp")?,
            created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
            updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
        };
        let password_hash: String = row.try_get("password_hash")?;
        Ok((user, password_hash))
    }

    async fn find_with_hash(&self, username: &str) -> Result<Option<(User, String)>, InfrastructureError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE normalized_username = ? LIMIT 1");
        let row = sqlx::query(&query)
            .bind(normalize_username(username))
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Self::row_to_user).transpose()
    }
}

#[async_trait]
impl IdentityRepository for MySqlIdentityRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        Ok(self.find_with_hash(username).await?.map(|(user, _)| user))
    }

    async fn check_password(&self, user: &User, password: &str) -> Result<bool, DomainError> {
        match self.find_with_hash(&user.username).await? {
            Some((_, hash)) => Ok(self.hasher.verify(password, &hash).await?),
            None => Ok(false),
        }
    }

    async fn check_password_without_user(&self, password: &str) -> Result<(), DomainError> {
        self.hasher.verify_placeholder(password).await?;
        Ok(())
    }

    async fn create(&self, user: NewUser, password: &str) -> Result<User, DomainError> {
        self.policy.check(password)?;
        let password_hash = self.hasher.hash(password).await?;
        let user = user.into_user();

        let query = format!(
            "INSERT INTO users ({USER_COLUMNS}, normalized_username) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"
        );
        let result = sqlx::query(&query)
            .bind(user.id.to_string())
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.name)
            .bind(&password_hash)
            .bind(&user.security_stamp)
            .bind(user.created_at)
            .bind(user.updated_at)
            .bind(normalize_username(&user.username))
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(user),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(ValidationError::DuplicateValue {
                    field: "username".to_string(),
                }
                .into())
            }
            Err(e) => Err(InfrastructureError::from(e).into()),
        }
    }

    async fn change_password(
        &self,
        user: &User,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), DomainError> {
        if !self.check_password(user, current_password).await? {
            return Err(AuthError::IncorrectPassword.into());
        }
        self.policy.check(new_password)?;
        let password_hash = self.hasher.hash(new_password).await?;

        let result = sqlx::query(
            "UPDATE users SET password_hash = ?, security_stamp = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&password_hash)
        .bind(Uuid::new_v4().to_string())
        .bind(Utc::now())
        .bind(user.id.to_string())
        .execute(&self.pool)
        .await
        .map_err(InfrastructureError::from)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound {
                resource: format!("user {}", user.username),
            });
        }
        Ok(())
    }

    async fn roles_for(&self, user: &User) -> Result<Vec<String>, DomainError> {
        let rows = sqlx::query("SELECT role_name FROM user_roles WHERE user_id = ? ORDER BY role_name")
            .bind(user.id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(InfrastructureError::from)?;

        rows.iter()
            .map(|row| row.try_get::<String, _>("role_name"))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| InfrastructureError::from(e).into())
    }

    async fn role_exists(&self, role: &str) -> Result<bool, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM roles WHERE name = ?")
            .bind(role)
            .fetch_one(&self.pool)
            .await
            .map_err(InfrastructureError::from)?;
        Ok(count > 0)
    }

    async fn create_role(&self, role: &str) -> Result<(), DomainError> {
        sqlx::query("INSERT IGNORE INTO roles (name) VALUES (?)")
            .bind(role)
            .execute(&self.pool)
            .await
            .map_err(InfrastructureError::from)?;
        Ok(())
    }

    async fn add_to_role(&self, user: &User, role: &str) -> Result<(), DomainError> {
        if !self.role_exists(role).await? {
            return Err(DomainError::NotFound {
                resource: format!("role {role}"),
            });
        }
        sqlx::query("INSERT IGNORE INTO user_roles (user_id, role_name) VALUES (?, ?)")
            .bind(user.id.to_string())
            .bind(role)
            .execute(&self.pool)
            .await
            .map_err(InfrastructureError::from)?;
        Ok(())
    }
}
