//! In-memory identity store

use std::collections::{BTreeSet, HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use ts_core::domain::entities::user::{NewUser, User};
use ts_core::domain::value_objects::PasswordPolicy;
use ts_core::errors::{AuthError, DomainError, ValidationError};
use ts_core::repositories::IdentityRepository;

use super::hasher::PasswordHasher;
use super::normalize_username;

struct UserEntry {
    user: User,
    password_hash: String,
    roles: BTreeSet<String>,
}

/// Identity store held in process memory
///
/// Usernames are matched case-insensitively. Contents are lost on restart.
pub struct InMemoryIdentityRepository {
    users: RwLock<HashMap<String, UserEntry>>,
    roles: RwLock<HashSet<String>>,
    hasher: PasswordHasher,
    policy: PasswordPolicy,
}

impl Default for InMemoryIdentityRepository {
    fn default() -> Self {
        Self::new(PasswordHasher::default(), PasswordPolicy::default())
    }
}

impl InMemoryIdentityRepository {
    pub fn new(hasher: PasswordHasher, policy: PasswordPolicy) -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            roles: RwLock::new(HashSet::new()),
            hasher,
            policy,
        }
    }

    async fn password_hash(&self, user: &User) -> Option<String> {
        self.users
            .read()
            .await
            .get(&normalize_username(&user.username))
            .map(|entry| entry.password_hash.clone())
    }

    #[cfg(test)]
    pub(crate) async fn stored_hash(&self, username: &str) -> Option<String> {
        self.users
            .read()
            .await
            .get(&normalize_username(username))
            .map(|entry| entry.password_hash.clone())
    }
}

#[async_trait]
impl IdentityRepository for InMemoryIdentityRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users
            .get(&normalize_username(username))
            .map(|entry| entry.user.clone()))
    }

    async fn check_password(&self, user: &User, password: &str) -> Result<bool, DomainError> {
        match self.password_hash(user).await {
            Some(hash) => Ok(self.hasher.verify(password, &hash).await?),
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
        let key = normalize_username(&user.username);

        let mut users = self.users.write().await;
        if users.contains_key(&key) {
            return Err(ValidationError::DuplicateValue {
                field: "username".to_string(),
            }
            .into());
        }

        let user = user.into_user();
        users.insert(
            key,
            UserEntry {
                user: user.clone(),
                password_hash,
                roles: BTreeSet::new(),
            },
        );
        tracing::debug!(username = %user.username, "user created");
        Ok(user)
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

        let mut users = self.users.write().await;
        let entry = users
            .get_mut(&normalize_username(&user.username))
            .ok_or_else(|| DomainError::NotFound {
                resource: format!("user {}", user.username),
            })?;
        entry.password_hash = password_hash;
        entry.user.refresh_security_stamp();
        Ok(())
    }

    async fn roles_for(&self, user: &User) -> Result<Vec<String>, DomainError> {
        let users = self.users.read().await;
        Ok(users
            .get(&normalize_username(&user.username))
            .map(|entry| entry.roles.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn role_exists(&self, role: &str) -> Result<bool, DomainError> {
        Ok(self.roles.read().await.contains(role))
    }

    async fn create_role(&self, role: &str) -> Result<(), DomainError> {
        self.roles.write().await.insert(role.to_string());
        Ok(())
    }

    async fn add_to_role(&self, user: &User, role: &str) -> Result<(), DomainError> {
        if !self.role_exists(role).await? {
            return Err(DomainError::NotFound {
                resource: format!("role {role}"),
            });
        }
        let mut users = self.users.write().await;
        let entry = users
            .get_mut(&normalize_username(&user.username))
            .ok_or_else(|| DomainError::NotFound {
                resource: format!("user {}", user.username),
            })?;
        entry.roles.insert(role.to_string());
        Ok(())
    }
}
