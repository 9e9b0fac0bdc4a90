//! Mock implementation of IdentityRepository for testing

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::user::{NewUser, User};
use crate::domain::value_objects::PasswordPolicy;
use crate::errors::{AuthError, DomainError, ValidationError};

use super::r#trait::IdentityRepository;

struct StoredUser {
    user: User,
    password: String,
    roles: HashSet<String>,
}

/// Mock identity repository for testing
///
/// Passwords are kept in plaintext; the default password policy is enforced.
#[derive(Clone, Default)]
pub struct MockIdentityRepository {
    users: Arc<RwLock<HashMap<String, StoredUser>>>,
    roles: Arc<RwLock<HashSet<String>>>,
    policy: PasswordPolicy,
    failing: Arc<AtomicBool>,
    unknown_user_checks: Arc<AtomicUsize>,
}

impl MockIdentityRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with a storage error
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Seed a user with the given roles, bypassing the password policy
    pub async fn seed(&self, username: &str, password: &str, roles: &[&str]) -> User {
        let user = User::new(username, format!("{username}@example.com"), None);
        let stored = StoredUser {
            user: user.clone(),
            password: password.to_string(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
        };
        self.roles.write().await.extend(roles.iter().map(|r| r.to_string()));
        self.users.write().await.insert(username.to_string(), stored);
        user
    }

    pub async fn password_of(&self, username: &str) -> Option<String> {
        self.users.read().await.get(username).map(|s| s.password.clone())
    }

    /// Number of password checks made for usernames with no account
    pub fn unknown_user_checks(&self) -> usize {
        self.unknown_user_checks.load(Ordering::SeqCst)
    }

    pub async fn known_roles(&self) -> HashSet<String> {
        self.roles.read().await.clone()
    }

    fn check_available(&self) -> Result<(), DomainError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DomainError::storage("identity store unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl IdentityRepository for MockIdentityRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        self.check_available()?;
        Ok(self.users.read().await.get(username).map(|s| s.user.clone()))
    }

    async fn check_password(&self, user: &User, password: &str) -> Result<bool, DomainError> {
        self.check_available()?;
        let users = self.users.read().await;
        Ok(users
            .get(&user.username)
            .map(|s| s.password == password)
            .unwrap_or(false))
    }

    async fn check_password_without_user(&self, _password: &str) -> Result<(), DomainError> {
        self.check_available()?;
        self.unknown_user_checks.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn create(&self, user: NewUser, password: &str) -> Result<User, DomainError> {
        self.check_available()?;
        self.policy.check(password)?;

        let mut users = self.users.write().await;
        if users.contains_key(&user.username) {
            return Err(ValidationError::DuplicateValue {
                field: "username".to_string(),
            }
            .into());
        }

        let user = user.into_user();
        users.insert(
            user.username.clone(),
            StoredUser {
                user: user.clone(),
                password: password.to_string(),
                roles: HashSet::new(),
            },
        );
        Ok(user)
    }

    async fn change_password(
        &self,
        user: &User,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), DomainError> {
        self.check_available()?;
        let mut users = self.users.write().await;
        let stored = users
            .get_mut(&user.username)
            .ok_or_else(|| DomainError::NotFound {
                resource: "user".to_string(),
            })?;
        if stored.password != current_password {
            return Err(AuthError::IncorrectPassword.into());
        }
        self.policy.check(new_password)?;

        stored.password = new_password.to_string();
        stored.user.refresh_security_stamp();
        Ok(())
    }

    async fn roles_for(&self, user: &User) -> Result<Vec<String>, DomainError> {
        self.check_available()?;
        let users = self.users.read().await;
        let mut roles: Vec<String> = users
            .get(&user.username)
            .map(|s| s.roles.iter().cloned().collect())
            .unwrap_or_default();
        roles.sort();
        Ok(roles)
    }

    async fn role_exists(&self, role: &str) -> Result<bool, DomainError> {
        self.check_available()?;
        Ok(self.roles.read().await.contains(role))
    }

    async fn create_role(&self, role: &str) -> Result<(), DomainError> {
        self.check_available()?;
        self.roles.write().await.insert(role.to_string());
        Ok(())
    }

    async fn add_to_role(&self, user: &User, role: &str) -> Result<(), DomainError> {
        self.check_available()?;
        if !self.roles.read().await.contains(role) {
            return Err(DomainError::NotFound {
                resource: format!("role {role}"),
            });
        }
        let mut users = self.users.write().await;
        let stored = users
            .get_mut(&user.username)
            .ok_or_else(|| DomainError::NotFound {
                resource: "user".to_string(),
            })?;
        stored.roles.insert(role.to_string());
        Ok(())
    }
}
