//! User entity as seen through the identity store contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Well-known role names
pub struct UserRoles;

impl UserRoles {
    pub const ADMIN: &'static str = "Admin";
    pub const USER: &'static str = "User";
}

/// A registered account
///
/// The password hash never leaves the identity store, so it is not part of
/// this entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user
    pub id: Uuid,

    /// Login name, unique across users
    pub username: String,

    pub email: String,

    /// Display name
    pub name: Option<String>,

    /// Regenerated whenever credentials change
    pub security_stamp: String,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new User instance
    pub fn new(username: impl Into<String>, email: impl Into<String>, name: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            email: email.into(),
            name,
            security_stamp: Uuid::new_v4().to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Marks the credentials as changed
    pub fn refresh_security_stamp(&mut self) {
        self.security_stamp = Uuid::new_v4().to_string();
        self.updated_at = Utc::now();
    }
}

/// Registration input handed to the identity store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub name: Option<String>,
}

impl NewUser {
    pub fn new(username: impl Into<String>, email: impl Into<String>, name: Option<String>) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            name,
        }
    }

    /// Materializes the account with a fresh id and security stamp
    pub fn into_user(self) -> User {
        User::new(self.username, self.email, self.name)
    }
}
