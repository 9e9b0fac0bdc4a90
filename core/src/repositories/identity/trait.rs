//! Identity repository trait: user credentials and role membership.

use async_trait::async_trait;

use crate::domain::entities::user::{NewUser, User};
use crate::errors::DomainError;

/// Repository trait for users, their passwords and roles
///
/// Password hashing and the password policy live behind this trait; callers
/// only ever hand over and compare plaintext candidates.
///
/// # Errors
/// Store outages are reported as `DomainError::Storage`. Refusals such as a
/// policy violation or a duplicate username use the validation variants.
#[async_trait]
pub trait IdentityRepository: Send + Sync {
    /// Find a user by login name
    ///
    /// # Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - No user with that name
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;

    /// Check a plaintext password against the stored hash
    async fn check_password(&self, user: &User, password: &str) -> Result<bool, DomainError>;

    /// Do the work of `check_password` for a username with no account
    ///
    /// Never matches. Called on a lookup miss so that an unknown username
    /// answers no faster than a wrong password.
    async fn check_password_without_user(&self, password: &str) -> Result<(), DomainError>;

    /// Create a user with an initial password
    ///
    /// # Arguments
    /// * `user` - Registration details
    /// * `password` - Plaintext password, checked against the store's policy
    ///
    /// # Returns
    /// * `Ok(User)` - The created user
    /// * `Err(DomainError)` - Duplicate username, policy violation or store failure
    async fn create(&self, user: NewUser, password: &str) -> Result<User, DomainError>;

    /// Replace the password after re-checking the current one
    ///
    /// # Returns
    /// * `Ok(())` - Password changed, security stamp regenerated
    /// * `Err(DomainError)` - Current password wrong, new password refused or store failure
    async fn change_password(
        &self,
        user: &User,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), DomainError>;

    /// Roles the user currently belongs to
    async fn roles_for(&self, user: &User) -> Result<Vec<String>, DomainError>;

    async fn role_exists(&self, role: &str) -> Result<bool, DomainError>;

    async fn create_role(&self, role: &str) -> Result<(), DomainError>;

    /// Add the user to an existing role; adding twice is a no-op
    async fn add_to_role(&self, user: &User, role: &str) -> Result<(), DomainError>;
}
