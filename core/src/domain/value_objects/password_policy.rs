//! Password strength rules enforced by identity stores.

use crate::errors::ValidationError;

/// Password policy applied on account creation and password change
///
/// Defaults require at least six characters including a digit, a lowercase
/// letter, an uppercase letter and a non-alphanumeric character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub require_digit: bool,
    pub require_lowercase: bool,
    pub require_uppercase: bool,
    pub require_non_alphanumeric: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 6,
            require_digit: true,
            require_lowercase: true,
            require_uppercase: true,
            require_non_alphanumeric: true,
        }
    }
}

impl PasswordPolicy {
    /// Policy that accepts any non-empty password
    pub fn relaxed() -> Self {
        Self {
            min_length: 1,
            require_digit: false,
            require_lowercase: false,
            require_uppercase: false,
            require_non_alphanumeric: false,
        }
    }

    /// Checks `password` against every enabled rule
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Password is acceptable
    /// * `Err(ValidationError::PasswordPolicy)` - First rule that failed
    pub fn check(&self, password: &str) -> Result<(), ValidationError> {
        let violation = |reason: &str| {
            Err(ValidationError::PasswordPolicy {
                reason: reason.to_string(),
            })
        };

        if password.chars().count() < self.min_length {
            return violation(format!("must be at least {} characters", self.min_length).as_str());
        }
        if self.require_digit && !password.chars().any(|c| c.is_ascii_digit()) {
            return violation("must contain a digit");
        }
        if self.require_lowercase && !password.chars().any(char::is_lowercase) {
            return violation("must contain a lowercase letter");
        }
        if self.require_uppercase && !password.chars().any(char::is_uppercase) {
            return violation("must contain an uppercase letter");
        }
        if self.require_non_alphanumeric && password.chars().all(char::is_alphanumeric) {
            return violation("must contain a non-alphanumeric character");
        }
        Ok(())
    }
}
