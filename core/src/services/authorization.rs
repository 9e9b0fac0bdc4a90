//! Role-based authorization over an already verified claim set.
//!
//! Decisions use only the roles embedded at token issuance, so a role change
//! takes effect once the user obtains a new access token.

use crate::domain::entities::token::ClaimSet;
use crate::errors::AuthError;

/// Allows the request if no role is required or the claims carry any of `required_roles`
pub fn authorize(claims: &ClaimSet, required_roles: &[&str]) -> Result<(), AuthError> {
    if required_roles.is_empty() || required_roles.iter().any(|role| claims.has_role(role)) {
        Ok(())
    } else {
        Err(AuthError::InsufficientPermissions)
    }
}
