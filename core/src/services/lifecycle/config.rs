//! Configuration for the token lifecycle service

use chrono::Duration;
use ts_shared::config::AuthConfig;

use crate::domain::entities::token::REFRESH_TOKEN_EXPIRY_DAYS;
use crate::domain::entities::user::UserRoles;
use crate::errors::DomainError;

/// Configuration for the token lifecycle service
#[derive(Debug, Clone)]
pub struct LifecycleConfig {
    /// Lifetime of issued access tokens
    pub access_token_ttl: Duration,
    /// Lifetime stamped on the token record at login; not extended by rotation
    pub refresh_token_ttl: Duration,
    /// Upper bound for a single store call
    pub store_timeout: std::time::Duration,
    /// Role given to self-registered users
    pub default_role: String,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            access_token_ttl: Duration::days(7),
            refresh_token_ttl: Duration::days(REFRESH_TOKEN_EXPIRY_DAYS),
            store_timeout: std::time::Duration::from_secs(5),
            default_role: UserRoles::USER.to_string(),
        }
    }
}

impl TryFrom<&AuthConfig> for LifecycleConfig {
    type Error = DomainError;

    fn try_from(auth: &AuthConfig) -> Result<Self, Self::Error> {
        Ok(Self {
            access_token_ttl: lifetime("access_token_expiry", auth.access_token_expiry_seconds())?,
            refresh_token_ttl: lifetime("refresh_token_expiry", auth.refresh_token_expiry_seconds())?,
            store_timeout: std::time::Duration::from_millis(auth.store_timeout_ms),
            ..Default::default()
        })
    }
}

/// Converts a configured lifetime in seconds, rejecting non-positive or unrepresentable values
fn lifetime(name: &str, seconds: i64) -> Result<Duration, DomainError> {
    Duration::try_seconds(seconds)
        .filter(|ttl| *ttl > Duration::zero())
        .ok_or_else(|| DomainError::Configuration {
            message: format!("auth.jwt.{name} of {seconds} seconds is out of range"),
        })
}
