//! Authentication and token configuration

use serde::{Deserialize, Serialize};

const DEVELOPMENT_SECRET: &str = "development-secret-please-change-in-production";

/// Seven days, the lifetime observed for both token kinds.
const SEVEN_DAYS_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Longest lifetime accepted for either token kind: ten years.
pub const MAX_TOKEN_LIFETIME_SECONDS: i64 = 10 * 365 * 24 * 60 * 60;

/// JWT signing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// Symmetric key material for HS256 signing
    pub secret: String,

    /// Access token lifetime in seconds
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry: i64,

    /// Refresh token lifetime in seconds
    #[serde(default = "default_refresh_token_expiry")]
    pub refresh_token_expiry: i64,

    /// JWT issuer claim
    #[serde(default = "default_issuer")]
    pub issuer: String,

    /// JWT audience claim
    #[serde(default = "default_audience")]
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::from(DEVELOPMENT_SECRET),
            access_token_expiry: default_access_token_expiry(),
            refresh_token_expiry: default_refresh_token_expiry(),
            issuer: default_issuer(),
            audience: default_audience(),
        }
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Set access token expiry in minutes
    pub fn with_access_expiry_minutes(mut self, minutes: i64) -> Self {
        self.access_token_expiry = minutes * 60;
        self
    }

    /// Set refresh token expiry in days
    pub fn with_refresh_expiry_days(mut self, days: i64) -> Self {
        self.refresh_token_expiry = days * 86400;
        self
    }

    /// Check both lifetimes lie in `1..=MAX_TOKEN_LIFETIME_SECONDS`
    pub fn validate_lifetimes(&self) -> Result<(), String> {
        for (name, seconds) in [
            ("access_token_expiry", self.access_token_expiry),
            ("refresh_token_expiry", self.refresh_token_expiry),
        ] {
            if !(1..=MAX_TOKEN_LIFETIME_SECONDS).contains(&seconds) {
                return Err(format!(
                    "auth.jwt.{name} must be between 1 and {MAX_TOKEN_LIFETIME_SECONDS} seconds, got {seconds}"
                ));
            }
        }
        Ok(())
    }

    /// Check if using default secret (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.secret == DEVELOPMENT_SECRET
    }
}

/// Administrator account seeded at startup
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BootstrapAdminConfig {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Complete authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// JWT configuration
    #[serde(default)]
    pub jwt: JwtConfig,

    /// Upper bound in milliseconds for a single store call
    #[serde(default = "default_store_timeout_ms")]
    pub store_timeout_ms: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt: JwtConfig::default(),
            store_timeout_ms: default_store_timeout_ms(),
        }
    }
}

impl AuthConfig {
    /// Get JWT secret
    pub fn jwt_secret(&self) -> &str {
        &self.jwt.secret
    }

    /// Get access token expiry in seconds
    pub fn access_token_expiry_seconds(&self) -> i64 {
        self.jwt.access_token_expiry
    }

    /// Get refresh token expiry in seconds
    pub fn refresh_token_expiry_seconds(&self) -> i64 {
        self.jwt.refresh_token_expiry
    }
}

fn default_access_token_expiry() -> i64 {
    SEVEN_DAYS_SECONDS
}

fn default_refresh_token_expiry() -> i64 {
    SEVEN_DAYS_SECONDS
}

fn default_issuer() -> String {
    String::from("turnstile")
}

fn default_audience() -> String {
    String::from("turnstile-api")
}

fn default_store_timeout_ms() -> u64 {
    5_000
}
