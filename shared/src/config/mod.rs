//! Configuration module with business-specific sub-modules
//!
//! - `auth` - Token signing and lifetime configuration
//! - `database` - Optional MySQL persistence configuration
//! - `environment` - Environment detection and logging configuration
//! - `server` - HTTP server configuration

pub mod auth;
pub mod database;
pub mod environment;
pub mod server;

use serde::{Deserialize, Serialize};

pub use auth::{AuthConfig, BootstrapAdminConfig, JwtConfig, MAX_TOKEN_LIFETIME_SECONDS};
pub use database::DatabaseConfig;
pub use environment::{Environment, LoggingConfig};
pub use server::ServerConfig;

/// Complete application configuration combining all sub-configurations
///
/// Built once at process start and never mutated afterwards.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    #[serde(default)]
    pub environment: Environment,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Authentication configuration
    #[serde(default)]
    pub auth: AuthConfig,

    /// Database configuration; in-memory stores are used when absent
    #[serde(default)]
    pub database: Option<DatabaseConfig>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Administrator account created at startup if missing
    #[serde(default)]
    pub bootstrap_admin: Option<BootstrapAdminConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            server: ServerConfig::default(),
            auth: AuthConfig::default(),
            database: None,
            logging: LoggingConfig::for_environment(env),
            bootstrap_admin: None,
        }
    }
}

impl AppConfig {
    /// Check the invariants that must hold before any request is served
    ///
    /// Returns a human readable reason when the configuration is unusable.
    pub fn validate(&self) -> Result<(), String> {
        if self.auth.jwt.secret.is_empty() {
            return Err("auth.jwt.secret must not be empty".to_string());
        }
        if self.environment.is_production() && self.auth.jwt.is_using_default_secret() {
            return Err("the development signing secret cannot be used in production".to_string());
        }
        if self.auth.jwt.issuer.is_empty() || self.auth.jwt.audience.is_empty() {
            return Err("auth.jwt.issuer and auth.jwt.audience must be set".to_string());
        }
        self.auth.jwt.validate_lifetimes()
    }
}
