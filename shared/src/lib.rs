//! Shared configuration and wire types for the Turnstile server
//!
//! This crate provides functionality used across all server modules:
//! - Configuration types, loaded once at startup and shared read-only
//! - Status and error response bodies spoken by the HTTP gateway

pub mod config;
pub mod types;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, AuthConfig, BootstrapAdminConfig, DatabaseConfig, Environment, JwtConfig,
    LoggingConfig, ServerConfig,
};
pub use types::{ErrorResponse, HealthResponse, StatusResponse};
