//! Token lifecycle service module
//!
//! Orchestrates login, refresh rotation, revocation, password change and
//! registration over the identity and token record stores.

mod config;
mod service;

#[cfg(test)]
mod tests;

pub use config::LifecycleConfig;
pub use service::TokenLifecycleService;
