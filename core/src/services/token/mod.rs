//! Token service module for JWT and refresh token handling
//!
//! This module handles:
//! - HS256 access token signing with a pinned algorithm
//! - Signature-only validation for refresh, full validation for requests
//! - Opaque refresh token generation from the OS entropy source

mod config;
mod refresh;
mod signer;

#[cfg(test)]
mod tests;

pub use config::TokenSignerConfig;
pub use refresh::{RefreshTokenGenerator, REFRESH_TOKEN_BYTES};
pub use signer::TokenSigner;
