//! Opaque refresh token generation

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};

use crate::errors::TokenError;

/// Random bytes per refresh token (256 bits)
pub const REFRESH_TOKEN_BYTES: usize = 32;

/// Produces refresh tokens from the operating system's CSPRNG
#[derive(Debug, Clone, Copy, Default)]
pub struct RefreshTokenGenerator;

impl RefreshTokenGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Draws 32 random bytes and returns them base64 encoded
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - 44 character token
    /// * `Err(TokenError::EntropyUnavailable)` - The OS could not supply randomness
    pub fn generate(&self) -> Result<String, TokenError> {
        Self::generate_with(&mut OsRng)
    }

    /// Same as [`RefreshTokenGenerator::generate`] with an explicit entropy source
    pub fn generate_with<R: RngCore + CryptoRng>(rng: &mut R) -> Result<String, TokenError> {
        let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
        rng.try_fill_bytes(&mut bytes)
            .map_err(|_| TokenError::EntropyUnavailable)?;
        Ok(STANDARD.encode(bytes))
    }
}
