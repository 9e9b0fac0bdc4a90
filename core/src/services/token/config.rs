//! Configuration for the token signer

use ts_shared::config::JwtConfig;

/// Key material and audience settings for the token signer
#[derive(Debug, Clone)]
pub struct TokenSignerConfig {
    /// Symmetric HS256 secret
    pub secret: String,
    /// Value of the `iss` claim
    pub issuer: String,
    /// Value of the `aud` claim
    pub audience: String,
}

impl TokenSignerConfig {
    pub fn new(
        secret: impl Into<String>,
        issuer: impl Into<String>,
        audience: impl Into<String>,
    ) -> Self {
        Self {
            secret: secret.into(),
            issuer: issuer.into(),
            audience: audience.into(),
        }
    }
}

impl From<&JwtConfig> for TokenSignerConfig {
    fn from(jwt: &JwtConfig) -> Self {
        Self::new(jwt.secret.clone(), jwt.issuer.clone(), jwt.audience.clone())
    }
}
