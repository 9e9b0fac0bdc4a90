//! HS256 signing and validation of access tokens

use std::collections::HashSet;

use chrono::{Duration, SubsecRound, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::domain::entities::token::{AccessClaims, AccessToken, ClaimSet};
use crate::errors::{DomainError, TokenError};

use super::config::TokenSignerConfig;

/// The only algorithm tokens are signed with or accepted under
const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

/// Encodes and decodes signed claim sets
///
/// Holds no mutable state; share one instance behind an `Arc`.
pub struct TokenSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    audience: String,
    /// Signature and algorithm only
    refresh_validation: Validation,
    /// Signature, algorithm, expiry, issuer and audience
    full_validation: Validation,
}

impl TokenSigner {
    /// Creates a new token signer
    ///
    /// # Arguments
    ///
    /// * `config` - Secret, issuer and audience
    ///
    /// # Returns
    ///
    /// * `Ok(TokenSigner)` - Ready to sign
    /// * `Err(DomainError::Configuration)` - The secret is empty
    pub fn new(config: TokenSignerConfig) -> Result<Self, DomainError> {
        if config.secret.is_empty() {
            return Err(DomainError::Configuration {
                message: "token signing secret must not be empty".to_string(),
            });
        }

        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        let mut refresh_validation = Validation::new(SIGNING_ALGORITHM);
        refresh_validation.validate_exp = false;
        refresh_validation.validate_nbf = false;
        refresh_validation.validate_aud = false;
        refresh_validation.required_spec_claims = HashSet::from(["sub".to_string()]);

        let mut full_validation = Validation::new(SIGNING_ALGORITHM);
        full_validation.set_issuer(&[config.issuer.as_str()]);
        full_validation.set_audience(&[config.audience.as_str()]);
        full_validation.set_required_spec_claims(&["exp", "sub", "iss", "aud"]);
        full_validation.validate_exp = true;
        full_validation.leeway = 0;

        Ok(Self {
            encoding_key,
            decoding_key,
            issuer: config.issuer,
            audience: config.audience,
            refresh_validation,
            full_validation,
        })
    }

    /// Signs `claims` into an access token valid from now for `ttl`
    ///
    /// # Arguments
    ///
    /// * `claims` - Subject, token id and roles to embed
    /// * `ttl` - Lifetime of the token
    ///
    /// # Returns
    ///
    /// * `Ok(AccessToken)` - Compact JWT with its validity window
    /// * `Err(TokenError::TokenGenerationFailed)` - Serialization or signing failed
    /// * `Err(DomainError::Configuration)` - `ttl` overflows the calendar
    pub fn issue_access_token(&self, claims: &ClaimSet, ttl: Duration) -> Result<AccessToken, DomainError> {
        let issued_at = Utc::now().trunc_subsecs(0);
        let expires_at = issued_at
            .checked_add_signed(ttl)
            .ok_or_else(|| DomainError::Configuration {
                message: "access token lifetime out of range".to_string(),
            })?;
        let payload = AccessClaims::new(claims.clone(), issued_at, expires_at, &self.issuer, &self.audience);

        let token = encode(&Header::new(SIGNING_ALGORITHM), &payload, &self.encoding_key)
            .map_err(|_| TokenError::TokenGenerationFailed)?;

        Ok(AccessToken {
            token,
            issued_at,
            expires_at,
        })
    }

    /// Recovers the claim set of a possibly expired token
    ///
    /// Verifies the signature and that the header names exactly HS256.
    /// Expiry, issuer and audience are not checked.
    pub fn validate_for_refresh(&self, token: &str) -> Result<ClaimSet, DomainError> {
        self.decode_with(token, &self.refresh_validation)
    }

    /// Validates a token presented on an ordinary authenticated request
    ///
    /// Same as [`TokenSigner::validate_for_refresh`] plus expiry (no leeway),
    /// issuer and audience checks.
    pub fn validate_full(&self, token: &str) -> Result<ClaimSet, DomainError> {
        self.decode_with(token, &self.full_validation)
    }

    fn decode_with(&self, token: &str, validation: &Validation) -> Result<ClaimSet, DomainError> {
        let data = decode::<AccessClaims>(token, &self.decoding_key, validation)
            .map_err(|e| map_jwt_error(e.kind()))?;

        if data.claims.claims.username().is_empty() {
            return Err(TokenError::InvalidClaims.into());
        }
        Ok(data.claims.claims)
    }
}

fn map_jwt_error(kind: &ErrorKind) -> TokenError {
    match kind {
        ErrorKind::ExpiredSignature => TokenError::TokenExpired,
        ErrorKind::InvalidSignature => TokenError::InvalidSignature,
        ErrorKind::InvalidAlgorithm => TokenError::InvalidAlgorithm,
        ErrorKind::InvalidIssuer | ErrorKind::InvalidAudience | ErrorKind::InvalidSubject => {
            TokenError::InvalidClaims
        }
        ErrorKind::MissingRequiredClaim(claim) => TokenError::MissingClaim {
            claim: claim.clone(),
        },
        _ => TokenError::InvalidTokenFormat,
    }
}
