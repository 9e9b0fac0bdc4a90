//! Token entities for JWT-based authentication.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Refresh token lifetime stamped at login (7 days)
pub const REFRESH_TOKEN_EXPIRY_DAYS: i64 = 7;

/// Claim type naming the subject (username)
pub const CLAIM_SUBJECT: &str = "sub";

/// Claim type naming the unique token identifier
pub const CLAIM_TOKEN_ID: &str = "jti";

/// Claim type naming a role; repeated once per role
pub const CLAIM_ROLE: &str = "role";

/// The authenticated facts embedded in an access token
///
/// A claim set always carries the subject username and a unique token id,
/// plus zero or more roles. Fields are private so a built set cannot be
/// altered; derive a new one with [`ClaimSet::with_fresh_token_id`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimSet {
    sub: String,
    jti: String,
    #[serde(default, rename = "role", skip_serializing_if = "Vec::is_empty")]
    roles: Vec<String>,
}

impl ClaimSet {
    /// Builds a claim set for `username` with a freshly generated token id
    pub fn new<I, S>(username: impl Into<String>, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_parts(username, Uuid::new_v4().to_string(), roles)
    }

    /// Builds a claim set from already known parts
    pub fn from_parts<I, S>(username: impl Into<String>, token_id: impl Into<String>, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            sub: username.into(),
            jti: token_id.into(),
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }

    /// Subject username
    pub fn username(&self) -> &str {
        &self.sub
    }

    /// Unique token identifier (jti)
    pub fn token_id(&self) -> &str {
        &self.jti
    }

    pub fn roles(&self) -> &[String] {
        &self.roles
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// Same subject and roles under a new token id
    pub fn with_fresh_token_id(&self) -> Self {
        Self {
            sub: self.sub.clone(),
            jti: Uuid::new_v4().to_string(),
            roles: self.roles.clone(),
        }
    }

    /// Iterates the claims as ordered `(type, value)` pairs: subject, token id, then roles
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        [(CLAIM_SUBJECT, self.sub.as_str()), (CLAIM_TOKEN_ID, self.jti.as_str())]
            .into_iter()
            .chain(self.roles.iter().map(|role| (CLAIM_ROLE, role.as_str())))
    }
}

/// Full JWT payload: the claim set plus the registered time and audience claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    #[serde(flatten)]
    pub claims: ClaimSet,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,
}

impl AccessClaims {
    /// Stamps `claims` with the validity window, issuer and audience
    pub fn new(
        claims: ClaimSet,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
        issuer: &str,
        audience: &str,
    ) -> Self {
        Self {
            claims,
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            iss: issuer.to_string(),
            aud: audience.to_string(),
        }
    }
}

/// A signed access token and its validity window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    /// Compact serialized, signed JWT
    pub token: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Access token plus opaque refresh token handed to the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: AccessToken,
    pub refresh_token: String,
}

/// Server-side refresh token state, one per username
///
/// Created on the first successful login, overwritten on every login and
/// rotation, revoked by clearing `refresh_token`. Records are never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    /// Unique key
    pub username: String,

    /// Current refresh token; `None` once revoked
    pub refresh_token: Option<String>,

    /// Instant after which the refresh token is no longer accepted
    pub refresh_token_expiry: DateTime<Utc>,
}

impl TokenRecord {
    /// Creates a record holding a live refresh token
    pub fn new(
        username: impl Into<String>,
        refresh_token: impl Into<String>,
        refresh_token_expiry: DateTime<Utc>,
    ) -> Self {
        Self {
            username: username.into(),
            refresh_token: Some(refresh_token.into()),
            refresh_token_expiry,
        }
    }

    /// True if `presented` is exactly the stored, unexpired refresh token
    pub fn accepts(&self, presented: &str, now: DateTime<Utc>) -> bool {
        if self.is_expired_at(now) {
            return false;
        }
        match self.refresh_token.as_deref() {
            Some(stored) if !stored.is_empty() && !presented.is_empty() => {
                constant_time_eq::constant_time_eq(stored.as_bytes(), presented.as_bytes())
            }
            _ => false,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.refresh_token_expiry <= now
    }

    pub fn is_revoked(&self) -> bool {
        self.refresh_token.as_deref().map_or(true, str::is_empty)
    }

    /// Replaces the refresh token, keeping the stored expiry
    pub fn rotated(&self, refresh_token: impl Into<String>) -> Self {
        Self {
            username: self.username.clone(),
            refresh_token: Some(refresh_token.into()),
            refresh_token_expiry: self.refresh_token_expiry,
        }
    }

    /// Clears the refresh token, keeping the stored expiry
    pub fn revoked(&self) -> Self {
        Self {
            username: self.username.clone(),
            refresh_token: None,
            refresh_token_expiry: self.refresh_token_expiry,
        }
    }
}
