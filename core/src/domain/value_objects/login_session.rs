//! Result of a successful login.

use chrono::{DateTime, Utc};

use crate::domain::entities::token::TokenPair;

/// Tokens issued by a successful login together with who they were issued to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginSession {
    /// Login name the tokens were issued for
    pub username: String,

    /// Display name, if the account has one
    pub name: Option<String>,

    pub tokens: TokenPair,
}

impl LoginSession {
    pub fn new(username: impl Into<String>, name: Option<String>, tokens: TokenPair) -> Self {
        Self {
            username: username.into(),
            name,
            tokens,
        }
    }

    /// Signed access token string
    pub fn access_token(&self) -> &str {
        &self.tokens.access_token.token
    }

    pub fn refresh_token(&self) -> &str {
        &self.tokens.refresh_token
    }

    /// Access token expiry
    pub fn expiration(&self) -> DateTime<Utc> {
        self.tokens.access_token.expires_at
    }
}
