use serde::{Deserialize, Serialize};
use validator::Validate;

use ts_core::TokenPair;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TokenRefreshRequest {
    #[validate(length(min = 1))]
    pub access_token: String,
    #[validate(length(min = 1))]
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRefreshResponse {
    pub access_token: String,
    pub refresh_token: String,
}

impl From<TokenPair> for TokenRefreshResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token.token,
            refresh_token: pair.refresh_token,
        }
    }
}
