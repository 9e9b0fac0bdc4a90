use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use ts_core::LoginSession;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegistrationRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1))]
    pub user_name: String,
    #[validate(length(min = 1))]
    pub current_password: String,
    #[validate(length(min = 1))]
    pub new_password: String,
    #[validate(must_match(other = "new_password"))]
    pub confirm_new_password: String,
}

/// Login outcome; token fields are empty on failure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub status_code: i32,
    pub message: String,
    pub name: Option<String>,
    pub username: Option<String>,
    pub token: String,
    pub refresh_token: Option<String>,
    pub expiration: Option<DateTime<Utc>>,
}

impl LoginResponse {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            status_code: 0,
            message: message.into(),
            name: None,
            username: None,
            token: String::new(),
            refresh_token: None,
            expiration: None,
        }
    }
}

impl From<LoginSession> for LoginResponse {
    fn from(session: LoginSession) -> Self {
        let expiration = session.expiration();
        Self {
            status_code: 1,
            message: String::from("User logged in successfully"),
            name: session.name,
            username: Some(session.username),
            token: session.tokens.access_token.token,
            refresh_token: Some(session.tokens.refresh_token),
            expiration: Some(expiration),
        }
    }
}
