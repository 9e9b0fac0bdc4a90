//! Shared setup for the HTTP integration tests
#![allow(dead_code)]

use std::sync::Arc;

use actix_web::{http::header, test::TestRequest, web};
use serde_json::json;

use ts_api::app::AppState;
use ts_core::{
    LifecycleConfig, NewUser, PasswordPolicy, TokenLifecycleService, TokenSigner, TokenSignerConfig,
};
use ts_infra::{InMemoryIdentityRepository, InMemoryTokenRecordRepository, PasswordHasher};

pub const SECRET: &str = "integration-test-secret-0123456789";
pub const ISSUER: &str = "turnstile-test";
pub const AUDIENCE: &str = "turnstile-test-clients";
pub const PASSWORD: &str = "Secret1!";

pub type TestLifecycle = TokenLifecycleService<InMemoryIdentityRepository, InMemoryTokenRecordRepository>;
pub type TestState = AppState<InMemoryIdentityRepository, InMemoryTokenRecordRepository>;

pub fn signer_with_secret(secret: &str) -> Arc<TokenSigner> {
    Arc::new(TokenSigner::new(TokenSignerConfig::new(secret, ISSUER, AUDIENCE)).unwrap())
}

/// App state over fresh in-memory stores with a cheap bcrypt cost
pub fn test_state() -> web::Data<TestState> {
    let identity = Arc::new(InMemoryIdentityRepository::new(
        PasswordHasher::with_cost(4),
        PasswordPolicy::default(),
    ));
    let tokens = Arc::new(InMemoryTokenRecordRepository::new());
    let lifecycle = TokenLifecycleService::new(
        identity,
        tokens,
        signer_with_secret(SECRET),
        LifecycleConfig::default(),
    );
    web::Data::new(AppState::new(Arc::new(lifecycle)))
}

/// Registers `username` with `role` directly through the service
pub async fn seed_user(state: &web::Data<TestState>, username: &str, role: &str) {
    state
        .lifecycle
        .register_with_role(
            NewUser::new(username, format!("{}@example.com", username), Some(username.to_uppercase())),
            PASSWORD,
            role,
        )
        .await
        .unwrap();
}

pub fn login_request(username: &str, password: &str) -> TestRequest {
    TestRequest::post()
        .uri("/api/authorization/login")
        .set_json(json!({ "username": username, "password": password }))
}

pub fn refresh_request(access_token: &str, refresh_token: &str) -> TestRequest {
    TestRequest::post()
        .uri("/api/token/refresh")
        .set_json(json!({ "accessToken": access_token, "refreshToken": refresh_token }))
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}
