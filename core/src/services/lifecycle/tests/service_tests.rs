//! Unit tests for TokenLifecycleService

use std::sync::Arc;

use chrono::{Duration, Utc};
use tokio::sync::RwLock;

use super::mocks::{
    service, service_with_config, signer, StaleReadTokenRecordRepository, StalledTokenRecordRepository,
};
use crate::domain::entities::token::TokenRecord;
use crate::domain::entities::user::{NewUser, UserRoles};
use crate::errors::{AuthError, DomainError, TokenError};
use crate::repositories::{MockIdentityRepository, MockTokenRecordRepository};
use crate::services::lifecycle::{LifecycleConfig, TokenLifecycleService};

const PASSWORD: &str = "Passw0rd!";

async fn alice() -> (MockIdentityRepository, MockTokenRecordRepository) {
    let identity = MockIdentityRepository::new();
    identity.seed("alice", PASSWORD, &[UserRoles::USER]).await;
    (identity, MockTokenRecordRepository::new())
}

fn auth_error<T: std::fmt::Debug>(result: Result<T, DomainError>) -> AuthError {
    match result {
        Err(DomainError::Auth(e)) => e,
        other => panic!("expected auth error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_login_issues_token_for_user() {
    let (identity, tokens) = alice().await;
    let service = service(identity, tokens.clone());

    let session = service.login("alice", PASSWORD).await.unwrap();

    let claims = service.signer().validate_full(session.access_token()).unwrap();
    assert_eq!(claims.username(), "alice");
    assert_eq!(claims.roles(), &["User".to_string()]);
    assert_eq!(session.username, "alice");
    assert!(session.expiration() > Utc::now() + Duration::days(6));

    let record = tokens.get("alice").await.unwrap();
    assert_eq!(record.refresh_token.as_deref(), Some(session.refresh_token()));
    let lifetime = record.refresh_token_expiry - Utc::now();
    assert!(lifetime > Duration::days(6) && lifetime <= Duration::days(7));
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let (identity, tokens) = alice().await;
    let service = service(identity, tokens.clone());

    let unknown = auth_error(service.login("mallory", PASSWORD).await);
    let wrong = auth_error(service.login("alice", "nope").await);

    assert_eq!(unknown, AuthError::InvalidCredentials);
    assert_eq!(unknown, wrong);
    assert!(tokens.get("alice").await.is_none());
}

#[tokio::test]
async fn test_unknown_username_still_checks_a_password() {
    let (identity, tokens) = alice().await;
    let service = service(identity.clone(), tokens);

    let _ = service.login("mallory", PASSWORD).await;
    assert_eq!(identity.unknown_user_checks(), 1);

    let _ = service.login("alice", "nope").await;
    assert!(service.login("alice", PASSWORD).await.is_ok());
    assert_eq!(identity.unknown_user_checks(), 1);
}

#[tokio::test]
async fn test_login_with_unrepresentable_refresh_lifetime_fails_cleanly() {
    let (identity, tokens) = alice().await;
    let config = LifecycleConfig {
        refresh_token_ttl: Duration::days(365 * 1_000_000),
        ..LifecycleConfig::default()
    };
    let service = service_with_config(identity, tokens.clone(), config);

    let result = service.login("alice", PASSWORD).await;

    assert!(matches!(result, Err(DomainError::Configuration { .. })));
    assert!(tokens.get("alice").await.is_none());
}

#[tokio::test]
async fn test_login_replaces_previous_session() {
    let (identity, tokens) = alice().await;
    let service = service(identity, tokens);

    let first = service.login("alice", PASSWORD).await.unwrap();
    let second = service.login("alice", PASSWORD).await.unwrap();

    assert_ne!(first.refresh_token(), second.refresh_token());
    let result = service.refresh(first.access_token(), first.refresh_token()).await;
    assert_eq!(auth_error(result), AuthError::InvalidClientRequest);
}

#[tokio::test]
async fn test_register_login_refresh_replay_scenario() {
    let identity = MockIdentityRepository::new();
    let service = service(identity.clone(), MockTokenRecordRepository::new());

    service
        .register(NewUser::new("alice", "alice@example.com", Some("Alice".to_string())), PASSWORD)
        .await
        .unwrap();
    let session = service.login("alice", PASSWORD).await.unwrap();
    assert_eq!(session.name.as_deref(), Some("Alice"));

    let rotated = service
        .refresh(session.access_token(), session.refresh_token())
        .await
        .unwrap();
    assert_ne!(rotated.refresh_token, session.refresh_token());

    let replay = service.refresh(session.access_token(), session.refresh_token()).await;
    assert_eq!(auth_error(replay), AuthError::InvalidClientRequest);

    let next = service
        .refresh(&rotated.access_token.token, &rotated.refresh_token)
        .await
        .unwrap();
    assert_ne!(next.refresh_token, rotated.refresh_token);
}

#[tokio::test]
async fn test_refresh_keeps_claims_and_stored_expiry() {
    let (identity, tokens) = alice().await;
    let service = service(identity, tokens.clone());

    let session = service.login("alice", PASSWORD).await.unwrap();
    let expiry = tokens.get("alice").await.unwrap().refresh_token_expiry;

    let rotated = service
        .refresh(session.access_token(), session.refresh_token())
        .await
        .unwrap();

    let before = service.signer().validate_full(session.access_token()).unwrap();
    let after = service.signer().validate_full(&rotated.access_token.token).unwrap();
    assert_eq!(after.username(), before.username());
    assert_eq!(after.roles(), before.roles());
    assert_ne!(after.token_id(), before.token_id());

    let record = tokens.get("alice").await.unwrap();
    assert_eq!(record.refresh_token_expiry, expiry);
    assert_eq!(record.refresh_token.as_deref(), Some(rotated.refresh_token.as_str()));
}

#[tokio::test]
async fn test_refresh_accepts_expired_access_token() {
    let (identity, tokens) = alice().await;
    let config = LifecycleConfig {
        access_token_ttl: Duration::minutes(-5),
        ..Default::default()
    };
    let service = service_with_config(identity, tokens, config);

    let session = service.login("alice", PASSWORD).await.unwrap();
    assert!(service.signer().validate_full(session.access_token()).is_err());

    assert!(service
        .refresh(session.access_token(), session.refresh_token())
        .await
        .is_ok());
}

#[tokio::test]
async fn test_refresh_fails_once_record_expired() {
    let (identity, tokens) = alice().await;
    let service = service(identity, tokens.clone());

    let session = service.login("alice", PASSWORD).await.unwrap();
    tokens
        .insert(TokenRecord::new("alice", session.refresh_token(), Utc::now() - Duration::seconds(1)))
        .await;

    let result = service.refresh(session.access_token(), session.refresh_token()).await;
    assert_eq!(auth_error(result), AuthError::InvalidClientRequest);
}

#[tokio::test]
async fn test_refresh_rejects_forged_access_token() {
    let (identity, tokens) = alice().await;
    let service = service(identity, tokens);
    let session = service.login("alice", PASSWORD).await.unwrap();

    let mut forged = session.access_token().to_string();
    forged.push('x');
    let result = service.refresh(&forged, session.refresh_token()).await;
    assert!(result.unwrap_err().is_invalid_token());

    let result = service.refresh("garbage", session.refresh_token()).await;
    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::InvalidTokenFormat))
    ));
}

#[tokio::test]
async fn test_refresh_without_record_or_with_wrong_token() {
    let (identity, tokens) = alice().await;
    let service = service(identity, tokens);

    let claims = crate::domain::entities::token::ClaimSet::new("alice", ["User"]);
    let token = service.signer().issue_access_token(&claims, Duration::minutes(5)).unwrap();
    let result = service.refresh(&token.token, "anything").await;
    assert_eq!(auth_error(result), AuthError::InvalidClientRequest);

    let session = service.login("alice", PASSWORD).await.unwrap();
    for presented in ["", "not-the-token"] {
        let result = service.refresh(session.access_token(), presented).await;
        assert_eq!(auth_error(result), AuthError::InvalidClientRequest);
    }
}

#[tokio::test]
async fn test_refresh_losing_compare_and_swap_fails() {
    let (identity, tokens) = alice().await;
    let winner = service(identity.clone(), tokens.clone());
    let session = winner.login("alice", PASSWORD).await.unwrap();
    let snapshot = tokens.get("alice").await;

    winner
        .refresh(session.access_token(), session.refresh_token())
        .await
        .unwrap();
    let stored = tokens.get("alice").await;

    let stale = StaleReadTokenRecordRepository {
        live: tokens.clone(),
        snapshot: RwLock::new(snapshot),
    };
    let loser = TokenLifecycleService::new(Arc::new(identity), Arc::new(stale), signer(), LifecycleConfig::default());
    let result = loser.refresh(session.access_token(), session.refresh_token()).await;

    assert_eq!(auth_error(result), AuthError::InvalidClientRequest);
    assert_eq!(tokens.get("alice").await, stored);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_refreshes_with_same_pair_rotate_once() {
    let (identity, tokens) = alice().await;
    let service = Arc::new(service(identity, tokens.clone()));
    let session = service.login("alice", PASSWORD).await.unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let service = Arc::clone(&service);
            let access = session.access_token().to_string();
            let refresh = session.refresh_token().to_string();
            tokio::spawn(async move { service.refresh(&access, &refresh).await })
        })
        .collect();

    let mut winners = Vec::new();
    for handle in handles {
        match handle.await.unwrap() {
            Ok(pair) => winners.push(pair),
            Err(e) => assert!(matches!(e, DomainError::Auth(AuthError::InvalidClientRequest))),
        }
    }

    assert_eq!(winners.len(), 1);
    let record = tokens.get("alice").await.unwrap();
    assert_eq!(record.refresh_token.as_deref(), Some(winners[0].refresh_token.as_str()));
}

#[tokio::test]
async fn test_revoke_clears_refresh_token() {
    let (identity, tokens) = alice().await;
    let service = service(identity, tokens.clone());
    let session = service.login("alice", PASSWORD).await.unwrap();
    let expiry = tokens.get("alice").await.unwrap().refresh_token_expiry;

    service.revoke("alice").await.unwrap();

    let record = tokens.get("alice").await.unwrap();
    assert!(record.is_revoked());
    assert_eq!(record.refresh_token_expiry, expiry);

    let result = service.refresh(session.access_token(), session.refresh_token()).await;
    assert_eq!(auth_error(result), AuthError::InvalidClientRequest);

    assert!(service.login("alice", PASSWORD).await.is_ok());
}

#[tokio::test]
async fn test_revoke_keeps_session_started_after_its_read() {
    let (identity, tokens) = alice().await;
    let service = service(identity.clone(), tokens.clone());
    service.login("alice", PASSWORD).await.unwrap();
    let snapshot = tokens.get("alice").await;

    let newer = service.login("alice", PASSWORD).await.unwrap();

    let stale = StaleReadTokenRecordRepository {
        live: tokens.clone(),
        snapshot: RwLock::new(snapshot),
    };
    let revoker = TokenLifecycleService::new(Arc::new(identity), Arc::new(stale), signer(), LifecycleConfig::default());
    revoker.revoke("alice").await.unwrap();

    let record = tokens.get("alice").await.unwrap();
    assert_eq!(record.refresh_token.as_deref(), Some(newer.refresh_token()));
    assert!(service.refresh(newer.access_token(), newer.refresh_token()).await.is_ok());
}

#[tokio::test]
async fn test_revoke_twice_is_harmless() {
    let (identity, tokens) = alice().await;
    let service = service(identity, tokens.clone());
    service.login("alice", PASSWORD).await.unwrap();

    service.revoke("alice").await.unwrap();
    service.revoke("alice").await.unwrap();

    assert!(tokens.get("alice").await.unwrap().is_revoked());
}

#[tokio::test]
async fn test_revoke_without_record() {
    let (identity, tokens) = alice().await;
    let service = service(identity, tokens);
    assert_eq!(auth_error(service.revoke("alice").await), AuthError::UserNotFound);
}

#[tokio::test]
async fn test_change_password_outcomes() {
    let (identity, tokens) = alice().await;
    let service = service(identity.clone(), tokens);

    let unknown = auth_error(service.change_password("bob", PASSWORD, "N3wPassw0rd!").await);
    assert_eq!(unknown.to_string(), "User with the username \"bob\" does not exist.");

    let wrong = auth_error(service.change_password("alice", "nope", "N3wPassw0rd!").await);
    assert_eq!(wrong, AuthError::IncorrectPassword);

    let weak = auth_error(service.change_password("alice", PASSWORD, "weak").await);
    assert_eq!(weak, AuthError::PasswordChangeFailed);

    service
        .change_password("alice", PASSWORD, "N3wPassw0rd!")
        .await
        .unwrap();
    assert_eq!(identity.password_of("alice").await.as_deref(), Some("N3wPassw0rd!"));
    assert!(service.login("alice", "N3wPassw0rd!").await.is_ok());
}

#[tokio::test]
async fn test_change_password_keeps_existing_session() {
    let (identity, tokens) = alice().await;
    let service = service(identity, tokens);
    let session = service.login("alice", PASSWORD).await.unwrap();

    service
        .change_password("alice", PASSWORD, "N3wPassw0rd!")
        .await
        .unwrap();

    assert!(service.signer().validate_full(session.access_token()).is_ok());
    assert!(service
        .refresh(session.access_token(), session.refresh_token())
        .await
        .is_ok());
}

#[tokio::test]
async fn test_register_creates_default_role() {
    let identity = MockIdentityRepository::new();
    let service = service(identity.clone(), MockTokenRecordRepository::new());

    let user = service
        .register(NewUser::new("bob", "bob@example.com", None), PASSWORD)
        .await
        .unwrap();

    assert!(identity.known_roles().await.contains(UserRoles::USER));
    let session = service.login("bob", PASSWORD).await.unwrap();
    let claims = service.signer().validate_full(session.access_token()).unwrap();
    assert!(claims.has_role(UserRoles::USER));
    assert_eq!(user.username, "bob");
}

#[tokio::test]
async fn test_register_with_role_grants_admin() {
    let identity = MockIdentityRepository::new();
    let service = service(identity, MockTokenRecordRepository::new());

    service
        .register_with_role(NewUser::new("root", "root@example.com", None), PASSWORD, UserRoles::ADMIN)
        .await
        .unwrap();
    let session = service.login("root", PASSWORD).await.unwrap();
    let claims = service.signer().validate_full(session.access_token()).unwrap();
    assert!(claims.has_role(UserRoles::ADMIN));
    assert!(!claims.has_role(UserRoles::USER));
}

#[tokio::test]
async fn test_register_failures() {
    let (identity, tokens) = alice().await;
    let service = service(identity, tokens);

    let taken = service
        .register(NewUser::new("alice", "other@example.com", None), PASSWORD)
        .await;
    assert_eq!(auth_error(taken), AuthError::UsernameTaken);

    let weak = service
        .register(NewUser::new("carol", "carol@example.com", None), "weak")
        .await;
    assert_eq!(auth_error(weak), AuthError::RegistrationFailed);
}

#[tokio::test]
async fn test_store_failures_surface_as_storage_errors() {
    let (identity, tokens) = alice().await;
    let service = service(identity.clone(), tokens.clone());
    let session = service.login("alice", PASSWORD).await.unwrap();

    tokens.set_failing(true);
    let result = service.refresh(session.access_token(), session.refresh_token()).await;
    assert!(matches!(result, Err(DomainError::Storage { .. })));
    assert!(matches!(service.revoke("alice").await, Err(DomainError::Storage { .. })));
    assert!(matches!(
        service.login("alice", PASSWORD).await,
        Err(DomainError::Storage { .. })
    ));

    tokens.set_failing(false);
    identity.set_failing(true);
    assert!(matches!(
        service.login("alice", PASSWORD).await,
        Err(DomainError::Storage { .. })
    ));
    assert!(matches!(
        service.change_password("alice", PASSWORD, "N3wPassw0rd!").await,
        Err(DomainError::Storage { .. })
    ));
}

#[tokio::test(start_paused = true)]
async fn test_stalled_store_times_out() {
    let (identity, _) = alice().await;
    let config = LifecycleConfig {
        store_timeout: std::time::Duration::from_millis(50),
        ..Default::default()
    };
    let service = TokenLifecycleService::new(
        Arc::new(identity),
        Arc::new(StalledTokenRecordRepository),
        signer(),
        config,
    );

    let result = service.login("alice", PASSWORD).await;
    match result {
        Err(DomainError::Storage { message }) => assert!(message.contains("timed out")),
        other => panic!("expected storage timeout, got {other:?}"),
    }
}
