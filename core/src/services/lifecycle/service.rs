//! Main token lifecycle service implementation

use std::future::Future;
use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};

use crate::domain::entities::token::{ClaimSet, TokenPair, TokenRecord};
use crate::domain::entities::user::{NewUser, User};
use crate::domain::value_objects::LoginSession;
use crate::errors::{AuthError, DomainError, DomainResult, ValidationError};
use crate::repositories::{IdentityRepository, TokenRecordRepository, WriteCondition};
use crate::services::token::{RefreshTokenGenerator, TokenSigner};

use super::config::LifecycleConfig;

/// Issues, rotates and revokes credentials for one session per user
///
/// Holds no per-user state; everything lives in the two stores. Every store
/// call is attempted once, bounded by `LifecycleConfig::store_timeout`.
pub struct TokenLifecycleService<U, T>
where
    U: IdentityRepository,
    T: TokenRecordRepository,
{
    /// Users, passwords and roles
    identity: Arc<U>,
    /// Refresh token records
    tokens: Arc<T>,
    signer: Arc<TokenSigner>,
    generator: RefreshTokenGenerator,
    config: LifecycleConfig,
}

impl<U, T> TokenLifecycleService<U, T>
where
    U: IdentityRepository,
    T: TokenRecordRepository,
{
    /// Create a new token lifecycle service
    ///
    /// # Arguments
    ///
    /// * `identity` - Identity store
    /// * `tokens` - Token record store
    /// * `signer` - Access token signer
    /// * `config` - Lifetimes, store deadline and default role
    pub fn new(identity: Arc<U>, tokens: Arc<T>, signer: Arc<TokenSigner>, config: LifecycleConfig) -> Self {
        Self {
            identity,
            tokens,
            signer,
            generator: RefreshTokenGenerator::new(),
            config,
        }
    }

    /// Shared signer, also used to verify bearer tokens
    pub fn signer(&self) -> &Arc<TokenSigner> {
        &self.signer
    }

    pub fn config(&self) -> &LifecycleConfig {
        &self.config
    }

    /// Authenticate with username and password and start a session
    ///
    /// Replaces any refresh token previously issued to the user.
    ///
    /// # Returns
    ///
    /// * `Ok(LoginSession)` - Access token, refresh token and expiry
    /// * `Err(AuthError::InvalidCredentials)` - Unknown user or wrong password
    /// * `Err(DomainError::Storage)` - A store failed or timed out
    pub async fn login(&self, username: &str, password: &str) -> DomainResult<LoginSession> {
        let user = match self.within_deadline("find user", self.identity.find_by_username(username)).await? {
            Some(user) => user,
            None => {
                let checked = self
                    .within_deadline("check password", self.identity.check_password_without_user(password))
                    .await;
                if let Err(e) = checked {
                    warn!(username, error = %e, "password check for unknown user failed");
                }
                warn!(username, "login rejected");
                return Err(AuthError::InvalidCredentials.into());
            }
        };

        if !self.within_deadline("check password", self.identity.check_password(&user, password)).await? {
            warn!(username, "login rejected");
            return Err(AuthError::InvalidCredentials.into());
        }

        let roles = self.within_deadline("load roles", self.identity.roles_for(&user)).await?;
        let claims = ClaimSet::new(user.username.as_str(), roles);
        let access_token = self.signer.issue_access_token(&claims, self.config.access_token_ttl)?;
        let refresh_token = self.generator.generate()?;

        let expiry = Utc::now()
            .checked_add_signed(self.config.refresh_token_ttl)
            .ok_or_else(|| DomainError::Configuration {
                message: "refresh token lifetime out of range".to_string(),
            })?;
        let record = TokenRecord::new(user.username.as_str(), refresh_token.as_str(), expiry);
        if !self.within_deadline("store token record", self.tokens.upsert(&record, WriteCondition::Unconditional)).await? {
            error!(username, "unconditional token record write was refused");
            return Err(DomainError::storage("token record write refused"));
        }

        info!(username, "user logged in");
        Ok(LoginSession::new(
            user.username,
            user.name,
            TokenPair {
                access_token,
                refresh_token,
            },
        ))
    }

    /// Exchange a (possibly expired) access token and the current refresh token
    /// for a new pair
    ///
    /// The access token only needs a valid signature. The refresh token must
    /// equal the stored one and the stored expiry must lie in the future. The
    /// stored refresh token is replaced only if it still holds the presented
    /// value, so of two concurrent refreshes with the same pair one fails.
    ///
    /// # Returns
    ///
    /// * `Ok(TokenPair)` - Rotated pair; the stored expiry is unchanged
    /// * `Err(DomainError::Token)` - Access token signature, algorithm or structure is invalid
    /// * `Err(AuthError::InvalidClientRequest)` - No record, mismatch, expiry or lost race
    /// * `Err(DomainError::Storage)` - A store failed or timed out
    pub async fn refresh(&self, access_token: &str, refresh_token: &str) -> DomainResult<TokenPair> {
        let claims = self.signer.validate_for_refresh(access_token).map_err(|e| {
            warn!(error = %e, "refresh rejected: access token invalid");
            e
        })?;
        let username = claims.username();

        let record = self
            .within_deadline("find token record", self.tokens.find_by_username(username))
            .await?;
        let record = match record {
            Some(record) if record.accepts(refresh_token, Utc::now()) => record,
            _ => {
                warn!(username, "refresh rejected: refresh token not accepted");
                return Err(AuthError::InvalidClientRequest.into());
            }
        };

        let access_token = self
            .signer
            .issue_access_token(&claims.with_fresh_token_id(), self.config.access_token_ttl)?;
        let new_refresh_token = self.generator.generate()?;

        let condition = WriteCondition::RefreshTokenEquals(refresh_token.to_string());
        let rotated = record.rotated(new_refresh_token.as_str());
        if !self.within_deadline("rotate token record", self.tokens.upsert(&rotated, condition)).await? {
            warn!(username, "refresh rejected: concurrent rotation");
            return Err(AuthError::InvalidClientRequest.into());
        }

        info!(username, "refresh token rotated");
        Ok(TokenPair {
            access_token,
            refresh_token: new_refresh_token,
        })
    }

    /// Clear the stored refresh token of `username`
    ///
    /// `username` must come from the caller's verified access token. Only the
    /// refresh token read here is cleared; one written meanwhile by a login or
    /// rotation is left in place.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Refresh token cleared; outstanding access tokens stay valid until expiry
    /// * `Err(AuthError::UserNotFound)` - The user has no token record
    pub async fn revoke(&self, username: &str) -> DomainResult<()> {
        let record = self
            .within_deadline("find token record", self.tokens.find_by_username(username))
            .await?
            .ok_or_else(|| {
                warn!(username, "revoke rejected: no token record");
                DomainError::from(AuthError::UserNotFound)
            })?;

        let Some(current) = record.refresh_token.clone().filter(|token| !token.is_empty()) else {
            info!(username, "refresh token already revoked");
            return Ok(());
        };

        let condition = WriteCondition::RefreshTokenEquals(current);
        if !self.within_deadline("revoke token record", self.tokens.upsert(&record.revoked(), condition)).await? {
            info!(username, "revoke skipped: refresh token replaced since read");
            return Ok(());
        }

        info!(username, "refresh token revoked");
        Ok(())
    }

    /// Change a user's password after verifying the current one
    ///
    /// Outstanding access and refresh tokens are left untouched.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Password changed
    /// * `Err(AuthError::UnknownUser)` - No such user
    /// * `Err(AuthError::IncorrectPassword)` - `current_password` does not match
    /// * `Err(AuthError::PasswordChangeFailed)` - The identity store refused the new password
    pub async fn change_password(
        &self,
        username: &str,
        current_password: &str,
        new_password: &str,
    ) -> DomainResult<()> {
        let user = self
            .within_deadline("find user", self.identity.find_by_username(username))
            .await?
            .ok_or_else(|| AuthError::UnknownUser {
                username: username.to_string(),
            })?;

        if !self.within_deadline("check password", self.identity.check_password(&user, current_password)).await? {
            warn!(username, "password change rejected: incorrect password");
            return Err(AuthError::IncorrectPassword.into());
        }

        let changed = self
            .within_deadline(
                "change password",
                self.identity.change_password(&user, current_password, new_password),
            )
            .await;
        match changed {
            Ok(()) => {
                info!(username, "password changed");
                Ok(())
            }
            Err(e @ DomainError::Storage { .. }) => Err(e),
            Err(DomainError::Auth(AuthError::IncorrectPassword)) => Err(AuthError::IncorrectPassword.into()),
            Err(e) => {
                warn!(username, error = %e, "password change refused by identity store");
                Err(AuthError::PasswordChangeFailed.into())
            }
        }
    }

    /// Register a user with the default role
    ///
    /// Issues no tokens; the user logs in separately.
    pub async fn register(&self, user: NewUser, password: &str) -> DomainResult<User> {
        let role = self.config.default_role.clone();
        self.register_with_role(user, password, &role).await
    }

    /// Register a user and add them to `role`, creating the role if needed
    ///
    /// # Returns
    ///
    /// * `Ok(User)` - The created user
    /// * `Err(AuthError::UsernameTaken)` - A user with that name exists
    /// * `Err(AuthError::RegistrationFailed)` - The identity store refused the user
    pub async fn register_with_role(&self, user: NewUser, password: &str, role: &str) -> DomainResult<User> {
        let username = user.username.clone();
        if self
            .within_deadline("find user", self.identity.find_by_username(&username))
            .await?
            .is_some()
        {
            warn!(username = %username, "registration rejected: username taken");
            return Err(AuthError::UsernameTaken.into());
        }

        let created = match self.within_deadline("create user", self.identity.create(user, password)).await {
            Ok(created) => created,
            Err(e @ DomainError::Storage { .. }) => return Err(e),
            Err(DomainError::ValidationErr(ValidationError::DuplicateValue { .. })) => {
                return Err(AuthError::UsernameTaken.into());
            }
            Err(e) => {
                warn!(username = %username, error = %e, "registration refused by identity store");
                return Err(AuthError::RegistrationFailed.into());
            }
        };

        if !self.within_deadline("find role", self.identity.role_exists(role)).await? {
            self.within_deadline("create role", self.identity.create_role(role)).await?;
        }
        self.within_deadline("assign role", self.identity.add_to_role(&created, role))
            .await?;

        info!(username = %username, role, "user registered");
        Ok(created)
    }

    /// Runs one store call under the configured deadline
    async fn within_deadline<F, R>(&self, operation: &'static str, call: F) -> DomainResult<R>
    where
        F: Future<Output = DomainResult<R>>,
    {
        match tokio::time::timeout(self.config.store_timeout, call).await {
            Ok(Err(e @ DomainError::Storage { .. })) => {
                error!(operation, error = %e, "store call failed");
                Err(e)
            }
            Ok(result) => result,
            Err(_) => {
                error!(operation, timeout = ?self.config.store_timeout, "store call timed out");
                Err(DomainError::storage(format!("{operation} timed out")))
            }
        }
    }
}
