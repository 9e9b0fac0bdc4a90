//! # Turnstile Core
//!
//! Credential issuance and session renewal: domain entities, the token
//! signer and refresh token generator, the token lifecycle service, the
//! repository interfaces it depends on, and the error taxonomy.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::entities::{
    AccessClaims, AccessToken, ClaimSet, NewUser, TokenPair, TokenRecord, User, UserRoles,
};
pub use domain::value_objects::{LoginSession, PasswordPolicy};
pub use errors::{AuthError, DomainError, DomainResult, TokenError, ValidationError};
pub use repositories::{IdentityRepository, TokenRecordRepository, WriteCondition};
pub use services::{
    authorize, LifecycleConfig, RefreshTokenGenerator, TokenLifecycleService, TokenSigner,
    TokenSignerConfig,
};
