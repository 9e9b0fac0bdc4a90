//! Domain entities representing core business objects.

pub mod token;
pub mod user;

// Re-export commonly used types
pub use token::{
    AccessClaims, AccessToken, ClaimSet, TokenPair, TokenRecord,
    CLAIM_ROLE, CLAIM_SUBJECT, CLAIM_TOKEN_ID, REFRESH_TOKEN_EXPIRY_DAYS,
};
pub use user::{NewUser, User, UserRoles};
