//! Repository interfaces for the two external stores.
//!
//! - `token` - One refresh token record per username, with conditional writes
//! - `identity` - Users, passwords and role membership

pub mod identity;
pub mod token;

pub use identity::IdentityRepository;
pub use token::{TokenRecordRepository, WriteCondition};

#[cfg(test)]
pub use identity::MockIdentityRepository;
#[cfg(test)]
pub use token::MockTokenRecordRepository;
