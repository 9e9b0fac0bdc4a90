//! Identity store: users, password hashes and roles

mod hasher;
mod memory;


pub use hasher::PasswordHasher;
pub use memory::InMemoryIdentityRepository;

/// Key used for case-insensitive username lookups
pub fn normalize_username(username: &str) -> String {
    username.trim().to_uppercase()
}
