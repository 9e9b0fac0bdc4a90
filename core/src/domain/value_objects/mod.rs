//! Value objects representing immutable domain concepts.

pub mod login_session;
pub mod password_policy;

// Re-export commonly used types
pub use login_session::LoginSession;
pub use password_policy::PasswordPolicy;
