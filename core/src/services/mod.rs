//! Business services containing domain logic and use cases.

pub mod authorization;
pub mod lifecycle;
pub mod token;

// Re-export commonly used types
pub use authorization::authorize;
pub use lifecycle::{LifecycleConfig, TokenLifecycleService};
pub use token::{RefreshTokenGenerator, TokenSigner, TokenSignerConfig};
