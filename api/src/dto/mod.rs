//! Request and response bodies

pub mod auth;
pub mod token;

pub use auth::{ChangePasswordRequest, LoginRequest, LoginResponse, RegistrationRequest};
pub use token::{TokenRefreshRequest, TokenRefreshResponse};
pub use ts_shared::types::{ErrorResponse, HealthResponse, StatusResponse};
