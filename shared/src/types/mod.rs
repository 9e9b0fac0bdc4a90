//! Type definitions shared by the HTTP gateway and its clients
//!
//! - `response` - Status, error and health response bodies

pub mod response;

pub use response::{ErrorResponse, HealthResponse, StatusResponse};
