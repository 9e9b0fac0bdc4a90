//! CORS middleware configuration for cross-origin requests.

use actix_cors::Cors;

/// Creates the CORS middleware accepting any origin, method and header.
///
/// The request origin is echoed back rather than answered with a wildcard.
pub fn create_cors() -> Cors {
    Cors::permissive()
}
