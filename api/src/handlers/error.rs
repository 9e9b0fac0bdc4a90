//! Conversion of domain errors into HTTP responses

use actix_web::{error::JsonPayloadError, http::StatusCode, HttpRequest, HttpResponse};
use ts_core::errors::{AuthError, DomainError};
use ts_shared::types::StatusResponse;

/// Body message for malformed or incomplete request bodies
pub const MISSING_FIELDS_MESSAGE: &str = "Please pass in all required fields.";

/// Body message for store and internal failures; details stay in the log
pub const INTERNAL_ERROR_MESSAGE: &str = "An internal error occurred";

/// Message for every rejected refresh pairing or invalid token
pub const INVALID_CLIENT_REQUEST_MESSAGE: &str = "Invalid client request";

/// Status line for an account error
fn auth_status(error: &AuthError) -> StatusCode {
    match error {
        AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        AuthError::InsufficientPermissions => StatusCode::FORBIDDEN,
        _ => StatusCode::BAD_REQUEST,
    }
}

/// Handle domain errors and convert them to appropriate HTTP responses
pub fn handle_domain_error(error: DomainError) -> HttpResponse {
    match error {
        DomainError::Auth(auth_error) => {
            log::debug!("request rejected: {}", auth_error);
            HttpResponse::build(auth_status(&auth_error))
                .json(StatusResponse::failure(auth_error.to_string()))
        }
        DomainError::Token(token_error) => {
            log::debug!("token rejected: {}", token_error);
            HttpResponse::BadRequest().json(StatusResponse::failure(INVALID_CLIENT_REQUEST_MESSAGE))
        }
        DomainError::ValidationErr(_) => {
            HttpResponse::BadRequest().json(StatusResponse::failure(MISSING_FIELDS_MESSAGE))
        }
        DomainError::NotFound { resource } => {
            HttpResponse::NotFound().json(StatusResponse::failure(format!("{} not found", resource)))
        }
        error @ (DomainError::Storage { .. } | DomainError::Configuration { .. }) => {
            log::error!("Domain Error: {:?}", error);
            HttpResponse::InternalServerError().json(StatusResponse::failure(INTERNAL_ERROR_MESSAGE))
        }
    }
}

/// Rejects unreadable JSON bodies with the uniform missing-fields response
pub fn json_error_handler(error: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    log::debug!("rejected request body: {}", error);
    let response = HttpResponse::BadRequest().json(StatusResponse::failure(MISSING_FIELDS_MESSAGE));
    actix_web::error::InternalError::from_response(error, response).into()
}
