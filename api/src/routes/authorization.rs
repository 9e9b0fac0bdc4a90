use actix_web::{web, HttpResponse};
use validator::Validate;

use ts_core::errors::{AuthError, DomainError};
use ts_core::repositories::{IdentityRepository, TokenRecordRepository};
use ts_core::NewUser;
use ts_shared::types::StatusResponse;

use crate::app::AppState;
use crate::dto::auth::{ChangePasswordRequest, LoginRequest, LoginResponse, RegistrationRequest};
use crate::handlers::error::{handle_domain_error, MISSING_FIELDS_MESSAGE};

/// Handler for POST /api/authorization/login
///
/// # Request Body
///
/// ```json
/// { "username": "alice", "password": "Secret1!" }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "statusCode": 1,
///     "message": "User logged in successfully",
///     "name": "Alice",
///     "username": "alice",
///     "token": "eyJhbGciOi...",
///     "refreshToken": "q2V0...",
///     "expiration": "2024-01-08T12:00:00Z"
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: Missing username or password
/// - 401 Unauthorized: Unknown user or wrong password
/// - 500 Internal Server Error: Store failure
pub async fn login<U, T>(
    state: web::Data<AppState<U, T>>,
    request: web::Json<LoginRequest>,
) -> HttpResponse
where
    U: IdentityRepository + 'static,
    T: TokenRecordRepository + 'static,
{
    if request.validate().is_err() {
        return HttpResponse::BadRequest().json(LoginResponse::failure(MISSING_FIELDS_MESSAGE));
    }

    match state.lifecycle.login(&request.username, &request.password).await {
        Ok(session) => HttpResponse::Ok().json(LoginResponse::from(session)),
        Err(DomainError::Auth(error @ AuthError::InvalidCredentials)) => {
            HttpResponse::Unauthorized().json(LoginResponse::failure(error.to_string()))
        }
        Err(error) => handle_domain_error(error),
    }
}

/// Handler for POST /api/authorization/registration
///
/// Creates the account with the default role. No tokens are issued.
///
/// ## Errors
/// - 400 Bad Request: Missing fields, username taken or password rejected by policy
pub async fn register<U, T>(
    state: web::Data<AppState<U, T>>,
    request: web::Json<RegistrationRequest>,
) -> HttpResponse
where
    U: IdentityRepository + 'static,
    T: TokenRecordRepository + 'static,
{
    if request.validate().is_err() {
        return HttpResponse::BadRequest().json(StatusResponse::failure(MISSING_FIELDS_MESSAGE));
    }

    let request = request.into_inner();
    let user = NewUser::new(request.username, request.email, Some(request.name));
    match state.lifecycle.register(user, &request.password).await {
        Ok(_) => HttpResponse::Ok().json(StatusResponse::success("User registered successfully!")),
        Err(error) => handle_domain_error(error),
    }
}

/// Handler for POST /api/authorization/changePassword
///
/// Issued tokens remain valid after the change.
///
/// ## Errors
/// - 400 Bad Request: Missing fields, mismatched confirmation, unknown user,
///   incorrect current password or new password rejected
pub async fn change_password<U, T>(
    state: web::Data<AppState<U, T>>,
    request: web::Json<ChangePasswordRequest>,
) -> HttpResponse
where
    U: IdentityRepository + 'static,
    T: TokenRecordRepository + 'static,
{
    if request.validate().is_err() {
        return HttpResponse::BadRequest().json(StatusResponse::failure(MISSING_FIELDS_MESSAGE));
    }

    match state
        .lifecycle
        .change_password(&request.user_name, &request.current_password, &request.new_password)
        .await
    {
        Ok(()) => HttpResponse::Ok().json(StatusResponse::success("Password was changed successfully!")),
        Err(error) => handle_domain_error(error),
    }
}
