use actix_web::{web, HttpResponse};
use validator::Validate;

use ts_core::repositories::{IdentityRepository, TokenRecordRepository};
use ts_shared::types::StatusResponse;

use crate::app::AppState;
use crate::dto::token::{TokenRefreshRequest, TokenRefreshResponse};
use crate::handlers::error::{handle_domain_error, INVALID_CLIENT_REQUEST_MESSAGE};
use crate::middleware::auth::AuthContext;

/// Handler for POST /api/token/refresh
///
/// Exchanges an access token, expired or not, and the current refresh token
/// for a new pair. The presented refresh token stops working.
///
/// # Request Body
///
/// ```json
/// { "accessToken": "eyJhbGciOi...", "refreshToken": "q2V0..." }
/// ```
///
/// ## Errors
/// - 400 Bad Request: "Invalid client request" for every rejected pairing
/// - 500 Internal Server Error: Store failure
pub async fn refresh<U, T>(
    state: web::Data<AppState<U, T>>,
    request: web::Json<TokenRefreshRequest>,
) -> HttpResponse
where
    U: IdentityRepository + 'static,
    T: TokenRecordRepository + 'static,
{
    if request.validate().is_err() {
        return HttpResponse::BadRequest().json(StatusResponse::failure(INVALID_CLIENT_REQUEST_MESSAGE));
    }

    match state
        .lifecycle
        .refresh(&request.access_token, &request.refresh_token)
        .await
    {
        Ok(pair) => HttpResponse::Ok().json(TokenRefreshResponse::from(pair)),
        Err(error) => handle_domain_error(error),
    }
}

/// Handler for POST /api/token/revoke
///
/// Clears the caller's refresh token. Requires authentication via Bearer
/// token; the username comes from the verified token only.
///
/// ## Errors
/// - 400 Bad Request: The caller has no token record
/// - 401 Unauthorized: Missing or invalid access token
pub async fn revoke<U, T>(state: web::Data<AppState<U, T>>, auth: AuthContext) -> HttpResponse
where
    U: IdentityRepository + 'static,
    T: TokenRecordRepository + 'static,
{
    match state.lifecycle.revoke(auth.username()).await {
        Ok(()) => HttpResponse::Ok().json(true),
        Err(error) => handle_domain_error(error),
    }
}
