use actix_web::HttpResponse;

use crate::middleware::auth::AuthContext;

/// Handler for GET /api/protected/getdata
///
/// Any caller with a valid access token.
pub async fn protected_data(auth: AuthContext) -> HttpResponse {
    log::debug!("protected data requested by {}", auth.username());
    HttpResponse::Ok().body("Data from protected controller")
}

/// Handler for GET /api/admin/getdata
///
/// Only reachable with the `Admin` role; the middleware answers 403 otherwise.
pub async fn admin_data(auth: AuthContext) -> HttpResponse {
    log::debug!("admin data requested by {}", auth.username());
    HttpResponse::Ok().body("Data from admin controller")
}
