use actix_web::HttpResponse;
use ts_shared::types::HealthResponse;

/// Handler for GET /health
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse::healthy("turnstile-api", env!("CARGO_PKG_VERSION")))
}
