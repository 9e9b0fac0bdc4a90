//! Application state and factory
//!
//! This module holds the state shared by all workers and provides the
//! factory for creating the Actix-web application.

use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpResponse};

use ts_core::repositories::{IdentityRepository, TokenRecordRepository};
use ts_core::services::TokenLifecycleService;
use ts_core::UserRoles;
use ts_shared::types::ErrorResponse;

use crate::handlers::json_error_handler;
use crate::middleware::{auth::JwtAuth, cors::create_cors};
use crate::routes::{authorization, health, protected, token};

/// Default upper bound for JSON request bodies (16 KiB)
const DEFAULT_MAX_PAYLOAD_SIZE: usize = 16 * 1024;

/// Application state shared across all handlers
pub struct AppState<U, T>
where
    U: IdentityRepository,
    T: TokenRecordRepository,
{
    pub lifecycle: Arc<TokenLifecycleService<U, T>>,
    /// Maximum accepted JSON body size in bytes
    pub max_payload_size: usize,
}

impl<U, T> AppState<U, T>
where
    U: IdentityRepository,
    T: TokenRecordRepository,
{
    pub fn new(lifecycle: Arc<TokenLifecycleService<U, T>>) -> Self {
        Self {
            lifecycle,
            max_payload_size: DEFAULT_MAX_PAYLOAD_SIZE,
        }
    }

    pub fn with_max_payload_size(mut self, bytes: usize) -> Self {
        self.max_payload_size = bytes;
        self
    }
}

/// Create and configure the application with all dependencies
pub fn create_app<U, T>(
    app_state: web::Data<AppState<U, T>>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    U: IdentityRepository + 'static,
    T: TokenRecordRepository + 'static,
{
    let signer = Arc::clone(app_state.lifecycle.signer());
    let json_config = web::JsonConfig::default()
        .limit(app_state.max_payload_size)
        .error_handler(json_error_handler);

    App::new()
        .app_data(app_state)
        .app_data(json_config)
        .wrap(Logger::default())
        .wrap(create_cors())
        .route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/api")
                .service(
                    web::scope("/authorization")
                        .route("/login", web::post().to(authorization::login::<U, T>))
                        .route("/registration", web::post().to(authorization::register::<U, T>))
                        .route(
                            "/changePassword",
                            web::post().to(authorization::change_password::<U, T>),
                        ),
                )
                .service(
                    web::scope("/token")
                        .route("/refresh", web::post().to(token::refresh::<U, T>))
                        .route(
                            "/revoke",
                            web::post()
                                .to(token::revoke::<U, T>)
                                .wrap(JwtAuth::new(Arc::clone(&signer))),
                        ),
                )
                .route(
                    "/protected/getdata",
                    web::get()
                        .to(protected::protected_data)
                        .wrap(JwtAuth::new(Arc::clone(&signer))),
                )
                .route(
                    "/admin/getdata",
                    web::get()
                        .to(protected::admin_data)
                        .wrap(JwtAuth::new(signer).require_role(UserRoles::ADMIN)),
                ),
        )
        .default_service(web::route().to(not_found))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        "not_found",
        "The requested resource was not found",
    ))
}
