use std::sync::Arc;
use std::time::Duration;

use actix_web::{web, HttpServer};
use anyhow::Context;
use log::{info, warn};

use ts_api::app::{create_app, AppState};
use ts_core::errors::{AuthError, DomainError};
use ts_core::repositories::{IdentityRepository, TokenRecordRepository};
use ts_core::{LifecycleConfig, NewUser, TokenLifecycleService, TokenSigner, TokenSignerConfig, UserRoles};
use ts_infra::{InMemoryIdentityRepository, InMemoryTokenRecordRepository};
use ts_shared::config::{AppConfig, BootstrapAdminConfig};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = ts_api::config::load()?;

    env_logger::init_from_env(env_logger::Env::new().default_filter_or(config.logging.level.as_str()));

    info!("Starting Turnstile API Server ({})", config.environment);
    if config.auth.jwt.is_using_default_secret() {
        warn!("Using the development signing secret; set JWT_SECRET before deploying");
    }

    let signer = Arc::new(TokenSigner::new(TokenSignerConfig::from(&config.auth.jwt))?);
    let lifecycle_config = LifecycleConfig::try_from(&config.auth)?;

    #[cfg(feature = "mysql")]
    {
        use ts_core::PasswordPolicy;
        use ts_infra::{DatabasePool, MySqlIdentityRepository, MySqlTokenRecordRepository, PasswordHasher};

        if let Some(database) = config.database.as_ref() {
            let pool = DatabasePool::connect(database).await?;
            pool.migrate().await?;
            info!("Using MySQL stores");

            let identity = Arc::new(MySqlIdentityRepository::new(
                pool.pool().clone(),
                PasswordHasher::default(),
                PasswordPolicy::default(),
            ));
            let tokens = Arc::new(MySqlTokenRecordRepository::new(pool.pool().clone()));
            let lifecycle = Arc::new(TokenLifecycleService::new(identity, tokens, signer, lifecycle_config));
            return serve(&config, lifecycle).await;
        }
    }

    if config.database.is_some() {
        warn!("database configured but MySQL support is not compiled in; using in-memory stores");
    } else {
        info!("Using in-memory stores");
    }
    let identity = Arc::new(InMemoryIdentityRepository::default());
    let tokens = Arc::new(InMemoryTokenRecordRepository::new());
    let lifecycle = Arc::new(TokenLifecycleService::new(identity, tokens, signer, lifecycle_config));
    serve(&config, lifecycle).await
}

/// Seeds the administrator account and runs the HTTP server until shutdown
async fn serve<U, T>(config: &AppConfig, lifecycle: Arc<TokenLifecycleService<U, T>>) -> anyhow::Result<()>
where
    U: IdentityRepository + 'static,
    T: TokenRecordRepository + 'static,
{
    if let Some(admin) = config.bootstrap_admin.as_ref() {
        bootstrap_admin(&lifecycle, admin).await?;
    }

    let app_state = web::Data::new(
        AppState::new(lifecycle).with_max_payload_size(config.server.max_payload_size),
    );

    let bind_address = config.server.bind_address();
    info!("Server will bind to: {}", bind_address);

    let mut server = HttpServer::new(move || create_app(app_state.clone()))
        .keep_alive(Duration::from_secs(config.server.keep_alive));
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("failed to bind {}", bind_address))?
        .run()
        .await?;
    Ok(())
}

/// Creates the configured administrator unless the username already exists
async fn bootstrap_admin<U, T>(
    lifecycle: &TokenLifecycleService<U, T>,
    admin: &BootstrapAdminConfig,
) -> anyhow::Result<()>
where
    U: IdentityRepository,
    T: TokenRecordRepository,
{
    let user = NewUser::new(admin.username.as_str(), admin.email.as_str(), None);
    match lifecycle
        .register_with_role(user, &admin.password, UserRoles::ADMIN)
        .await
    {
        Ok(_) => {
            info!("Administrator {} created", admin.username);
            Ok(())
        }
        Err(DomainError::Auth(AuthError::UsernameTaken)) => {
            info!("Administrator {} already exists", admin.username);
            Ok(())
        }
        Err(e) => Err(e).context("failed to create the bootstrap administrator"),
    }
}
