//! MySQL connection pool

use std::time::Duration;

use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use tracing::{error, info};
use ts_shared::config::DatabaseConfig;

use crate::InfrastructureError;

/// Shared MySQL connection pool
#[derive(Clone)]
pub struct DatabasePool {
    pool: MySqlPool,
}

impl DatabasePool {
    /// Connects using the pool limits from `config`
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, InfrastructureError> {
        if config.url.is_empty() {
            return Err(InfrastructureError::Config("database.url must not be empty".to_string()));
        }

        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout))
            .idle_timeout(Duration::from_secs(config.idle_timeout))
            .connect(&config.url)
            .await
            .map_err(|e| {
                error!(error = %e, "failed to connect to database");
                e
            })?;

        info!(max_connections = config.max_connections, "database pool created");
        Ok(Self { pool })
    }

    /// Applies the bundled schema migrations
    pub async fn migrate(&self) -> Result<(), InfrastructureError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("database migrations applied");
        Ok(())
    }

    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}
