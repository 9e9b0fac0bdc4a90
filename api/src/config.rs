//! Startup configuration loading
//!
//! Sources, later ones overriding earlier ones:
//! 1. built-in defaults for the detected environment
//! 2. `config/default.*` and `config/{environment}.*`, both optional
//! 3. `APP__`-prefixed environment variables, e.g. `APP__AUTH__JWT__SECRET`
//! 4. the flat variables `JWT_SECRET`, `JWT_ISSUER`, `JWT_AUDIENCE`,
//!    `SERVER_HOST`, `SERVER_PORT` and `DATABASE_URL`
//!
//! A `.env` file is read first if present.

use anyhow::{anyhow, Context};
use config::{Config, File};
use std::env;

use ts_shared::config::{AppConfig, DatabaseConfig, Environment, LoggingConfig};

/// Load and validate the application configuration
pub fn load() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env();
    let defaults = AppConfig {
        environment,
        logging: LoggingConfig::for_environment(environment),
        ..AppConfig::default()
    };

    let settings = Config::builder()
        .add_source(Config::try_from(&defaults).context("failed to serialize default configuration")?)
        .add_source(File::with_name("config/default").required(false))
        .add_source(File::with_name(environment.config_file()).required(false))
        .add_source(
            config::Environment::with_prefix("APP")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .context("failed to read configuration sources")?;

    let mut app_config: AppConfig = settings
        .try_deserialize()
        .context("invalid configuration")?;

    apply_legacy_overrides(&mut app_config, |key| env::var(key).ok())?;
    app_config.validate().map_err(|reason| anyhow!(reason))?;

    Ok(app_config)
}

/// Applies the flat, unprefixed variables on top of the layered configuration
fn apply_legacy_overrides<F>(config: &mut AppConfig, lookup: F) -> anyhow::Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(secret) = lookup("JWT_SECRET") {
        config.auth.jwt.secret = secret;
    }
    if let Some(issuer) = lookup("JWT_ISSUER") {
        config.auth.jwt.issuer = issuer;
    }
    if let Some(audience) = lookup("JWT_AUDIENCE") {
        config.auth.jwt.audience = audience;
    }
    if let Some(host) = lookup("SERVER_HOST") {
        config.server.host = host;
    }
    if let Some(port) = lookup("SERVER_PORT") {
        config.server.port = port
            .parse()
            .with_context(|| format!("SERVER_PORT must be a valid port number, got {:?}", port))?;
    }
    if let Some(url) = lookup("DATABASE_URL") {
        match config.database.as_mut() {
            Some(database) => database.url = url,
            None => config.database = Some(DatabaseConfig::new(url)),
        }
    }
    Ok(())
}
