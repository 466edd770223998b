//! Backend entry-point: loads settings, prepares storage and serves the REST API.

mod server;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use bloodmatch::inbound::http::health::HealthState;
use bloodmatch::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use server::{ServerConfig, ServerSettings, create_server};

/// Apply pending migrations then open the connection pool.
async fn prepare_database(config: PoolConfig) -> Result<DbPool> {
    let url = config.database_url().to_owned();
    let applied = tokio::task::spawn_blocking(move || run_pending_migrations(&url))
        .await
        .wrap_err("migration task panicked")?
        .wrap_err("failed to apply database migrations")?;
    info!(applied, "database migrations complete");
    DbPool::new(config)
        .await
        .wrap_err("failed to build database pool")
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load_from_iter(std::env::args_os())
        .wrap_err("failed to load server settings")?;

    let mut config = ServerConfig::new(settings.bind_addr());
    if let Some(pool_config) = settings.pool_config() {
        config = config.with_db_pool(prepare_database(pool_config).await?);
    }

    info!(bind_addr = %settings.bind_addr(), "starting server");
    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, config)?.await?;
    Ok(())
}
