//! # agro-api — Binary Entry Point
//!
//! Reads configuration from the environment, connects to Postgres when
//! `DATABASE_URL` is set, and serves the registry API.

use agro_api::config::{AppConfig, LogFormat};
use agro_api::state::AppState;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
    tracing::info!(?config, "configuration loaded");

    let db_pool = agro_api::db::init_pool(config.database_url.as_deref())
        .await
        .map_err(|e| {
            tracing::error!("Database initialization failed: {e}");
            e
        })?;

    let port = config.port;
    let app = agro_api::app(AppState::with_config(config, db_pool));

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Registry API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
