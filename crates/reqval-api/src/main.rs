//! # reqval-demo: Binary Entry Point
//!
//! Serves the demo product catalog. Configuration comes from the
//! environment (and an optional `.env` file): `HOSTNAME`, `PORT`
//! (default 5000), `REQVAL_BODY_LIMIT`.

use anyhow::Context;
use reqval_api::{AppConfig, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env().context("reading configuration")?;
    let (hostname, port) = (config.hostname.clone(), config.port);

    let app = reqval_api::app(AppState::with_config(config)).map_err(|e| {
        tracing::error!("route configuration failed: {e}");
        e
    })?;

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!("Listening at http://{hostname}:{port}");

    axum::serve(listener, app).await?;
    Ok(())
}
