//! Main entry point for the Barista backend.
//!
//! This file loads configuration, initializes logging, builds the trusted key
//! source and the token verifier, and serves the drink API with Axum.
//! It orchestrates the application's startup and defines its overall structure.

use std::sync::Arc;

use anyhow::Context;
use barista_backend::auth::TokenVerifier;
use barista_backend::config::{AppConfig, Args};
use barista_backend::services::key_refresher::KeyRefresher;
use barista_backend::{app, AppState};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "barista_backend=info,barista_adapters=info,tower_http=info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_target(true)
        .init();

    let args = Args::parse();
    let config = AppConfig::load(&args).context("loading configuration")?;

    let keys = config
        .auth
        .key_source()
        .await
        .context("building trusted key source")?;
    info!(
        source = %keys.kind(),
        algorithm = ?keys.algorithm(),
        audience = %config.auth.audience,
        "authorization guard configured"
    );

    let verifier = Arc::new(TokenVerifier::new(
        keys.clone(),
        &config.auth.audience,
        config.auth.issuer.as_deref(),
    ));

    if let Some(refresher) = KeyRefresher::new(keys, config.auth.refresh_interval_secs) {
        refresher.start();
    }

    let router = app(AppState::new(verifier), &config.server);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!("listening on {}", addr);

    axum::serve(listener, router).await?;
    Ok(())
}
