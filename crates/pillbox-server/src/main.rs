mod config;
mod serve;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use pillbox_api::auth::AppStateInner;
use pillbox_db::{Database, DocumentStore};

use crate::config::Config;
use crate::serve::serve_until;

/// Per-request budget, covering body read and response write.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    let config = Config::parse();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "pillbox=debug,pillbox_api=debug,pillbox_db=info,tower_http=debug".into()
            }),
        )
        .init();

    if config.uses_placeholder_secret() {
        warn!("PILLBOX_SESSION_SECRET is unset or a placeholder; session cookies are forgeable by anyone who knows it");
    }

    // Init database
    let store: Arc<dyn DocumentStore> = Arc::new(Database::open(&config.db_path)?);
    let state = AppStateInner::new(store.clone(), config.session_secret.clone());

    let app = pillbox_api::router(state)
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(config.listen).await?;
    info!("Pillbox server listening on {}", config.listen);

    serve_until(
        listener,
        app,
        shutdown_signal(),
        config.graceful_timeout(),
        store,
    )
    .await
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
                }
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                ctrl_c.await.ok();
                info!("Received Ctrl+C, shutting down...");
            }
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
