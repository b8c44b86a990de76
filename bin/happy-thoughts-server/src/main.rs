//! happy-thoughts-server – entry point.
//!
//! Startup order:
//! 1. Parse configuration from environment variables.
//! 2. Initialise structured tracing (JSON or human-readable).
//! 3. Open the thought store selected by the database URL.
//! 4. Build the Axum router and start the HTTP server with graceful shutdown.

mod config;
mod db;
mod entities;
mod error;
mod middleware;
mod routes;
mod schemas;
mod state;

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::Config;
use crate::db::Store;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Configuration ───────────────────────────────────────────────────────
    let cfg = Config::from_env();

    // ── 2. Tracing ─────────────────────────────────────────────────────────────
    // RUST_LOG wins; otherwise THOUGHTS_LOG, warning loudly if it is not a
    // valid filter expression.
    let env_filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
        Ok(f) => f,
        Err(_) => match cfg.log_level.parse::<tracing_subscriber::EnvFilter>() {
            Ok(f) => f,
            Err(e) => {
                eprintln!(
                    "WARN: THOUGHTS_LOG='{}' is not a valid tracing filter ({}); \
                     falling back to 'info'",
                    cfg.log_level, e
                );
                tracing_subscriber::EnvFilter::new("info")
            }
        },
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_thread_ids(true);

    if cfg.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    info!(version = env!("CARGO_PKG_VERSION"), "happy-thoughts-server starting");

    // ── 3. Store ───────────────────────────────────────────────────────────────
    let store = Store::connect(&cfg.database_url).await?;
    info!(backend = store.backend(), "store ready");

    // ── 4. HTTP server with graceful shutdown ──────────────────────────────────
    let listener = tokio::net::TcpListener::bind(cfg.bind_address()).await?;
    info!("Server running on http://{}", listener.local_addr()?);

    let state = Arc::new(AppState::new(cfg, store));
    let app = routes::build(state);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("happy-thoughts-server stopped");
    Ok(())
}

/// Returns a future that resolves when SIGINT (Ctrl-C) or SIGTERM is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to install CTRL+C signal handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => warn!(error = %e, "failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    info!("shutdown signal received; starting graceful shutdown");
}
