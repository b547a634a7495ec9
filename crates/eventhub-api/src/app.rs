//! Application builder: wires router, middleware and state into an Axum app
//! and runs it.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::middleware as axum_middleware;
use tokio::sync::watch;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use eventhub_auth::RevocationSweeper;
use eventhub_cache::{RedisClient, RedisRevocationStore};
use eventhub_core::config::{AppConfig, RevocationBackend, StoreBackend};
use eventhub_core::error::AppError;
use eventhub_database::{DatabasePool, Stores, migration};

use crate::middleware::cors::build_cors_layer;
use crate::middleware::logging::request_logging;
use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config.server.cors);

    build_router(state)
        .layer(axum_middleware::from_fn(request_logging))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Open the stores selected by `config.store`.
///
/// With the PostgreSQL backend, pending migrations are applied first.
pub async fn build_stores(config: &AppConfig) -> Result<Stores, AppError> {
    let stores = match config.store.backend {
        StoreBackend::Postgres => {
            let db = DatabasePool::connect(&config.database).await?;
            migration::run_migrations(db.pool()).await?;
            Stores::postgres(db.into_pool())
        }
        StoreBackend::Memory => {
            warn!("Using in-memory stores; data is lost on restart");
            Stores::memory()
        }
    };

    match config.store.revocation_backend {
        RevocationBackend::Database => Ok(stores),
        RevocationBackend::Redis => {
            let client = RedisClient::connect(&config.store.redis).await?;
            Ok(stores.with_revocations(Arc::new(RedisRevocationStore::new(client))))
        }
    }
}

/// Runs the EventHub server until Ctrl+C or SIGTERM.
pub async fn run_server(config: AppConfig) -> Result<(), AppError> {
    info!("Starting EventHub server...");

    let stores = build_stores(&config).await?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sweeper = RevocationSweeper::from_config(&config.auth, Arc::clone(&stores.revocations))
        .spawn(shutdown_rx);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let app = build_app(AppState::new(config, stores)?);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    info!(%addr, "EventHub server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = shutdown_tx.send(true);
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    if tokio::time::timeout(grace, sweeper).await.is_err() {
        warn!("Revocation sweeper did not stop within the grace period");
    }

    info!("EventHub server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
