//! HTTP server for the quiz platform leaderboard.
//!
//! # Routes
//! - `GET /health`
//! - `GET /leaderboard?top=N`: top entries, total users, caller's standing
//! - `GET /leaderboard/user/{user_id}/score`
//! - `GET /leaderboard/user/{user_id}/around?range_size=R`
//! - `POST /leaderboard/user/{user_id}/score` (own account only)
//! - `DELETE /leaderboard/user/{user_id}` (own account only)
//! - `DELETE /leaderboard/clear`

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    Router,
    routing::{delete, get},
};
use tokio::{net::TcpListener, signal};
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod bootstrap;
pub mod error;
pub mod logging;
pub mod routes;
pub mod state;

use routes::{
    around_handler, clear_handler, health_handler, leaderboard_handler, remove_user_handler,
    submit_score_handler, user_score_handler,
};
use state::AppState;

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/leaderboard", get(leaderboard_handler))
        .route("/leaderboard/clear", delete(clear_handler))
        .route(
            "/leaderboard/user/{user_id}",
            delete(remove_user_handler),
        )
        .route(
            "/leaderboard/user/{user_id}/score",
            get(user_score_handler).post(submit_score_handler),
        )
        .route("/leaderboard/user/{user_id}/around", get(around_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(state: Arc<AppState>) -> Result<()> {
    let address = state.config.server.bind.clone();
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    info!("Server running on {address}");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {e}");
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
}
