//! HTTP edge server for edgechat.
//!
//! Exposes:
//!
//! - `POST /api/chat/completions`: plugin commands stream scan progress,
//!   everything else is budgeted and relayed to the model backend
//! - `GET /api/health`
//!
//! The router is built by [`build_router`] and served by [`serve`] until
//! the cancellation token fires.

pub mod error;
pub mod handlers;
pub mod state;

use axum::Router;
use edgechat_types::config::ServerConfig;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

pub use error::{Result, ServerError};
pub use state::AppState;

/// Build the API router with all routes.
///
/// An empty `cors_origins` allows any origin.
pub fn build_router(state: AppState, cors_origins: &[String]) -> Router {
    let cors = if cors_origins.is_empty() {
        CorsLayer::permissive()
    } else {
        let origins: Vec<_> = cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    Router::new()
        .nest("/api", handlers::api_routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `config.bind` and serve until `cancel` fires.
pub async fn serve(state: AppState, config: &ServerConfig, cancel: CancellationToken) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .map_err(|source| ServerError::Bind {
            addr: config.bind.clone(),
            source,
        })?;
    info!(addr = %listener.local_addr()?, "edge server listening");

    let app = build_router(state, &config.cors_origins);
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await?;

    info!("edge server stopped");
    Ok(())
}
