//! Router setup and server startup.
//!
//! Configures the axum Router with CORS, tracing, compression, and a body
//! limit. CORS is fully open (any origin, method, and header): the service
//! is an unauthenticated backend for browser frontends on arbitrary hosts.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use concord_core::error::ConcordError;

use crate::handlers;
use crate::state::AppState;

/// Create the axum Router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/analyze", post(handlers::analyze))
        .route("/health", get(handlers::health))
        .layer(DefaultBodyLimit::max(1024 * 1024)) // 1MB request bodies
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Bind the listener and serve requests until the process exits.
///
/// Binds 0.0.0.0 so browser frontends on other hosts can reach the service.
/// Construction of `state` (corpus, embedder, index) must already have
/// completed; nothing is lazily initialized per request.
pub async fn start_server(port: u16, state: AppState) -> Result<(), ConcordError> {
    let addr = format!("0.0.0.0:{}", port);
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ConcordError::Api(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!(addr = %addr, "API server listening");

    axum::serve(listener, router)
        .await
        .map_err(|e| ConcordError::Api(format!("Server error: {}", e)))?;

    Ok(())
}
