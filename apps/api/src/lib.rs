//! HTTP API server for the MediRush order core.
//!
//! Provides REST endpoints for order creation, read-back and the status
//! transitions driven by the payment and delivery collaborators, with
//! structured logging (tracing) and permissive CORS for the storefront.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use routes::orders::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(routes::health::check))
        .route("/orders", post(routes::orders::create))
        .route("/orders/{id}", get(routes::orders::get))
        .route("/orders/{id}/pay", post(routes::orders::pay))
        .route("/orders/{id}/status", put(routes::orders::update_status))
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}
