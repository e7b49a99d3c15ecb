//! API Routes
//!
//! Configures the Axum router with all diagnostics endpoints.

use axum::{
    routing::{delete, get},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clear_all_handler, clear_segment_handler, dump_handler, health_handler, segment_handler,
    stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /stats` - Stats for every segment
/// - `GET /segments/:id` - Stats for one segment
/// - `GET /dump` - Entry metadata for every segment
/// - `DELETE /cache/:id` - Clear one segment
/// - `DELETE /cache` - Clear every segment
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/stats", get(stats_handler))
        .route("/segments/:id", get(segment_handler))
        .route("/dump", get(dump_handler))
        .route("/cache", delete(clear_all_handler))
        .route("/cache/:id", delete(clear_segment_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
