//! API Routes
//!
//! This module organizes all HTTP endpoints for the application:
//! - `/api/review` - Run the literature-review pipeline
//! - `/api/review/export` - Download the assembled review
//! - `/api/health` - Health checks
//! - `/api/settings` - API credential and model management
//! - `/` - The browser form

pub mod health;
pub mod review;
pub mod ui;

use axum::Router;
use crate::middleware::apply_cors;
use crate::models::AppState;
use crate::settings;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    let cors_origins = state.config.server.cors_allowed_origins.clone();

    // API routes (with state)
    let api_router = Router::new()
        .merge(review::router(state))
        .merge(health::router())
        .merge(settings::router()); // Settings API (no state needed)

    let router = Router::new()
        .merge(api_router)
        .merge(ui::router())
        .layer(TraceLayer::new_for_http());

    apply_cors(router, &cors_origins)
}
