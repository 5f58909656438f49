// ScholarSynth - AI-assisted literature review service

pub mod config;
pub mod types;
pub mod models;
pub mod llm;
pub mod search;    // arXiv paper metadata
pub mod agents;
pub mod routes;
pub mod middleware;
pub mod settings;  // User settings and API key management
pub mod utils;

// Re-exports for convenience
pub use config::Config;
pub use models::AppState;
// Note: Import specific items from types module instead of glob to avoid name conflicts
// e.g., use scholarsynth::types::{ChatMessage, AppResult};

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}
