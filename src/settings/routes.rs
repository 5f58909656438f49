//! Settings API Routes
//!
//! Provides REST endpoints for managing user settings:
//! - GET /api/settings - Get current settings (API key masked)
//! - POST /api/settings - Update the stored API key and default model

use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use super::{SettingsStorage, UserSettings};

/// Create the settings router
pub fn router() -> Router {
    Router::new()
        .route("/api/settings", get(get_settings))
        .route("/api/settings", post(update_settings))
}

#[derive(Debug, Serialize)]
struct SettingsResponse {
    api_key_set: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    default_model: Option<String>,
}

impl From<&UserSettings> for SettingsResponse {
    fn from(settings: &UserSettings) -> Self {
        Self {
            api_key_set: settings
                .groq
                .api_key
                .as_deref()
                .map(|k| !k.trim().is_empty())
                .unwrap_or(false),
            default_model: settings.groq.default_model.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct UpdateSettingsRequest {
    /// New API key; an empty string clears the stored key
    groq_api_key: Option<String>,
    /// New default model; an empty string clears the override
    default_model: Option<String>,
}

/// GET /api/settings - Get current settings
async fn get_settings() -> impl IntoResponse {
    let storage = SettingsStorage::new();

    match storage.load().await {
        Ok(settings) => {
            (StatusCode::OK, Json(SettingsResponse::from(&settings))).into_response()
        }
        Err(e) => {
            error!("Failed to load settings: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "error": "Failed to load settings",
                    "details": e.to_string()
                })),
            )
                .into_response()
        }
    }
}

/// POST /api/settings - Update settings
async fn update_settings(Json(request): Json<UpdateSettingsRequest>) -> impl IntoResponse {
    let storage = SettingsStorage::new();

    // Load existing settings
    let mut settings = match storage.load().await {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to load settings: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "error": "Failed to load existing settings",
                    "details": e.to_string()
                })),
            )
                .into_response();
        }
    };

    // Apply updates
    if let Some(key) = request.groq_api_key {
        if key.is_empty() {
            settings.groq.api_key = None;
        } else {
            settings.groq.api_key = Some(key);
        }
    }
    if let Some(model) = request.default_model {
        if model.is_empty() {
            settings.groq.default_model = None;
        } else {
            settings.groq.default_model = Some(model);
        }
    }

    match storage.save(&settings).await {
        Ok(()) => {
            info!("Settings updated");
            (StatusCode::OK, Json(SettingsResponse::from(&settings))).into_response()
        }
        Err(e) => {
            error!("Failed to save settings: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "error": "Failed to save settings",
                    "details": e.to_string()
                })),
            )
                .into_response()
        }
    }
}
