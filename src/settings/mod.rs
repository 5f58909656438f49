//! Settings Module
//!
//! Secure storage and retrieval of user settings: the browser-saved API
//! credential and an optional default-model override. The API key is
//! encrypted at rest using AES-256-GCM.
//!
//! This store is the last link in the credential chain — an explicit config
//! value and the process environment are consulted first.

pub mod routes;
pub mod storage;

pub use routes::router;
pub use storage::SettingsStorage;

use serde::{Deserialize, Serialize};

/// API key configuration for the chat provider
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProviderConfig {
    /// The API key (encrypted at rest, decrypted when loaded)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Default model for this provider
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_model: Option<String>,
}

/// User settings structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserSettings {
    /// Groq configuration
    #[serde(default)]
    pub groq: ProviderConfig,
}
