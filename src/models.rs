use crate::config::Config;
use crate::settings::SettingsStorage;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub settings: Arc<SettingsStorage>,
}

/// Source labels attached to review chunks.
pub mod sources {
    /// The paper-fetch stage
    pub const RESEARCHER: &str = "researcher";
    /// The review-writing stage (AI or deterministic)
    pub const SUMMARIZER: &str = "summarizer";
    /// Infrastructure messages (configuration problems)
    pub const SYSTEM: &str = "system";
}

/// One labeled chunk of orchestrator output. Every terminal path of the
/// review pipeline emits exactly one of these.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ReviewChunk {
    /// Markdown (or plain text) content
    pub content: String,
    /// Which stage produced it: "researcher", "summarizer", or "system"
    pub source: String,
}

impl ReviewChunk {
    pub fn new(source: &str, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            source: source.to_string(),
        }
    }
}

#[derive(Debug, serde::Deserialize)]
pub struct ReviewRequest {
    pub topic: String,
    /// Optional model id override for this request
    pub model: Option<String>,
    /// Optional fetch cap override
    pub max_results: Option<usize>,
}

#[derive(Debug, serde::Serialize)]
pub struct ReviewResponse {
    pub review_id: uuid::Uuid,
    pub topic: String,
    pub chunks: Vec<ReviewChunk>,
    pub response_time_ms: u64,
}

#[derive(Debug, serde::Deserialize)]
pub struct ExportRequest {
    pub content: String,
    pub format: ExportFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Markdown,
    Text,
}

#[derive(Debug, serde::Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}
