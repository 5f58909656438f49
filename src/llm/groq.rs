// Groq adapter implementation
// Speaks the OpenAI-compatible chat completions contract.
// API reference: https://console.groq.com/docs/api-reference#chat

use crate::config::LLMConfig;
use crate::settings::SettingsStorage;
use crate::types::{AppError, AppResult, ChatMessage, ChatRole, MessageInput};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

const GROQ_API_BASE: &str = "https://api.groq.com/openai/v1";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(90);

/// Per-call knobs for a chat completion.
#[derive(Debug, Clone)]
pub struct ChatOptions {
    pub temperature: f32,
    pub max_tokens: Option<u32>,
}

impl Default for ChatOptions {
    fn default() -> Self {
        Self {
            temperature: 0.2,
            max_tokens: None,
        }
    }
}

/// Client for the Groq chat completions endpoint.
///
/// Holds no conversation state; every `create` call is a single independent
/// request/response round trip. Retry policy, if any, belongs to the caller.
#[derive(Debug)]
pub struct GroqClient {
    client: Client,
    api_key: String,
    model: String,
    api_base: String,
}

// Request types for the Groq API. `ChatMessage` already serializes to the
// wire shape ({role, content} with lowercase roles).
#[derive(Serialize)]
struct GroqChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
}

// Response types for the Groq API
#[derive(Deserialize)]
struct GroqChatResponse {
    choices: Vec<GroqChoice>,
    #[serde(default)]
    usage: Option<GroqUsage>,
}

#[derive(Deserialize)]
struct GroqChoice {
    message: GroqResponseMessage,
}

#[derive(Deserialize)]
struct GroqResponseMessage {
    content: String,
}

#[derive(Deserialize)]
struct GroqUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[derive(Deserialize)]
struct GroqErrorResponse {
    error: GroqError,
}

#[derive(Deserialize)]
struct GroqError {
    message: String,
}

/// Resolve the API credential from the ordered source list: explicit
/// configuration value, then the process environment, then the settings
/// store. Resolution happens once per construction and writes nothing back
/// to the environment.
pub async fn resolve_api_key(explicit: Option<&str>, store: &SettingsStorage) -> Option<String> {
    if let Some(key) = explicit {
        let key = key.trim();
        if !key.is_empty() {
            return Some(key.to_string());
        }
    }

    if let Ok(key) = std::env::var("GROQ_API_KEY") {
        let key = key.trim();
        if !key.is_empty() {
            return Some(key.to_string());
        }
    }

    match store.get_api_key().await {
        Ok(Some(key)) if !key.trim().is_empty() => Some(key.trim().to_string()),
        _ => None,
    }
}

impl GroqClient {
    /// Create a client against the production endpoint. Fails fast with a
    /// configuration error when the credential is empty.
    pub fn new(model: &str, api_key: &str) -> AppResult<Self> {
        Self::with_api_base(model, api_key, GROQ_API_BASE)
    }

    /// Create a client against an explicit endpoint (tests point this at a
    /// local mock server).
    pub fn with_api_base(model: &str, api_key: &str, api_base: &str) -> AppResult<Self> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(AppError::Config(
                "GROQ_API_KEY is required. Set it in the environment or save it on the settings page.".to_string(),
            ));
        }

        if !api_key.starts_with("gsk_") {
            warn!("API key does not have the expected 'gsk_' prefix");
        }
        if !models::is_supported(model) {
            warn!(model, "model is not in the supported table; the remote service is the final arbiter");
        }

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AppError::Transport(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            model: model.to_string(),
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    /// Build a client with the credential resolved through the source chain
    /// and the model taken from the request override, the settings store, or
    /// the configured default, in that order.
    pub async fn from_sources(
        config: &LLMConfig,
        store: &SettingsStorage,
        model_override: Option<&str>,
    ) -> AppResult<Self> {
        let explicit = if config.groq_api_key.trim().is_empty() {
            None
        } else {
            Some(config.groq_api_key.as_str())
        };

        let api_key = resolve_api_key(explicit, store).await.ok_or_else(|| {
            AppError::Config(
                "GROQ_API_KEY is not available. Set it as an environment variable or save it on the settings page.".to_string(),
            )
        })?;

        let stored_model = store.default_model().await;
        let model = model_override
            .map(str::to_string)
            .or(stored_model)
            .unwrap_or_else(|| config.default_model.clone());

        match &config.api_base {
            Some(base) => Self::with_api_base(&model, &api_key, base),
            None => Self::new(&model, &api_key),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Convert heterogeneous message-like inputs into the uniform
    /// role/content list. Never fails and never returns an empty list: an
    /// empty input slice degrades to a single user message carrying the JSON
    /// string form of the whole input.
    pub fn normalize(inputs: &[MessageInput]) -> Vec<ChatMessage> {
        let mut formatted = Vec::with_capacity(inputs.len());

        for input in inputs {
            match input {
                MessageInput::Text(s) => formatted.push(ChatMessage::user(s.clone())),
                MessageInput::Pair { role, content } => {
                    let role = role.unwrap_or(ChatRole::User);
                    formatted.push(ChatMessage::new(role, value_to_text(content)));
                }
                MessageInput::Other(value) => {
                    formatted.push(ChatMessage::user(value_to_text(value)));
                }
            }
        }

        if formatted.is_empty() {
            let whole = serde_json::to_string(inputs).unwrap_or_default();
            formatted.push(ChatMessage::user(whole));
        }

        formatted
    }

    /// Issue exactly one chat completion request and return the model's
    /// reply text. No internal retry; timeout expiry surfaces as a
    /// transport error.
    pub async fn create(
        &self,
        messages: &[MessageInput],
        options: &ChatOptions,
    ) -> AppResult<String> {
        let url = format!("{}/chat/completions", self.api_base);

        let request = GroqChatRequest {
            model: self.model.clone(),
            messages: Self::normalize(messages),
            temperature: options.temperature,
            max_tokens: options.max_tokens,
            stream: false,
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Transport(format!("Groq request failed: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(self.map_error(status, &error_text));
        }

        let parsed: GroqChatResponse = response
            .json()
            .await
            .map_err(|e| AppError::Transport(format!("failed to parse Groq response: {}", e)))?;

        if let Some(usage) = &parsed.usage {
            info!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                total_tokens = usage.total_tokens,
                "chat completion succeeded"
            );
        }

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Transport("Groq returned no choices".to_string()))?;

        Ok(choice.message.content)
    }

    fn map_error(&self, status: reqwest::StatusCode, body: &str) -> AppError {
        let detail = serde_json::from_str::<GroqErrorResponse>(body)
            .map(|e| e.error.message)
            .unwrap_or_else(|_| body.to_string());
        let body_lower = body.to_lowercase();

        match status.as_u16() {
            401 => AppError::Auth("Invalid API key. Please check your GROQ_API_KEY.".to_string()),
            429 => AppError::RateLimited(
                "Rate limit exceeded. Please wait and try again.".to_string(),
            ),
            400 if body_lower.contains("decommissioned") => AppError::ModelUnavailable(format!(
                "Model '{}' is no longer supported: {}",
                self.model, detail
            )),
            400 if body_lower.contains("rate limit") => AppError::RateLimited(detail),
            _ => AppError::Transport(format!("Groq API error ({}): {}", status, detail)),
        }
    }
}

fn value_to_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Supported Groq model ids. The table is advisory; unknown ids are sent
/// through with a warning and the remote service decides.
pub mod models {
    /// (model id, context window, production or preview)
    pub const SUPPORTED: &[(&str, &str, &str)] = &[
        ("llama-3.3-70b-versatile", "128K", "production"),
        ("llama-3.1-8b-instant", "128K", "production"),
        ("llama3-70b-8192", "8K", "production"),
        ("llama3-8b-8192", "8K", "production"),
        ("gemma2-9b-it", "8K", "production"),
        ("meta-llama/llama-4-maverick-17b-128e-instruct", "128K", "preview"),
        ("meta-llama/llama-4-scout-17b-16e-instruct", "128K", "preview"),
    ];

    /// Best balance of capability and cost.
    pub const DEFAULT: &str = "llama-3.3-70b-versatile";
    /// Fastest responses.
    pub const FAST: &str = "llama-3.1-8b-instant";
    /// Better at code-heavy material.
    pub const CODING: &str = "meta-llama/llama-4-maverick-17b-128e-instruct";

    pub fn is_supported(model: &str) -> bool {
        SUPPORTED.iter().any(|(id, _, _)| *id == model)
    }

    /// Recommended model id by use case. Unknown use cases get the default.
    pub fn recommended(use_case: &str) -> &'static str {
        match use_case {
            "fast" => FAST,
            "coding" => CODING,
            "general" | "research" => DEFAULT,
            _ => DEFAULT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_plain_strings() {
        let inputs: Vec<MessageInput> = vec!["first".into(), "second".into()];
        let messages = GroqClient::normalize(&inputs);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], ChatMessage::user("first"));
        assert_eq!(messages[1], ChatMessage::user("second"));
    }

    #[test]
    fn normalize_pair_defaults_role_to_user() {
        let inputs = vec![MessageInput::Pair {
            role: None,
            content: serde_json::json!("hello"),
        }];
        let messages = GroqClient::normalize(&inputs);
        assert_eq!(messages, vec![ChatMessage::user("hello")]);
    }

    #[test]
    fn normalize_serializes_structured_content() {
        let inputs = vec![MessageInput::Pair {
            role: Some(ChatRole::System),
            content: serde_json::json!({"instruction": "be brief", "limit": 3}),
        }];
        let messages = GroqClient::normalize(&inputs);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, ChatRole::System);
        let parsed: serde_json::Value = serde_json::from_str(&messages[0].content).unwrap();
        assert_eq!(parsed["limit"], 3);
    }

    #[test]
    fn normalize_unrecognized_value_becomes_user_text() {
        let inputs = vec![MessageInput::Other(serde_json::json!(["a", 1, null]))];
        let messages = GroqClient::normalize(&inputs);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, ChatRole::User);
        assert!(messages[0].content.contains("\"a\""));
    }

    #[test]
    fn normalize_empty_input_yields_nonempty_list() {
        let messages = GroqClient::normalize(&[]);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, ChatRole::User);
        assert!(!messages[0].content.is_empty());
    }

    #[test]
    fn constructor_rejects_empty_credential() {
        let err = GroqClient::new(models::DEFAULT, "  ").unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn unknown_model_is_accepted() {
        // Unknown ids warn but construct; the remote service decides.
        assert!(GroqClient::new("not-a-real-model", "gsk_test").is_ok());
    }

    #[test]
    fn recommended_model_table() {
        assert_eq!(models::recommended("general"), "llama-3.3-70b-versatile");
        assert_eq!(models::recommended("fast"), "llama-3.1-8b-instant");
        assert_eq!(models::recommended("research"), "llama-3.3-70b-versatile");
        assert_eq!(
            models::recommended("coding"),
            "meta-llama/llama-4-maverick-17b-128e-instruct"
        );
        assert_eq!(models::recommended("unknown"), models::DEFAULT);
        assert!(models::is_supported(models::DEFAULT));
        assert!(!models::is_supported("not-a-real-model"));
    }

    #[tokio::test]
    async fn create_returns_reply_text_on_success() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer gsk_test")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"choices":[{"message":{"role":"assistant","content":"A fine review."}}],
                    "usage":{"prompt_tokens":10,"completion_tokens":5,"total_tokens":15}}"#,
            )
            .create_async()
            .await;

        let client = GroqClient::with_api_base(models::DEFAULT, "gsk_test", &server.url()).unwrap();
        let inputs: Vec<MessageInput> = vec!["write a review".into()];
        let reply = client.create(&inputs, &ChatOptions::default()).await.unwrap();
        assert_eq!(reply, "A fine review.");
    }

    #[tokio::test]
    async fn create_maps_401_to_auth_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/chat/completions")
            .with_status(401)
            .with_body(r#"{"error":{"message":"Invalid API Key"}}"#)
            .create_async()
            .await;

        let client = GroqClient::with_api_base(models::DEFAULT, "gsk_test", &server.url()).unwrap();
        let inputs: Vec<MessageInput> = vec!["hi".into()];
        let err = client.create(&inputs, &ChatOptions::default()).await.unwrap_err();
        assert!(matches!(err, AppError::Auth(_)));
    }

    #[tokio::test]
    async fn create_maps_429_to_rate_limited() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/chat/completions")
            .with_status(429)
            .with_body(r#"{"error":{"message":"Rate limit reached"}}"#)
            .create_async()
            .await;

        let client = GroqClient::with_api_base(models::DEFAULT, "gsk_test", &server.url()).unwrap();
        let inputs: Vec<MessageInput> = vec!["hi".into()];
        let err = client.create(&inputs, &ChatOptions::default()).await.unwrap_err();
        assert!(matches!(err, AppError::RateLimited(_)));
    }

    #[tokio::test]
    async fn create_maps_decommissioned_model_to_model_unavailable() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/chat/completions")
            .with_status(400)
            .with_body(
                r#"{"error":{"message":"The model `llama3-8b-8192` has been decommissioned"}}"#,
            )
            .create_async()
            .await;

        let client =
            GroqClient::with_api_base("llama3-8b-8192", "gsk_test", &server.url()).unwrap();
        let inputs: Vec<MessageInput> = vec!["hi".into()];
        let err = client.create(&inputs, &ChatOptions::default()).await.unwrap_err();
        assert!(matches!(err, AppError::ModelUnavailable(_)));
    }

    #[tokio::test]
    async fn create_maps_rate_limit_shaped_400_to_rate_limited() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/chat/completions")
            .with_status(400)
            .with_body(r#"{"error":{"message":"Rate limit exceeded for this organization"}}"#)
            .create_async()
            .await;

        let client = GroqClient::with_api_base(models::DEFAULT, "gsk_test", &server.url()).unwrap();
        let inputs: Vec<MessageInput> = vec!["hi".into()];
        let err = client.create(&inputs, &ChatOptions::default()).await.unwrap_err();
        assert!(matches!(err, AppError::RateLimited(_)));
    }

    #[tokio::test]
    async fn create_maps_other_failures_to_transport() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/chat/completions")
            .with_status(503)
            .with_body("upstream unavailable")
            .create_async()
            .await;

        let client = GroqClient::with_api_base(models::DEFAULT, "gsk_test", &server.url()).unwrap();
        let inputs: Vec<MessageInput> = vec!["hi".into()];
        let err = client.create(&inputs, &ChatOptions::default()).await.unwrap_err();
        assert!(matches!(err, AppError::Transport(_)));
    }
}
