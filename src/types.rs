// Type definitions and enums

use serde::{Deserialize, Serialize};

/// Role of a chat message. The remote API speaks lowercase strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::System => "system",
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for ChatRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single normalized chat message. An ordered sequence of these forms a
/// conversation; order is chronological.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content)
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, content)
    }

    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(ChatRole::System, content)
    }
}

/// Message-like value accepted at the chat adapter boundary.
///
/// Callers may hand the adapter plain strings, role/content pairs (with the
/// role optional and the content any JSON value), or arbitrary JSON. This is
/// a closed set; `GroqClient::normalize` converts it into `ChatMessage`s and
/// never fails. The untagged serde representation is the one conversion
/// point where heterogeneous external values enter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageInput {
    /// A bare string, treated as a user message.
    Text(String),
    /// A role/content pair. Missing role defaults to `user`; structured
    /// content is serialized to JSON text.
    Pair {
        role: Option<ChatRole>,
        content: serde_json::Value,
    },
    /// Anything else. Stringified wholesale during normalization.
    Other(serde_json::Value),
}

impl From<&str> for MessageInput {
    fn from(s: &str) -> Self {
        MessageInput::Text(s.to_string())
    }
}

impl From<String> for MessageInput {
    fn from(s: String) -> Self {
        MessageInput::Text(s)
    }
}

impl From<ChatMessage> for MessageInput {
    fn from(m: ChatMessage) -> Self {
        MessageInput::Pair {
            role: Some(m.role),
            content: serde_json::Value::String(m.content),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Search error: {0}")]
    Search(String),
}

pub type AppResult<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_role_roundtrips_as_lowercase() {
        assert_eq!(serde_json::to_string(&ChatRole::User).unwrap(), "\"user\"");
        assert_eq!(
            serde_json::from_str::<ChatRole>("\"assistant\"").unwrap(),
            ChatRole::Assistant
        );
        assert_eq!(ChatRole::System.to_string(), "system");
    }

    #[test]
    fn message_input_deserializes_untagged() {
        let text: MessageInput = serde_json::from_str("\"hello\"").unwrap();
        assert!(matches!(text, MessageInput::Text(ref s) if s == "hello"));

        let pair: MessageInput =
            serde_json::from_str(r#"{"role":"system","content":"be brief"}"#).unwrap();
        match pair {
            MessageInput::Pair { role, content } => {
                assert_eq!(role, Some(ChatRole::System));
                assert_eq!(content, serde_json::json!("be brief"));
            }
            other => panic!("expected Pair, got {:?}", other),
        }

        let bare: MessageInput = serde_json::from_str(r#"{"foo":1}"#).unwrap();
        assert!(matches!(bare, MessageInput::Other(_)));
    }
}
