// LLM abstraction layer

pub mod groq;

pub use groq::{resolve_api_key, ChatOptions, GroqClient};
