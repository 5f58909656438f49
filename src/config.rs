use anyhow::Result;
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub llm: LLMConfig,
    pub search: SearchConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LLMConfig {
    /// API key from the environment. May be empty; the adapter's credential
    /// chain falls back to the settings store.
    pub groq_api_key: String,
    pub default_model: String,
    /// Endpoint override, used by tests against a local mock server.
    pub api_base: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    pub max_results: usize,
    /// Endpoint override, used by tests against a local mock server.
    pub api_base: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server: ServerConfig {
                port: env::var("PORT")
                    .unwrap_or_else(|_| "3000".to_string())
                    .parse()?,
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                cors_allowed_origins: env::var("ALLOWED_ORIGINS")
                    .unwrap_or_else(|_| "http://localhost:3000,http://localhost:5173".to_string())
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .collect(),
            },
            llm: LLMConfig {
                groq_api_key: env::var("GROQ_API_KEY").unwrap_or_default(),
                default_model: env::var("GROQ_MODEL")
                    .unwrap_or_else(|_| crate::llm::groq::models::DEFAULT.to_string()),
                api_base: env::var("GROQ_API_BASE").ok(),
            },
            search: SearchConfig {
                max_results: env::var("ARXIV_MAX_RESULTS")
                    .unwrap_or_else(|_| "5".to_string())
                    .parse()?,
                api_base: env::var("ARXIV_API_BASE").ok(),
            },
        })
    }
}
