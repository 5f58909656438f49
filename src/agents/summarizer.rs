//! Review Summarizer
//!
//! Builds the single-prompt conversation that asks the model for a full
//! literature review. The orchestrator decides what to do with the result;
//! this module only produces it.

use crate::llm::{ChatOptions, GroqClient};
use crate::search::Paper;
use crate::types::{AppError, AppResult, MessageInput};
use tracing::info;

/// AI output whose trimmed length is at or below this is treated as low
/// quality and replaced by the deterministic formatter.
pub const MIN_REVIEW_CHARS: usize = 100;

/// Leave room for a complete multi-section review.
const MAX_COMPLETION_TOKENS: u32 = 4096;

pub struct Summarizer;

impl Summarizer {
    /// Request an AI-written review for `topic` over `papers`. Exactly one
    /// chat completion call; no retry.
    pub async fn generate(
        client: &GroqClient,
        topic: &str,
        papers: &[Paper],
    ) -> AppResult<String> {
        let prompt = Self::create_review_prompt(topic, papers)?;

        let options = ChatOptions {
            temperature: 0.2,
            max_tokens: Some(MAX_COMPLETION_TOKENS),
        };

        let inputs: Vec<MessageInput> = vec![prompt.into()];
        let review = client.create(&inputs, &options).await?;

        info!(
            model = client.model(),
            review_len = review.len(),
            "received AI review"
        );
        Ok(review)
    }

    /// Single-prompt conversation embedding the topic and the serialized
    /// paper list.
    fn create_review_prompt(topic: &str, papers: &[Paper]) -> AppResult<String> {
        let papers_json = serde_json::to_string_pretty(papers)
            .map_err(|e| AppError::Transport(format!("failed to serialize papers: {}", e)))?;

        Ok(format!(
            r#"Create a comprehensive academic literature review for the topic '{topic}'.

Here are the papers to analyze:
{papers_json}

Please create a professional literature review with:
1. An introduction explaining the importance of {topic}
2. For each paper: title (as a markdown link), authors, the key problem addressed, and the main contributions
3. A conclusion highlighting key themes and future directions

Format it in clean markdown."#,
            topic = topic,
            papers_json = papers_json,
        ))
    }
}
