//! Agent System
//!
//! This module contains the stages that produce a literature review:
//!
//! - **Researcher**: fetches paper metadata from arXiv
//! - **Summarizer**: asks the chat model to write the review
//! - **Formatter**: deterministic template fallback
//!
//! ## Pipeline Overview
//!
//! ```text
//! Topic
//!   │
//!   ▼
//! ┌─────────────┐  no papers
//! │ Researcher  │────────────▶ "no papers found" chunk
//! └─────────────┘
//!   │ ≥1 paper
//!   ▼
//! ┌─────────────┐  no credential
//! │ Summarizer  │────────────▶ configuration-error chunk
//! └─────────────┘
//!   │ failure or short output
//!   ▼
//! ┌─────────────┐
//! │  Formatter  │────────────▶ deterministic review chunk
//! └─────────────┘
//! ```
//!
//! Every terminal path emits exactly one chunk.

pub mod formatter;
pub mod summarizer;

pub use formatter::format_review;
pub use summarizer::{Summarizer, MIN_REVIEW_CHARS};

use crate::llm::GroqClient;
use crate::models::{sources, AppState, ReviewChunk};
use crate::search::ArxivClient;
use tracing::{info, warn};

/// Run the full review pipeline for a topic.
///
/// Always returns at least one chunk. Chat-stage failures degrade silently
/// to the deterministic formatter; only an empty fetch result and a missing
/// credential produce user-visible messages.
pub async fn run_review(
    topic: &str,
    model_override: Option<&str>,
    max_results: Option<usize>,
    state: &AppState,
) -> Vec<ReviewChunk> {
    let limit = max_results.unwrap_or(state.config.search.max_results);

    // Step 1: fetch papers. A failed search is equivalent to an empty one.
    let arxiv = match &state.config.search.api_base {
        Some(base) => ArxivClient::with_base(base),
        None => ArxivClient::new(),
    };

    let papers = match arxiv.search(topic, limit).await {
        Ok(papers) => papers,
        Err(e) => {
            warn!(error = %e, topic, "arXiv search failed");
            Vec::new()
        }
    };

    if papers.is_empty() {
        info!(topic, "no papers found");
        return vec![ReviewChunk::new(
            sources::RESEARCHER,
            "No papers found for this topic. Please try a different search term.",
        )];
    }

    info!(count = papers.len(), topic, "papers fetched");

    // Step 2: construct the chat adapter. Construction is lazy: a missing
    // credential is discovered only here, after the fetch has completed.
    let client =
        match GroqClient::from_sources(&state.config.llm, &state.settings, model_override).await {
            Ok(client) => client,
            Err(e) => {
                warn!(error = %e, "chat adapter cannot be constructed");
                return vec![ReviewChunk::new(
                    sources::SYSTEM,
                    format!("Configuration error: {}", e),
                )];
            }
        };

    // Step 3: attempt the AI review; fall back to the template on any
    // failure or on output below the quality threshold. The cause is
    // logged, never shown to the caller.
    match Summarizer::generate(&client, topic, &papers).await {
        Ok(review) if review.trim().chars().count() > MIN_REVIEW_CHARS => {
            info!(review_len = review.len(), "AI review accepted");
            vec![ReviewChunk::new(sources::SUMMARIZER, review)]
        }
        Ok(review) => {
            warn!(
                review_len = review.trim().chars().count(),
                threshold = MIN_REVIEW_CHARS,
                "AI review below quality threshold, using deterministic formatter"
            );
            vec![ReviewChunk::new(
                sources::SUMMARIZER,
                format_review(topic, &papers),
            )]
        }
        Err(e) => {
            warn!(error = %e, "AI review failed, using deterministic formatter");
            vec![ReviewChunk::new(
                sources::SUMMARIZER,
                format_review(topic, &papers),
            )]
        }
    }
}
