use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json as ResponseJson},
    routing::post,
    Json, Router,
};
use crate::agents;
use crate::models::{AppState, ExportFormat, ExportRequest, ReviewRequest, ReviewResponse};
use crate::utils::to_plain_text;
use std::time::Instant;
use tracing::info;
use uuid::Uuid;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/review", post(post_review))
        .route("/api/review/export", post(export_review))
        .with_state(state)
}

/// Run the review pipeline for a topic. Adapter failures never surface as
/// HTTP errors; degradation shows up only in the chunk content.
pub async fn post_review(
    State(state): State<AppState>,
    Json(request): Json<ReviewRequest>,
) -> Result<ResponseJson<ReviewResponse>, StatusCode> {
    let topic = request.topic.trim().to_string();
    if topic.is_empty() {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }

    info!(topic = %topic, "Received review request");
    let started = Instant::now();

    let chunks = agents::run_review(
        &topic,
        request.model.as_deref(),
        request.max_results,
        &state,
    )
    .await;

    let response = ReviewResponse {
        review_id: Uuid::new_v4(),
        topic,
        chunks,
        response_time_ms: started.elapsed().as_millis() as u64,
    };

    info!(
        review_id = %response.review_id,
        chunks = response.chunks.len(),
        "Review response sent"
    );

    Ok(Json(response))
}

/// Return the assembled review as a downloadable attachment, optionally
/// with links and markup stripped.
async fn export_review(Json(request): Json<ExportRequest>) -> impl IntoResponse {
    let (body, content_type, filename) = match request.format {
        ExportFormat::Markdown => (
            request.content,
            "text/markdown; charset=utf-8",
            "literature_review.md",
        ),
        ExportFormat::Text => (
            to_plain_text(&request.content),
            "text/plain; charset=utf-8",
            "literature_review.txt",
        ),
    };

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
}
