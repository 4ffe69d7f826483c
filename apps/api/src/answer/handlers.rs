//! Axum route handlers for the Answer API.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::answer::generator::{Answer, Comparison};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub prompt: String,
}

#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    pub naive_prompt: String,
    pub refined_prompt: String,
}

/// POST /api/v1/answer
///
/// Upstream failures are reported in the body (`failed: true`), not as an
/// HTTP error, so the client can show them and let the user resubmit.
pub async fn handle_answer(
    State(state): State<AppState>,
    Json(request): Json<AnswerRequest>,
) -> Result<Json<Answer>, AppError> {
    if request.prompt.trim().is_empty() {
        return Err(AppError::Validation("prompt cannot be empty".to_string()));
    }

    let answer = state.answers()?.answer(request.prompt.trim()).await;
    Ok(Json(answer))
}

/// POST /api/v1/compare
///
/// Answers the naive and the refined prompt with the same chat model.
pub async fn handle_compare(
    State(state): State<AppState>,
    Json(request): Json<CompareRequest>,
) -> Result<Json<Comparison>, AppError> {
    if request.naive_prompt.trim().is_empty() || request.refined_prompt.trim().is_empty() {
        return Err(AppError::Validation(
            "naive_prompt and refined_prompt cannot be empty".to_string(),
        ));
    }

    let comparison = state
        .answers()?
        .compare(request.naive_prompt.trim(), request.refined_prompt.trim())
        .await;
    Ok(Json(comparison))
}
