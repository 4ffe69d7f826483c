//! Axum route handlers for the Refine API.

use axum::{extract::State, Json};
use serde::Deserialize;
use tracing::debug;

use crate::errors::AppError;
use crate::filters::defaults::DefaultPreferences;
use crate::filters::model::FilterAnswers;
use crate::refine::refiner::{PreferenceSection, Refinement};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RefineRequest {
    pub prompt: String,
    #[serde(default)]
    pub defaults: DefaultPreferences,
    /// Answers collected for the synthesized filters.
    #[serde(default)]
    pub custom: FilterAnswers,
}

/// POST /api/v1/refine
///
/// Rewrites the naive prompt using the default preferences and the custom
/// filter answers. On model failure the naive prompt comes back with a notice.
pub async fn handle_refine(
    State(state): State<AppState>,
    Json(request): Json<RefineRequest>,
) -> Result<Json<Refinement>, AppError> {
    if request.prompt.trim().is_empty() {
        return Err(AppError::Validation("prompt cannot be empty".to_string()));
    }
    request.defaults.validate()?;
    if request.custom.is_empty() {
        debug!("Refining without custom filter answers");
    }

    let sections = [
        PreferenceSection::new("Default", request.defaults.into_answers()),
        PreferenceSection::new("Custom", request.custom),
    ];

    let refinement = state
        .refiner()?
        .refine(request.prompt.trim(), &sections)
        .await;

    Ok(Json(refinement))
}
