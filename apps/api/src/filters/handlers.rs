//! Axum route handlers for the Filters API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::errors::AppError;
use crate::filters::choices::collect_answers;
use crate::filters::defaults::{default_filter_definitions, DefaultPreferences};
use crate::filters::model::{FilterAnswers, FilterDefinition, FilterSet};
use crate::filters::synthesizer::SynthesisOrigin;
use crate::state::AppState;

const FALLBACK_NOTICE: &str =
    "Could not generate custom filters for this prompt; showing general filters instead.";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SynthesizeRequest {
    pub prompt: String,
}

#[derive(Debug, Serialize)]
pub struct SynthesizeResponse {
    pub filter_set: FilterSet,
    pub origin: SynthesisOrigin,
    pub used_fallback: bool,
    pub attempts: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DefaultFiltersResponse {
    pub filters: Vec<FilterDefinition>,
    pub defaults: DefaultPreferences,
}

#[derive(Debug, Deserialize)]
pub struct CollectAnswersRequest {
    pub filter_set: FilterSet,
    #[serde(default)]
    pub submitted: Map<String, Value>,
}

#[derive(Debug, Serialize)]
pub struct CollectAnswersResponse {
    pub filter_set_id: Uuid,
    pub answers: FilterAnswers,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/filters
///
/// Proposes clarifying filters for a naive prompt. Always 200 once the prompt
/// is non-blank: invalid model output degrades to the fallback set.
pub async fn handle_synthesize(
    State(state): State<AppState>,
    Json(request): Json<SynthesizeRequest>,
) -> Result<Json<SynthesizeResponse>, AppError> {
    if request.prompt.trim().is_empty() {
        return Err(AppError::Validation("prompt cannot be empty".to_string()));
    }

    let synthesis = state.synthesizer()?.synthesize(request.prompt.trim()).await;
    let used_fallback = synthesis.used_fallback();

    Ok(Json(SynthesizeResponse {
        attempts: synthesis.attempts(),
        origin: synthesis.origin,
        filter_set: synthesis.filter_set,
        used_fallback,
        notice: used_fallback.then(|| FALLBACK_NOTICE.to_string()),
    }))
}

/// GET /api/v1/filters/defaults
pub async fn handle_default_filters() -> Json<DefaultFiltersResponse> {
    Json(DefaultFiltersResponse {
        filters: default_filter_definitions(),
        defaults: DefaultPreferences::default(),
    })
}

/// POST /api/v1/filters/answers
///
/// Coerces raw form values against the filter set they were rendered from.
/// A set without a free-text filter gets the default one first.
pub async fn handle_collect_answers(
    Json(request): Json<CollectAnswersRequest>,
) -> Result<Json<CollectAnswersResponse>, AppError> {
    let mut filter_set = request.filter_set;
    if filter_set.is_empty() {
        return Err(AppError::Validation("filter_set has no filters".to_string()));
    }
    if !filter_set.keys_unique() {
        return Err(AppError::Validation(
            "filter_set contains duplicate keys".to_string(),
        ));
    }
    filter_set.ensure_free_text();

    let answers = collect_answers(&filter_set, &request.submitted);

    Ok(Json(CollectAnswersResponse {
        filter_set_id: filter_set.id,
        answers,
    }))
}
