use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service version, configured models, and which capabilities have
/// credentials.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "promptlab",
        "capabilities": {
            "filters": state.synthesizer.is_some(),
            "refine": state.refiner.is_some(),
            "answer": state.answers.is_some()
        },
        "models": {
            "generation": state.config.generation_model,
            "chat": state.config.chat_model,
            "chat_fallback": state.config.chat_fallback_model
        },
        "filter_max_attempts": state.synthesizer.as_ref().map(|s| s.max_attempts())
    }))
}
