pub mod health;

use axum::{
    http::Uri,
    routing::{get, post},
    Router,
};

use crate::answer::handlers as answer;
use crate::errors::AppError;
use crate::filters::handlers as filters;
use crate::refine::handlers as refine;
use crate::state::AppState;

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {uri}"))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Filters API
        .route("/api/v1/filters", post(filters::handle_synthesize))
        .route(
            "/api/v1/filters/defaults",
            get(filters::handle_default_filters),
        )
        .route(
            "/api/v1/filters/answers",
            post(filters::handle_collect_answers),
        )
        // Refine API
        .route("/api/v1/refine", post(refine::handle_refine))
        // Answer API
        .route("/api/v1/answer", post(answer::handle_answer))
        .route("/api/v1/compare", post(answer::handle_compare))
        .fallback(not_found)
        .with_state(state)
}
