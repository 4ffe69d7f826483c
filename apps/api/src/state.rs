use crate::answer::generator::AnswerGenerator;
use crate::config::Config;
use crate::errors::AppError;
use crate::filters::synthesizer::FilterSynthesizer;
use crate::refine::refiner::PromptRefiner;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Holds no per-user data: filter sets and answers travel in request bodies.
/// A component is `None` when its provider credential was missing at startup.
#[derive(Clone)]
pub struct AppState {
    pub synthesizer: Option<FilterSynthesizer>,
    pub refiner: Option<PromptRefiner>,
    pub answers: Option<AnswerGenerator>,
    pub config: Config,
}

impl AppState {
    pub fn synthesizer(&self) -> Result<&FilterSynthesizer, AppError> {
        self.synthesizer.as_ref().ok_or_else(|| {
            AppError::Unavailable(
                "Filter synthesis is not configured (GOOGLE_GENAI_API_KEY missing)".to_string(),
            )
        })
    }

    pub fn refiner(&self) -> Result<&PromptRefiner, AppError> {
        self.refiner.as_ref().ok_or_else(|| {
            AppError::Unavailable(
                "Prompt refinement is not configured (GOOGLE_GENAI_API_KEY missing)".to_string(),
            )
        })
    }

    pub fn answers(&self) -> Result<&AnswerGenerator, AppError> {
        self.answers.as_ref().ok_or_else(|| {
            AppError::Unavailable(
                "Answer generation is not configured (OPENAI_API_KEY missing)".to_string(),
            )
        })
    }
}
