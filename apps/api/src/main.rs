mod answer;
mod config;
mod errors;
mod filters;
mod llm_client;
mod refine;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::answer::generator::AnswerGenerator;
use crate::config::Config;
use crate::filters::synthesizer::FilterSynthesizer;
use crate::llm_client::{GeminiClient, OpenAiClient};
use crate::refine::refiner::PromptRefiner;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed numeric values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting PromptLab API v{}", env!("CARGO_PKG_VERSION"));

    // Generation model: filter synthesis and prompt refinement
    let (synthesizer, refiner) = match &config.google_genai_api_key {
        Some(key) => {
            let gemini = Arc::new(GeminiClient::new(
                key.clone(),
                config.generation_model.clone(),
                config.llm_timeout,
            )?);
            info!(
                "Generation client initialized (model: {}, filter attempts: {})",
                gemini.model(),
                config.filter_max_attempts
            );
            (
                Some(FilterSynthesizer::new(
                    gemini.clone(),
                    config.filter_max_attempts,
                )),
                Some(PromptRefiner::new(gemini)),
            )
        }
        None => {
            warn!("GOOGLE_GENAI_API_KEY not set; filter synthesis and refinement disabled");
            (None, None)
        }
    };

    // Chat model: answers for the naive and refined prompts
    let answers = match &config.openai_api_key {
        Some(key) => {
            let openai = Arc::new(OpenAiClient::new(key.clone(), config.llm_timeout)?);
            info!(
                "Chat client initialized (model: {}, fallback: {})",
                config.chat_model, config.chat_fallback_model
            );
            Some(AnswerGenerator::new(
                openai,
                config.chat_model.clone(),
                config.chat_fallback_model.clone(),
            ))
        }
        None => {
            warn!("OPENAI_API_KEY not set; answer generation disabled");
            None
        }
    };

    // Build app state
    let state = AppState {
        synthesizer,
        refiner,
        answers,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
