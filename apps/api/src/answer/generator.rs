//! Answer Generator: sends a prompt to the chat model and returns its text.
//!
//! The only retry is a model swap: if the primary model is reported
//! unavailable, the fallback model is tried once. Every other failure
//! becomes a user-visible message in the returned `Answer`.

use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::answer::prompts::{ANSWER_FAILED_MESSAGE, ANSWER_SYSTEM, INVALID_MODEL_MESSAGE};
use crate::llm_client::{ChatCompleter, LlmError};

#[derive(Debug, Clone, Serialize)]
pub struct Answer {
    pub text: String,
    /// Model that produced `text`, or the last model tried on failure.
    pub model: String,
    pub failed: bool,
}

/// The experiment: the same chat model answering the naive and the refined prompt.
#[derive(Debug, Clone, Serialize)]
pub struct Comparison {
    pub naive: Answer,
    pub refined: Answer,
}

#[derive(Clone)]
pub struct AnswerGenerator {
    chat: Arc<dyn ChatCompleter>,
    model: String,
    fallback_model: String,
}

impl AnswerGenerator {
    pub fn new(chat: Arc<dyn ChatCompleter>, model: String, fallback_model: String) -> Self {
        Self {
            chat,
            model,
            fallback_model,
        }
    }

    pub async fn answer(&self, prompt: &str) -> Answer {
        match self.chat.complete(&self.model, ANSWER_SYSTEM, prompt).await {
            Ok(text) => self.success(&self.model, text),
            Err(LlmError::ModelUnavailable { model }) if self.fallback_model != model => {
                warn!(
                    "Chat model '{}' unavailable, retrying once with '{}'",
                    model, self.fallback_model
                );
                match self
                    .chat
                    .complete(&self.fallback_model, ANSWER_SYSTEM, prompt)
                    .await
                {
                    Ok(text) => self.success(&self.fallback_model, text),
                    Err(e) => failure(&self.fallback_model, e),
                }
            }
            Err(e) => failure(&self.model, e),
        }
    }

    /// Answers both prompts, one after the other.
    pub async fn compare(&self, naive_prompt: &str, refined_prompt: &str) -> Comparison {
        let naive = self.answer(naive_prompt).await;
        let refined = self.answer(refined_prompt).await;
        Comparison { naive, refined }
    }

    fn success(&self, model: &str, text: String) -> Answer {
        info!("Answer generated by '{}' ({} chars)", model, text.len());
        Answer {
            text: text.trim().to_string(),
            model: model.to_string(),
            failed: false,
        }
    }
}

fn failure(model: &str, e: LlmError) -> Answer {
    error!("Answer generation with '{}' failed: {}", model, e);
    let text = match e {
        LlmError::ModelUnavailable { .. } => INVALID_MODEL_MESSAGE,
        _ => ANSWER_FAILED_MESSAGE,
    };
    Answer {
        text: text.to_string(),
        model: model.to_string(),
        failed: true,
    }
}
