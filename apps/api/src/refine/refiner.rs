//! Prompt Refiner: one generation call, no retries.
//!
//! On any failure the naive prompt is returned unchanged with a notice, so
//! the answer step can still run.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::filters::model::FilterAnswers;
use crate::llm_client::TextGenerator;
use crate::refine::prompts::{REFINEMENT_FAILED_NOTICE, REFINEMENT_INSTRUCTION};

/// Answers grouped by where their filters came from ("Default", "Custom").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreferenceSection {
    pub label: String,
    pub answers: FilterAnswers,
}

impl PreferenceSection {
    pub fn new(label: &str, answers: FilterAnswers) -> Self {
        Self {
            label: label.to_string(),
            answers,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Refinement {
    pub refined_prompt: String,
    pub fell_back: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

#[derive(Clone)]
pub struct PromptRefiner {
    generator: Arc<dyn TextGenerator>,
}

impl PromptRefiner {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    pub async fn refine(&self, naive_prompt: &str, sections: &[PreferenceSection]) -> Refinement {
        let prompt = build_refinement_prompt(naive_prompt, sections);

        match self.generator.generate(&prompt).await {
            Ok(text) if !text.trim().is_empty() => {
                info!("Prompt refined ({} chars)", text.trim().len());
                Refinement {
                    refined_prompt: text.trim().to_string(),
                    fell_back: false,
                    notice: None,
                }
            }
            Ok(_) => {
                error!("Prompt refinement returned empty text");
                fallback(naive_prompt)
            }
            Err(e) => {
                error!("Prompt refinement failed: {e}");
                fallback(naive_prompt)
            }
        }
    }
}

fn fallback(naive_prompt: &str) -> Refinement {
    Refinement {
        refined_prompt: naive_prompt.to_string(),
        fell_back: true,
        notice: Some(REFINEMENT_FAILED_NOTICE.to_string()),
    }
}

/// Instruction, naive prompt, then one `[label]` block per non-empty section
/// with `- key: value` lines. Blank answers are left out.
pub fn build_refinement_prompt(naive_prompt: &str, sections: &[PreferenceSection]) -> String {
    let mut prompt = format!("{REFINEMENT_INSTRUCTION}\n\nNaive Prompt: {naive_prompt}\n");

    let blocks: Vec<String> = sections
        .iter()
        .filter_map(|section| {
            let lines: Vec<String> = section
                .answers
                .iter()
                .filter(|(_, answer)| !answer.is_blank())
                .map(|(key, answer)| format!("- {key}: {answer}"))
                .collect();
            if lines.is_empty() {
                None
            } else {
                Some(format!("[{}]\n{}", section.label, lines.join("\n")))
            }
        })
        .collect();

    if !blocks.is_empty() {
        prompt.push_str("\nUser Preferences:\n\n");
        prompt.push_str(&blocks.join("\n\n"));
        prompt.push('\n');
    }

    prompt
}
