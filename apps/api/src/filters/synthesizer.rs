//! Filter Synthesizer: turns a naive prompt into a validated `FilterSet`.
//!
//! Flow: build prompt → generate → extract payload → validate → return.
//! A failed attempt (provider error, no payload, bad JSON, invalid filters)
//! is logged and retried up to `max_attempts` times, strictly in sequence.
//! When every attempt fails the fixed fallback set is returned, so callers
//! never see an error from this component.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::filters::fallback::fallback_filter_set;
use crate::filters::model::FilterSet;
use crate::filters::prompts::FILTER_SYNTH_PROMPT_TEMPLATE;
use crate::filters::validate::parse_filter_output;
use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;
use crate::llm_client::TextGenerator;

/// Attempts used when configuration does not say otherwise.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Where the returned filters came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum SynthesisOrigin {
    /// Validated model output from the given 1-based attempt.
    Generated { attempt: u32 },
    /// Every attempt failed; the fixed fallback set was used.
    Fallback { attempts: u32 },
}

#[derive(Debug, Clone, Serialize)]
pub struct Synthesis {
    pub filter_set: FilterSet,
    pub origin: SynthesisOrigin,
}

impl Synthesis {
    pub fn used_fallback(&self) -> bool {
        matches!(self.origin, SynthesisOrigin::Fallback { .. })
    }

    /// Number of generation calls this synthesis issued.
    pub fn attempts(&self) -> u32 {
        match self.origin {
            SynthesisOrigin::Generated { attempt } => attempt,
            SynthesisOrigin::Fallback { attempts } => attempts,
        }
    }
}

#[derive(Clone)]
pub struct FilterSynthesizer {
    generator: Arc<dyn TextGenerator>,
    max_attempts: u32,
}

impl FilterSynthesizer {
    /// `max_attempts` below 1 is raised to 1.
    pub fn new(generator: Arc<dyn TextGenerator>, max_attempts: u32) -> Self {
        Self {
            generator,
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Proposes filters for `prompt`. Never fails: degrades to the fallback
    /// set after `max_attempts` invalid outputs.
    pub async fn synthesize(&self, prompt: &str) -> Synthesis {
        let request = build_synthesis_prompt(prompt);

        for attempt in 1..=self.max_attempts {
            let raw = match self.generator.generate(&request).await {
                Ok(raw) => raw,
                Err(e) => {
                    warn!(
                        "Filter synthesis attempt {}/{}: generation failed: {}",
                        attempt, self.max_attempts, e
                    );
                    continue;
                }
            };
            debug!("[Attempt {}] LLM output: {}", attempt, raw);

            match parse_filter_output(&raw) {
                Ok(filters) => {
                    info!(
                        "Filter synthesis produced {} filters on attempt {}",
                        filters.len(),
                        attempt
                    );
                    return Synthesis {
                        filter_set: FilterSet::new(filters),
                        origin: SynthesisOrigin::Generated { attempt },
                    };
                }
                Err(e) => {
                    warn!(
                        "Filter synthesis attempt {}/{}: invalid output: {}",
                        attempt, self.max_attempts, e
                    );
                }
            }
        }

        warn!(
            "Filter synthesis failed after {} attempts, using fallback filters",
            self.max_attempts
        );
        Synthesis {
            filter_set: fallback_filter_set(),
            origin: SynthesisOrigin::Fallback {
                attempts: self.max_attempts,
            },
        }
    }
}

fn build_synthesis_prompt(prompt: &str) -> String {
    FILTER_SYNTH_PROMPT_TEMPLATE
        .replace("{json_only}", JSON_ONLY_INSTRUCTION)
        .replace("{prompt}", prompt)
}
