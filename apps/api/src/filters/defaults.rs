//! Default preference filters shown beside the synthesized ones.
//!
//! Unlike synthesized filters these never change: answer format, tone and
//! output length on a 1–5 scale.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::filters::model::{FilterAnswer, FilterAnswers, FilterDefinition};

pub const OUTPUT_LENGTH_MIN: u8 = 1;
pub const OUTPUT_LENGTH_MAX: u8 = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum AnswerFormat {
    #[default]
    Paragraph,
    #[serde(rename = "Bullet Points")]
    BulletPoints,
}

impl AnswerFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnswerFormat::Paragraph => "Paragraph",
            AnswerFormat::BulletPoints => "Bullet Points",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum Tone {
    #[default]
    Formal,
    Informal,
    Neutral,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Formal => "Formal",
            Tone::Informal => "Informal",
            Tone::Neutral => "Neutral",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultPreferences {
    pub answer_format: AnswerFormat,
    pub tone: Tone,
    pub output_length: u8,
}

impl Default for DefaultPreferences {
    fn default() -> Self {
        Self {
            answer_format: AnswerFormat::default(),
            tone: Tone::default(),
            output_length: 3,
        }
    }
}

impl DefaultPreferences {
    pub fn validate(&self) -> Result<(), AppError> {
        if !(OUTPUT_LENGTH_MIN..=OUTPUT_LENGTH_MAX).contains(&self.output_length) {
            return Err(AppError::Validation(format!(
                "output_length must be between {OUTPUT_LENGTH_MIN} and {OUTPUT_LENGTH_MAX}, got {}",
                self.output_length
            )));
        }
        Ok(())
    }

    /// Answers keyed by the labels the refiner sees.
    pub fn into_answers(self) -> FilterAnswers {
        let mut answers = FilterAnswers::new();
        answers.insert(
            "Answer Format",
            FilterAnswer::Text(self.answer_format.as_str().to_string()),
        );
        answers.insert(
            "Tone of Response",
            FilterAnswer::Text(self.tone.as_str().to_string()),
        );
        answers.insert("Output Length", FilterAnswer::Number(self.output_length.into()));
        answers
    }
}

/// Definitions for clients that render the default preferences themselves.
/// Output length is a bounded scale, exposed as a single choice over 1–5.
pub fn default_filter_definitions() -> Vec<FilterDefinition> {
    let lengths: Vec<String> = (OUTPUT_LENGTH_MIN..=OUTPUT_LENGTH_MAX)
        .map(|n| n.to_string())
        .collect();
    let lengths: Vec<&str> = lengths.iter().map(String::as_str).collect();

    vec![
        FilterDefinition::single_choice(
            "default_answer_format",
            "Preferred answer format:",
            &[AnswerFormat::Paragraph.as_str(), AnswerFormat::BulletPoints.as_str()],
        ),
        FilterDefinition::single_choice(
            "default_tone_of_response",
            "Preferred tone of response:",
            &[Tone::Formal.as_str(), Tone::Informal.as_str(), Tone::Neutral.as_str()],
        ),
        FilterDefinition::single_choice("default_output_length", "Length of output:", &lengths),
    ]
}
