//! Filter data model: definitions proposed by the model, the set returned for
//! one prompt submission, and the answers collected against it.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Number;
use uuid::Uuid;

/// The input a filter asks for.
///
/// Source-side type strings collapse into these three variants. Anything the
/// model invents degrades to `FreeText` so the consumer can always render it.
/// Deserialization goes through the same mapping, so a filter set posted back
/// with an unfamiliar kind is still accepted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    #[default]
    FreeText,
    SingleChoice,
    MultiChoice,
}

impl FilterKind {
    /// Maps the model's `type` string to a kind. Case and surrounding
    /// whitespace are ignored. Unknown strings become `FreeText`.
    pub fn from_source_type(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "text_input" | "text" | "text_area" | "textarea" | "free_text" => Self::FreeText,
            "radio" | "selectbox" | "select" | "dropdown" | "single_choice" => Self::SingleChoice,
            "checkbox" | "multiselect" | "multi_select" | "multi_choice" => Self::MultiChoice,
            _ => Self::FreeText,
        }
    }
}

impl<'de> Deserialize<'de> for FilterKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from_source_type(&raw))
    }
}

/// One structured clarifying question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterDefinition {
    #[serde(default)]
    pub kind: FilterKind,
    pub label: String,
    pub key: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl FilterDefinition {
    pub fn free_text(key: &str, label: &str) -> Self {
        Self {
            kind: FilterKind::FreeText,
            label: label.to_string(),
            key: key.to_string(),
            options: Vec::new(),
        }
    }

    pub fn single_choice(key: &str, label: &str, options: &[&str]) -> Self {
        Self {
            kind: FilterKind::SingleChoice,
            label: label.to_string(),
            key: key.to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
        }
    }

    pub fn multi_choice(key: &str, label: &str, options: &[&str]) -> Self {
        Self {
            kind: FilterKind::MultiChoice,
            label: label.to_string(),
            key: key.to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
        }
    }

    /// A checkbox with no options: a single yes/no flag.
    pub fn is_flag(&self) -> bool {
        self.kind == FilterKind::MultiChoice && self.options.is_empty()
    }
}

/// Key and label used when a set has no free-text filter of its own.
pub const DEFAULT_FREE_TEXT_KEY: &str = "default_custom_text";
pub const DEFAULT_FREE_TEXT_LABEL: &str = "Describe your requirements:";

/// The ordered filters returned for one synthesis request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterSet {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub filters: Vec<FilterDefinition>,
}

impl FilterSet {
    pub fn new(filters: Vec<FilterDefinition>) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            filters,
        }
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&FilterDefinition> {
        self.filters.iter().find(|f| f.key == key)
    }

    pub fn keys_unique(&self) -> bool {
        let mut seen = HashSet::new();
        self.filters.iter().all(|f| seen.insert(f.key.as_str()))
    }

    /// Guarantees at least one free-text filter, prepending the default one
    /// when the model proposed none.
    pub fn ensure_free_text(&mut self) {
        if self.filters.iter().any(|f| f.kind == FilterKind::FreeText) {
            return;
        }
        let mut key = DEFAULT_FREE_TEXT_KEY.to_string();
        let mut suffix = 1;
        while self.get(&key).is_some() {
            suffix += 1;
            key = format!("{DEFAULT_FREE_TEXT_KEY}_{suffix}");
        }
        self.filters
            .insert(0, FilterDefinition::free_text(&key, DEFAULT_FREE_TEXT_LABEL));
    }
}

/// A user-supplied value for one filter.
///
/// Any JSON number is accepted. A `null` answer means "not answered" and is
/// dropped when `FilterAnswers` is deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterAnswer {
    Flag(bool),
    Number(Number),
    Text(String),
    Choices(Vec<String>),
}

impl FilterAnswer {
    /// True when the answer carries nothing worth sending to the refiner.
    pub fn is_blank(&self) -> bool {
        match self {
            FilterAnswer::Text(s) => s.trim().is_empty(),
            FilterAnswer::Choices(c) => c.is_empty(),
            FilterAnswer::Flag(_) | FilterAnswer::Number(_) => false,
        }
    }
}

impl fmt::Display for FilterAnswer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterAnswer::Flag(b) => write!(f, "{}", if *b { "Yes" } else { "No" }),
            FilterAnswer::Number(n) => write!(f, "{n}"),
            FilterAnswer::Text(s) => f.write_str(s),
            FilterAnswer::Choices(c) => f.write_str(&c.join(", ")),
        }
    }
}

/// Answers keyed by filter key, in insertion order.
///
/// Serialized as a JSON object; order is kept on the way in and out because
/// it decides the order of the preference lines sent to the refiner.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterAnswers {
    entries: Vec<(String, FilterAnswer)>,
}

impl FilterAnswers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the answer for `key`, keeping its first position.
    pub fn insert(&mut self, key: impl Into<String>, answer: FilterAnswer) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = answer,
            None => self.entries.push((key, answer)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&FilterAnswer> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, a)| a)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterAnswer)> {
        self.entries.iter().map(|(k, a)| (k.as_str(), a))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for FilterAnswers {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, answer) in &self.entries {
            map.serialize_entry(key, answer)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FilterAnswers {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AnswersVisitor;

        impl<'de> Visitor<'de> for AnswersVisitor {
            type Value = FilterAnswers;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of filter keys to answers")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut answers = FilterAnswers::new();
                let mut seen = HashSet::new();
                while let Some((key, answer)) =
                    access.next_entry::<String, Option<FilterAnswer>>()?
                {
                    if !seen.insert(key.clone()) {
                        return Err(de::Error::custom(format!("duplicate answer key '{key}'")));
                    }
                    if let Some(answer) = answer {
                        answers.insert(key, answer);
                    }
                }
                Ok(answers)
            }
        }

        deserializer.deserialize_map(AnswersVisitor)
    }
}
