//! Collects submitted form values against a `FilterSet`.
//!
//! The client renders one input per definition and posts back whatever the
//! user entered. Values are coerced by kind; anything that does not fit is
//! dropped, never rejected.

use serde_json::{Map, Value};
use tracing::debug;

use crate::filters::model::{FilterAnswer, FilterAnswers, FilterDefinition, FilterKind, FilterSet};

pub fn collect_answers(set: &FilterSet, submitted: &Map<String, Value>) -> FilterAnswers {
    let mut answers = FilterAnswers::new();

    for filter in &set.filters {
        let value = submitted.get(&filter.key);
        if let Some(answer) = coerce(filter, value) {
            answers.insert(filter.key.clone(), answer);
        }
    }

    for key in submitted.keys().filter(|k| set.get(k).is_none()) {
        debug!("Ignoring submitted value for unknown filter key '{}'", key);
    }

    debug!(
        "Collected {} answers for {} filters in set {}",
        answers.len(),
        set.len(),
        set.id
    );
    answers
}

fn coerce(filter: &FilterDefinition, value: Option<&Value>) -> Option<FilterAnswer> {
    if filter.is_flag() {
        let checked = match value {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => matches!(
                s.trim().to_ascii_lowercase().as_str(),
                "true" | "yes" | "on"
            ),
            _ => false,
        };
        return Some(FilterAnswer::Flag(checked));
    }

    let value = value?;

    match filter.kind {
        FilterKind::FreeText => scalar_text(value).map(FilterAnswer::Text),
        FilterKind::SingleChoice => {
            let choice = scalar_text(value)?;
            if filter.options.contains(&choice) {
                Some(FilterAnswer::Text(choice))
            } else {
                debug!(
                    "Dropping '{}' for '{}': not one of the offered options",
                    choice, filter.key
                );
                None
            }
        }
        FilterKind::MultiChoice => {
            let picked: Vec<String> = match value {
                Value::Array(items) => items.iter().filter_map(scalar_text).collect(),
                other => scalar_text(other).into_iter().collect(),
            };
            let selected = filter
                .options
                .iter()
                .filter(|opt| picked.contains(opt))
                .cloned()
                .collect();
            Some(FilterAnswer::Choices(selected))
        }
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
