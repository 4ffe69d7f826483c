//! Validation of model-proposed filters.
//!
//! Parsing succeeding is not enough: a syntactically valid payload that is
//! missing a `key` or a choice list is rejected here so the synthesizer can
//! retry or fall back.

use std::collections::HashSet;

use serde_json::Value;
use thiserror::Error;

use crate::filters::extract::extract_payload;
use crate::filters::model::{FilterDefinition, FilterKind};

/// Name of the list field the model is instructed to emit.
pub const FILTER_LIST_FIELD: &str = "custom_filters";

#[derive(Debug, Error)]
pub enum FilterValidationError {
    #[error("no JSON object found in model output")]
    NoPayload,

    #[error("payload is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("missing 'custom_filters' field")]
    MissingFilterList,

    #[error("'custom_filters' is not a list")]
    NotAList,

    #[error("'custom_filters' is empty")]
    Empty,

    #[error("filter #{index} is not an object")]
    NotAnObject { index: usize },

    #[error("filter #{index} is missing a non-empty '{field}'")]
    MissingField { index: usize, field: &'static str },

    #[error("filter '{key}' (#{index}) is a single choice without options")]
    MissingOptions { index: usize, key: String },

    #[error("duplicate filter key '{0}'")]
    DuplicateKey(String),
}

/// Extracts, parses and validates raw model output in one step.
pub fn parse_filter_output(raw: &str) -> Result<Vec<FilterDefinition>, FilterValidationError> {
    let payload = extract_payload(raw).ok_or(FilterValidationError::NoPayload)?;
    let value: Value = serde_json::from_str(payload)?;
    validate_filters(&value)
}

/// Validates a parsed payload and converts it into filter definitions.
pub fn validate_filters(value: &Value) -> Result<Vec<FilterDefinition>, FilterValidationError> {
    let list = value
        .get(FILTER_LIST_FIELD)
        .ok_or(FilterValidationError::MissingFilterList)?
        .as_array()
        .ok_or(FilterValidationError::NotAList)?;

    if list.is_empty() {
        return Err(FilterValidationError::Empty);
    }

    let mut seen = HashSet::new();
    let mut filters = Vec::with_capacity(list.len());

    for (index, item) in list.iter().enumerate() {
        let filter = validate_filter(index, item)?;
        if !seen.insert(filter.key.clone()) {
            return Err(FilterValidationError::DuplicateKey(filter.key));
        }
        filters.push(filter);
    }

    Ok(filters)
}

fn validate_filter(index: usize, item: &Value) -> Result<FilterDefinition, FilterValidationError> {
    let obj = item
        .as_object()
        .ok_or(FilterValidationError::NotAnObject { index })?;

    // The instruction asks for `type`; some outputs say `kind` instead.
    let kind_raw = non_empty_str(obj.get("type"))
        .or_else(|| non_empty_str(obj.get("kind")))
        .ok_or(FilterValidationError::MissingField {
            index,
            field: "type",
        })?;
    let label = non_empty_str(obj.get("label")).ok_or(FilterValidationError::MissingField {
        index,
        field: "label",
    })?;
    let key = non_empty_str(obj.get("key")).ok_or(FilterValidationError::MissingField {
        index,
        field: "key",
    })?;

    let kind = FilterKind::from_source_type(kind_raw);
    let options = match kind {
        FilterKind::FreeText => Vec::new(),
        FilterKind::SingleChoice | FilterKind::MultiChoice => read_options(obj.get("options")),
    };

    if kind == FilterKind::SingleChoice && options.is_empty() {
        return Err(FilterValidationError::MissingOptions {
            index,
            key: key.to_string(),
        });
    }

    Ok(FilterDefinition {
        kind,
        label: label.to_string(),
        key: key.to_string(),
        options,
    })
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Reads an options list, stringifying scalars and dropping blanks and
/// repeats. A missing or non-list value yields no options.
fn read_options(value: Option<&Value>) -> Vec<String> {
    let Some(items) = value.and_then(Value::as_array) else {
        return Vec::new();
    };

    let mut options: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        let option = match item {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => continue,
        };
        if !option.is_empty() && !options.contains(&option) {
            options.push(option);
        }
    }
    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_payload_converts_all_filters() {
        let value = json!({
            "custom_filters": [
                {"type": "text_input", "label": "Describe your requirements:", "key": "custom_free_text"},
                {"type": "radio", "label": "Level?", "key": "lvl", "options": ["Basic", "Advanced"]},
                {"type": "checkbox", "label": "Areas?", "key": "areas", "options": ["Design", "Performance"]},
                {"type": "checkbox", "label": "Include examples?", "key": "examples"}
            ]
        });
        let filters = validate_filters(&value).unwrap();
        assert_eq!(filters.len(), 4);
        assert_eq!(filters[0].kind, FilterKind::FreeText);
        assert_eq!(filters[1].kind, FilterKind::SingleChoice);
        assert_eq!(filters[1].options, vec!["Basic", "Advanced"]);
        assert_eq!(filters[2].kind, FilterKind::MultiChoice);
        assert!(filters[3].is_flag());
    }

    #[test]
    fn test_missing_list_field_is_rejected() {
        let value = json!({"filters": []});
        assert!(matches!(
            validate_filters(&value),
            Err(FilterValidationError::MissingFilterList)
        ));
    }

    #[test]
    fn test_list_field_of_wrong_shape_is_rejected() {
        let value = json!({"custom_filters": {"type": "radio"}});
        assert!(matches!(
            validate_filters(&value),
            Err(FilterValidationError::NotAList)
        ));
    }

    #[test]
    fn test_empty_list_is_rejected() {
        let value = json!({"custom_filters": []});
        assert!(matches!(
            validate_filters(&value),
            Err(FilterValidationError::Empty)
        ));
    }

    #[test]
    fn test_non_object_element_is_rejected() {
        let value = json!({"custom_filters": ["radio"]});
        assert!(matches!(
            validate_filters(&value),
            Err(FilterValidationError::NotAnObject { index: 0 })
        ));
    }

    #[test]
    fn test_missing_key_is_rejected() {
        let value = json!({
            "custom_filters": [
                {"type": "text_input", "label": "Goal?", "key": "goal"},
                {"type": "radio", "label": "Level?", "options": ["A", "B"]}
            ]
        });
        assert!(matches!(
            validate_filters(&value),
            Err(FilterValidationError::MissingField { index: 1, field: "key" })
        ));
    }

    #[test]
    fn test_blank_label_is_rejected() {
        let value = json!({"custom_filters": [{"type": "text_input", "label": "  ", "key": "k"}]});
        assert!(matches!(
            validate_filters(&value),
            Err(FilterValidationError::MissingField { field: "label", .. })
        ));
    }

    #[test]
    fn test_missing_type_is_rejected() {
        let value = json!({"custom_filters": [{"label": "Goal?", "key": "goal"}]});
        assert!(matches!(
            validate_filters(&value),
            Err(FilterValidationError::MissingField { field: "type", .. })
        ));
    }

    #[test]
    fn test_kind_field_is_accepted_in_place_of_type() {
        let value = json!({"custom_filters": [{"kind": "selectbox", "label": "Tone?", "key": "tone", "options": ["Formal"]}]});
        let filters = validate_filters(&value).unwrap();
        assert_eq!(filters[0].kind, FilterKind::SingleChoice);
    }

    #[test]
    fn test_single_choice_without_options_is_rejected() {
        let value = json!({"custom_filters": [{"type": "radio", "label": "Level?", "key": "lvl"}]});
        assert!(matches!(
            validate_filters(&value),
            Err(FilterValidationError::MissingOptions { .. })
        ));
    }

    #[test]
    fn test_duplicate_keys_are_rejected() {
        let value = json!({
            "custom_filters": [
                {"type": "text_input", "label": "Goal?", "key": "goal"},
                {"type": "text_input", "label": "Other goal?", "key": "goal"}
            ]
        });
        assert!(matches!(
            validate_filters(&value),
            Err(FilterValidationError::DuplicateKey(k)) if k == "goal"
        ));
    }

    #[test]
    fn test_unknown_type_degrades_to_free_text_and_drops_options() {
        let value = json!({"custom_filters": [{"type": "slider", "label": "Length?", "key": "len", "options": [1, 5]}]});
        let filters = validate_filters(&value).unwrap();
        assert_eq!(filters[0].kind, FilterKind::FreeText);
        assert!(filters[0].options.is_empty());
    }

    #[test]
    fn test_options_are_stringified_and_deduplicated() {
        let value = json!({"custom_filters": [{"type": "radio", "label": "Pages?", "key": "pages", "options": [1, "2", " ", "2", true, null]}]});
        let filters = validate_filters(&value).unwrap();
        assert_eq!(filters[0].options, vec!["1", "2", "true"]);
    }

    #[test]
    fn test_parse_filter_output_tolerates_commentary() {
        let raw = "Sure! {\"custom_filters\":[{\"type\":\"radio\",\"label\":\"Level?\",\"key\":\"lvl\",\"options\":[\"Basic\",\"Advanced\"]}]} Let me know!";
        let filters = parse_filter_output(raw).unwrap();
        assert_eq!(filters.len(), 1);
        assert_eq!(filters[0].key, "lvl");
    }

    #[test]
    fn test_parse_filter_output_without_payload() {
        assert!(matches!(
            parse_filter_output("not json"),
            Err(FilterValidationError::NoPayload)
        ));
    }

    #[test]
    fn test_parse_filter_output_with_broken_json() {
        assert!(matches!(
            parse_filter_output("{\"custom_filters\": [}"),
            Err(FilterValidationError::Parse(_))
        ));
    }
}
