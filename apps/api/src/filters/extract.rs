//! Locates the JSON payload inside raw model output.

use crate::llm_client::strip_json_fences;

/// Returns the slice from the first `{` to the last `}` of `text`, after
/// stripping any code fences.
///
/// Greedy on purpose: nested objects and braces inside string values stay
/// intact. Braces in commentary outside the payload widen the slice and make
/// it unparsable; the caller treats that as a failed attempt.
pub fn extract_payload(text: &str) -> Option<&str> {
    let text = strip_json_fences(text);
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}
