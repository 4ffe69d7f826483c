// LLM prompt constants for filter synthesis.

/// Filter synthesis prompt template. Replace `{json_only}` and `{prompt}` before sending.
pub const FILTER_SYNTH_PROMPT_TEMPLATE: &str = r#"{json_only}

Task:
You are an expert in extracting user requirements for optimal prompt design. Analyze the following input prompt and generate a set of highly relevant custom filters that will capture maximum insight into what the user wants. The requirements are as follows:
- There must be exactly one free-form text input filter for the user to describe their requirements in their own words. Label it clearly (for example, "Describe your requirements:").
- All additional filters must be option-based (using types "radio", "checkbox", or "selectbox") to help the user select specific details.
- The filters should capture details such as the specific goal or outcome desired, tone, style, audience preferences, level of detail, technical constraints, and any domain-specific information.
- Every filter must have a non-empty "type", "label" and "key". Every key must be unique.
- "radio" and "selectbox" filters must list at least one option.

Return a JSON object exactly in the following structure:
{
  "custom_filters": [
    {
      "type": "text_input",
      "label": "Describe your requirements:",
      "key": "custom_free_text"
    },
    {
      "type": "radio",
      "label": "Your question here",
      "key": "unique_key_here",
      "options": ["Option1", "Option2"]
    }
  ]
}

Input Prompt:
{prompt}"#;
