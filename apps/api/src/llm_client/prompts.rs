// Prompt fragments shared by more than one caller.

/// Instruction block that demands a bare JSON object and nothing else.
pub const JSON_ONLY_INSTRUCTION: &str = "IMPORTANT: Output must be strictly valid JSON \
    with no extra text, markdown, or explanations. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";
