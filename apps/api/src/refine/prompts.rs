// LLM prompt constants for prompt refinement.

/// Instruction placed before the naive prompt and the user's preferences.
pub const REFINEMENT_INSTRUCTION: &str = "You are an expert prompt optimizer. \
    Transform the given naive prompt into a highly detailed, structured, and clear prompt \
    that maximizes response quality from an AI model. Ensure the refined prompt is \
    comprehensive and includes all necessary details to guide the AI model effectively. \
    Return only the refined prompt.";

/// Shown to the user when refinement fails and the naive prompt is used as-is.
pub const REFINEMENT_FAILED_NOTICE: &str =
    "Prompt refinement failed; the original prompt will be used unchanged.";
