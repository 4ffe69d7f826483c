// LLM prompt constants for answer generation.

pub const ANSWER_SYSTEM: &str =
    "You are a knowledgeable AI assistant. Provide clear and precise answers.";

/// Shown when the chat call fails for any reason other than the model id.
pub const ANSWER_FAILED_MESSAGE: &str = "Error generating response.";

/// Shown when neither the primary nor the fallback model is available.
pub const INVALID_MODEL_MESSAGE: &str = "Invalid model or request parameters.";
