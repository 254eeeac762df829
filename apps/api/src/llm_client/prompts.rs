// Cross-cutting prompt fragments shared by every LLM call.
// Feature-specific templates live in recommend::prompts.

/// System instruction sent with every completion request.
pub const COUNSELOR_SYSTEM: &str = "You are an expert career counselor and AI assistant. \
    Provide concise, actionable career advice. \
    Always return valid JSON only, no additional text or formatting.";

/// Closing instruction appended to every user prompt.
pub const JSON_ONLY_INSTRUCTION: &str =
    "Return the JSON only. Do NOT include any text before or after it.";
