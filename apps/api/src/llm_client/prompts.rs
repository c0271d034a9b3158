// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.

/// Closing instruction for prompts sent with a single-object response schema.
pub const OBJECT_SCHEMA_INSTRUCTION: &str =
    "Ensure the output is a single valid JSON object that conforms to the provided schema.";

/// Closing instruction for prompts sent with an array response schema.
pub const ARRAY_SCHEMA_INSTRUCTION: &str =
    "Ensure the output is a valid JSON array of objects that conforms to the provided schema.";
