// Meal planning: prompt building, schema-constrained generation, dish swaps,
// and the HTTP handlers that expose them.
// All LLM calls go through llm_client, never directly to Gemini.

pub mod generator;
pub mod handlers;
pub mod prompts;
pub mod swap;
