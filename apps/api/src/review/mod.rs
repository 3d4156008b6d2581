// Resume review: document extraction, versioned prompt templates, the LLM
// round-trip and the feedback parser that turns its reply into a record.
// All LLM calls go through llm_client.

pub mod extract;
pub mod handlers;
pub mod parser;
pub mod prompts;
pub mod reviewer;
pub mod sections;
