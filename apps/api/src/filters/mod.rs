// Dynamic filter generation and validation.
// All model calls go through llm_client, no direct provider calls here.

pub mod choices;
pub mod defaults;
pub mod extract;
pub mod fallback;
pub mod handlers;
pub mod model;
pub mod prompts;
pub mod synthesizer;
pub mod validate;
