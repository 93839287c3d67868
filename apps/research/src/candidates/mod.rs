// Candidate analysis: CSV rows scored on cultural fit and technical skills.
// All model calls go through llm_client.

pub mod analyzer;
pub mod loader;
pub mod prompts;
pub mod scoring;
