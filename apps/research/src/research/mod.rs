// Research reports: gap analysis, market intelligence, technical validation,
// cultural intelligence, plus single-claim verification.
// All model calls go through llm_client; nothing here talks to the API directly.

pub mod claims;
pub mod executor;
pub mod prompts;
pub mod requests;
pub mod shapes;
pub mod sources;
