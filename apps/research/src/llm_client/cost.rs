//! Model cost table and per-call cost estimation.
//!
//! The estimate is intentionally crude: the prompt's character count stands in
//! for its input token count, and the full `max_output_tokens` allowance is
//! charged as output whether or not the model used it.

/// Per-token rates (USD) for one model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelRate {
    pub input: f64,
    pub output: f64,
}

/// Rate charged for `gpt-4`, and for any model missing from the table.
const DEFAULT_RATE: ModelRate = ModelRate {
    input: 0.03 / 1000.0,
    output: 0.06 / 1000.0,
};

const COST_TABLE: &[(&str, ModelRate)] = &[
    ("gpt-4", DEFAULT_RATE),
    (
        "gpt-4-turbo",
        ModelRate {
            input: 0.01 / 1000.0,
            output: 0.03 / 1000.0,
        },
    ),
    (
        "gpt-3.5-turbo",
        ModelRate {
            input: 0.001 / 1000.0,
            output: 0.002 / 1000.0,
        },
    ),
];

/// Looks up the rate for `model`, falling back to the `gpt-4` entry.
pub fn rate_for(model: &str) -> ModelRate {
    COST_TABLE
        .iter()
        .find(|(name, _)| *name == model)
        .map(|(_, rate)| *rate)
        .unwrap_or(DEFAULT_RATE)
}

/// Estimated USD cost of sending `prompt` to `model` with the given output allowance.
pub fn estimate_cost(model: &str, prompt: &str, max_output_tokens: u32) -> f64 {
    let rate = rate_for(model);
    let approx_input_tokens = prompt.chars().count() as f64;
    approx_input_tokens * rate.input + f64::from(max_output_tokens) * rate.output
}
