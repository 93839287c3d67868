//! Claim verification. Asks the model to rate a single factual claim.

use serde::Serialize;
use serde_json::Value;

use crate::errors::AppError;
use crate::llm_client::{GenerationParams, LlmClient, Session};
use crate::research::prompts::{CLAIM_VERIFICATION_INTRO, CLAIM_VERIFICATION_OUTPUT};
use crate::research::shapes::{parse_validated, ClaimVerdict};

pub const CLAIM_MODEL: &str = "gpt-4.1-mini";

#[derive(Debug, Clone, Serialize)]
pub struct ClaimVerification {
    pub claim: String,
    pub confidence_score: f64,
    pub explanation: String,
}

pub fn render_claim_prompt(claim: &str) -> Result<String, AppError> {
    let claim = claim.trim();
    if claim.is_empty() {
        return Err(AppError::InvalidRequest("claim must not be empty".into()));
    }
    Ok(format!(
        "{CLAIM_VERIFICATION_INTRO} Claim: '{claim}'\n\n{CLAIM_VERIFICATION_OUTPUT}"
    ))
}

pub async fn verify_claim(
    claim: &str,
    llm: &LlmClient,
    session: &Session,
) -> Result<ClaimVerification, AppError> {
    let prompt = render_claim_prompt(claim)?;
    let text = llm
        .invoke(session, &prompt, &GenerationParams::new(CLAIM_MODEL, 800, 0.3))
        .await?;

    let value = parse_validated::<ClaimVerdict>("claim_verification", &text)?;
    Ok(ClaimVerification {
        claim: claim.trim().to_string(),
        confidence_score: value["confidence_score"].as_f64().unwrap_or_default(),
        explanation: value["explanation"]
            .as_str()
            .map(str::to_string)
            .unwrap_or_default(),
    })
}

/// Verification result, or the inline error record if it failed.
pub fn verification_record(outcome: &Result<ClaimVerification, AppError>) -> Value {
    match outcome {
        Ok(verification) => serde_json::to_value(verification).unwrap_or(Value::Null),
        Err(e) => e.to_record(),
    }
}
