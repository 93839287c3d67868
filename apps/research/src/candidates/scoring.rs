//! Overall candidate score, a fixed weighted average of the technical and
//! cultural sub-scores returned by the model.

use serde_json::Value;

pub const TECHNICAL_WEIGHT: f64 = 0.6;
pub const CULTURAL_WEIGHT: f64 = 0.4;

/// `technical * 0.6 + cultural * 0.4` rounded half to even, with both inputs
/// clamped to 0–100.
pub fn overall_score(technical_score: f64, cultural_score: f64) -> u32 {
    let technical = clamp_score(technical_score);
    let cultural = clamp_score(cultural_score);
    (technical * TECHNICAL_WEIGHT + cultural * CULTURAL_WEIGHT).round_ties_even() as u32
}

/// Reads a numeric sub-score from an analysis record. Missing or non-numeric → 0.
pub fn score_from(record: &Value, field: &str) -> f64 {
    record.get(field).and_then(Value::as_f64).unwrap_or(0.0)
}

fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 100.0)
    }
}
