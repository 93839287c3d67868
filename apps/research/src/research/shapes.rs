//! Declared output shapes for every model response the executor consumes.
//!
//! The gateway hands back raw text. `parse_validated` strips code fences,
//! parses a JSON object, deserializes it into the declared shape and runs the
//! shape's range checks. Any failure is `ResponseNotParsable`. On success the
//! parsed JSON value is returned as-is, so fields outside the declared shape
//! survive.
//!
//! Report fields are all optional: a field the model left out is fine, a field
//! that is present must have the declared type and range. Shape structs are
//! only read through `check`; their fields document the contract.

#![allow(dead_code)]

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::errors::AppError;
use crate::llm_client::strip_json_fences;

pub trait ExpectedShape: DeserializeOwned {
    /// Range and enum checks serde cannot express.
    fn check(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Parses `text` as JSON and validates it against `T`.
pub fn parse_validated<T: ExpectedShape>(kind: &str, text: &str) -> Result<Value, AppError> {
    let value: Value = serde_json::from_str(strip_json_fences(text))
        .map_err(|e| AppError::not_parsable(kind, format!("invalid JSON: {e}")))?;

    if !value.is_object() {
        return Err(AppError::not_parsable(kind, "expected a JSON object"));
    }

    let shaped: T = serde_json::from_value(value.clone())
        .map_err(|e| AppError::not_parsable(kind, format!("unexpected shape: {e}")))?;
    shaped
        .check()
        .map_err(|reason| AppError::not_parsable(kind, reason))?;

    Ok(value)
}

fn check_score(field: &str, score: f64) -> Result<(), String> {
    if (0.0..=100.0).contains(&score) {
        Ok(())
    } else {
        Err(format!("{field} must be within 0-100, got {score}"))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Report shapes
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GapAnalysis {
    #[serde(default)]
    pub missing_components: Vec<Value>,
    #[serde(default)]
    pub enhancement_opportunities: Vec<Value>,
    #[serde(default)]
    pub technical_gaps: Vec<Value>,
    #[serde(default)]
    pub cultural_intelligence_gaps: Vec<Value>,
    #[serde(default)]
    pub market_validation_needs: Vec<Value>,
    #[serde(default)]
    pub implementation_blockers: Vec<Value>,
    #[serde(default)]
    pub priority_recommendations: Vec<Value>,
    pub estimated_effort: Option<String>,
    pub confidence_score: Option<f64>,
}

impl ExpectedShape for GapAnalysis {
    fn check(&self) -> Result<(), String> {
        self.confidence_score
            .map_or(Ok(()), |score| check_score("confidence_score", score))
    }
}

#[derive(Debug, Deserialize)]
pub struct MarketIntelligence {
    pub market_size: Option<Value>,
    pub competitive_analysis: Option<Value>,
    #[serde(default)]
    pub cultural_trends: Vec<Value>,
    pub technology_adoption: Option<Value>,
    #[serde(default)]
    pub regulatory_considerations: Vec<Value>,
    #[serde(default)]
    pub market_opportunities: Vec<Value>,
    #[serde(default)]
    pub entry_barriers: Vec<Value>,
    #[serde(default)]
    pub success_factors: Vec<Value>,
}

impl ExpectedShape for MarketIntelligence {}

#[derive(Debug, Deserialize)]
pub struct TechnicalValidation {
    pub architecture_assessment: Option<Map<String, Value>>,
    pub api_integration_feasibility: Option<Map<String, Value>>,
    #[serde(default)]
    pub performance_optimization: Vec<Value>,
    #[serde(default)]
    pub security_considerations: Vec<Value>,
    /// Free text such as "low", "medium" or "high".
    pub implementation_complexity: Option<String>,
    pub resource_requirements: Option<Map<String, Value>>,
    #[serde(default)]
    pub risk_factors: Vec<Value>,
    #[serde(default)]
    pub mitigation_strategies: Vec<Value>,
}

impl ExpectedShape for TechnicalValidation {}

#[derive(Debug, Deserialize)]
pub struct CulturalIntelligence {
    pub cultural_profiles: Option<Map<String, Value>>,
    #[serde(default)]
    pub bias_mitigation_strategies: Vec<Value>,
    #[serde(default)]
    pub integration_best_practices: Vec<Value>,
    #[serde(default)]
    pub cultural_adaptation_indicators: Vec<Value>,
    #[serde(default)]
    pub success_metrics: Vec<Value>,
}

impl ExpectedShape for CulturalIntelligence {}

// ────────────────────────────────────────────────────────────────────────────
// Candidate and claim shapes
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CulturalFit {
    pub cultural_score: Option<f64>,
    pub communication_style: Option<String>,
    pub adaptation_potential: Option<String>,
    #[serde(default)]
    pub market_preferences: Vec<Value>,
    #[serde(default)]
    pub strengths: Vec<Value>,
    #[serde(default)]
    pub development_areas: Vec<Value>,
}

impl ExpectedShape for CulturalFit {
    fn check(&self) -> Result<(), String> {
        self.cultural_score
            .map_or(Ok(()), |score| check_score("cultural_score", score))
    }
}

#[derive(Debug, Deserialize)]
pub struct TechnicalSkills {
    pub technical_score: Option<f64>,
    pub skill_proficiency: Option<Map<String, Value>>,
    pub experience_level: Option<String>,
    pub learning_potential: Option<String>,
    #[serde(default)]
    pub technical_strengths: Vec<Value>,
    #[serde(default)]
    pub skill_gaps: Vec<Value>,
}

impl ExpectedShape for TechnicalSkills {
    fn check(&self) -> Result<(), String> {
        self.technical_score
            .map_or(Ok(()), |score| check_score("technical_score", score))
    }
}

#[derive(Debug, Deserialize)]
pub struct ClaimVerdict {
    pub confidence_score: f64,
    pub explanation: String,
}

impl ExpectedShape for ClaimVerdict {
    fn check(&self) -> Result<(), String> {
        check_score("confidence_score", self.confidence_score)?;
        if self.explanation.trim().is_empty() {
            return Err("explanation must not be empty".to_string());
        }
        Ok(())
    }
}
