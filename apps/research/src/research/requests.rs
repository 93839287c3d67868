//! Typed request builders for the four report kinds.
//!
//! Every report is described by a parameter struct. `ReportRequest::render`
//! validates the parameters and produces the prompt; the model and sampling
//! settings come from the report kind.

use serde::Serialize;

use crate::errors::AppError;
use crate::llm_client::GenerationParams;
use crate::research::prompts::{
    CULTURAL_INTELLIGENCE_INTRO, CULTURAL_INTELLIGENCE_OUTPUT, GAP_ANALYSIS_INTRO,
    GAP_ANALYSIS_OUTPUT, MARKET_INTELLIGENCE_INTRO, MARKET_INTELLIGENCE_OUTPUT,
    TECHNICAL_VALIDATION_INTRO, TECHNICAL_VALIDATION_OUTPUT,
};

/// Specification text beyond this many characters is not sent.
pub const MAX_SPECIFICATION_CHARS: usize = 8000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    GapAnalysis,
    MarketIntelligence,
    TechnicalValidation,
    CulturalIntelligence,
}

impl ReportKind {
    pub const ALL: [ReportKind; 4] = [
        ReportKind::GapAnalysis,
        ReportKind::MarketIntelligence,
        ReportKind::TechnicalValidation,
        ReportKind::CulturalIntelligence,
    ];

    /// Field name of this report in the aggregate JSON document.
    pub fn key(self) -> &'static str {
        match self {
            ReportKind::GapAnalysis => "gap_analysis",
            ReportKind::MarketIntelligence => "market_intelligence",
            ReportKind::TechnicalValidation => "technical_validation",
            ReportKind::CulturalIntelligence => "cultural_intelligence",
        }
    }

    pub fn generation_params(self) -> GenerationParams {
        match self {
            ReportKind::GapAnalysis => GenerationParams::new("gpt-4", 2000, 0.3),
            ReportKind::MarketIntelligence => GenerationParams::new("gpt-4", 2500, 0.4),
            ReportKind::TechnicalValidation => GenerationParams::new("gpt-4-turbo", 2000, 0.2),
            ReportKind::CulturalIntelligence => GenerationParams::new("gpt-4", 3000, 0.3),
        }
    }
}

impl std::fmt::Display for ReportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone)]
pub struct GapAnalysisParams {
    pub specification_content: String,
}

#[derive(Debug, Clone)]
pub struct MarketParams {
    pub target_markets: Vec<String>,
    pub competitors: Vec<String>,
    pub tech_trends: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct TechnicalParams {
    pub architecture_details: String,
    pub api_integrations: String,
    pub scalability_needs: String,
}

#[derive(Debug, Clone)]
pub struct CulturalParams {
    pub target_markets: Vec<String>,
    pub cultural_dimensions: Vec<String>,
    pub hiring_practices: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for MarketParams {
    fn default() -> Self {
        Self {
            target_markets: strings(&["US", "Israel", "Germany", "France", "UK"]),
            competitors: strings(&["LinkedIn Talent", "Greenhouse", "HireVue", "Pymetrics"]),
            tech_trends: strings(&[
                "AI hiring",
                "Remote work",
                "Cultural diversity",
                "Skills-based hiring",
            ]),
        }
    }
}

impl Default for TechnicalParams {
    fn default() -> Self {
        Self {
            architecture_details:
                "Microservices with React frontend, Node.js backend, PostgreSQL database"
                    .to_string(),
            api_integrations: "OpenAI, HuggingFace, GitHub, LinkedIn APIs".to_string(),
            scalability_needs: "Global deployment, high availability, auto-scaling".to_string(),
        }
    }
}

impl Default for CulturalParams {
    fn default() -> Self {
        Self {
            target_markets: strings(&[
                "United States",
                "Israel",
                "Germany",
                "France",
                "United Kingdom",
            ]),
            cultural_dimensions: strings(&[
                "Communication style",
                "Hierarchy",
                "Innovation",
                "Risk tolerance",
            ]),
            hiring_practices: strings(&[
                "Interview styles",
                "Decision making",
                "Onboarding",
                "Performance evaluation",
            ]),
        }
    }
}

/// One fully-parameterized report request.
#[derive(Debug, Clone)]
pub enum ReportRequest {
    GapAnalysis(GapAnalysisParams),
    MarketIntelligence(MarketParams),
    TechnicalValidation(TechnicalParams),
    CulturalIntelligence(CulturalParams),
}

impl ReportRequest {
    pub fn kind(&self) -> ReportKind {
        match self {
            ReportRequest::GapAnalysis(_) => ReportKind::GapAnalysis,
            ReportRequest::MarketIntelligence(_) => ReportKind::MarketIntelligence,
            ReportRequest::TechnicalValidation(_) => ReportKind::TechnicalValidation,
            ReportRequest::CulturalIntelligence(_) => ReportKind::CulturalIntelligence,
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        let kind = self.kind();
        match self {
            ReportRequest::GapAnalysis(p) => {
                require_text(kind, "specification_content", &p.specification_content)
            }
            ReportRequest::MarketIntelligence(p) => {
                require_list(kind, "target_markets", &p.target_markets)?;
                require_list(kind, "competitors", &p.competitors)?;
                require_list(kind, "tech_trends", &p.tech_trends)
            }
            ReportRequest::TechnicalValidation(p) => {
                require_text(kind, "architecture_details", &p.architecture_details)?;
                require_text(kind, "api_integrations", &p.api_integrations)?;
                require_text(kind, "scalability_needs", &p.scalability_needs)
            }
            ReportRequest::CulturalIntelligence(p) => {
                require_list(kind, "target_markets", &p.target_markets)?;
                require_list(kind, "cultural_dimensions", &p.cultural_dimensions)?;
                require_list(kind, "hiring_practices", &p.hiring_practices)
            }
        }
    }

    /// Validates the parameters and renders the prompt text.
    pub fn render(&self) -> Result<String, AppError> {
        self.validate()?;

        let prompt = match self {
            ReportRequest::GapAnalysis(p) => format!(
                "{GAP_ANALYSIS_INTRO}\n{}\n\n{GAP_ANALYSIS_OUTPUT}",
                truncate_chars(&p.specification_content, MAX_SPECIFICATION_CHARS)
            ),
            ReportRequest::MarketIntelligence(p) => format!(
                "{MARKET_INTELLIGENCE_INTRO}\n\nRESEARCH FOCUS:\n\
                 Target Markets: {}\n\
                 Competitive Landscape: {}\n\
                 Technology Trends: {}\n\n{MARKET_INTELLIGENCE_OUTPUT}",
                p.target_markets.join(", "),
                p.competitors.join(", "),
                p.tech_trends.join(", ")
            ),
            ReportRequest::TechnicalValidation(p) => format!(
                "{TECHNICAL_VALIDATION_INTRO}\n\nTECHNICAL COMPONENTS:\n\
                 Architecture: {}\n\
                 API Integrations: {}\n\
                 Scalability Requirements: {}\n\n{TECHNICAL_VALIDATION_OUTPUT}",
                p.architecture_details, p.api_integrations, p.scalability_needs
            ),
            ReportRequest::CulturalIntelligence(p) => format!(
                "{CULTURAL_INTELLIGENCE_INTRO}\n\nCULTURAL RESEARCH SCOPE:\n\
                 Markets: {}\n\
                 Cultural Dimensions: {}\n\
                 Hiring Practices: {}\n\n{CULTURAL_INTELLIGENCE_OUTPUT}",
                p.target_markets.join(", "),
                p.cultural_dimensions.join(", "),
                p.hiring_practices.join(", ")
            ),
        };

        Ok(prompt)
    }
}

fn require_text(kind: ReportKind, field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::InvalidRequest(format!(
            "{kind}: {field} must not be empty"
        )));
    }
    Ok(())
}

fn require_list(kind: ReportKind, field: &str, values: &[String]) -> Result<(), AppError> {
    if values.iter().all(|v| v.trim().is_empty()) {
        return Err(AppError::InvalidRequest(format!(
            "{kind}: {field} must list at least one entry"
        )));
    }
    Ok(())
}

/// Returns at most the first `max` characters of `text`, on a char boundary.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
