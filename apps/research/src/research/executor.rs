//! Report generation. Runs the four report kinds concurrently and assembles
//! the aggregate research report.
//!
//! Each report is rendered from its typed request, sent through the gateway,
//! and validated against its declared shape. A failing report becomes an
//! inline error record in its own field; the others are unaffected.

use std::path::PathBuf;

use serde::Serialize;
use serde_json::Value;
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::{LlmClient, Session};
use crate::research::requests::{
    CulturalParams, GapAnalysisParams, MarketParams, ReportKind, ReportRequest, TechnicalParams,
};
use crate::research::shapes::{
    parse_validated, CulturalIntelligence, GapAnalysis, MarketIntelligence, TechnicalValidation,
};
use crate::research::sources::load_specification_files;

/// Inputs for the three reports that do not depend on specification files.
#[derive(Debug, Clone, Default)]
pub struct ResearchInputs {
    pub market: MarketParams,
    pub technical: TechnicalParams,
    pub cultural: CulturalParams,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResearchReport {
    pub execution_timestamp: String,
    pub session_id: Uuid,
    pub total_cost: f64,
    pub gap_analysis: Value,
    pub market_intelligence: Value,
    pub technical_validation: Value,
    pub cultural_intelligence: Value,
    /// One entry per specification file that could not be read.
    pub source_warnings: Vec<String>,
}

impl ResearchReport {
    pub fn section(&self, kind: ReportKind) -> &Value {
        match kind {
            ReportKind::GapAnalysis => &self.gap_analysis,
            ReportKind::MarketIntelligence => &self.market_intelligence,
            ReportKind::TechnicalValidation => &self.technical_validation,
            ReportKind::CulturalIntelligence => &self.cultural_intelligence,
        }
    }
}

/// Runs a single report request and returns its validated JSON.
pub async fn run_report(
    request: &ReportRequest,
    llm: &LlmClient,
    session: &Session,
) -> Result<Value, AppError> {
    let kind = request.kind();
    info!("Executing {kind}");

    let prompt = request.render()?;
    let text = llm
        .invoke(session, &prompt, &kind.generation_params())
        .await?;

    match kind {
        ReportKind::GapAnalysis => parse_validated::<GapAnalysis>(kind.key(), &text),
        ReportKind::MarketIntelligence => parse_validated::<MarketIntelligence>(kind.key(), &text),
        ReportKind::TechnicalValidation => {
            parse_validated::<TechnicalValidation>(kind.key(), &text)
        }
        ReportKind::CulturalIntelligence => {
            parse_validated::<CulturalIntelligence>(kind.key(), &text)
        }
    }
}

/// Loads the specification files and runs all four reports against one session.
pub async fn execute_comprehensive_research(
    specification_files: &[PathBuf],
    inputs: ResearchInputs,
    llm: &LlmClient,
    session: &Session,
) -> ResearchReport {
    info!("Starting comprehensive research execution");

    let bundle = load_specification_files(specification_files).await;

    let gap = ReportRequest::GapAnalysis(GapAnalysisParams {
        specification_content: bundle.content,
    });
    let market = ReportRequest::MarketIntelligence(inputs.market);
    let technical = ReportRequest::TechnicalValidation(inputs.technical);
    let cultural = ReportRequest::CulturalIntelligence(inputs.cultural);

    let (gap_result, market_result, technical_result, cultural_result) = tokio::join!(
        run_report(&gap, llm, session),
        run_report(&market, llm, session),
        run_report(&technical, llm, session),
        run_report(&cultural, llm, session),
    );

    ResearchReport {
        execution_timestamp: chrono::Local::now().to_rfc3339(),
        session_id: session.id(),
        total_cost: session.spent(),
        gap_analysis: into_record(ReportKind::GapAnalysis, gap_result),
        market_intelligence: into_record(ReportKind::MarketIntelligence, market_result),
        technical_validation: into_record(ReportKind::TechnicalValidation, technical_result),
        cultural_intelligence: into_record(ReportKind::CulturalIntelligence, cultural_result),
        source_warnings: bundle.warnings,
    }
}

fn into_record(kind: ReportKind, outcome: Result<Value, AppError>) -> Value {
    outcome.unwrap_or_else(|e| {
        error!(code = e.code(), "{kind} failed: {e}");
        e.to_record()
    })
}
