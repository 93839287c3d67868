//! Candidate analysis: cultural-fit and technical-skills calls per candidate,
//! combined into a weighted overall score.
//!
//! Each candidate's two calls run in order. Candidates themselves are handled
//! by a bounded pool of workers; results keep input order. Only the first
//! [`MAX_ANALYZED_CANDIDATES`] rows of a batch are analyzed.

use std::path::Path;

use futures::stream::{self, StreamExt};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{error, info};

use crate::candidates::loader::{load_candidates, CandidateRecord};
use crate::candidates::prompts::{cultural_fit_prompt, technical_skills_prompt};
use crate::candidates::scoring::{overall_score, score_from};
use crate::errors::AppError;
use crate::llm_client::{GenerationParams, LlmClient, Session};
use crate::research::shapes::{parse_validated, CulturalFit, ExpectedShape, TechnicalSkills};

/// Hard cap on rows analyzed per batch.
pub const MAX_ANALYZED_CANDIDATES: usize = 10;

#[derive(Debug, Clone, Serialize)]
pub struct CandidateAnalysis {
    pub candidate_id: Value,
    pub name: Value,
    pub cultural_analysis: Value,
    pub technical_analysis: Value,
    pub overall_score: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct CandidateBatchSummary {
    /// Every row in the input, including those beyond the analysis cap.
    pub total_candidates: usize,
    pub analyzed_candidates: usize,
    pub analysis_results: Vec<CandidateAnalysis>,
    pub total_cost: f64,
}

fn candidate_params() -> GenerationParams {
    GenerationParams::new("gpt-4", 800, 0.3)
}

/// Runs one sub-analysis. A failure degrades to `{"error": ..., <score_field>: 0}`.
async fn sub_analysis<T: ExpectedShape>(
    kind: &str,
    score_field: &str,
    prompt: String,
    llm: &LlmClient,
    session: &Session,
) -> Value {
    let outcome = match llm.invoke(session, &prompt, &candidate_params()).await {
        Ok(text) => parse_validated::<T>(kind, &text),
        Err(e) => Err(AppError::from(e)),
    };

    outcome.unwrap_or_else(|e| {
        error!(code = e.code(), "{kind} failed: {e}");
        json!({ "error": e.to_string(), score_field: 0 })
    })
}

pub async fn analyze_candidate(
    candidate: &CandidateRecord,
    llm: &LlmClient,
    session: &Session,
) -> CandidateAnalysis {
    let profile = candidate.profile_json();

    let cultural_analysis = sub_analysis::<CulturalFit>(
        "cultural_fit",
        "cultural_score",
        cultural_fit_prompt(&profile),
        llm,
        session,
    )
    .await;
    let technical_analysis = sub_analysis::<TechnicalSkills>(
        "technical_skills",
        "technical_score",
        technical_skills_prompt(&profile),
        llm,
        session,
    )
    .await;

    let overall_score = overall_score(
        score_from(&technical_analysis, "technical_score"),
        score_from(&cultural_analysis, "cultural_score"),
    );

    CandidateAnalysis {
        candidate_id: candidate.id(),
        name: candidate.name(),
        cultural_analysis,
        technical_analysis,
        overall_score,
    }
}

/// Analyzes up to [`MAX_ANALYZED_CANDIDATES`] records with at most `workers`
/// candidates in flight.
pub async fn analyze_candidates(
    candidates: &[CandidateRecord],
    workers: usize,
    llm: &LlmClient,
    session: &Session,
) -> CandidateBatchSummary {
    let analysis_results: Vec<CandidateAnalysis> = stream::iter(
        candidates.iter().take(MAX_ANALYZED_CANDIDATES),
    )
    .map(|candidate| analyze_candidate(candidate, llm, session))
    .buffered(workers.max(1))
    .collect()
    .await;

    CandidateBatchSummary {
        total_candidates: candidates.len(),
        analyzed_candidates: analysis_results.len(),
        analysis_results,
        total_cost: session.spent(),
    }
}

/// Loads the CSV at `path` and analyzes its candidates.
pub async fn analyze_csv_candidates(
    path: &Path,
    workers: usize,
    llm: &LlmClient,
    session: &Session,
) -> Result<CandidateBatchSummary, AppError> {
    info!("Analyzing candidates from CSV: {}", path.display());
    let candidates = load_candidates(path)?;
    Ok(analyze_candidates(&candidates, workers, llm, session).await)
}
