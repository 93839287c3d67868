//! Plain-text run summaries printed to stdout after each command.

use std::path::Path;

use serde_json::Value;

use crate::candidates::analyzer::CandidateBatchSummary;
use crate::errors::AppError;
use crate::research::executor::ResearchReport;
use crate::research::requests::ReportKind;

const RULE: &str = "==================================================";

fn list_len(section: &Value, field: &str) -> usize {
    section
        .get(field)
        .and_then(Value::as_array)
        .map(Vec::len)
        .unwrap_or(0)
}

fn is_degraded(section: &Value) -> bool {
    section.get("error").is_some()
}

pub fn research_lines(report: &ResearchReport, saved_to: Option<&Path>) -> Vec<String> {
    let mut lines = vec![
        String::new(),
        RULE.to_string(),
        "COMPREHENSIVE RESEARCH COMPLETED".to_string(),
        RULE.to_string(),
        format!("Total Cost: ${:.2}", report.total_cost),
        format!("Execution Time: {}", report.execution_timestamp),
    ];

    match saved_to {
        Some(path) => lines.push(format!("Report: {}", path.display())),
        None => lines.push("Report: not saved".to_string()),
    }

    for warning in &report.source_warnings {
        lines.push(format!("Warning: {warning}"));
    }

    let gap = &report.gap_analysis;
    if !is_degraded(gap) {
        let confidence = gap
            .get("confidence_score")
            .and_then(Value::as_f64)
            .unwrap_or(0.0);
        lines.push(String::new());
        lines.push(format!("Gap Analysis - Confidence: {confidence}%"));
        lines.push(format!(
            "Missing Components: {}",
            list_len(gap, "missing_components")
        ));
        lines.push(format!(
            "Enhancement Opportunities: {}",
            list_len(gap, "enhancement_opportunities")
        ));
    }

    let market = &report.market_intelligence;
    if !is_degraded(market) {
        lines.push(String::new());
        lines.push("Market Intelligence:".to_string());
        lines.push(format!(
            "Market Opportunities: {}",
            list_len(market, "market_opportunities")
        ));
        lines.push(format!(
            "Success Factors: {}",
            list_len(market, "success_factors")
        ));
    }

    let degraded: Vec<&str> = ReportKind::ALL
        .iter()
        .filter(|kind| is_degraded(report.section(**kind)))
        .map(|kind| kind.key())
        .collect();
    if !degraded.is_empty() {
        lines.push(String::new());
        lines.push(format!("Degraded sections: {}", degraded.join(", ")));
    }

    lines
}

pub fn candidate_lines(
    outcome: &Result<CandidateBatchSummary, AppError>,
    saved_to: Option<&Path>,
) -> Vec<String> {
    let mut lines = vec![String::new(), "Candidate Analysis:".to_string()];
    match outcome {
        Ok(summary) => {
            lines.push(format!("Total Candidates: {}", summary.total_candidates));
            lines.push(format!("Analyzed: {}", summary.analyzed_candidates));
            lines.push(format!("Total Cost: ${:.2}", summary.total_cost));
            match saved_to {
                Some(path) => lines.push(format!("Results: {}", path.display())),
                None => lines.push("Results: not saved".to_string()),
            }
        }
        Err(e) => lines.push(e.to_record().to_string()),
    }
    lines
}

pub fn print(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}
