mod candidates;
mod config;
mod errors;
mod llm_client;
mod persistence;
mod research;
mod summary;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::candidates::analyzer::analyze_csv_candidates;
use crate::config::Config;
use crate::llm_client::{Admission, LlmClient, OpenAiUpstream, Session};
use crate::persistence::ReportWriter;
use crate::research::claims::{verification_record, verify_claim};
use crate::research::executor::{execute_comprehensive_research, ResearchInputs};

/// Budget-capped research reports and candidate scoring over a chat-completion API.
#[derive(Debug, Parser)]
#[command(name = "research", version)]
struct Cli {
    /// Session budget in USD (overrides COST_LIMIT_PER_SESSION).
    #[arg(long, global = true)]
    cost_limit: Option<f64>,

    /// Directory for JSON output (overrides OUTPUT_DIRECTORY).
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate the research report, then optionally analyze candidates.
    Run {
        /// Specification file to include in gap analysis. Repeatable.
        #[arg(long = "spec", value_name = "PATH")]
        specs: Vec<PathBuf>,

        /// Candidate CSV to analyze after the report, if it exists.
        #[arg(long, value_name = "CSV")]
        candidates: Option<PathBuf>,
    },
    /// Analyze candidates from a CSV file.
    Candidates {
        #[arg(value_name = "CSV")]
        csv: PathBuf,
    },
    /// Ask the model to verify a single claim.
    VerifyClaim { claim: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (fails on a missing API key)
    let mut config = Config::from_env()?;
    apply_overrides(&mut config, &cli)?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting research executor v{}", env!("CARGO_PKG_VERSION"));

    let upstream = OpenAiUpstream::new(
        &config.openai_base_url,
        config.openai_api_key.clone(),
        config.request_timeout,
    )?;
    let llm = LlmClient::new(
        Arc::new(upstream),
        Admission::new(config.max_concurrent_requests, config.requests_per_minute),
    );
    info!(
        "LLM client initialized (max concurrent: {}, pacing interval: {}ms)",
        config.max_concurrent_requests,
        llm.pacing_interval().as_millis()
    );

    let session = Session::new(config.cost_limit_per_session);
    info!(
        "Session {} started with a ${:.2} budget",
        session.id(),
        session.limit()
    );

    let writer = ReportWriter::new(&config.output_directory)?;
    info!("Writing output to {}", writer.directory().display());

    match cli.command {
        Command::Run { specs, candidates } => {
            let report =
                execute_comprehensive_research(&specs, ResearchInputs::default(), &llm, &session)
                    .await;
            let saved = writer.write("research_report", &report).await;
            summary::print(&summary::research_lines(&report, saved.as_deref()));

            if let Some(csv) = candidates {
                if csv.exists() {
                    info!("Analyzing candidates from {}", csv.display());
                    analyze_and_report(&csv, &config, &llm, &session, &writer).await;
                } else {
                    warn!("Candidate file {} not found, skipping analysis", csv.display());
                }
            }
        }
        Command::Candidates { csv } => {
            analyze_and_report(&csv, &config, &llm, &session, &writer).await;
        }
        Command::VerifyClaim { claim } => {
            let outcome = verify_claim(&claim, &llm, &session).await;
            let record = verification_record(&outcome);
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
    }

    info!(
        "Session {} finished. Total estimated cost: ${:.2} (${:.2} remaining)",
        session.id(),
        session.spent(),
        session.remaining()
    );

    Ok(())
}

async fn analyze_and_report(
    csv: &std::path::Path,
    config: &Config,
    llm: &LlmClient,
    session: &Session,
    writer: &ReportWriter,
) {
    let outcome =
        analyze_csv_candidates(csv, config.max_concurrent_requests, llm, session).await;
    let saved = match &outcome {
        Ok(batch) => {
            writer
                .write("candidate_analysis", &batch.analysis_results)
                .await
        }
        Err(e) => {
            tracing::error!(code = e.code(), "CSV analysis failed: {e}");
            None
        }
    };
    summary::print(&summary::candidate_lines(&outcome, saved.as_deref()));
}

fn apply_overrides(config: &mut Config, cli: &Cli) -> Result<()> {
    if let Some(limit) = cli.cost_limit {
        if !limit.is_finite() || limit <= 0.0 {
            bail!("--cost-limit must be a positive amount, got {limit}");
        }
        config.cost_limit_per_session = limit;
    }
    if let Some(dir) = &cli.output_dir {
        config.output_directory = dir.clone();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config::from_lookup(|key| (key == "OPENAI_API_KEY").then(|| "sk-test".to_string()))
            .unwrap()
    }

    #[test]
    fn test_cli_parses_run_with_specs() {
        let cli = Cli::try_parse_from([
            "research",
            "run",
            "--spec",
            "a.md",
            "--spec",
            "b.md",
            "--candidates",
            "people.csv",
        ])
        .unwrap();
        match cli.command {
            Command::Run { specs, candidates } => {
                assert_eq!(specs, vec![PathBuf::from("a.md"), PathBuf::from("b.md")]);
                assert_eq!(candidates, Some(PathBuf::from("people.csv")));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_cli_global_overrides_after_subcommand() {
        let cli = Cli::try_parse_from([
            "research",
            "candidates",
            "people.csv",
            "--cost-limit",
            "2.5",
            "--output-dir",
            "/tmp/out",
        ])
        .unwrap();
        let mut config = base_config();
        apply_overrides(&mut config, &cli).unwrap();
        assert_eq!(config.cost_limit_per_session, 2.5);
        assert_eq!(config.output_directory, PathBuf::from("/tmp/out"));
    }

    #[test]
    fn test_cli_verify_claim() {
        let cli = Cli::try_parse_from(["research", "verify-claim", "Ana led the migration."])
            .unwrap();
        assert!(matches!(cli.command, Command::VerifyClaim { ref claim } if claim == "Ana led the migration."));
    }

    #[test]
    fn test_non_positive_cost_limit_override_rejected() {
        let cli = Cli::try_parse_from(["research", "--cost-limit", "0", "run"]).unwrap();
        let mut config = base_config();
        assert!(apply_overrides(&mut config, &cli).is_err());
    }
}
