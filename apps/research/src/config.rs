use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_COST_LIMIT: f64 = 25.0;
const DEFAULT_MAX_CONCURRENT: usize = 3;
const DEFAULT_REQUESTS_PER_MINUTE: u32 = 60;
const DEFAULT_TIMEOUT_SECS: u64 = 120;
const DEFAULT_OUTPUT_DIRECTORY: &str = "./research_output";

/// Application configuration loaded from environment variables.
/// Fails at startup if the API credential is missing or a value does not parse.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_base_url: String,
    /// Session budget ceiling in USD.
    pub cost_limit_per_session: f64,
    pub max_concurrent_requests: usize,
    /// Pacing of upstream call starts. 0 disables pacing.
    pub requests_per_minute: u32,
    pub request_timeout: Duration,
    pub output_directory: PathBuf,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let openai_api_key = lookup("OPENAI_API_KEY")
            .filter(|v| !v.trim().is_empty())
            .context("Required environment variable 'OPENAI_API_KEY' is not set")?;

        let cost_limit_per_session =
            parse_or(&lookup, "COST_LIMIT_PER_SESSION", DEFAULT_COST_LIMIT)?;
        if !cost_limit_per_session.is_finite() || cost_limit_per_session <= 0.0 {
            bail!("COST_LIMIT_PER_SESSION must be a positive amount, got {cost_limit_per_session}");
        }

        let max_concurrent_requests =
            parse_or(&lookup, "MAX_CONCURRENT_REQUESTS", DEFAULT_MAX_CONCURRENT)?;
        if max_concurrent_requests == 0 {
            bail!("MAX_CONCURRENT_REQUESTS must be at least 1");
        }

        let timeout_secs: u64 = parse_or(&lookup, "REQUEST_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        if timeout_secs == 0 {
            bail!("REQUEST_TIMEOUT_SECS must be at least 1");
        }

        Ok(Config {
            openai_api_key,
            openai_base_url: lookup("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            cost_limit_per_session,
            max_concurrent_requests,
            requests_per_minute: parse_or(
                &lookup,
                "REQUESTS_PER_MINUTE",
                DEFAULT_REQUESTS_PER_MINUTE,
            )?,
            request_timeout: Duration::from_secs(timeout_secs),
            output_directory: lookup("OUTPUT_DIRECTORY")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIRECTORY)),
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}
