//! LLM Client: the invocation gateway for every model call in the executor.
//!
//! ARCHITECTURAL RULE: No other module may talk to the completion API directly.
//! All calls go through `LlmClient::invoke`, which enforces the session budget,
//! applies admission limits, and accumulates estimated cost.

use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, warn};

pub mod admission;
pub mod cost;
pub mod prompts;
pub mod session;
pub mod upstream;

pub use admission::Admission;
pub use session::Session;
pub use upstream::{ChatUpstream, GenerationParams, OpenAiUpstream};

use crate::llm_client::cost::estimate_cost;
use crate::llm_client::prompts::ANALYST_SYSTEM;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Cost limit exceeded: ${spent:.2} spent of ${limit:.2}")]
    BudgetExceeded { spent: f64, limit: f64 },

    #[error("Upstream call failed: {0}")]
    UpstreamCallFailed(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Admission limiter closed")]
    AdmissionClosed,
}

/// The single gateway used by report generation, candidate analysis and
/// claim verification. Cheap to clone; clones share the admission limiter.
#[derive(Clone)]
pub struct LlmClient {
    upstream: Arc<dyn ChatUpstream>,
    admission: Arc<Admission>,
}

impl LlmClient {
    pub fn new(upstream: Arc<dyn ChatUpstream>, admission: Admission) -> Self {
        Self {
            upstream,
            admission: Arc::new(admission),
        }
    }

    pub fn pacing_interval(&self) -> std::time::Duration {
        self.admission.interval()
    }

    /// Sends `prompt` upstream and returns the raw completion text.
    ///
    /// Budget is checked before admission and reserved while the call is in
    /// flight; it is charged only after success.
    /// The text is returned unparsed; callers own JSON decoding. No retries.
    pub async fn invoke(
        &self,
        session: &Session,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, LlmError> {
        if prompt.trim().is_empty() {
            return Err(LlmError::InvalidRequest("prompt must not be empty".into()));
        }
        if params.max_output_tokens == 0 {
            return Err(LlmError::InvalidRequest(
                "max_output_tokens must be greater than zero".into(),
            ));
        }

        let estimated_cost = estimate_cost(&params.model, prompt, params.max_output_tokens);
        check_budget(session, estimated_cost)?;

        let _permit = self.admission.acquire().await?;
        // Spend and in-flight calls may have moved while this call waited for a permit.
        let reservation = session
            .reserve(estimated_cost)
            .map_err(|e| refused(session, estimated_cost, e))?;

        let text = self
            .upstream
            .complete(ANALYST_SYSTEM, prompt, params)
            .await
            .map_err(|e| {
                error!("LLM API call failed (model {}): {e}", params.model);
                match e {
                    LlmError::UpstreamCallFailed(_) => e,
                    other => LlmError::UpstreamCallFailed(other.to_string()),
                }
            })?;

        let total = reservation.commit();
        info!(
            session = %session.id(),
            model = %params.model,
            "API call completed. Estimated cost: ${estimated_cost:.3}, Total: ${total:.2}"
        );

        Ok(text)
    }
}

fn check_budget(session: &Session, estimated_cost: f64) -> Result<(), LlmError> {
    session
        .admit(estimated_cost)
        .map_err(|e| refused(session, estimated_cost, e))
}

fn refused(session: &Session, estimated_cost: f64, e: LlmError) -> LlmError {
    warn!(
        session = %session.id(),
        "Refusing call with estimated cost ${estimated_cost:.3}: {e}"
    );
    e
}

/// Removes a surrounding markdown code fence, with or without an info string
/// such as `json`, from model output. Unfenced text is only trimmed.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest.trim_start_matches(|c: char| c.is_ascii_alphabetic()),
    };
    let body = body.trim();
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// In-process upstream fakes shared by tests across the crate.
#[cfg(test)]
pub mod testing {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;

    use super::{Admission, ChatUpstream, GenerationParams, LlmClient, LlmError};

    type Rule = (Vec<String>, Result<String, String>);

    /// Answers each prompt with the first rule whose markers the prompt all contains.
    /// Prompts that match no rule fail as upstream errors.
    #[derive(Default)]
    pub struct ScriptedUpstream {
        rules: Mutex<Vec<Rule>>,
        calls: AtomicUsize,
        seen: Mutex<Vec<(String, GenerationParams)>>,
        delay: Mutex<Duration>,
    }

    impl ScriptedUpstream {
        pub fn new() -> Arc<Self> {
            Arc::new(Self::default())
        }

        pub fn reply(self: &Arc<Self>, marker: &str, text: &str) -> Arc<Self> {
            self.push(&[marker], Ok(text.to_string()))
        }

        pub fn reply_all(self: &Arc<Self>, markers: &[&str], text: &str) -> Arc<Self> {
            self.push(markers, Ok(text.to_string()))
        }

        pub fn fail(self: &Arc<Self>, marker: &str, message: &str) -> Arc<Self> {
            self.push(&[marker], Err(message.to_string()))
        }

        fn push(self: &Arc<Self>, markers: &[&str], outcome: Result<String, String>) -> Arc<Self> {
            let markers = markers.iter().map(|m| m.to_string()).collect();
            self.rules.lock().unwrap().push((markers, outcome));
            self.clone()
        }

        /// Every reply waits `delay` before returning.
        pub fn delayed(self: &Arc<Self>, delay: Duration) -> Arc<Self> {
            *self.delay.lock().unwrap() = delay;
            self.clone()
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn seen(&self) -> Vec<(String, GenerationParams)> {
            self.seen.lock().unwrap().clone()
        }

        pub fn client(self: &Arc<Self>) -> LlmClient {
            LlmClient::new(self.clone(), Admission::unbounded())
        }
    }

    #[async_trait]
    impl ChatUpstream for ScriptedUpstream {
        async fn complete(
            &self,
            _system: &str,
            prompt: &str,
            params: &GenerationParams,
        ) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen
                .lock()
                .unwrap()
                .push((prompt.to_string(), params.clone()));

            let delay = *self.delay.lock().unwrap();
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            let rules = self.rules.lock().unwrap();
            let rule = rules
                .iter()
                .find(|(markers, _)| markers.iter().all(|m| prompt.contains(m.as_str())));
            match rule {
                Some((_, Ok(text))) => Ok(text.clone()),
                Some((_, Err(message))) => Err(LlmError::UpstreamCallFailed(message.clone())),
                None => Err(LlmError::UpstreamCallFailed("no scripted reply".into())),
            }
        }
    }
}
