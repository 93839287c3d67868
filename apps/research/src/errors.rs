use serde_json::{json, Value};
use thiserror::Error;

use crate::llm_client::LlmError;

/// Application-level error type.
///
/// None of these abort a run: each is caught where it happens and turned into
/// an inline `{"error": ...}` record via [`AppError::to_record`].
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Llm(#[from] LlmError),

    #[error("Response for {kind} is not parsable: {reason}")]
    ResponseNotParsable { kind: String, reason: String },

    #[error("Could not read {path}: {reason}")]
    FileUnreadable { path: String, reason: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl AppError {
    pub fn not_parsable(kind: &str, reason: impl Into<String>) -> Self {
        AppError::ResponseNotParsable {
            kind: kind.to_string(),
            reason: reason.into(),
        }
    }

    pub fn file_unreadable(path: impl std::fmt::Display, err: &std::io::Error) -> Self {
        AppError::FileUnreadable {
            path: path.to_string(),
            reason: err.to_string(),
        }
    }

    /// Short machine-readable label for log fields.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Llm(LlmError::BudgetExceeded { .. }) => "BUDGET_EXCEEDED",
            AppError::Llm(LlmError::InvalidRequest(_)) | AppError::InvalidRequest(_) => {
                "INVALID_REQUEST"
            }
            AppError::Llm(_) => "UPSTREAM_CALL_FAILED",
            AppError::ResponseNotParsable { .. } => "RESPONSE_NOT_PARSABLE",
            AppError::FileUnreadable { .. } => "FILE_UNREADABLE",
        }
    }

    /// The inline record that replaces a failed section of a report.
    pub fn to_record(&self) -> Value {
        json!({ "error": self.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_error_record() {
        let err = AppError::from(LlmError::BudgetExceeded {
            spent: 25.0,
            limit: 25.0,
        });
        assert_eq!(err.code(), "BUDGET_EXCEEDED");
        assert_eq!(
            err.to_record(),
            json!({"error": "Cost limit exceeded: $25.00 spent of $25.00"})
        );
    }

    #[test]
    fn test_upstream_error_code() {
        let err = AppError::from(LlmError::UpstreamCallFailed("timeout".into()));
        assert_eq!(err.code(), "UPSTREAM_CALL_FAILED");
        assert!(err.to_string().contains("timeout"));
    }

    #[test]
    fn test_not_parsable_record_names_kind() {
        let err = AppError::not_parsable("gap_analysis", "expected value at line 1 column 1");
        assert_eq!(err.code(), "RESPONSE_NOT_PARSABLE");
        let record = err.to_record();
        let message = record["error"].as_str().unwrap();
        assert!(message.contains("gap_analysis"));
        assert!(message.contains("line 1 column 1"));
    }

    #[test]
    fn test_file_unreadable_record() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "No such file or directory");
        let err = AppError::file_unreadable("missing.csv", &io);
        assert_eq!(err.code(), "FILE_UNREADABLE");
        assert_eq!(
            err.to_record(),
            json!({"error": "Could not read missing.csv: No such file or directory"})
        );
    }

    #[test]
    fn test_record_has_only_error_key() {
        let record = AppError::InvalidRequest("empty claim".into()).to_record();
        assert_eq!(record.as_object().unwrap().len(), 1);
    }
}
