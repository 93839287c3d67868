//! Specification file loading for gap analysis.

use std::path::PathBuf;

use tracing::warn;

use crate::errors::AppError;

/// Concatenated specification text plus one warning per file that was skipped.
#[derive(Debug, Clone, Default)]
pub struct SpecificationBundle {
    pub content: String,
    pub warnings: Vec<String>,
}

/// Reads every file in order and joins them under `=== <path> ===` headers.
/// Unreadable files are skipped with a warning and never fail the load.
pub async fn load_specification_files(paths: &[PathBuf]) -> SpecificationBundle {
    let mut bundle = SpecificationBundle::default();

    for path in paths {
        match tokio::fs::read_to_string(path).await {
            Ok(text) => {
                bundle
                    .content
                    .push_str(&format!("\n\n=== {} ===\n{}", path.display(), text));
            }
            Err(e) => {
                let err = AppError::file_unreadable(path.display(), &e);
                warn!("Skipping specification file: {err}");
                bundle.warnings.push(err.to_string());
            }
        }
    }

    bundle
}
