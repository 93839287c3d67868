//! Timestamped JSON output files.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::{error, info};

/// Writes `<prefix>_<YYYYMMDD_HHMMSS>.json` files into one output directory.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    directory: PathBuf,
}

impl ReportWriter {
    /// Creates the output directory if needed.
    pub fn new(directory: impl Into<PathBuf>) -> Result<Self> {
        let directory = directory.into();
        std::fs::create_dir_all(&directory).with_context(|| {
            format!("Could not create output directory {}", directory.display())
        })?;
        Ok(Self { directory })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Writes `value` as pretty JSON. Failures are logged and yield `None`.
    pub async fn write<T: Serialize>(&self, prefix: &str, value: &T) -> Option<PathBuf> {
        let path = self.path_for(prefix, Local::now());

        let body = match serde_json::to_string_pretty(value) {
            Ok(body) => body,
            Err(e) => {
                error!("Failed to serialize {prefix}: {e}");
                return None;
            }
        };

        match tokio::fs::write(&path, body).await {
            Ok(()) => {
                info!("{prefix} saved to: {}", path.display());
                Some(path)
            }
            Err(e) => {
                error!("Failed to save {prefix} to {}: {e}", path.display());
                None
            }
        }
    }

    fn path_for(&self, prefix: &str, at: DateTime<Local>) -> PathBuf {
        self.directory
            .join(format!("{prefix}_{}.json", timestamp_slug(at)))
    }
}

/// `YYYYMMDD_HHMMSS` in local time.
pub fn timestamp_slug(at: DateTime<Local>) -> String {
    at.format("%Y%m%d_%H%M%S").to_string()
}
