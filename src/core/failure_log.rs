//! Append-only log of failed lock attempts

use std::path::{Path, PathBuf};

use chrono::{Local, SecondsFormat};
use tokio::{fs::OpenOptions, io::AsyncWriteExt};
use tracing::error;

/// File name used inside the configured log directory
pub const FAILURE_LOG_FILE: &str = "bssid-lock.log";

/// Sink for failure diagnostics
///
/// Every recorded message goes to the process log at error level. When a
/// path is configured the message is also appended to that file as
/// `[<timestamp>] <message>`. Writing never fails the caller.
#[derive(Debug, Clone, Default)]
pub struct FailureLog {
    path: Option<PathBuf>,
}

impl FailureLog {
    /// Failure log that only writes to the process log
    pub fn disabled() -> Self {
        Self { path: None }
    }

    /// Failure log appending to `path`
    pub fn to_file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Failure log appending to [`FAILURE_LOG_FILE`] inside `dir`, creating
    /// the directory if needed
    pub fn in_dir(dir: &Path) -> Self {
        if let Err(e) = std::fs::create_dir_all(dir) {
            error!("Failed to create log directory {}: {}", dir.display(), e);
        }
        Self::to_file(dir.join(FAILURE_LOG_FILE))
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Record a failure message
    pub async fn record(&self, message: &str) {
        error!("{}", message);

        let Some(path) = &self.path else {
            return;
        };

        if let Err(e) = Self::append(path, message).await {
            error!("Failed to write failure log {}: {}", path.display(), e);
        }
    }

    async fn append(path: &Path, message: &str) -> std::io::Result<()> {
        let timestamp = Local::now().to_rfc3339_opts(SecondsFormat::Micros, false);
        let line = format!("[{timestamp}] {}\n", single_line(message));

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await
    }
}

/// Join the non-blank lines of `message` with ` | ` so that one failure
/// always occupies one line of the log
fn single_line(message: &str) -> String {
    message
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" | ")
}
