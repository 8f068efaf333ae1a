//! Asynchronous server-side jobs.

use std::fmt;

use serde::Deserialize;

/// Status of an asynchronous job.
///
/// `Finished` and `Failed` are terminal. The server owns every transition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Accepted but not yet picked up.
    #[default]
    Queued,
    /// In progress.
    Running,
    /// Completed successfully.
    Finished,
    /// Completed with an error.
    Failed,
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Queued => "queued",
            Self::Running => "running",
            Self::Finished => "finished",
            Self::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// An asynchronous operation tracked by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Job {
    /// Server-assigned GUID.
    pub guid: String,
    /// Status as of the last fetch.
    pub status: JobStatus,
    /// Failure description, present only when the job failed.
    pub error_message: Option<String>,
}

impl Job {
    /// Creates a queued job handle for `guid`.
    #[must_use]
    pub fn queued(guid: impl Into<String>) -> Self {
        Self {
            guid: guid.into(),
            status: JobStatus::Queued,
            error_message: None,
        }
    }
}
