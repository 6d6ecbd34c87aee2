use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of an assessment run as reported by the platform.
/// `Completed` and `Failed` are terminal: a run is never re-polled once
/// either is observed. A well-formed report whose status is missing or
/// outside this set degrades to `Unknown`, which the tracker also treats
/// as terminal (failed); it never keeps polling a run whose outcome it
/// cannot interpret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Pending,
    Running,
    Completed,
    Failed,
    #[serde(other)]
    #[default]
    Unknown,
}

impl RunStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Unknown)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wire shape of a single poll response (`GET /assessments/{id}`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunStatusReport {
    #[serde(default)]
    pub status: RunStatus,
    #[serde(default)]
    pub error: Option<String>,
}

/// One tracked invocation of the remote risk-evaluation job. Created when a
/// start request succeeds; mutated only by poll reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentRun {
    pub id: String,
    pub status: RunStatus,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AssessmentRun {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            status: RunStatus::Pending,
            error: None,
            created_at: Utc::now(),
        }
    }

    pub fn apply(&mut self, report: &RunStatusReport) {
        self.status = report.status;
        self.error = report.error.clone();
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}
