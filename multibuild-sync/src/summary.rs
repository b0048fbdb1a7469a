//! Per-repository outcomes and the run summary.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

use multibuild_core::Label;

/// What happened during the update step of one repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateStatus {
    /// The pull brought new commits.
    Updated,
    /// The pull reported the branch was already up to date.
    UpToDate,
    /// Updating was declined for this run.
    Skipped,
    Failed,
}

/// What happened during the build step of one repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildStatus {
    Built,
    /// Nothing new was pulled and no flag forced a build.
    NotNeeded,
    Failed,
    /// The update failed, so no build was tried.
    NotAttempted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryOutcome {
    pub label: Label,
    pub path: PathBuf,
    pub update: UpdateStatus,
    pub build: BuildStatus,
    pub error: Option<String>,
}

impl RepositoryOutcome {
    pub fn updated(&self) -> bool {
        self.update == UpdateStatus::Updated
    }

    pub fn built(&self) -> bool {
        self.build == BuildStatus::Built
    }

    pub fn is_failure(&self) -> bool {
        self.update == UpdateStatus::Failed || self.build == BuildStatus::Failed
    }
}

/// Result of the one-time shared-cache wipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CacheStatus {
    NotRequested,
    Cleaned { path: PathBuf },
    /// Logged and ignored; the run went on.
    Failed { reason: String },
    /// `--dry-run`: the cache was left alone.
    WouldClean { path: PathBuf },
}

/// Why a run ended before every selected repository was attempted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum StopReason {
    Interrupted,
    FailurePolicy { label: Label },
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub cache: CacheStatus,
    /// One entry per attempted repository, in selection order.
    pub outcomes: Vec<RepositoryOutcome>,
    /// Selected repositories that were never attempted.
    pub not_attempted: Vec<Label>,
    pub stopped: Option<StopReason>,
}

impl RunSummary {
    pub fn updated_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.updated()).count()
    }

    pub fn built_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.built()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failure()).count()
    }

    pub fn outcome(&self, label: &str) -> Option<&RepositoryOutcome> {
        self.outcomes.iter().find(|o| o.label.as_str() == label)
    }
}
