//! Sequential update-and-build over the selected repositories.

use std::path::PathBuf;

use chrono::Utc;

use multibuild_core::{cache, FailurePolicy, Label, RepositoryDescriptor, RunParameters};
use multibuild_exec::{CommandRunner, CommandSpec};

use crate::error::SyncError;
use crate::stop::StopSignal;
use crate::summary::{
    BuildStatus, CacheStatus, RepositoryOutcome, RunSummary, StopReason, UpdateStatus,
};
use crate::updater::{RepositoryUpdater, ResetTarget, UpdateOutcome};

/// Fixed inputs of the orchestrator, independent of any single run.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Absolute path of the shared build cache.
    pub cache_path: PathBuf,
    pub reset: ResetTarget,
    pub failure_policy: FailurePolicy,
    /// Leave the cache in place and only log what would be deleted.
    pub dry_run: bool,
}

pub struct BuildOrchestrator<R: CommandRunner> {
    runner: R,
    config: OrchestratorConfig,
    stop: StopSignal,
}

impl<R: CommandRunner> BuildOrchestrator<R> {
    pub fn new(runner: R, config: OrchestratorConfig) -> Self {
        Self {
            runner,
            config,
            stop: StopSignal::new(),
        }
    }

    /// Share `stop` with whoever may request a graceful stop.
    pub fn with_stop_signal(mut self, stop: StopSignal) -> Self {
        self.stop = stop;
        self
    }

    /// Process every selected repository in order.
    ///
    /// Per-repository failures are recorded in the summary and never abort
    /// siblings, unless the failure policy is [`FailurePolicy::Abort`].
    pub fn run(&self, params: &RunParameters) -> RunSummary {
        let started_at = Utc::now();
        let cache = self.clean_cache(params);

        let repositories = params.repositories();
        let mut outcomes = Vec::with_capacity(repositories.len());
        let mut stopped = None;

        for repo in repositories {
            if self.stop.is_requested() {
                tracing::warn!("stop requested, not starting {}", repo.label());
                stopped = Some(StopReason::Interrupted);
                break;
            }

            let outcome = self.process(repo, params);
            let failed = outcome.is_failure();
            outcomes.push(outcome);

            if failed && self.config.failure_policy == FailurePolicy::Abort {
                tracing::warn!("{} failed, aborting the remaining repositories", repo.label());
                stopped = Some(StopReason::FailurePolicy {
                    label: repo.label().clone(),
                });
                break;
            }
        }

        let not_attempted: Vec<Label> = repositories[outcomes.len()..]
            .iter()
            .map(|r| r.label().clone())
            .collect();

        RunSummary {
            started_at,
            finished_at: Utc::now(),
            cache,
            outcomes,
            not_attempted,
            stopped,
        }
    }

    fn clean_cache(&self, params: &RunParameters) -> CacheStatus {
        if !params.clean_cache_first {
            return CacheStatus::NotRequested;
        }
        let path = self.config.cache_path.clone();
        if self.config.dry_run {
            tracing::info!("[dry-run] would delete the build cache {}", path.display());
            return CacheStatus::WouldClean { path };
        }
        match cache::clean_cache_dir(&path) {
            Ok(path) => CacheStatus::Cleaned { path },
            Err(err) => {
                tracing::warn!("{err}");
                CacheStatus::Failed {
                    reason: err.to_string(),
                }
            }
        }
    }

    fn process(&self, repo: &RepositoryDescriptor, params: &RunParameters) -> RepositoryOutcome {
        let updater = RepositoryUpdater::new(&self.runner, &self.config.reset);

        let update = match updater.update(repo, params) {
            Ok(update) => update,
            Err(source) => {
                let err = SyncError::Update {
                    label: repo.label().clone(),
                    source,
                };
                tracing::error!("{err}");
                return outcome(repo, UpdateStatus::Failed, BuildStatus::NotAttempted, Some(err));
            }
        };
        let update_status = update_status(&update);

        if !params.should_build(update.pulled_new_content) {
            tracing::info!("{}: no new content, not built", repo.label());
            return outcome(repo, update_status, BuildStatus::NotNeeded, None);
        }

        let build = CommandSpec::shell(repo.build_command().as_str());
        match self.runner.run(&build, repo.path()) {
            Ok(_) => {
                tracing::info!("{}: built with `{}`", repo.label(), repo.build_command());
                outcome(repo, update_status, BuildStatus::Built, None)
            }
            Err(source) => {
                let err = SyncError::Build {
                    label: repo.label().clone(),
                    source,
                };
                tracing::error!("{err}");
                outcome(repo, update_status, BuildStatus::Failed, Some(err))
            }
        }
    }
}

fn update_status(update: &UpdateOutcome) -> UpdateStatus {
    if update.skipped {
        UpdateStatus::Skipped
    } else if update.pulled_new_content {
        UpdateStatus::Updated
    } else {
        UpdateStatus::UpToDate
    }
}

fn outcome(
    repo: &RepositoryDescriptor,
    update: UpdateStatus,
    build: BuildStatus,
    error: Option<SyncError>,
) -> RepositoryOutcome {
    RepositoryOutcome {
        label: repo.label().clone(),
        path: repo.path().to_path_buf(),
        update,
        build,
        error: error.map(|e| e.to_string()),
    }
}
