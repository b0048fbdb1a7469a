//! Shared run entrypoint used by the CLI.

use std::path::Path;
use std::time::Duration;

use multibuild_core::{FailurePolicy, RunParameters, Settings};
use multibuild_exec::{CommandRunner, DryRunRunner, SystemRunner};

use crate::orchestrator::{BuildOrchestrator, OrchestratorConfig};
use crate::stop::StopSignal;
use crate::summary::RunSummary;
use crate::updater::ResetTarget;

/// Knobs that may be overridden per invocation.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub dry_run: bool,
    pub timeout: Option<Duration>,
    pub failure_policy: FailurePolicy,
}

impl RunOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            dry_run: false,
            timeout: settings.command_timeout(),
            failure_policy: settings.failure_policy,
        }
    }
}

pub fn orchestrator_config(home: &Path, settings: &Settings, options: &RunOptions) -> OrchestratorConfig {
    OrchestratorConfig {
        cache_path: settings.cache_path_at(home),
        reset: ResetTarget::from_settings(settings),
        failure_policy: options.failure_policy,
        dry_run: options.dry_run,
    }
}

/// Run one batch with real processes, or logged no-ops under `dry_run`.
pub fn run(
    home: &Path,
    settings: &Settings,
    params: &RunParameters,
    options: &RunOptions,
    stop: StopSignal,
) -> RunSummary {
    let runner: Box<dyn CommandRunner> = if options.dry_run {
        Box::new(DryRunRunner)
    } else {
        Box::new(SystemRunner::with_timeout(options.timeout))
    };
    BuildOrchestrator::new(runner, orchestrator_config(home, settings, options))
        .with_stop_signal(stop)
        .run(params)
}
