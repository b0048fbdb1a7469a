//! Git-level update of one repository.
//!
//! One pass, no retries:
//!
//! 1. **Prepare** (reset only): `git clean -fxd`, `git checkout <reset branch>`,
//!    `git reset --hard <remote>/<reset branch>`. The first failing step ends
//!    the sequence, so checkout and reset never run against a tree the clean
//!    could not scrub.
//! 2. **Checkout** (no reset): `git checkout <target branch>`.
//! 3. **Pull**: `git pull`, stdout kept verbatim.
//! 4. New content unless the pull output contains [`ALREADY_UP_TO_DATE`].

use multibuild_core::{RepositoryDescriptor, RunParameters, Settings};
use multibuild_exec::{CommandRunner, CommandSpec, ExecError};

/// Emitted by `git pull` when no commit arrived. Exact, case-sensitive.
pub const ALREADY_UP_TO_DATE: &str = "Already up to date";

/// Result of a successful update step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub pulled_new_content: bool,
    pub raw_output: String,
    /// Updating was declined; no git command ran.
    pub skipped: bool,
}

impl UpdateOutcome {
    pub fn from_pull_output(raw_output: String) -> Self {
        Self {
            pulled_new_content: !raw_output.contains(ALREADY_UP_TO_DATE),
            raw_output,
            skipped: false,
        }
    }

    /// Same as an empty pull output: counts as new content.
    pub fn skipped() -> Self {
        Self {
            skipped: true,
            ..Self::from_pull_output(String::new())
        }
    }
}

/// Branch and remote used by the destructive reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetTarget {
    pub branch: String,
    pub remote: String,
}

impl ResetTarget {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            branch: settings.reset_branch.clone(),
            remote: settings.remote.clone(),
        }
    }
}

impl Default for ResetTarget {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

pub struct RepositoryUpdater<'a, R: CommandRunner + ?Sized> {
    runner: &'a R,
    reset: &'a ResetTarget,
}

impl<'a, R: CommandRunner + ?Sized> RepositoryUpdater<'a, R> {
    pub fn new(runner: &'a R, reset: &'a ResetTarget) -> Self {
        Self { runner, reset }
    }

    pub fn update(
        &self,
        repo: &RepositoryDescriptor,
        params: &RunParameters,
    ) -> Result<UpdateOutcome, ExecError> {
        if !params.update {
            tracing::info!("{}: update skipped", repo.label());
            return Ok(UpdateOutcome::skipped());
        }

        if params.reset_before_update {
            self.prepare(repo)?;
        } else {
            let checkout = CommandSpec::git(["checkout", params.target_branch.as_str()]);
            self.runner.run(&checkout, repo.path())?;
        }

        let raw = self.runner.run(&CommandSpec::git(["pull"]), repo.path())?;
        let outcome = UpdateOutcome::from_pull_output(raw);
        if outcome.pulled_new_content {
            tracing::info!("{}: new content pulled", repo.label());
        } else {
            tracing::info!("{}: already up to date", repo.label());
        }
        Ok(outcome)
    }

    fn prepare(&self, repo: &RepositoryDescriptor) -> Result<(), ExecError> {
        tracing::warn!(
            "{}: resetting to {}/{} and removing untracked files",
            repo.label(),
            self.reset.remote,
            self.reset.branch
        );
        for step in reset_steps(self.reset) {
            self.runner.run(&step, repo.path())?;
        }
        Ok(())
    }
}

/// The destructive reset sequence, in execution order.
pub fn reset_steps(reset: &ResetTarget) -> [CommandSpec; 3] {
    [
        CommandSpec::git(["clean", "-fxd"]),
        CommandSpec::git(["checkout", reset.branch.as_str()]),
        CommandSpec::git([
            "reset".to_string(),
            "--hard".to_string(),
            format!("{}/{}", reset.remote, reset.branch),
        ]),
    ]
}
