//! The single `multibuild` run: settings, discovery, selection, batch, report.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;

use multibuild_core::{discovery, settings, BuildCatalog, FailurePolicy, Settings};
use multibuild_sync::pipeline::{self, RunOptions};
use multibuild_sync::StopSignal;

use crate::prompter::{InquirePrompter, Prompter};
use crate::report;
use crate::selection::{SelectionFlags, SelectionPolicy};

/// Flags of `multibuild`.
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Build every selected repository with the default command, whether or
    /// not it pulled anything. Skips the build-variant menu.
    #[arg(short = 'b', long)]
    pub build_full: bool,

    /// Delete the shared build cache (~/.m2/repository) before processing.
    #[arg(short = 'c', long = "clean-m2")]
    pub clean_m2: bool,

    /// Directory holding the repositories. Defaults to the current directory.
    #[arg(short = 'd', long, value_name = "DIR")]
    pub repos_directory: Option<PathBuf>,

    /// Skip every menu: update and build all found repositories.
    #[arg(short = 's', long)]
    pub skip_menu: bool,

    /// Target branch when the menu is skipped; menu default otherwise.
    #[arg(long, value_name = "NAME")]
    pub branch: Option<String>,

    /// Reset every repository to the reset branch before updating (with --skip-menu).
    #[arg(long)]
    pub reset: bool,

    /// Kill any git or build command running longer than this. 0 disables.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Stop the batch at the first failing repository.
    #[arg(long)]
    pub abort_on_failure: bool,

    /// Log the commands instead of running them. The build cache is kept.
    #[arg(long)]
    pub dry_run: bool,

    /// Print the run summary as JSON.
    #[arg(long)]
    pub json: bool,

    /// Settings file. Defaults to ~/.multibuild/config.yaml.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl RunArgs {
    pub fn run(self) -> Result<()> {
        let home = settings::home_dir()?;
        self.run_at(&home, &InquirePrompter)
    }

    pub fn run_at(self, home: &Path, prompter: &dyn Prompter) -> Result<()> {
        let settings = self.load_settings(home)?;
        let root = match &self.repos_directory {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().context("could not determine current directory")?,
        };

        let catalog = BuildCatalog::from_settings(&settings);
        let discovered = discovery::discover(&root, &settings, &catalog)?;
        tracing::info!(
            "found {} repositories under {}",
            discovered.len(),
            root.display()
        );

        let params = SelectionPolicy::new(
            prompter,
            &catalog,
            &settings.default_branch,
            &settings.reset_branch,
        )
        .resolve(discovered, &self.selection_flags())?;

        let stop = StopSignal::new();
        install_stop_handler(stop.clone());

        let summary = pipeline::run(home, &settings, &params, &self.run_options(&settings), stop);
        if self.json {
            report::print_json(&summary)?;
        } else {
            report::print_table(&summary);
        }
        Ok(())
    }

    fn load_settings(&self, home: &Path) -> Result<Settings> {
        match &self.config {
            Some(path) => settings::load_from(path)
                .with_context(|| format!("failed to load settings from {}", path.display())),
            None => settings::load_at(home).context("failed to load settings"),
        }
    }

    fn selection_flags(&self) -> SelectionFlags {
        SelectionFlags {
            build_full: self.build_full,
            clean_cache: self.clean_m2,
            skip_menu: self.skip_menu,
            branch: self.branch.clone(),
            reset: self.reset,
        }
    }

    fn run_options(&self, settings: &Settings) -> RunOptions {
        let mut options = RunOptions::from_settings(settings);
        options.dry_run = self.dry_run;
        if let Some(secs) = self.timeout {
            options.timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }
        if self.abort_on_failure {
            options.failure_policy = FailurePolicy::Abort;
        }
        options
    }
}

/// Ctrl-C during the batch lets the current repository finish, then stops.
fn install_stop_handler(stop: StopSignal) {
    let result = ctrlc::set_handler(move || {
        tracing::warn!("stop requested, finishing the current repository");
        stop.request();
    });
    if let Err(err) = result {
        tracing::warn!("could not install the Ctrl-C handler: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_settings() {
        let settings = Settings {
            command_timeout_secs: 30,
            ..Settings::default()
        };
        let args = RunArgs {
            timeout: Some(5),
            abort_on_failure: true,
            dry_run: true,
            ..RunArgs::default()
        };
        let options = args.run_options(&settings);
        assert_eq!(options.timeout, Some(Duration::from_secs(5)));
        assert_eq!(options.failure_policy, FailurePolicy::Abort);
        assert!(options.dry_run);
    }

    #[test]
    fn zero_timeout_flag_disables_the_limit() {
        let settings = Settings {
            command_timeout_secs: 30,
            ..Settings::default()
        };
        let args = RunArgs {
            timeout: Some(0),
            ..RunArgs::default()
        };
        assert_eq!(args.run_options(&settings).timeout, None);
    }

    #[test]
    fn settings_apply_without_flags() {
        let settings = Settings {
            command_timeout_secs: 30,
            failure_policy: FailurePolicy::Abort,
            ..Settings::default()
        };
        let options = RunArgs::default().run_options(&settings);
        assert_eq!(options.timeout, Some(Duration::from_secs(30)));
        assert_eq!(options.failure_policy, FailurePolicy::Abort);
        assert!(!options.dry_run);
    }

    #[test]
    fn selection_flags_mirror_args() {
        let args = RunArgs {
            build_full: true,
            clean_m2: true,
            skip_menu: true,
            branch: Some("develop".into()),
            reset: true,
            ..RunArgs::default()
        };
        let flags = args.selection_flags();
        assert!(flags.build_full && flags.clean_cache && flags.skip_menu && flags.reset);
        assert_eq!(flags.branch.as_deref(), Some("develop"));
    }
}
