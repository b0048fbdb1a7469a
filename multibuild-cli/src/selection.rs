//! Turns flags and menu answers into [`RunParameters`].

use anyhow::{Context, Result};

use multibuild_core::{BuildCatalog, BuildCommand, RepositoryDescriptor, RunParameters};

use crate::prompter::Prompter;

/// Branch answer that stands for the default branch.
const DEFAULT_BRANCH_ANSWER: &str = "M";

/// Flags that shape the selection before any prompt is shown.
#[derive(Debug, Clone, Default)]
pub struct SelectionFlags {
    pub build_full: bool,
    pub clean_cache: bool,
    pub skip_menu: bool,
    pub branch: Option<String>,
    pub reset: bool,
}

pub struct SelectionPolicy<'a, P: Prompter + ?Sized> {
    prompter: &'a P,
    catalog: &'a BuildCatalog,
    default_branch: &'a str,
    reset_branch: &'a str,
}

impl<'a, P: Prompter + ?Sized> SelectionPolicy<'a, P> {
    pub fn new(
        prompter: &'a P,
        catalog: &'a BuildCatalog,
        default_branch: &'a str,
        reset_branch: &'a str,
    ) -> Self {
        Self {
            prompter,
            catalog,
            default_branch,
            reset_branch,
        }
    }

    /// Narrow `discovered` to the repositories of this run.
    ///
    /// With `skip_menu` nothing is asked: every repository is updated on the
    /// default branch and built with the default command.
    pub fn resolve(
        &self,
        discovered: Vec<RepositoryDescriptor>,
        flags: &SelectionFlags,
    ) -> Result<RunParameters> {
        if flags.skip_menu {
            return self.non_interactive(discovered, flags);
        }

        let mut repositories = self.ask_repositories(discovered)?;
        let reset = self.prompter.confirm(
            &format!(
                "Reset the repositories to {} (git reset --hard) before updating?",
                self.reset_branch
            ),
            flags.reset,
        )?;
        let update = self.prompter.confirm("Update the repositories (git pull)?", true)?;
        let build_all = if update && !flags.build_full {
            self.prompter.confirm(
                "Build every selected repository? Otherwise only updated ones are built",
                false,
            )?
        } else {
            false
        };
        let branch = self.ask_branch(flags)?;

        let command = if flags.build_full {
            self.catalog.default_command().clone()
        } else {
            self.ask_variant()?
        };
        for repo in &mut repositories {
            repo.set_build_command(&command, self.catalog)?;
        }

        let mut params = RunParameters::new(repositories, branch)?;
        params.reset_before_update = reset;
        params.update = update;
        params.force_build = flags.build_full || build_all;
        params.clean_cache_first = flags.clean_cache;
        Ok(params)
    }

    fn non_interactive(
        &self,
        discovered: Vec<RepositoryDescriptor>,
        flags: &SelectionFlags,
    ) -> Result<RunParameters> {
        let branch = flags
            .branch
            .clone()
            .unwrap_or_else(|| self.default_branch.to_string());
        let mut params = RunParameters::new(discovered, branch)?;
        params.reset_before_update = flags.reset;
        params.force_build = true;
        params.clean_cache_first = flags.clean_cache;
        Ok(params)
    }

    /// Re-asks until at least one repository is chosen.
    fn ask_repositories(
        &self,
        mut discovered: Vec<RepositoryDescriptor>,
    ) -> Result<Vec<RepositoryDescriptor>> {
        let options: Vec<String> = discovered
            .iter()
            .map(|repo| format!("{} ({})", repo.label(), repo.path().display()))
            .collect();

        let mut chosen = loop {
            let chosen = self
                .prompter
                .multi_select("Which repositories should be updated and built?", options.clone())?;
            if !chosen.is_empty() {
                break chosen;
            }
            tracing::warn!("select at least one repository");
        };
        chosen.sort_unstable();
        chosen.dedup();

        // Keep discovery order whatever order the answers came in.
        let mut index = 0;
        discovered.retain(|_| {
            let keep = chosen.binary_search(&index).is_ok();
            index += 1;
            keep
        });
        Ok(discovered)
    }

    fn ask_branch(&self, flags: &SelectionFlags) -> Result<String> {
        let answer = self.prompter.text(
            "Which branch should every repository build?",
            &format!(
                "{DEFAULT_BRANCH_ANSWER} or empty for {}",
                flags.branch.as_deref().unwrap_or(self.default_branch)
            ),
        )?;
        Ok(self.branch_from_answer(&answer, flags.branch.as_deref()))
    }

    fn branch_from_answer(&self, answer: &str, fallback: Option<&str>) -> String {
        let answer = answer.trim();
        if answer.is_empty() {
            return fallback.unwrap_or(self.default_branch).to_string();
        }
        if answer.eq_ignore_ascii_case(DEFAULT_BRANCH_ANSWER) {
            return self.default_branch.to_string();
        }
        answer.to_string()
    }

    fn ask_variant(&self) -> Result<BuildCommand> {
        let options = self
            .catalog
            .commands()
            .iter()
            .map(|command| command.to_string())
            .collect();
        let index = self.prompter.select("Which build should run?", options)?;
        self.catalog
            .variant(index + 1)
            .cloned()
            .context("selected build variant is out of range")
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::fs;

    use multibuild_core::{discovery, Settings};
    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;
    use crate::prompter::UserCancelled;

    #[derive(Debug)]
    enum Answer {
        Pick(Vec<usize>),
        Yes(bool),
        Text(&'static str),
        Choose(usize),
        Cancel,
    }

    /// Replays answers in order and records every question asked.
    #[derive(Default)]
    struct ScriptedPrompter {
        answers: RefCell<VecDeque<Answer>>,
        asked: RefCell<Vec<String>>,
    }

    impl ScriptedPrompter {
        fn new(answers: Vec<Answer>) -> Self {
            Self {
                answers: RefCell::new(answers.into()),
                asked: RefCell::default(),
            }
        }

        fn next(&self, message: &str) -> Result<Answer> {
            self.asked.borrow_mut().push(message.to_string());
            match self.answers.borrow_mut().pop_front() {
                Some(Answer::Cancel) => Err(UserCancelled.into()),
                Some(answer) => Ok(answer),
                None => panic!("unexpected prompt: {message}"),
            }
        }

        fn asked(&self) -> usize {
            self.asked.borrow().len()
        }
    }

    impl Prompter for ScriptedPrompter {
        fn multi_select(&self, message: &str, _options: Vec<String>) -> Result<Vec<usize>> {
            match self.next(message)? {
                Answer::Pick(picked) => Ok(picked),
                other => panic!("expected Pick, got {other:?}"),
            }
        }

        fn confirm(&self, message: &str, _default: bool) -> Result<bool> {
            match self.next(message)? {
                Answer::Yes(yes) => Ok(yes),
                other => panic!("expected Yes, got {other:?}"),
            }
        }

        fn text(&self, message: &str, _help: &str) -> Result<String> {
            match self.next(message)? {
                Answer::Text(text) => Ok(text.to_string()),
                other => panic!("expected Text, got {other:?}"),
            }
        }

        fn select(&self, message: &str, _options: Vec<String>) -> Result<usize> {
            match self.next(message)? {
                Answer::Choose(index) => Ok(index),
                other => panic!("expected Choose, got {other:?}"),
            }
        }
    }

    fn discovered(names: &[&str]) -> (TempDir, Vec<RepositoryDescriptor>) {
        let root = TempDir::new().expect("root");
        for name in names {
            fs::create_dir_all(root.path().join(name)).expect("mkdir");
        }
        let settings = Settings::default();
        let repos = discovery::discover(
            root.path(),
            &settings,
            &BuildCatalog::from_settings(&settings),
        )
        .expect("discover");
        (root, repos)
    }

    fn labels(params: &RunParameters) -> Vec<String> {
        params
            .repositories()
            .iter()
            .map(|r| r.label().to_string())
            .collect()
    }

    const REPOS: [&str; 3] = ["acme.ael.aep", "acme.ael.bae", "acme.ael.jive"];

    #[test]
    fn skip_menu_takes_everything_with_forced_default_build() {
        let (_root, repos) = discovered(&REPOS);
        let catalog = BuildCatalog::default();
        let prompter = ScriptedPrompter::default();
        let flags = SelectionFlags {
            skip_menu: true,
            ..SelectionFlags::default()
        };

        let params = SelectionPolicy::new(&prompter, &catalog, "master", "master")
            .resolve(repos, &flags)
            .expect("resolve");

        assert_eq!(prompter.asked(), 0);
        assert_eq!(labels(&params), vec!["AEP", "BAE", "JIVE"]);
        assert_eq!(params.target_branch, "master");
        assert!(params.force_build);
        assert!(params.update);
        assert!(!params.reset_before_update);
        assert!(!params.clean_cache_first);
        let aep = &params.repositories()[0];
        assert_eq!(aep.build_command(), catalog.default_command());
    }

    #[test]
    fn skip_menu_honours_branch_reset_and_cache_flags() {
        let (_root, repos) = discovered(&REPOS);
        let catalog = BuildCatalog::default();
        let prompter = ScriptedPrompter::default();
        let flags = SelectionFlags {
            skip_menu: true,
            clean_cache: true,
            reset: true,
            branch: Some("develop".into()),
            ..SelectionFlags::default()
        };

        let params = SelectionPolicy::new(&prompter, &catalog, "master", "master")
            .resolve(repos, &flags)
            .expect("resolve");

        assert_eq!(params.target_branch, "develop");
        assert!(params.reset_before_update);
        assert!(params.clean_cache_first);
    }

    #[test]
    fn menu_answers_become_run_parameters() {
        let (_root, repos) = discovered(&REPOS);
        let catalog = BuildCatalog::default();
        let prompter = ScriptedPrompter::new(vec![
            Answer::Pick(vec![2, 0]),
            Answer::Yes(true),
            Answer::Yes(true),
            Answer::Yes(false),
            Answer::Text("feature/login"),
            Answer::Choose(2),
        ]);

        let params = SelectionPolicy::new(&prompter, &catalog, "master", "master")
            .resolve(repos, &SelectionFlags::default())
            .expect("resolve");

        assert_eq!(labels(&params), vec!["AEP", "JIVE"], "discovery order is kept");
        assert_eq!(params.target_branch, "feature/login");
        assert!(params.reset_before_update);
        assert!(params.update);
        assert!(!params.force_build);

        let aep = &params.repositories()[0];
        assert_eq!(aep.build_command().as_str(), "gradlew clean jar");
        let jive = &params.repositories()[1];
        assert_eq!(jive.build_command().as_str(), "mvn clean install");
    }

    #[test]
    fn empty_selection_is_asked_again() {
        let (_root, repos) = discovered(&REPOS);
        let catalog = BuildCatalog::default();
        let prompter = ScriptedPrompter::new(vec![
            Answer::Pick(vec![]),
            Answer::Pick(vec![]),
            Answer::Pick(vec![1]),
            Answer::Yes(false),
            Answer::Yes(true),
            Answer::Yes(true),
            Answer::Text(""),
            Answer::Choose(0),
        ]);

        let params = SelectionPolicy::new(&prompter, &catalog, "master", "master")
            .resolve(repos, &SelectionFlags::default())
            .expect("resolve");

        assert_eq!(labels(&params), vec!["BAE"]);
        assert!(params.force_build, "build-all answer forces builds");
        assert_eq!(prompter.asked(), 8);
    }

    #[rstest]
    #[case("m", "master")]
    #[case("M", "master")]
    #[case("", "master")]
    #[case("  ", "master")]
    #[case("release-7", "release-7")]
    fn branch_answers(#[case] answer: &str, #[case] expected: &str) {
        let catalog = BuildCatalog::default();
        let prompter = ScriptedPrompter::default();
        let policy = SelectionPolicy::new(&prompter, &catalog, "master", "master");
        assert_eq!(policy.branch_from_answer(answer, None), expected);
    }

    #[test]
    fn empty_branch_answer_falls_back_to_flag() {
        let catalog = BuildCatalog::default();
        let prompter = ScriptedPrompter::default();
        let policy = SelectionPolicy::new(&prompter, &catalog, "master", "master");
        assert_eq!(policy.branch_from_answer("", Some("develop")), "develop");
        assert_eq!(policy.branch_from_answer("m", Some("develop")), "master");
    }

    #[test]
    fn build_full_skips_variant_and_build_all_questions() {
        let (_root, repos) = discovered(&REPOS);
        let catalog = BuildCatalog::default();
        let prompter = ScriptedPrompter::new(vec![
            Answer::Pick(vec![0]),
            Answer::Yes(false),
            Answer::Yes(true),
            Answer::Text("m"),
        ]);
        let flags = SelectionFlags {
            build_full: true,
            ..SelectionFlags::default()
        };

        let params = SelectionPolicy::new(&prompter, &catalog, "master", "master")
            .resolve(repos, &flags)
            .expect("resolve");

        assert_eq!(prompter.asked(), 4);
        assert!(params.force_build);
        assert_eq!(params.repositories()[0].build_command(), catalog.default_command());
    }

    #[test]
    fn declining_update_skips_build_all_question() {
        let (_root, repos) = discovered(&REPOS);
        let catalog = BuildCatalog::default();
        let prompter = ScriptedPrompter::new(vec![
            Answer::Pick(vec![0]),
            Answer::Yes(false),
            Answer::Yes(false),
            Answer::Text("m"),
            Answer::Choose(1),
        ]);

        let params = SelectionPolicy::new(&prompter, &catalog, "master", "master")
            .resolve(repos, &SelectionFlags::default())
            .expect("resolve");

        assert!(!params.update);
        assert!(!params.force_build);
        assert_eq!(prompter.asked(), 5);
    }

    #[test]
    fn cancelling_a_prompt_surfaces_user_cancelled() {
        let (_root, repos) = discovered(&REPOS);
        let catalog = BuildCatalog::default();
        let prompter = ScriptedPrompter::new(vec![Answer::Pick(vec![0]), Answer::Cancel]);

        let err = SelectionPolicy::new(&prompter, &catalog, "master", "master")
            .resolve(repos, &SelectionFlags::default())
            .expect_err("cancelled");

        assert!(err.downcast_ref::<UserCancelled>().is_some());
    }
}
