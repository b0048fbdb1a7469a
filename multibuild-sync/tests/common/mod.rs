//! Shared fixtures: a scripted command runner and repository workspaces.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use multibuild_core::{discovery, BuildCatalog, RepositoryDescriptor, Settings};
use multibuild_exec::{CommandRunner, CommandSpec, ExecError};
use tempfile::TempDir;

pub const UP_TO_DATE: &str = "Already up to date.\n";
pub const FAST_FORWARD: &str = "Updating 1a2b3c4..5d6e7f8\nFast-forward\n README.md | 2 +-\n";

enum Response {
    Output(String),
    Fail,
}

/// Answers commands by `(directory name, rendered command)`.
///
/// Unscripted commands succeed with empty output. Every call is recorded.
#[derive(Default)]
pub struct ScriptedRunner {
    responses: HashMap<(String, String), Response>,
    calls: RefCell<Vec<(String, String)>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, dir: &str, command: &CommandSpec, output: &str) -> Self {
        self.responses.insert(
            (dir.to_string(), command.to_string()),
            Response::Output(output.to_string()),
        );
        self
    }

    pub fn fail(mut self, dir: &str, command: &CommandSpec) -> Self {
        self.responses
            .insert((dir.to_string(), command.to_string()), Response::Fail);
        self
    }

    /// Rendered commands run in `dir`, in call order.
    pub fn calls_in(&self, dir: &str) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter(|(d, _)| d == dir)
            .map(|(_, c)| c.clone())
            .collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, command: &CommandSpec, cwd: &Path) -> Result<String, ExecError> {
        let dir = cwd
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let rendered = command.to_string();
        self.calls.borrow_mut().push((dir.clone(), rendered.clone()));

        match self.responses.get(&(dir, rendered.clone())) {
            Some(Response::Output(out)) => Ok(out.clone()),
            Some(Response::Fail) => Err(ExecError::Failed {
                command: rendered,
                cwd: cwd.to_path_buf(),
                code: Some(1),
                stderr: "scripted failure".to_string(),
            }),
            None => Ok(String::new()),
        }
    }
}

pub fn git(args: &[&str]) -> CommandSpec {
    CommandSpec::git(args.iter().copied())
}

pub fn pull() -> CommandSpec {
    git(&["pull"])
}

pub fn build(command: &str) -> CommandSpec {
    CommandSpec::shell(command)
}

pub fn default_build() -> CommandSpec {
    build(BuildCatalog::default().default_command().as_str())
}

/// A workspace with one directory per name, described in name order.
pub fn workspace(names: &[&str]) -> (TempDir, Vec<RepositoryDescriptor>) {
    let root = TempDir::new().expect("workspace");
    for name in names {
        fs::create_dir_all(root.path().join(name)).expect("mkdir");
    }
    let settings = Settings {
        repository_suffixes: names.iter().map(|n| n.to_string()).collect(),
        ..Settings::default()
    };
    let repos = discovery::discover(root.path(), &settings, &BuildCatalog::from_settings(&settings))
        .expect("discover");
    (root, repos)
}
