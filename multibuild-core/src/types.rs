//! Domain types: labels, build commands, repository descriptors and run parameters.
//!
//! All path fields use `PathBuf`; never `&str` or `String` for filesystem paths.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::catalog::BuildCatalog;
use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Short upper-case identifier of a repository, used for display and selection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Label(pub String);

impl Label {
    /// Upper-cased text after the last `.` of the whole path.
    ///
    /// A path without any `.` yields the whole path, upper-cased.
    pub fn from_path(path: &Path) -> Self {
        let text = path.to_string_lossy();
        let last = text.rsplit('.').next().unwrap_or_default();
        Self(last.to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for Label {
    fn from(s: &str) -> Self {
        Self(s.to_uppercase())
    }
}

/// Opaque shell invocation used to build a repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuildCommand(pub String);

impl BuildCommand {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BuildCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for BuildCommand {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for BuildCommand {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// RepositoryDescriptor
// ---------------------------------------------------------------------------

/// One local checkout to update and build.
///
/// The label is fixed at construction. The build command can only change
/// through [`RepositoryDescriptor::set_build_command`], which validates it
/// against the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryDescriptor {
    path: PathBuf,
    label: Label,
    build_command: BuildCommand,
    special: bool,
}

impl RepositoryDescriptor {
    /// Describe the repository at `path`.
    ///
    /// Returns [`CoreError::InvalidRepository`] if `path` is not an existing directory.
    pub fn new(path: impl Into<PathBuf>, catalog: &BuildCatalog) -> Result<Self, CoreError> {
        let path = path.into();
        if !path.is_dir() {
            return Err(CoreError::InvalidRepository { path });
        }

        let label = Label::from_path(&path);
        let special = catalog.is_special(&label);
        let build_command = if special {
            catalog.special_command().clone()
        } else {
            catalog.default_command().clone()
        };

        Ok(Self {
            path,
            label,
            build_command,
            special,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn label(&self) -> &Label {
        &self.label
    }

    pub fn build_command(&self) -> &BuildCommand {
        &self.build_command
    }

    /// Whether this repository always builds with the catalog's override command.
    pub fn is_special(&self) -> bool {
        self.special
    }

    /// Assign the build command.
    ///
    /// Special-labelled repositories keep the override command whatever is
    /// passed. Otherwise `command` must belong to the catalog; a rejected
    /// command leaves the current one in place.
    pub fn set_build_command(
        &mut self,
        command: &BuildCommand,
        catalog: &BuildCatalog,
    ) -> Result<(), CoreError> {
        if self.special {
            self.build_command = catalog.special_command().clone();
            return Ok(());
        }
        if !catalog.contains(command) {
            return Err(CoreError::InvalidCommand {
                command: command.0.clone(),
                label: self.label.clone(),
            });
        }
        self.build_command = command.clone();
        Ok(())
    }
}

impl fmt::Display for RepositoryDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.label.fmt(f)
    }
}

// ---------------------------------------------------------------------------
// RunParameters
// ---------------------------------------------------------------------------

/// Everything one batch run needs, assembled before any command executes.
#[derive(Debug, Clone)]
pub struct RunParameters {
    repositories: Vec<RepositoryDescriptor>,
    pub target_branch: String,
    pub reset_before_update: bool,
    /// When `false` no git command runs; every repository counts as updated.
    pub update: bool,
    pub force_build: bool,
    pub clean_cache_first: bool,
}

impl RunParameters {
    /// Start from the selected repositories with updating on and every other flag off.
    ///
    /// Returns [`CoreError::EmptySelection`] if `repositories` is empty.
    pub fn new(
        repositories: Vec<RepositoryDescriptor>,
        target_branch: impl Into<String>,
    ) -> Result<Self, CoreError> {
        if repositories.is_empty() {
            return Err(CoreError::EmptySelection);
        }
        Ok(Self {
            repositories,
            target_branch: target_branch.into(),
            reset_before_update: false,
            update: true,
            force_build: false,
            clean_cache_first: false,
        })
    }

    pub fn repositories(&self) -> &[RepositoryDescriptor] {
        &self.repositories
    }

    /// A wiped cache or an explicit build-everything request rebuilds
    /// unchanged repositories too.
    pub fn should_build(&self, pulled_new_content: bool) -> bool {
        self.force_build || pulled_new_content || self.clean_cache_first
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
