//! User settings, read from `~/.multibuild/config.yaml`.
//!
//! Every field has a default, so the file is optional and may list only the
//! keys a user wants to change.
//!
//! # API pattern
//!
//! - `load_at(home: &Path)`: explicit home; used in tests with `TempDir`
//! - `load_from(path)`: explicit file, for `--config`

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{io_err, CoreError};

pub const SETTINGS_DIR: &str = ".multibuild";
pub const SETTINGS_FILE: &str = "config.yaml";

/// What the orchestrator does after a repository fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Log the failure and move on to the next repository.
    #[default]
    Continue,
    /// Stop the batch after the first failed repository.
    Abort,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Branch checked out before pulling when no other branch is requested.
    pub default_branch: String,
    /// Reference branch used by the destructive reset.
    pub reset_branch: String,
    pub remote: String,
    /// Directory-name suffixes that mark a known repository.
    pub repository_suffixes: Vec<String>,
    /// Enumerated build variants; the first entry is the default.
    pub build_commands: Vec<String>,
    /// Labels that always build with `special_build_command`.
    pub special_labels: Vec<String>,
    pub special_build_command: String,
    /// Shared build cache, relative to the home directory.
    pub cache_dir: PathBuf,
    /// Per-command limit in seconds; `0` waits forever.
    pub command_timeout_secs: u64,
    pub failure_policy: FailurePolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_branch: "master".to_string(),
            reset_branch: "master".to_string(),
            remote: "origin".to_string(),
            repository_suffixes: [
                "ael.aep",
                "ael.aep.plugins",
                "ael.bae",
                "ael.dae",
                "ael.jive",
                "ael.aep.sdk",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            build_commands: [
                "gradlew clean build",
                "gradlew clean build -x test -x check -x javadoc",
                "gradlew clean jar",
                "gradlew clean install",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            special_labels: vec!["JIVE".to_string()],
            special_build_command: "mvn clean install".to_string(),
            cache_dir: PathBuf::from(".m2").join("repository"),
            command_timeout_secs: 0,
            failure_policy: FailurePolicy::Continue,
        }
    }
}

impl Settings {
    pub fn command_timeout(&self) -> Option<Duration> {
        (self.command_timeout_secs > 0).then(|| Duration::from_secs(self.command_timeout_secs))
    }

    /// `<home>/<cache_dir>`: pure, no I/O.
    pub fn cache_path_at(&self, home: &Path) -> PathBuf {
        home.join(&self.cache_dir)
    }
}

/// `<home>/.multibuild/config.yaml`: pure, no I/O.
pub fn settings_path_at(home: &Path) -> PathBuf {
    home.join(SETTINGS_DIR).join(SETTINGS_FILE)
}

/// Load settings from the home directory, falling back to defaults when the
/// file does not exist.
pub fn load_at(home: &Path) -> Result<Settings, CoreError> {
    let path = settings_path_at(home);
    if !path.exists() {
        tracing::debug!("no settings file at {}, using defaults", path.display());
        return Ok(Settings::default());
    }
    load_from(&path)
}

/// Load settings from an explicit file. The file must exist.
pub fn load_from(path: &Path) -> Result<Settings, CoreError> {
    let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    if contents.trim().is_empty() {
        return Ok(Settings::default());
    }
    serde_yaml::from_str(&contents).map_err(|e| CoreError::ConfigParse {
        path: path.to_path_buf(),
        source: e,
    })
}

pub fn home_dir() -> Result<PathBuf, CoreError> {
    dirs::home_dir().ok_or(CoreError::HomeNotFound)
}
