//! Error types for multibuild-core.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::Label;

/// Errors raised while describing, discovering, or configuring repositories.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The path handed to [`crate::RepositoryDescriptor::new`] is not an existing directory.
    #[error("the directory {path} doesn't exist")]
    InvalidRepository { path: PathBuf },

    /// A build command outside the catalog was assigned to a repository.
    #[error("'{command}' is not a recognized build command for {label}")]
    InvalidCommand { command: String, label: Label },

    /// Discovery found no directory matching a known repository suffix.
    #[error("no repositories found under {root}; make sure the repositories are cloned there")]
    NoRepositoriesFound { root: PathBuf },

    /// Two discovered repositories derive the same display label.
    #[error("repositories {first} and {second} both resolve to label {label}")]
    LabelCollision {
        label: Label,
        first: PathBuf,
        second: PathBuf,
    },

    /// A run was assembled without any repository to process.
    #[error("no repository selected")]
    EmptySelection,

    /// `dirs::home_dir()` returned `None`.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,

    /// Underlying I/O failure, with the path being touched.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Settings YAML could not be parsed.
    #[error("failed to parse settings at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Failures while wiping the shared build cache. Never fatal for a run.
#[derive(Debug, Error)]
pub enum CacheCleanError {
    #[error("cannot clean the build cache: {path} is not a directory")]
    NotADirectory { path: PathBuf },

    #[error("deleting the build cache at {path} failed: {source}")]
    Remove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> CoreError {
    CoreError::Io {
        path: path.into(),
        source,
    }
}
