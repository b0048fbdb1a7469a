//! multibuild core library: repository descriptors, settings, discovery, errors.
//!
//! - [`types`]: newtypes, [`RepositoryDescriptor`], [`RunParameters`]
//! - [`catalog`]: the enumerated build-command table
//! - [`settings`]: optional YAML settings file
//! - [`discovery`]: find known repositories under a root directory
//! - [`cache`]: wipe the shared build cache
//! - [`error`]: [`CoreError`], [`CacheCleanError`]

pub mod cache;
pub mod catalog;
pub mod discovery;
pub mod error;
pub mod settings;
pub mod types;

pub use catalog::BuildCatalog;
pub use error::{CacheCleanError, CoreError};
pub use settings::{FailurePolicy, Settings};
pub use types::{BuildCommand, Label, RepositoryDescriptor, RunParameters};
