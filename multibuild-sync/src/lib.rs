//! # multibuild-sync
//!
//! Update-and-build orchestration across local repositories.
//!
//! Call [`pipeline::run`] to process a batch with real processes, or build a
//! [`BuildOrchestrator`] around any [`multibuild_exec::CommandRunner`].

pub mod error;
pub mod orchestrator;
pub mod pipeline;
pub mod stop;
pub mod summary;
pub mod updater;

pub use error::SyncError;
pub use orchestrator::{BuildOrchestrator, OrchestratorConfig};
pub use stop::StopSignal;
pub use summary::{BuildStatus, CacheStatus, RepositoryOutcome, RunSummary, StopReason, UpdateStatus};
pub use updater::{RepositoryUpdater, ResetTarget, UpdateOutcome, ALREADY_UP_TO_DATE};
