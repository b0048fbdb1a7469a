//! Error types for multibuild-sync.

use thiserror::Error;

use multibuild_core::Label;
use multibuild_exec::ExecError;

/// A repository could not be processed. Recorded per repository, never
/// propagated to sibling repositories.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Reset, checkout or pull failed; the build step was skipped.
    #[error("{label}: update failed: {source}")]
    Update {
        label: Label,
        #[source]
        source: ExecError,
    },

    /// The build command failed.
    #[error("{label}: build failed: {source}")]
    Build {
        label: Label,
        #[source]
        source: ExecError,
    },
}
