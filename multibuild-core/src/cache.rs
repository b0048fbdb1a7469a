//! Shared build-cache cleaning.

use std::path::{Path, PathBuf};

use crate::error::CacheCleanError;

/// Recursively delete the shared cache directory at `path`.
///
/// Returns the deleted path on success. Deletion is permanent.
pub fn clean_cache_dir(path: &Path) -> Result<PathBuf, CacheCleanError> {
    if !path.is_dir() {
        return Err(CacheCleanError::NotADirectory {
            path: path.to_path_buf(),
        });
    }
    std::fs::remove_dir_all(path).map_err(|source| CacheCleanError::Remove {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!("the build cache {} has been deleted", path.display());
    Ok(path.to_path_buf())
}
