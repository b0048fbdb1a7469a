//! Repository discovery under a root directory.
//!
//! Only the immediate subdirectories of the root are considered. A
//! subdirectory is a candidate when its name ends with one of the configured
//! repository suffixes. Candidates are returned in file-name order so runs
//! are reproducible across platforms.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::catalog::BuildCatalog;
use crate::error::{io_err, CoreError};
use crate::settings::Settings;
use crate::types::{Label, RepositoryDescriptor};

/// Paths of all subdirectories of `root` whose name matches a known suffix.
pub fn candidate_paths(root: &Path, suffixes: &[String]) -> Result<Vec<PathBuf>, CoreError> {
    let mut entries: Vec<_> = std::fs::read_dir(root)
        .map_err(|e| io_err(root, e))?
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_dir())
        .collect();
    entries.sort_by_key(|e| e.file_name());

    Ok(entries
        .into_iter()
        .filter(|e| {
            let name = e.file_name();
            let name = name.to_string_lossy();
            suffixes.iter().any(|s| !s.is_empty() && name.ends_with(s.as_str()))
        })
        .map(|e| e.path())
        .collect())
}

/// Discover every known repository under `root` and describe it.
///
/// Returns [`CoreError::NoRepositoriesFound`] when nothing matches and
/// [`CoreError::LabelCollision`] when two candidates derive the same label.
pub fn discover(
    root: &Path,
    settings: &Settings,
    catalog: &BuildCatalog,
) -> Result<Vec<RepositoryDescriptor>, CoreError> {
    let mut seen: HashMap<Label, PathBuf> = HashMap::new();
    let mut repositories = Vec::new();

    for path in candidate_paths(root, &settings.repository_suffixes)? {
        let repository = match RepositoryDescriptor::new(path, catalog) {
            Ok(r) => r,
            Err(err) => {
                tracing::warn!("skipping candidate: {err}");
                continue;
            }
        };
        if let Some(first) = seen.get(repository.label()) {
            return Err(CoreError::LabelCollision {
                label: repository.label().clone(),
                first: first.clone(),
                second: repository.path().to_path_buf(),
            });
        }
        seen.insert(repository.label().clone(), repository.path().to_path_buf());
        tracing::debug!(
            "found repository {} at {}",
            repository.label(),
            repository.path().display()
        );
        repositories.push(repository);
    }

    if repositories.is_empty() {
        return Err(CoreError::NoRepositoriesFound {
            root: root.to_path_buf(),
        });
    }
    Ok(repositories)
}
