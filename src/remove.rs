//! Ordered removal of resolved deletion targets.
//!
//! Targets are classified at execution time by probing the real filesystem:
//! symbolic links are unlinked without being followed, directories are
//! removed recursively, regular files are removed. A target that no longer
//! exists is recorded as not found and the run continues; a removal that
//! fails aborts the run immediately, leaving earlier removals in place.

use crate::error::CleanError;
use crate::pattern::Target;
use std::fs;
use std::path::{Path, PathBuf};

/// What a removed entry turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovedKind {
    Directory,
    Symlink,
    File,
}

impl RemovedKind {
    /// Log-line prefix used in the success record.
    pub fn action(&self) -> &'static str {
        match self {
            RemovedKind::Directory => "Removed directory",
            RemovedKind::Symlink => "Unlinked",
            RemovedKind::File => "Removed file",
        }
    }
}

/// Outcome of a removal run.
#[derive(Debug, Default)]
pub struct RemovalReport {
    /// Successfully removed entries, in removal order.
    pub removed: Vec<(PathBuf, RemovedKind)>,
    /// Targets that did not exist at execution time.
    pub not_found: Vec<Target>,
    /// Bytes freed by the removals, symlinks contributing nothing.
    pub bytes_reclaimed: u64,
}

impl RemovalReport {
    /// Missing targets that were literal plan entries. Their absence means
    /// the document and the target directory have diverged structurally.
    pub fn missing_required(&self) -> impl Iterator<Item = &Target> {
        self.not_found.iter().filter(|target| target.required)
    }
}

/// Remove every target in plan order, stopping at the first failure.
pub fn remove_targets(targets: &[Target]) -> Result<RemovalReport, CleanError> {
    let mut report = RemovalReport::default();

    for target in targets {
        // symlink_metadata never follows the link, so a link to a directory
        // classifies as a link. An unreadable path probes the same as a
        // missing one.
        let metadata = match fs::symlink_metadata(&target.path) {
            Ok(metadata) => metadata,
            Err(_) => {
                report.not_found.push(target.clone());
                continue;
            }
        };

        let file_type = metadata.file_type();
        if file_type.is_symlink() {
            fs::remove_file(&target.path).map_err(|source| CleanError::RemoveLink {
                path: target.path.clone(),
                source,
            })?;
            report.removed.push((target.path.clone(), RemovedKind::Symlink));
        } else if file_type.is_dir() {
            let size = dir_size(&target.path);
            fs::remove_dir_all(&target.path).map_err(|source| CleanError::RemoveDir {
                path: target.path.clone(),
                source,
            })?;
            report.bytes_reclaimed += size;
            report
                .removed
                .push((target.path.clone(), RemovedKind::Directory));
        } else {
            let size = metadata.len();
            fs::remove_file(&target.path).map_err(|source| CleanError::RemoveFile {
                path: target.path.clone(),
                source,
            })?;
            report.bytes_reclaimed += size;
            report.removed.push((target.path.clone(), RemovedKind::File));
        }
    }

    Ok(report)
}

/// Total size of the files under a directory. Uses symlink_metadata so
/// symlinked content is neither followed nor counted.
fn dir_size(path: &Path) -> u64 {
    let mut total = 0u64;

    if let Ok(entries) = fs::read_dir(path) {
        for entry in entries.flatten() {
            let entry_path = entry.path();
            if let Ok(metadata) = fs::symlink_metadata(&entry_path) {
                if metadata.is_file() {
                    total += metadata.len();
                } else if metadata.is_dir() {
                    total += dir_size(&entry_path);
                }
            }
        }
    }

    total
}
