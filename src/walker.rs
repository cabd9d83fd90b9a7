//! Depth-first cleanup of a directory tree.

use crate::error::{KeepError, Result};
use crate::policy::KeepPolicy;
use std::fs::{self, FileType};
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info, warn};

/// Options controlling a cleanup run (runtime flags)
#[derive(Debug, Clone, Copy, Default)]
pub struct CleanOptions {
    /// Report what would be deleted without touching the tree
    pub dry_run: bool,
    /// Measure every deleted path before removing it
    pub calculate_sizes: bool,
}

/// A path that was judged unkept
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removal {
    /// Path relative to the cleaned folder, `/`-separated
    pub path: String,
    pub is_dir: bool,
    /// Bytes below the path; 0 unless sizes were requested
    pub size: u64,
    /// False when the deletion was only simulated
    pub removed: bool,
}

impl Removal {
    pub fn describe(&self) -> String {
        let kind = if self.is_dir { "folder" } else { "file" };
        format!("[Delete] {}: {}", kind, self.path)
    }
}

/// Outcome of a cleanup run
#[derive(Debug, Default)]
pub struct CleanReport {
    /// Unkept paths in traversal order
    pub removals: Vec<Removal>,
    /// Number of paths the policy was asked about
    pub visited: usize,
}

impl CleanReport {
    pub fn total_size(&self) -> u64 {
        self.removals.iter().map(|r| r.size).sum()
    }

    pub fn removed_count(&self) -> usize {
        self.removals.iter().filter(|r| r.removed).count()
    }

    /// Relative paths of all unkept entries
    pub fn paths(&self) -> Vec<&str> {
        self.removals.iter().map(|r| r.path.as_str()).collect()
    }
}

/// Apply `policy` to every entry below `root`.
///
/// The root itself is never tested. Unkept entries are removed (recursively for
/// directories) and never looked into; kept directories are only entered when
/// the policy asks for it. Symlinks and special files are leaves.
pub fn clean_tree(
    root: &Path,
    policy: &dyn KeepPolicy,
    options: CleanOptions,
) -> Result<CleanReport> {
    clean_tree_with(root, policy, options, &mut |_| {})
}

/// Like [`clean_tree`], calling `on_removal` for every unkept path as soon as it
/// has been deleted (or, in a dry run, judged).
///
/// A failing run has already reported everything it deleted before the error.
pub fn clean_tree_with(
    root: &Path,
    policy: &dyn KeepPolicy,
    options: CleanOptions,
    on_removal: &mut dyn FnMut(&Removal),
) -> Result<CleanReport> {
    let metadata = match fs::metadata(root) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(KeepError::MissingRoot(root.to_path_buf()))
        }
        Err(e) => return Err(KeepError::io(root, e)),
    };
    if !metadata.is_dir() {
        return Err(KeepError::NotADirectory(root.to_path_buf()));
    }

    debug!("cleaning {} (dry run: {})", root.display(), options.dry_run);

    let mut cleaner = Cleaner {
        policy,
        options,
        on_removal,
        report: CleanReport::default(),
    };
    cleaner.visit_children(root, "")?;

    Ok(cleaner.report)
}

struct Cleaner<'p, 's> {
    policy: &'p dyn KeepPolicy,
    options: CleanOptions,
    on_removal: &'s mut dyn FnMut(&Removal),
    report: CleanReport,
}

impl Cleaner<'_, '_> {
    fn visit_children(&mut self, dir: &Path, rel: &str) -> Result<()> {
        let entries = fs::read_dir(dir).map_err(|e| KeepError::io(dir, e))?;

        for entry in entries {
            let entry = entry.map_err(|e| KeepError::io(dir, e))?;
            let path = entry.path();
            // Does not follow symlinks
            let file_type = entry.file_type().map_err(|e| KeepError::io(&path, e))?;

            let name = entry.file_name();
            let name = name.to_string_lossy();
            let child_rel = if rel.is_empty() {
                name.into_owned()
            } else {
                format!("{}/{}", rel, name)
            };

            self.visit(&path, &child_rel, file_type)?;
        }

        Ok(())
    }

    fn visit(&mut self, path: &Path, rel: &str, file_type: FileType) -> Result<()> {
        self.report.visited += 1;

        let is_dir = file_type.is_dir();
        let keep = self.policy.should_keep(rel);
        let descend = self.policy.should_descend(rel);
        debug!("{} keep={} descend={}", rel, keep, descend);

        if !keep {
            return self.remove(path, rel, is_dir);
        }

        if is_dir && descend {
            self.visit_children(path, rel)?;
        }

        Ok(())
    }

    fn remove(&mut self, path: &Path, rel: &str, is_dir: bool) -> Result<()> {
        let size = if self.options.calculate_sizes {
            path_size(path)
        } else {
            0
        };

        if self.options.dry_run {
            debug!("would delete {}", rel);
        } else {
            let result = if is_dir {
                fs::remove_dir_all(path)
            } else {
                fs::remove_file(path)
            };
            result.map_err(|e| KeepError::io(path, e))?;
            info!("deleted {}", rel);
        }

        let removal = Removal {
            path: rel.to_string(),
            is_dir,
            size,
            removed: !self.options.dry_run,
        };
        (self.on_removal)(&removal);
        self.report.removals.push(removal);

        Ok(())
    }
}

/// Total size of a path without following symlinks. Unreadable entries count as 0.
fn path_size(path: &Path) -> u64 {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(err) => {
            warn!("could not get metadata for {}: {}", path.display(), err);
            return 0;
        }
    };

    if !metadata.is_dir() {
        return metadata.len();
    }

    let entries = match fs::read_dir(path) {
        Ok(entries) => entries,
        Err(err) => {
            warn!("failed to read directory {}: {}", path.display(), err);
            return 0;
        }
    };

    entries
        .flatten()
        .map(|entry| path_size(&entry.path()))
        .sum()
}
