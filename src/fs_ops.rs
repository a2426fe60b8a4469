// Recursive copy and delete helpers for profile snapshots
use anyhow::Result;
use std::fs;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

/// Recursively copy `from` into `to`, merging with whatever `to` already holds.
/// Existing files are overwritten.
pub fn copy_tree(from: &Path, to: &Path) -> Result<usize> {
    let mut copied = 0usize;

    fs::create_dir_all(to)?;

    for entry in WalkDir::new(from).follow_links(false) {
        let entry = entry?;
        let relative = entry.path().strip_prefix(from)?;
        let target = to.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else if entry.file_type().is_file() {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }

    debug!("Copied {} files from {} to {}", copied, from.display(), to.display());
    Ok(copied)
}

/// Recursively delete `path`, ignoring errors. Returns true if nothing is left behind.
pub fn remove_tree_quiet(path: &Path) -> bool {
    if !path.exists() {
        return true;
    }

    if let Err(e) = fs::remove_dir_all(path) {
        debug!("Could not fully remove {}: {}", path.display(), e);
    }

    !path.exists()
}
