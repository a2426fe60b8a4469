// Apply a stored profile to the client's live configuration
use crate::error::{ProfileError, ProfileResult};
use crate::fs_ops;
use crate::process::ProcessControl;
use std::path::{Component, Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedProfile {
    pub name: String,
    pub files_copied: usize,
    pub executable: PathBuf,
}

pub struct ProfileApplier {
    pub profiles_dir: PathBuf,
    pub app_name: String,
    pub live_config_dir: PathBuf,
    pub executable: PathBuf,
}

impl ProfileApplier {
    /// Replace the live configuration with the one stored in `name` and relaunch the client.
    pub fn apply<C: ProcessControl>(&self, name: &str, control: &mut C) -> ProfileResult<AppliedProfile> {
        let stored = self.profiles_dir.join(name).join(&self.app_name);
        if !is_plain_name(name) || !stored.is_dir() {
            return Err(ProfileError::ProfileNotFound(name.to_string()));
        }

        if !fs_ops::remove_tree_quiet(&self.live_config_dir) {
            warn!(
                "Live configuration {} was not fully removed",
                self.live_config_dir.display()
            );
        }

        let files_copied = fs_ops::copy_tree(&stored, &self.live_config_dir)
            .map_err(|e| ProfileError::CopyFailed(format!("{:#}", e)))?;
        info!("Profile '{}' applied ({} files)", name, files_copied);

        if !self.executable.is_file() {
            return Err(ProfileError::ExecutableNotFound(self.executable.clone()));
        }

        control.spawn_detached(&self.executable)?;
        info!("{} started with profile '{}'", self.app_name, name);

        Ok(AppliedProfile {
            name: name.to_string(),
            files_copied,
            executable: self.executable.clone(),
        })
    }
}

/// A single normal path component: no separators, no `.` or `..`
fn is_plain_name(name: &str) -> bool {
    !name.contains(['/', '\\'])
        && matches!(
            Path::new(name).components().collect::<Vec<_>>().as_slice(),
            [Component::Normal(_)]
        )
}
