// Profile rotation - mint fresh identifiers by cycling the client N times
use crate::error::{ProfileError, ProfileResult};
use crate::process::{CycleReport, ProcessControl, ProcessCycler};
use crate::profile_store::{ProfileStore, ScanResult};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Progress after each finished cycle
#[derive(Debug, Clone, PartialEq)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
    pub profile: String,
}

impl Progress {
    #[allow(dead_code)]
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }
}

#[derive(Debug, Clone)]
pub struct RotationOutcome {
    /// Names of the profile directories created, in order
    pub created: Vec<String>,
    pub reports: Vec<CycleReport>,
    /// Fresh scan of the profiles directory after the run
    pub scan: ScanResult,
}

impl RotationOutcome {
    /// Cycles that produced no snapshot
    pub fn degraded(&self) -> impl Iterator<Item = &CycleReport> {
        self.reports.iter().filter(|r| !r.snapshot_copied)
    }
}

/// Next free profile number: one past the highest `<prefix><n>` entry, or 1.
pub fn next_profile_number(root: &Path, prefix: &str) -> u64 {
    let pattern = match Regex::new(&format!(r"^{}(\d+)$", regex::escape(prefix))) {
        Ok(pattern) => pattern,
        Err(e) => {
            warn!("Invalid profile prefix '{}': {}", prefix, e);
            return 1;
        }
    };

    let Ok(entries) = fs::read_dir(root) else {
        return 1;
    };

    entries
        .filter_map(|e| e.ok())
        .filter_map(|e| {
            let name = e.file_name().to_string_lossy().to_string();
            pattern
                .captures(&name)
                .and_then(|caps| match caps[1].parse::<u64>() {
                    Ok(number) => Some(number),
                    Err(e) => {
                        warn!("Ignoring profile '{}': {}", name, e);
                        None
                    }
                })
        })
        .max()
        .map_or(1, |max| max.saturating_add(1))
}

pub struct RotationEngine<C: ProcessControl> {
    root: PathBuf,
    prefix: String,
    app_name: String,
    cycler: ProcessCycler<C>,
}

impl<C: ProcessControl> RotationEngine<C> {
    pub fn new(
        root: PathBuf,
        prefix: impl Into<String>,
        app_name: impl Into<String>,
        cycler: ProcessCycler<C>,
    ) -> Self {
        Self {
            root,
            prefix: prefix.into(),
            app_name: app_name.into(),
            cycler,
        }
    }

    /// Generate `count` new profiles, one client cycle each, strictly in sequence.
    ///
    /// A degraded cycle leaves its directory in place; there is no rollback or retry.
    pub fn run<F>(&mut self, count: usize, mut on_progress: F) -> ProfileResult<RotationOutcome>
    where
        F: FnMut(&Progress),
    {
        let executable = &self.cycler.settings().executable;
        if !executable.exists() {
            return Err(ProfileError::ExecutableNotFound(executable.clone()));
        }

        fs::create_dir_all(&self.root)?;

        let first = next_profile_number(&self.root, &self.prefix);
        info!(
            "Generating {} profiles starting at {}{}",
            count, self.prefix, first
        );

        let mut created = Vec::with_capacity(count);
        let mut reports = Vec::with_capacity(count);

        for (done, number) in (first..).take(count).enumerate() {
            let profile = format!("{}{}", self.prefix, number);
            let app_dir = self.root.join(&profile).join(&self.app_name);
            fs::create_dir_all(&app_dir)?;

            let report = self.cycler.run_cycle(&app_dir);
            if !report.snapshot_copied {
                warn!("Profile {} has no configuration snapshot", profile);
            }

            on_progress(&Progress {
                completed: done + 1,
                total: count,
                profile: profile.clone(),
            });

            created.push(profile);
            reports.push(report);
        }

        let scan = ProfileStore::new(self.root.clone(), self.app_name.clone()).scan();

        Ok(RotationOutcome {
            created,
            reports,
            scan,
        })
    }

    #[allow(dead_code)]
    pub fn into_cycler(self) -> ProcessCycler<C> {
        self.cycler
    }
}
