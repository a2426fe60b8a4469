// Operations behind both the subcommands and the interactive menu
use crate::applier::ProfileApplier;
use crate::cli_output::{format_duration, OutputMode, OutputWriter};
use crate::error::{ProfileError, ProfileResult};
use crate::process::{CycleSettings, ProcessCycler, SystemProcessControl};
use crate::profile_store::{ProfileStore, ScanResult};
use crate::rotation::RotationEngine;
use crate::settings::Settings;
use crate::system_conf;
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

pub struct App {
    settings: Settings,
    output: OutputWriter,
    scan: ScanResult,
}

impl App {
    /// Create the profiles directory if needed and take the initial scan
    pub fn new(settings: Settings, output: OutputWriter) -> Result<Self> {
        let profiles_dir = settings.profiles_dir();
        fs::create_dir_all(&profiles_dir).with_context(|| {
            format!("Failed to create profiles directory {}", profiles_dir.display())
        })?;

        let scan = ProfileStore::new(profiles_dir, settings.app_name.clone()).scan();
        Ok(Self {
            settings,
            output,
            scan,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn output(&self) -> &OutputWriter {
        &self.output
    }

    #[cfg(test)]
    pub fn scan(&self) -> &ScanResult {
        &self.scan
    }

    fn store(&self) -> ProfileStore {
        ProfileStore::new(self.settings.profiles_dir(), self.settings.app_name.clone())
    }

    /// Rescan and print every profile
    pub fn list(&mut self) {
        self.scan = self.store().scan();
        self.output.section("Found IDs");
        if self.scan.profiles.is_empty() {
            self.output.warning(&format!(
                "No profiles in {}",
                self.settings.profiles_dir().display()
            ));
            return;
        }
        self.output.profiles(&self.scan.profiles);
    }

    /// Generate `count` profiles, then print the refreshed list
    pub fn generate(&mut self, count: usize, executable: Option<PathBuf>, wait_seconds: Option<u64>) -> Result<()> {
        let wait = wait_seconds
            .map(Duration::from_secs)
            .unwrap_or_else(|| self.settings.wait());
        let settings = CycleSettings {
            process_name: self.settings.process_name.clone(),
            executable: executable.unwrap_or_else(|| self.settings.executable()),
            live_config_dir: self.settings.live_config_dir()?,
            wait,
        };

        self.output.section("Generating profiles");
        self.output.table(&[
            ("Executable", settings.executable.display().to_string()),
            ("Live config", settings.live_config_dir.display().to_string()),
            ("Profiles", count.to_string()),
            (
                "Estimated time",
                format_duration(wait.as_secs().saturating_mul(count as u64)),
            ),
        ]);

        let cycler = ProcessCycler::new(SystemProcessControl::new(), settings);
        let mut engine = RotationEngine::new(
            self.settings.profiles_dir(),
            self.settings.profile_prefix.clone(),
            self.settings.app_name.clone(),
            cycler,
        );

        let pb = if self.output.is_human() {
            let pb = ProgressBar::new(count as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("[{elapsed}] {bar:50.cyan/blue} {pos}/{len} profiles {msg}")?
                    .progress_chars("#>-"),
            );
            Some(pb)
        } else {
            None
        };

        let output = &self.output;
        let outcome = engine.run(count, |progress| {
            if let Some(ref pb) = pb {
                pb.set_message(progress.profile.clone());
                pb.inc(1);
            }
            output.progress("generate", progress.completed, progress.total);
        })?;

        if let Some(pb) = pb {
            pb.finish_with_message("Done!");
        }

        info!("Generated {} profiles", outcome.created.len());
        for report in &outcome.reports {
            if !report.spawned {
                self.output.warning(&format!(
                    "Client failed to start for {}",
                    report.target.display()
                ));
            }
            if !report.live_config_cleared {
                self.output
                    .warning("Live configuration could not be removed, the next ID may repeat");
            }
        }
        for report in outcome.degraded() {
            self.output.warning(&format!(
                "No configuration captured in {}",
                report.target.display()
            ));
        }
        self.output.success("All profiles generated successfully!");

        self.scan = outcome.scan;
        self.output.section("Updated Found IDs");
        self.output.profiles(&self.scan.profiles);
        Ok(())
    }

    pub fn show_beautiful(&self) {
        self.output.section("Beautiful IDs");
        self.output.beautiful(&self.scan.beautiful);
    }

    /// Print the configuration of the first profile holding `identifier`.
    /// Returns false if no profile has it.
    /// Print the configuration of the first profile holding `identifier`.
    /// A miss is returned to the caller, not printed.
    pub fn lookup(&self, identifier: &str) -> ProfileResult<()> {
        let profile = self
            .scan
            .profiles
            .find_by_identifier(identifier)
            .ok_or_else(|| ProfileError::IdNotFound(identifier.to_string()))?;

        self.output
            .section(&format!("Configuration for profile {}", profile.name));
        match system_conf::read_content(&profile.config_path) {
            Some(content) => match self.output.mode() {
                OutputMode::Json => self.output.emit_json(&serde_json::json!({
                    "profile": profile.name,
                    "config_path": profile.config_path,
                    "content": content,
                })),
                _ => println!("{}", content),
            },
            None => self
                .output
                .error(&format!("Cannot read {}", profile.config_path.display())),
        }
        Ok(())
    }

    pub fn apply(&self, name: &str) -> Result<()> {
        let applier = ProfileApplier {
            profiles_dir: self.settings.profiles_dir(),
            app_name: self.settings.app_name.clone(),
            live_config_dir: self.settings.live_config_dir()?,
            executable: self.settings.executable(),
        };

        let applied = applier.apply(name, &mut SystemProcessControl::new())?;
        self.output.success(&format!(
            "Profile '{}' applied successfully ({} files), {} started",
            applied.name,
            applied.files_copied,
            applied.executable.display()
        ));
        Ok(())
    }
}
