//! External client lifecycle - terminate, launch, wait, snapshot, clean
//!
//! The client is a black box: the only synchronization with it is a fixed
//! wait after launch. Every step of a cycle is best-effort, so a cycle always
//! runs to completion and reports what actually happened.

use crate::fs_ops;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;
use sysinfo::System;
use tracing::{debug, warn};

/// Process-level capabilities the cycler needs
pub trait ProcessControl {
    /// Kill every running process with this exact name. Best-effort.
    fn terminate_by_name(&mut self, name: &str);

    /// Launch `executable` without waiting for it
    fn spawn_detached(&mut self, executable: &Path) -> io::Result<()>;

    fn sleep_for(&mut self, duration: Duration);
}

/// `ProcessControl` backed by the real OS
#[derive(Debug, Default)]
pub struct SystemProcessControl {
    system: System,
}

impl SystemProcessControl {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProcessControl for SystemProcessControl {
    fn terminate_by_name(&mut self, name: &str) {
        self.system.refresh_processes();

        let mut killed = 0usize;
        for process in self.system.processes_by_exact_name(name) {
            if process.kill() {
                killed += 1;
            } else {
                debug!("Could not kill {} (pid {})", name, process.pid());
            }
        }

        debug!("Terminated {} instance(s) of {}", killed, name);
    }

    fn spawn_detached(&mut self, executable: &Path) -> io::Result<()> {
        let mut command = Command::new(executable);
        command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;
            const DETACHED_PROCESS: u32 = 0x0000_0008;
            command.creation_flags(DETACHED_PROCESS);
        }

        let child = command.spawn()?;
        debug!("Launched {} (pid {})", executable.display(), child.id());
        Ok(())
    }

    fn sleep_for(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Where a cycle currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclePhase {
    Idle,
    TerminatingBeforeLaunch,
    Launching,
    /// Blind wait, then snapshot of the live config
    Waiting,
    /// Kill again, then remove the live config so the next launch mints a new ID
    TerminatingAfterSnapshot,
}

#[derive(Debug, Clone)]
pub struct CycleSettings {
    /// Executable file name used to find running instances
    pub process_name: String,
    pub executable: PathBuf,
    /// The client's live configuration directory
    pub live_config_dir: PathBuf,
    pub wait: Duration,
}

/// Outcome of one cycle. A `false` field means that step degraded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub target: PathBuf,
    pub spawned: bool,
    pub snapshot_copied: bool,
    pub live_config_cleared: bool,
}

pub struct ProcessCycler<C: ProcessControl> {
    control: C,
    settings: CycleSettings,
    phase: CyclePhase,
}

impl<C: ProcessControl> ProcessCycler<C> {
    pub fn new(control: C, settings: CycleSettings) -> Self {
        Self {
            control,
            settings,
            phase: CyclePhase::Idle,
        }
    }

    pub fn settings(&self) -> &CycleSettings {
        &self.settings
    }

    #[allow(dead_code)]
    pub fn phase(&self) -> CyclePhase {
        self.phase
    }

    #[allow(dead_code)]
    pub fn into_control(self) -> C {
        self.control
    }

    fn enter(&mut self, phase: CyclePhase) {
        debug!("Cycle phase {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
    }

    /// Run one full cycle, snapshotting the live config into `target`.
    pub fn run_cycle(&mut self, target: &Path) -> CycleReport {
        let process_name = self.settings.process_name.clone();
        let live_dir = self.settings.live_config_dir.clone();

        self.enter(CyclePhase::TerminatingBeforeLaunch);
        self.control.terminate_by_name(&process_name);

        self.enter(CyclePhase::Launching);
        let spawned = match self.control.spawn_detached(&self.settings.executable) {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to launch {}: {}", self.settings.executable.display(), e);
                false
            }
        };

        self.enter(CyclePhase::Waiting);
        self.control.sleep_for(self.settings.wait);

        let snapshot_copied = if live_dir.exists() {
            match fs_ops::copy_tree(&live_dir, target) {
                Ok(_) => true,
                Err(e) => {
                    debug!("Error copying files into {}: {}", target.display(), e);
                    false
                }
            }
        } else {
            debug!("Live config {} not present after wait", live_dir.display());
            false
        };

        self.enter(CyclePhase::TerminatingAfterSnapshot);
        self.control.terminate_by_name(&process_name);
        let live_config_cleared = fs_ops::remove_tree_quiet(&live_dir);

        self.enter(CyclePhase::Idle);

        CycleReport {
            target: target.to_path_buf(),
            spawned,
            snapshot_copied,
            live_config_cleared,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fake::{Call, FakeControl};
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn settings(root: &Path) -> CycleSettings {
        CycleSettings {
            process_name: "AnyDesk.exe".to_string(),
            executable: root.join("AnyDesk.exe"),
            live_config_dir: root.join("appdata/AnyDesk"),
            wait: Duration::from_secs(7),
        }
    }

    #[test]
    fn test_cycle_sequence() {
        let root = TempDir::new().unwrap();
        let settings = settings(root.path());
        let control = FakeControl::minting(&settings.live_config_dir, &["123456789"]);
        let mut cycler = ProcessCycler::new(control, settings.clone());

        let target = root.path().join("profiles/AD1/AnyDesk");
        fs::create_dir_all(&target).unwrap();
        let report = cycler.run_cycle(&target);

        assert_eq!(cycler.phase(), CyclePhase::Idle);
        assert!(report.spawned);
        assert!(report.snapshot_copied);
        assert!(report.live_config_cleared);
        assert_eq!(
            fs::read_to_string(target.join("system.conf")).unwrap(),
            "ad.anynet.id=123456789\n"
        );
        assert!(!settings.live_config_dir.exists());

        let control = cycler.into_control();
        assert_eq!(
            control.calls,
            vec![
                Call::Terminate("AnyDesk.exe".to_string()),
                Call::Spawn(settings.executable.clone()),
                Call::Sleep(Duration::from_secs(7)),
                Call::Terminate("AnyDesk.exe".to_string()),
            ]
        );
    }

    #[test]
    fn test_failed_spawn_still_completes_cycle() {
        let root = TempDir::new().unwrap();
        let settings = settings(root.path());
        let control = FakeControl {
            fail_spawn: true,
            ..FakeControl::default()
        };
        let mut cycler = ProcessCycler::new(control, settings);

        let target = root.path().join("profiles/AD1/AnyDesk");
        fs::create_dir_all(&target).unwrap();
        let report = cycler.run_cycle(&target);

        assert!(!report.spawned);
        assert!(!report.snapshot_copied);
        assert!(report.live_config_cleared);
        assert_eq!(cycler.into_control().calls.len(), 4);
        assert!(!target.join("system.conf").exists());
    }

    #[test]
    fn test_stale_live_config_is_snapshotted_then_removed() {
        let root = TempDir::new().unwrap();
        let settings = settings(root.path());
        fs::create_dir_all(&settings.live_config_dir).unwrap();
        fs::write(settings.live_config_dir.join("system.conf"), "ad.anynet.id=42\n").unwrap();

        let mut cycler = ProcessCycler::new(FakeControl::default(), settings.clone());
        let target = root.path().join("AD9/AnyDesk");
        let report = cycler.run_cycle(&target);

        assert!(report.snapshot_copied);
        assert!(target.join("system.conf").exists());
        assert!(!settings.live_config_dir.exists());
    }

    #[test]
    fn test_system_control_spawn_missing_binary_errors() {
        let root = TempDir::new().unwrap();
        let mut control = SystemProcessControl::new();
        assert!(control
            .spawn_detached(&root.path().join("does-not-exist"))
            .is_err());
        // nothing by this name is running; must not panic
        control.terminate_by_name("anyprofile-test-no-such-process");
    }
}
