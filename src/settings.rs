// Settings management - where profiles live and how the client is driven
use crate::error::{ProfileError, ProfileResult};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_APP_NAME: &str = "AnyDesk";
const DEFAULT_PROCESS_NAME: &str = "AnyDesk.exe";
const DEFAULT_PREFIX: &str = "AD";
const DEFAULT_WAIT_SECONDS: u64 = 10;

/// Tool settings, stored as JSON. Unset paths fall back to locations
/// relative to the running program.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Directory holding `<prefix><n>` profile directories
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profiles_dir: Option<PathBuf>,
    /// Name of the client's config directory, both live and inside each profile
    pub app_name: String,
    /// Executable file name used to find running client instances
    pub process_name: String,
    /// Client executable to launch
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executable: Option<PathBuf>,
    pub profile_prefix: String,
    pub wait_seconds: u64,
    /// Live config directory override (default: `<user-appdata>/<app_name>`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live_config_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            profiles_dir: None,
            app_name: DEFAULT_APP_NAME.to_string(),
            process_name: DEFAULT_PROCESS_NAME.to_string(),
            executable: None,
            profile_prefix: DEFAULT_PREFIX.to_string(),
            wait_seconds: DEFAULT_WAIT_SECONDS,
            live_config_dir: None,
        }
    }
}

impl Settings {
    /// Load settings from `path`, or defaults if the file does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        let settings: Settings = serde_json::from_str(&content)
            .with_context(|| format!("Invalid settings file {}", path.display()))?;
        Ok(settings)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(&self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Get the settings file path
    pub fn settings_file_path() -> PathBuf {
        dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("anyprofile")
            .join("settings.json")
    }

    /// Directory of the running program; the default home of profiles and the client
    fn program_dir() -> PathBuf {
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn profiles_dir(&self) -> PathBuf {
        self.profiles_dir
            .clone()
            .unwrap_or_else(|| Self::program_dir().join("profiles"))
    }

    pub fn executable(&self) -> PathBuf {
        self.executable
            .clone()
            .unwrap_or_else(|| Self::program_dir().join(&self.process_name))
    }

    pub fn live_config_dir(&self) -> ProfileResult<PathBuf> {
        if let Some(dir) = &self.live_config_dir {
            return Ok(dir.clone());
        }

        dirs::config_dir()
            .map(|appdata| appdata.join(&self.app_name))
            .ok_or(ProfileError::NoAppDataDir)
    }

    pub fn wait(&self) -> Duration {
        Duration::from_secs(self.wait_seconds)
    }
}
