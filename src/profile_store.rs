// Profile discovery - scans stored profiles and picks out beautiful IDs
use crate::classifier::{classify, Classification};
use crate::system_conf::{self, SYSTEM_CONF};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// One stored snapshot of the client's configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Profile {
    pub name: String,
    pub identifier: String,
    pub config_path: PathBuf,
}

/// Profiles in directory listing order
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct ProfileCatalog {
    profiles: Vec<Profile>,
}

impl ProfileCatalog {
    #[allow(dead_code)]
    pub fn get(&self, name: &str) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.name == name)
    }

    /// First profile (in listing order) holding this identifier
    pub fn find_by_identifier(&self, identifier: &str) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.identifier == identifier)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Profile> {
        self.profiles.iter()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    fn insert(&mut self, profile: Profile) {
        self.profiles.push(profile);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BeautifulProfile {
    pub name: String,
    pub identifier: String,
    pub beauty: Classification,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct BeautifulCatalog {
    profiles: Vec<BeautifulProfile>,
}

impl BeautifulCatalog {
    #[allow(dead_code)]
    pub fn get(&self, name: &str) -> Option<&BeautifulProfile> {
        self.profiles.iter().find(|p| p.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BeautifulProfile> {
        self.profiles.iter()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

/// Both catalogs from a single scan
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanResult {
    pub profiles: ProfileCatalog,
    pub beautiful: BeautifulCatalog,
}

pub struct ProfileStore {
    root: PathBuf,
    app_name: String,
}

impl ProfileStore {
    pub fn new(root: PathBuf, app_name: impl Into<String>) -> Self {
        Self {
            root,
            app_name: app_name.into(),
        }
    }

    /// `<root>/<profile>/<app>/system.conf`
    pub fn config_path(&self, profile_name: &str) -> PathBuf {
        self.root
            .join(profile_name)
            .join(&self.app_name)
            .join(SYSTEM_CONF)
    }

    /// Rebuild both catalogs from disk. Never writes, never fails:
    /// invalid entries are logged and skipped.
    pub fn scan(&self) -> ScanResult {
        let mut result = ScanResult::default();

        if !self.root.exists() {
            warn!("Profiles directory '{}' does not exist!", self.root.display());
            return result;
        }

        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Cannot list profiles directory '{}': {}", self.root.display(), e);
                return result;
            }
        };

        for entry in entries.filter_map(|e| e.ok()) {
            let profile_name = entry.file_name().to_string_lossy().to_string();

            if !entry.path().is_dir() {
                debug!("Skipping non-directory item: {}", profile_name);
                continue;
            }

            let config_path = self.config_path(&profile_name);
            if !config_path.is_file() {
                warn!("{} not found in profile: {}", SYSTEM_CONF, profile_name);
                continue;
            }

            debug!("Parsing profile: {}", profile_name);
            let Some(identifier) = system_conf::read_identifier(&config_path) else {
                warn!("No ad.anynet.id found in {} for profile: {}", SYSTEM_CONF, profile_name);
                continue;
            };

            if let Some(beauty) = classify(&identifier) {
                result.beautiful.profiles.push(BeautifulProfile {
                    name: profile_name.clone(),
                    identifier: identifier.clone(),
                    beauty,
                });
            }

            result.profiles.insert(Profile {
                name: profile_name,
                identifier,
                config_path,
            });
        }

        info!(
            "Scanned {}: {} profiles, {} beautiful",
            self.root.display(),
            result.profiles.len(),
            result.beautiful.len()
        );

        result
    }
}
