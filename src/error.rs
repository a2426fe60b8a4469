// Error types for profile generation and application
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("Executable not found: {0}")]
    ExecutableNotFound(PathBuf),
    #[error("Profile '{0}' does not exist or is invalid")]
    ProfileNotFound(String),
    #[error("ID {0} not found.")]
    IdNotFound(String),
    #[error("Copy failed: {0}")]
    CopyFailed(String),
    #[error("Could not determine the application data directory")]
    NoAppDataDir,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ProfileResult<T> = Result<T, ProfileError>;
