//! Preconditions checked before a collection run touches the filesystem.

use std::path::Path;
use thiserror::Error;

use crate::config::Config;

/// Reasons a run refuses to start.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuardViolation {
    /// The database path names an existing directory
    #[error("database path {0} is a directory")]
    DatabaseIsDirectory(String),
    /// The download path names an existing file
    #[error("download directory {0} exists and is not a directory")]
    DownloadDirIsFile(String),
}

/// Check that the configured paths can be used.
///
/// Nothing is created or removed here.
pub fn check(config: &Config) -> Result<(), GuardViolation> {
    check_paths(&config.database_path, &config.download_dir)
}

fn check_paths(database: &Path, download_dir: &Path) -> Result<(), GuardViolation> {
    if database.is_dir() {
        return Err(GuardViolation::DatabaseIsDirectory(
            database.display().to_string(),
        ));
    }
    if download_dir.exists() && !download_dir.is_dir() {
        return Err(GuardViolation::DownloadDirIsFile(
            download_dir.display().to_string(),
        ));
    }
    Ok(())
}
