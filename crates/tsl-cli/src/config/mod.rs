//! Configuration management.

use anyhow::{Context as _, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tsl_client::{TslClient, DEFAULT_TIMEOUT, DEFAULT_TRUST_LIST_URL, DEFAULT_USER_AGENT};

use crate::cli::args::CollectArgs;

/// Collector configuration.
///
/// Every field has a default, so a partial file is enough.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Trust list to process.
    pub trust_list_url: String,

    /// SQLite database, deleted and recreated on each run.
    pub database_path: PathBuf,

    /// Scratch directory for downloaded containers.
    pub download_dir: PathBuf,

    /// User-Agent sent with every request.
    pub user_agent: String,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,

    /// Skip TLS certificate verification.
    pub accept_invalid_certs: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            trust_list_url: DEFAULT_TRUST_LIST_URL.to_string(),
            database_path: PathBuf::from("certificates.db"),
            download_dir: PathBuf::from("temp_cert_files"),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            accept_invalid_certs: false,
        }
    }
}

impl Config {
    /// Get the default config file path.
    pub fn path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("org", "tsl", "tsl-collector")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Load configuration from `explicit`, or from the default location.
    ///
    /// An explicit file must exist; a missing default file yields defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load_from(path),
            None => {
                let path = Self::path()?;
                if path.exists() {
                    Self::load_from(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Load configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        Ok(config)
    }

    /// Save configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Set one value by key name.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "trust_list_url" | "url" => self.trust_list_url = value.to_string(),
            "database_path" | "database" => self.database_path = PathBuf::from(value),
            "download_dir" => self.download_dir = PathBuf::from(value),
            "user_agent" => self.user_agent = value.to_string(),
            "timeout_secs" | "timeout" => {
                self.timeout_secs = value
                    .parse()
                    .with_context(|| format!("invalid timeout: {value}"))?;
            }
            "accept_invalid_certs" | "insecure" => {
                self.accept_invalid_certs = value
                    .parse()
                    .with_context(|| format!("expected true or false, got {value}"))?;
            }
            _ => {
                anyhow::bail!(
                    "Unknown config key: {}\n\n\
                     Available keys:\n  \
                     trust_list_url       - Trust list to download\n  \
                     database_path        - SQLite output file\n  \
                     download_dir         - Scratch directory for containers\n  \
                     user_agent           - User-Agent header\n  \
                     timeout_secs         - Request timeout in seconds\n  \
                     accept_invalid_certs - Skip TLS verification (true/false)",
                    key
                );
            }
        }
        Ok(())
    }

    /// Apply command-line overrides.
    #[must_use]
    pub fn with_overrides(mut self, args: &CollectArgs) -> Self {
        if let Some(url) = &args.url {
            self.trust_list_url.clone_from(url);
        }
        if let Some(database) = &args.database {
            self.database_path.clone_from(database);
        }
        if let Some(dir) = &args.download_dir {
            self.download_dir.clone_from(dir);
        }
        if args.insecure {
            self.accept_invalid_certs = true;
        }
        self
    }

    /// Request timeout
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Build an HTTP client from this configuration.
    pub fn client(&self) -> Result<TslClient> {
        let client = TslClient::builder()
            .timeout(self.timeout())
            .user_agent(&self.user_agent)
            .accept_invalid_certs(self.accept_invalid_certs)
            .build()?;
        Ok(client)
    }
}
