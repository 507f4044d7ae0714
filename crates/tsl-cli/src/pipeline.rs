//! Collection run: trust list, provider containers, certificate store.

use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use tsl_client::{Container, TrustListEntry, TslClient};
use tsl_core::{container, CertificateBatch};
use tsl_store::SqliteStore;

/// What happened to one trust-list provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderOutcome {
    /// Provider row and certificates committed
    Stored {
        /// Row id of the provider
        provider_id: i64,
        /// Certificates written
        certificates: usize,
    },
    /// The entry names no French information URI
    NoUri,
    /// Download or scratch-file handling failed
    Unavailable,
    /// The container held no certificate segment
    Empty,
    /// The transaction was rolled back
    StoreFailed,
}

/// Counters for a whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub providers_listed: usize,
    pub providers_stored: usize,
    pub certificates_stored: usize,
    pub without_uri: usize,
    pub unavailable: usize,
    pub empty: usize,
    pub store_failures: usize,
}

impl RunSummary {
    fn record(&mut self, outcome: &ProviderOutcome) {
        match outcome {
            ProviderOutcome::Stored { certificates, .. } => {
                self.providers_stored += 1;
                self.certificates_stored += certificates;
            }
            ProviderOutcome::NoUri => self.without_uri += 1,
            ProviderOutcome::Unavailable => self.unavailable += 1,
            ProviderOutcome::Empty => self.empty += 1,
            ProviderOutcome::StoreFailed => self.store_failures += 1,
        }
    }

    fn log_complete(&self) {
        info!(
            providers = self.providers_listed,
            stored = self.providers_stored,
            certificates = self.certificates_stored,
            "processing complete"
        );
    }
}

/// Drives one collection run against a prepared store.
pub struct Collector {
    client: TslClient,
    store: SqliteStore,
    download_dir: PathBuf,
}

impl Collector {
    /// Create a collector. `download_dir` must already exist.
    pub fn new(client: TslClient, store: SqliteStore, download_dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            store,
            download_dir: download_dir.into(),
        }
    }

    /// The store being filled
    pub const fn store(&self) -> &SqliteStore {
        &self.store
    }

    /// Process every provider of the trust list at `url`.
    ///
    /// A trust list that cannot be downloaded ends the run without error;
    /// one that cannot be parsed is fatal. Provider failures are logged and
    /// skipped.
    pub async fn run(&self, url: &str) -> Result<RunSummary> {
        let mut summary = RunSummary::default();

        let list = match self.client.trust_list(url).await {
            Ok(list) => list,
            Err(e) if e.is_fetch_error() => {
                error!(url, error = %e, "could not download trust list");
                summary.log_complete();
                return Ok(summary);
            }
            Err(e) => return Err(e).context("reading trust list"),
        };

        summary.providers_listed = list.len();
        for entry in &list.entries {
            let outcome = self.process_provider(entry).await;
            summary.record(&outcome);
        }

        summary.log_complete();
        Ok(summary)
    }

    /// Download, split, extract and store one provider.
    pub async fn process_provider(&self, entry: &TrustListEntry) -> ProviderOutcome {
        let name = entry.display_name();

        let Some(uri) = entry.information_uri.as_deref() else {
            debug!(provider = %name, "no information URI, skipping");
            return ProviderOutcome::NoUri;
        };

        info!(provider = %name, url = uri, "processing provider");

        let container = match self.client.container(uri).await {
            Ok(container) => container,
            Err(e) => {
                error!(provider = %name, url = uri, error = %e, "download failed");
                return ProviderOutcome::Unavailable;
            }
        };

        let raw = match self.stage(name, &container).await {
            Ok(raw) => raw,
            Err(e) => {
                error!(provider = %name, error = %e, "could not stage container");
                return ProviderOutcome::Unavailable;
            }
        };

        let segments = container::split(&raw);
        if segments.is_empty() {
            warn!(provider = %name, file = %container.filename, "no certificates in container");
            return ProviderOutcome::Empty;
        }

        let batch = CertificateBatch::from_segments(&segments);
        let provider = entry.to_provider(&container.filename);

        match self.store.store_provider(&provider, &batch.records).await {
            Ok(provider_id) => {
                info!(
                    provider = %name,
                    stored = batch.records.len(),
                    unique_keys = batch.unique_keys,
                    "provider complete"
                );
                ProviderOutcome::Stored {
                    provider_id,
                    certificates: batch.records.len(),
                }
            }
            Err(e) => {
                error!(provider = %name, error = %e, "failed to store provider");
                ProviderOutcome::StoreFailed
            }
        }
    }

    /// Round-trip the container through the download directory.
    ///
    /// The scratch file is removed before returning.
    async fn stage(&self, name: &str, container: &Container) -> Result<Vec<u8>> {
        let path = scratch_path(&self.download_dir, name, &container.filename);

        tokio::fs::write(&path, &container.bytes)
            .await
            .with_context(|| format!("writing {}", path.display()))?;
        debug!(path = %path.display(), size = container.bytes.len(), "saved container");

        let read = tokio::fs::read(&path)
            .await
            .with_context(|| format!("reading {}", path.display()));

        if let Err(e) = tokio::fs::remove_file(&path).await {
            warn!(path = %path.display(), error = %e, "could not remove scratch file");
        }
        read
    }

    /// Close the underlying store.
    pub async fn close(self) {
        self.store.close().await;
    }
}

/// `<dir>/<provider>_<filename>` with path-hostile characters replaced.
pub fn scratch_path(dir: &Path, provider: &str, filename: &str) -> PathBuf {
    dir.join(format!(
        "{}_{}",
        sanitize_component(provider),
        sanitize_component(filename)
    ))
}

/// Keep ASCII alphanumerics, `-`, `_`, `.` and spaces; replace everything else with `_`.
pub fn sanitize_component(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ' ') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_component() {
        assert_eq!(sanitize_component("Imprimerie Nationale"), "Imprimerie Nationale");
        assert_eq!(sanitize_component("A/B\\C:D"), "A_B_C_D");
        assert_eq!(sanitize_component("Société"), "Soci_t_");
        assert_eq!(sanitize_component("FR01.der"), "FR01.der");
    }

    #[test]
    fn test_scratch_path_stays_in_dir() {
        let dir = Path::new("/tmp/dl");
        let path = scratch_path(dir, "../../etc", "passwd");
        assert_eq!(path.parent(), Some(dir));
        assert_eq!(path.file_name().unwrap(), ".._.._etc_passwd");
    }

    #[test]
    fn test_summary_counts() {
        let mut summary = RunSummary::default();
        summary.record(&ProviderOutcome::Stored {
            provider_id: 1,
            certificates: 3,
        });
        summary.record(&ProviderOutcome::NoUri);
        summary.record(&ProviderOutcome::Empty);
        summary.record(&ProviderOutcome::Unavailable);
        assert_eq!(summary.providers_stored, 1);
        assert_eq!(summary.certificates_stored, 3);
        assert_eq!(summary.without_uri, 1);
        assert_eq!(summary.empty, 1);
        assert_eq!(summary.unavailable, 1);
        assert_eq!(summary.store_failures, 0);
    }
}
