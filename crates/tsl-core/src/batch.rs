//! Processing of one provider's certificate set.

use serde::Serialize;
use tracing::{info, warn};

use crate::container;
use crate::dedup::{DuplicateKey, DuplicateKeyTracker};
use crate::extract::extract;
use crate::types::CertificateRecord;

/// A certificate segment that could not be turned into a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedCertificate {
    /// 1-based position inside the container
    pub ordinal: usize,
    /// Why extraction failed
    pub reason: String,
}

/// Outcome of processing one provider's container.
#[derive(Debug, Default, Serialize)]
pub struct CertificateBatch {
    /// Records in container order
    pub records: Vec<CertificateRecord>,
    /// Repeated keys, in the order they were met
    pub duplicates: Vec<DuplicateKey>,
    /// Segments dropped because extraction failed
    pub skipped: Vec<SkippedCertificate>,
    /// Distinct canonical keys among `records`
    pub unique_keys: usize,
}

impl CertificateBatch {
    /// Extract every segment, dropping failures, and flag repeated keys.
    ///
    /// Ordinals follow segment positions, so a dropped certificate leaves a gap.
    pub fn from_segments<S: AsRef<[u8]>>(segments: &[S]) -> Self {
        let mut batch = Self::default();
        let mut tracker = DuplicateKeyTracker::new();

        for (index, segment) in segments.iter().enumerate() {
            let ordinal = index + 1;
            match extract(segment.as_ref(), ordinal) {
                Ok(record) => {
                    if let Some(dup) = tracker.observe(&record) {
                        batch.duplicates.push(dup);
                    }
                    batch.records.push(record);
                }
                Err(e) => {
                    warn!(ordinal, error = %e, "skipping certificate");
                    batch.skipped.push(SkippedCertificate {
                        ordinal,
                        reason: e.to_string(),
                    });
                }
            }
        }

        batch.unique_keys = tracker.unique_keys();
        info!(
            extracted = batch.records.len(),
            skipped = batch.skipped.len(),
            unique_keys = batch.unique_keys,
            "processed certificate batch"
        );
        batch
    }

    /// Split a raw container and process its segments.
    #[must_use]
    pub fn from_container(raw: &[u8]) -> Self {
        Self::from_segments(&container::split(raw))
    }

    /// Whether nothing usable was found
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
