//! Per-provider duplicate public key detection.

use serde::Serialize;
use std::collections::HashMap;
use tracing::warn;

use crate::types::CertificateRecord;

/// A certificate whose key was already seen earlier in the same batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateKey {
    /// Ordinal of the certificate repeating the key
    pub ordinal: usize,
    /// Ordinal of the first certificate carrying the key
    pub first_ordinal: usize,
    /// Subject of the repeating certificate
    pub subject_name: String,
}

/// Tracks canonical keys seen within one provider's batch.
///
/// Duplicates are reported, never rejected. Create a fresh tracker per provider.
#[derive(Debug, Default)]
pub struct DuplicateKeyTracker {
    seen: HashMap<String, usize>,
}

impl DuplicateKeyTracker {
    /// Create an empty tracker
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a certificate, returning the duplicate annotation if its key was seen before.
    pub fn observe(&mut self, record: &CertificateRecord) -> Option<DuplicateKey> {
        let key_hex = record.public_key_hex();
        if let Some(&first_ordinal) = self.seen.get(&key_hex) {
            warn!(
                ordinal = record.ordinal,
                first_ordinal,
                subject = %record.subject_name,
                "duplicate public key detected"
            );
            return Some(DuplicateKey {
                ordinal: record.ordinal,
                first_ordinal,
                subject_name: record.subject_name.clone(),
            });
        }
        self.seen.insert(key_hex, record.ordinal);
        None
    }

    /// Number of distinct canonical keys seen
    #[must_use]
    pub fn unique_keys(&self) -> usize {
        self.seen.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{KeyFormat, KeyType, NormalizedKey};
    use chrono::NaiveDateTime;

    fn record(ordinal: usize, key: &[u8]) -> CertificateRecord {
        CertificateRecord {
            raw_content: vec![0x30],
            key: NormalizedKey {
                key_type: KeyType::Ed25519,
                key_format: KeyFormat::Raw,
                key_info: None,
                encoded: key.to_vec(),
            },
            subject_name: format!("cert {ordinal}"),
            issuer_name: "issuer".into(),
            serial_number: "1".into(),
            not_valid_before: NaiveDateTime::default(),
            not_valid_after: NaiveDateTime::default(),
            ordinal,
        }
    }

    #[test]
    fn test_single_duplicate_flagged_at_later_position() {
        let keys: [&[u8]; 6] = [b"a", b"b", b"c", b"d", b"b", b"e"];
        let mut tracker = DuplicateKeyTracker::new();
        let warnings: Vec<_> = keys
            .iter()
            .enumerate()
            .filter_map(|(i, k)| tracker.observe(&record(i + 1, k)))
            .collect();

        assert_eq!(
            warnings,
            vec![DuplicateKey {
                ordinal: 5,
                first_ordinal: 2,
                subject_name: "cert 5".into(),
            }]
        );
        assert_eq!(tracker.unique_keys(), keys.len() - 1);
    }

    #[test]
    fn test_distinct_keys() {
        let mut tracker = DuplicateKeyTracker::new();
        assert!(tracker.observe(&record(1, b"x")).is_none());
        assert!(tracker.observe(&record(2, b"y")).is_none());
        assert_eq!(tracker.unique_keys(), 2);
    }

    #[test]
    fn test_repeated_key_keeps_first_ordinal() {
        let mut tracker = DuplicateKeyTracker::new();
        tracker.observe(&record(1, b"k"));
        tracker.observe(&record(2, b"k"));
        let dup = tracker.observe(&record(3, b"k")).unwrap();
        assert_eq!(dup.first_ordinal, 1);
        assert_eq!(tracker.unique_keys(), 1);
    }
}
