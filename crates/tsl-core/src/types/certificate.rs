//! Certificate record types.

use chrono::NaiveDateTime;
use serde::Serialize;

use super::{KeyFormat, KeyType};

/// A public key in canonical encoded form, ready for comparison and storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedKey {
    /// Algorithm family
    pub key_type: KeyType,
    /// Encoding of `encoded`
    pub key_format: KeyFormat,
    /// RSA bit length or EC curve name
    pub key_info: Option<String>,
    /// Canonical key bytes (never empty)
    #[serde(with = "hex::serde")]
    pub encoded: Vec<u8>,
}

/// One certificate extracted from a provider's container.
#[derive(Debug, Clone, Serialize)]
pub struct CertificateRecord {
    /// Exact DER bytes as found in the container
    #[serde(skip)]
    pub raw_content: Vec<u8>,
    /// Normalized public key
    #[serde(flatten)]
    pub key: NormalizedKey,
    /// Subject Common Name
    pub subject_name: String,
    /// Issuer Common Name
    pub issuer_name: String,
    /// Serial number, uppercase hex without padding
    pub serial_number: String,
    /// Start of validity, UTC without zone
    pub not_valid_before: NaiveDateTime,
    /// End of validity, UTC without zone
    pub not_valid_after: NaiveDateTime,
    /// 1-based position inside the container
    pub ordinal: usize,
}

impl CertificateRecord {
    /// Hex form of the canonical key, used for set membership.
    #[must_use]
    pub fn public_key_hex(&self) -> String {
        hex::encode(&self.key.encoded)
    }
}
