//! Certificate field extraction.

use chrono::{DateTime, NaiveDateTime};
use tracing::debug;
use x509_parser::time::ASN1Time;
use x509_parser::x509::X509Name;

use crate::error::{Result, TslError};
use crate::key::normalize_spki;
use crate::types::{CertificateRecord, KeyType};

/// Parse one DER certificate into a record at the given container position.
///
/// # Errors
///
/// Fails on malformed DER, an unsupported or invalid public key, or a
/// subject or issuer without a Common Name.
pub fn extract(der: &[u8], ordinal: usize) -> Result<CertificateRecord> {
    debug!(ordinal, size = der.len(), "parsing certificate");

    let (_, cert) = x509_parser::parse_x509_certificate(der).map_err(TslError::parse)?;

    let key = normalize_spki(cert.public_key())?;
    debug!(
        ordinal,
        key_type = %key.key_type,
        key_format = %key.key_format,
        key_info = key.key_info.as_deref().unwrap_or("-"),
        key_len = key.encoded.len(),
        key_prefix = %hex::encode(&key.encoded[..key.encoded.len().min(10)]),
        "extracted public key"
    );
    if key.key_type == KeyType::Ec {
        debug!(
            ordinal,
            point_format = if key.encoded.first() == Some(&0x04) { "uncompressed" } else { "unknown" },
            coordinate_len = (key.encoded.len() - 1) / 2,
            "EC point"
        );
    }

    let subject_name = common_name(cert.subject(), "subject")?;
    let issuer_name = common_name(cert.issuer(), "issuer")?;
    let serial_number = format!("{:X}", cert.serial);

    let validity = cert.validity();
    let not_valid_before = naive_utc(validity.not_before)?;
    let not_valid_after = naive_utc(validity.not_after)?;

    Ok(CertificateRecord {
        raw_content: der.to_vec(),
        key,
        subject_name,
        issuer_name,
        serial_number,
        not_valid_before,
        not_valid_after,
        ordinal,
    })
}

/// First Common Name of a distinguished name. No fallback to other attributes.
fn common_name(name: &X509Name<'_>, field: &'static str) -> Result<String> {
    let attr = name
        .iter_common_name()
        .next()
        .ok_or(TslError::MissingCommonName { field })?;
    attr.as_str()
        .map(str::to_string)
        .map_err(|e| TslError::parse(format!("{field} common name: {e}")))
}

fn naive_utc(t: ASN1Time) -> Result<NaiveDateTime> {
    let epoch = t.timestamp();
    DateTime::from_timestamp(epoch, 0)
        .map(|dt| dt.naive_utc())
        .ok_or(TslError::InvalidTimestamp(epoch))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::KeyFormat;
    use chrono::NaiveDate;

    #[test]
    fn test_rsa_fields() {
        let der = include_bytes!("../testdata/rsa2048_a.der");
        let record = extract(der, 1).unwrap();
        assert_eq!(record.raw_content, der.to_vec());
        assert_eq!(record.key.key_type, KeyType::Rsa);
        assert_eq!(record.key.key_format, KeyFormat::Spki);
        assert_eq!(record.key.key_info.as_deref(), Some("2048"));
        assert_eq!(record.subject_name, "RSA Signer A");
        assert_eq!(record.issuer_name, "RSA Signer A");
        assert_eq!(record.serial_number, "1001");
        assert_eq!(record.ordinal, 1);
        assert_eq!(
            record.not_valid_before,
            NaiveDate::from_ymd_opt(2026, 10, 19)
                .unwrap()
                .and_hms_opt(19, 50, 45)
                .unwrap()
        );
        assert_eq!(
            record.not_valid_after,
            NaiveDate::from_ymd_opt(2036, 10, 16)
                .unwrap()
                .and_hms_opt(19, 50, 45)
                .unwrap()
        );
    }

    #[test]
    fn test_serial_uppercase_unpadded() {
        let record = extract(include_bytes!("../testdata/rsa_serial_255.der"), 3).unwrap();
        assert_eq!(record.serial_number, "FF");
    }

    #[test]
    fn test_missing_common_name() {
        let err = extract(include_bytes!("../testdata/no_common_name.der"), 1).unwrap_err();
        assert!(matches!(err, TslError::MissingCommonName { field: "subject" }));
    }

    #[test]
    fn test_malformed_der() {
        let err = extract(&[0x30, 0x03, 0x02, 0x01], 1).unwrap_err();
        assert!(matches!(err, TslError::CertificateParse { .. }));
    }

    #[test]
    fn test_edwards_certificate() {
        let record = extract(include_bytes!("../testdata/ed25519.der"), 2).unwrap();
        assert_eq!(record.key.key_type, KeyType::Ed25519);
        assert_eq!(record.key.key_info, None);
        assert_eq!(record.subject_name, "Ed25519 Signer");
        assert_eq!(record.serial_number, "3003");
    }
}
