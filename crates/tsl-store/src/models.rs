//! Row types read back from the store.

use chrono::NaiveDateTime;
use sqlx::FromRow;

/// A row of the `providers` table.
#[derive(Debug, Clone, FromRow)]
pub struct ProviderRow {
    pub id: i64,
    pub name: String,
    pub trade_name: Option<String>,
    pub original_filename: Option<String>,
    pub downloaded_at: Option<NaiveDateTime>,
}

/// A row of the `certificates` table.
#[derive(Debug, Clone, FromRow)]
pub struct CertificateRow {
    pub id: i64,
    pub provider_id: i64,
    pub cert_content: Vec<u8>,
    pub public_key: Vec<u8>,
    pub key_type: String,
    pub key_format: String,
    pub key_info: Option<String>,
    pub subject_name: Option<String>,
    pub issuer_name: Option<String>,
    pub serial_number: Option<String>,
    pub not_valid_before: Option<NaiveDateTime>,
    pub not_valid_after: Option<NaiveDateTime>,
    /// 1-based position inside the provider's container
    pub cert_number: Option<i64>,
    pub created_at: Option<NaiveDateTime>,
}
