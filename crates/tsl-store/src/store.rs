//! SQLite certificate store.

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite, SqliteConnection};
use std::path::Path;
use std::time::Duration;
use tsl_core::{CertificateRecord, Provider};

use crate::error::{StoreError, StoreResult};
use crate::models::{CertificateRow, ProviderRow};

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS providers (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        trade_name TEXT,
        original_filename TEXT,
        downloaded_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    )",
    "CREATE TABLE IF NOT EXISTS certificates (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        provider_id INTEGER,
        cert_content BLOB NOT NULL,
        public_key BLOB NOT NULL,
        key_type TEXT NOT NULL,
        key_format TEXT NOT NULL,
        key_info TEXT,
        subject_name TEXT,
        issuer_name TEXT,
        serial_number TEXT,
        not_valid_before TIMESTAMP,
        not_valid_after TIMESTAMP,
        cert_number INTEGER,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
        FOREIGN KEY (provider_id) REFERENCES providers (id)
    )",
    "CREATE INDEX IF NOT EXISTS idx_provider_id ON certificates(provider_id)",
    "CREATE INDEX IF NOT EXISTS idx_subject_name ON certificates(subject_name)",
    "CREATE INDEX IF NOT EXISTS idx_serial_number ON certificates(serial_number)",
    "CREATE INDEX IF NOT EXISTS idx_key_type ON certificates(key_type)",
];

/// SQLite-backed store of providers and their certificates.
pub struct SqliteStore {
    pool: Pool<Sqlite>,
}

impl SqliteStore {
    /// Delete any existing database at `path` and create an empty one.
    pub async fn recreate(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        if path.is_dir() {
            return Err(StoreError::Config(format!(
                "database path {} is a directory",
                path.display()
            )));
        }
        if path.exists() {
            tracing::info!(path = %path.display(), "removing existing database");
            std::fs::remove_file(path).map_err(|e| StoreError::io(path.display().to_string(), e))?;
        }

        tracing::info!(path = %path.display(), "creating new database");
        let store = Self::open(path).await?;
        tracing::info!("database initialization complete");
        Ok(store)
    }

    /// Open (creating if missing) the database at `path` and ensure the schema exists.
    pub async fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::io(parent.display().to_string(), e))?;
        }

        let opts = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5));

        // Writes are strictly sequential; a single connection keeps them so.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(opts)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Create tables and indices.
    pub async fn migrate(&self) -> StoreResult<()> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Insert a provider and all of its certificates as one unit.
    ///
    /// Nothing is written if any insert fails. Returns the provider id.
    pub async fn store_provider(
        &self,
        provider: &Provider,
        records: &[CertificateRecord],
    ) -> StoreResult<i64> {
        let mut tx = self.pool.begin().await?;

        match insert_provider(&mut *tx, provider, records).await {
            Ok(provider_id) => {
                tx.commit().await?;
                tracing::info!(
                    provider = %provider.name,
                    provider_id,
                    certificates = records.len(),
                    "stored provider"
                );
                Ok(provider_id)
            }
            Err(e) => {
                tracing::error!(provider = %provider.name, error = %e, "rolling back provider");
                tx.rollback().await?;
                Err(e)
            }
        }
    }

    /// All providers, in insertion order.
    pub async fn providers(&self) -> StoreResult<Vec<ProviderRow>> {
        let rows = sqlx::query_as::<_, ProviderRow>(
            "SELECT id, name, trade_name, original_filename, downloaded_at
             FROM providers ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Certificates of one provider, in insertion order.
    pub async fn certificates_for_provider(
        &self,
        provider_id: i64,
    ) -> StoreResult<Vec<CertificateRow>> {
        let rows = sqlx::query_as::<_, CertificateRow>(
            "SELECT * FROM certificates WHERE provider_id = ? ORDER BY id",
        )
        .bind(provider_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Total number of stored certificates.
    pub async fn certificate_count(&self) -> StoreResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM certificates")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Close the connection pool.
    pub async fn close(self) {
        self.pool.close().await;
    }
}

async fn insert_provider(
    conn: &mut SqliteConnection,
    provider: &Provider,
    records: &[CertificateRecord],
) -> StoreResult<i64> {
    let provider_id = sqlx::query(
        "INSERT INTO providers (name, trade_name, original_filename) VALUES (?, ?, ?)",
    )
    .bind(&provider.name)
    .bind(provider.trade_name.as_deref())
    .bind(&provider.original_filename)
    .execute(&mut *conn)
    .await?
    .last_insert_rowid();

    for record in records {
        sqlx::query(
            "INSERT INTO certificates (
                provider_id, cert_content, public_key,
                key_type, key_format, key_info,
                subject_name, issuer_name, serial_number,
                not_valid_before, not_valid_after, cert_number
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(provider_id)
        .bind(&record.raw_content)
        .bind(&record.key.encoded)
        .bind(record.key.key_type.as_str())
        .bind(record.key.key_format.as_str())
        .bind(record.key.key_info.as_deref())
        .bind(&record.subject_name)
        .bind(&record.issuer_name)
        .bind(&record.serial_number)
        .bind(record.not_valid_before)
        .bind(record.not_valid_after)
        .bind(i64::try_from(record.ordinal).unwrap_or(i64::MAX))
        .execute(&mut *conn)
        .await?;
    }

    Ok(provider_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tsl_core::{KeyFormat, KeyType, NormalizedKey};

    fn record(ordinal: usize, key: &[u8]) -> CertificateRecord {
        let day = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        CertificateRecord {
            raw_content: vec![0x30, 0x00, ordinal as u8],
            key: NormalizedKey {
                key_type: KeyType::Ec,
                key_format: KeyFormat::Sec1,
                key_info: Some("secp256r1".into()),
                encoded: key.to_vec(),
            },
            subject_name: format!("Signer {ordinal}"),
            issuer_name: "Root".into(),
            serial_number: "FF".into(),
            not_valid_before: day.and_hms_opt(8, 30, 0).unwrap(),
            not_valid_after: day.and_hms_opt(9, 0, 0).unwrap(),
            ordinal,
        }
    }

    #[tokio::test]
    async fn test_store_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::recreate(dir.path().join("certificates.db"))
            .await
            .unwrap();

        let provider = Provider::new("Example", Some("EX".into()), "FR01.der");
        let records = vec![record(1, &[0x04, 1]), record(3, &[0x04, 1])];
        let id = store.store_provider(&provider, &records).await.unwrap();

        let providers = store.providers().await.unwrap();
        assert_eq!(providers.len(), 1);
        assert_eq!(providers[0].id, id);
        assert_eq!(providers[0].name, "Example");
        assert_eq!(providers[0].trade_name.as_deref(), Some("EX"));
        assert_eq!(providers[0].original_filename.as_deref(), Some("FR01.der"));
        assert!(providers[0].downloaded_at.is_some());

        let certs = store.certificates_for_provider(id).await.unwrap();
        assert_eq!(certs.len(), 2);
        assert_eq!(certs[0].key_type, "EC");
        assert_eq!(certs[0].key_format, "SEC1");
        assert_eq!(certs[0].key_info.as_deref(), Some("secp256r1"));
        assert_eq!(certs[0].public_key, vec![0x04, 1]);
        assert_eq!(certs[0].cert_content, vec![0x30, 0x00, 1]);
        assert_eq!(certs[1].cert_number, Some(3));
        assert_eq!(certs[0].serial_number.as_deref(), Some("FF"));
        assert_eq!(
            certs[0].not_valid_before,
            Some(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap().and_hms_opt(8, 30, 0).unwrap())
        );
        assert_eq!(store.certificate_count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_recreate_discards_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("certificates.db");

        let store = SqliteStore::recreate(&path).await.unwrap();
        store
            .store_provider(&Provider::new("Old", None, "old.der"), &[record(1, &[1])])
            .await
            .unwrap();
        store.close().await;

        let store = SqliteStore::recreate(&path).await.unwrap();
        assert!(store.providers().await.unwrap().is_empty());
        assert_eq!(store.certificate_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_failed_insert_rolls_back_provider() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::recreate(dir.path().join("certificates.db"))
            .await
            .unwrap();

        // Make certificate inserts fail after the provider row went in.
        sqlx::query(
            "CREATE TRIGGER reject_certs BEFORE INSERT ON certificates
             BEGIN SELECT RAISE(ABORT, 'rejected'); END",
        )
        .execute(&store.pool)
        .await
        .unwrap();

        let result = store
            .store_provider(&Provider::new("Doomed", None, "x.der"), &[record(1, &[1])])
            .await;
        assert!(matches!(result, Err(StoreError::Database(_))));
        assert!(store.providers().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_path_with_url_characters() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("certs#1?mode=ro.db");

        let store = SqliteStore::recreate(&path).await.unwrap();
        store
            .store_provider(&Provider::new("Literal", None, "a.der"), &[record(1, &[7])])
            .await
            .unwrap();
        store.close().await;

        assert!(path.is_file());
        let store = SqliteStore::open(&path).await.unwrap();
        assert_eq!(store.certificate_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_recreate_rejects_directory() {
        let dir = tempfile::tempdir().unwrap();
        let result = SqliteStore::recreate(dir.path()).await;
        assert!(matches!(result, Err(StoreError::Config(_))));
    }
}
