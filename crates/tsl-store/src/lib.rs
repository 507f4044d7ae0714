//! SQLite persistence for trust-list providers and certificates.
//!
//! The store is rebuilt from scratch on every collection run:
//! [`SqliteStore::recreate`] deletes the previous file. Each provider and
//! its certificates are written in one transaction by
//! [`SqliteStore::store_provider`].

pub mod error;
pub mod models;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use models::{CertificateRow, ProviderRow};
pub use store::SqliteStore;
