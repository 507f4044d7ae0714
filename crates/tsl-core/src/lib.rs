//! Core types and certificate processing for trust-service-provider lists.
//!
//! This crate holds the parts of the collector that involve no I/O:
//!
//! - **Container splitting**: [`container::split`] cuts a provider's
//!   `--End`-delimited container into DER segments
//! - **Key normalization**: [`key::normalize`] reduces RSA, EC, Ed25519 and
//!   Ed448 keys to canonical bytes
//! - **Field extraction**: [`extract::extract`] reads subject/issuer Common
//!   Names, serial number and validity
//! - **Duplicate tracking**: [`dedup::DuplicateKeyTracker`] flags keys
//!   repeated within one provider
//!
//! # Example
//!
//! ```rust,ignore
//! use tsl_core::CertificateBatch;
//!
//! let raw = std::fs::read("provider.der")?;
//! let batch = CertificateBatch::from_container(&raw);
//! for record in &batch.records {
//!     println!("{} {} {}", record.ordinal, record.key.key_type, record.subject_name);
//! }
//! ```

pub mod batch;
pub mod container;
pub mod dedup;
mod error;
pub mod extract;
pub mod key;
pub mod types;

pub use batch::{CertificateBatch, SkippedCertificate};
pub use dedup::{DuplicateKey, DuplicateKeyTracker};
pub use error::{Result, TslError};
pub use types::*;
