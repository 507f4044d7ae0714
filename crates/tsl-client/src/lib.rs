//! HTTP client for trust-service-provider lists.
//!
//! This crate provides [`TslClient`] for downloading a trust list and the
//! certificate containers its providers reference, and [`TrustList`] for
//! reading provider entries out of the TSL XML.

mod client;
mod error;
pub mod tsl;

pub use client::{
    filename_from_url, Container, TslClient, TslClientBuilder, DEFAULT_TIMEOUT,
    DEFAULT_TRUST_LIST_URL, DEFAULT_USER_AGENT,
};
pub use error::{ClientError, Result};
pub use tsl::{Namespaces, TrustList, TrustListEntry, TSL_NAMESPACES};
