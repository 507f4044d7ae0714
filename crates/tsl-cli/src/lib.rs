//! # tsl-cli
//!
//! Command-line collector for trust-service-provider certificates.
//!
//! ## Features
//!
//! - **Collect**: download a trust list, fetch every provider's certificate
//!   container and store normalized certificates in SQLite
//! - **Inspect**: audit a single container file offline
//! - **Config**: TOML configuration file with `TSL_*` environment overrides

pub mod cli;
pub mod config;
pub mod guard;
pub mod output;
pub mod pipeline;

pub use cli::run;
