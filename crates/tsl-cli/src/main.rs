//! tsl-collector - trust-service-provider certificate collector
//!
//! Mirrors the certificates referenced by a trust list into a SQLite database.

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    tsl_cli::run().await
}
