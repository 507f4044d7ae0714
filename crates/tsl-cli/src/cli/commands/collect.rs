//! `tsl-collector collect` - mirror a trust list into SQLite.

use anyhow::{Context as _, Result};
use tracing::{error, info};
use tsl_store::SqliteStore;

use super::Context;
use crate::cli::args::CollectArgs;
use crate::guard;
use crate::pipeline::{Collector, RunSummary};

pub async fn execute(ctx: Context, args: CollectArgs) -> Result<()> {
    let config = ctx.config.with_overrides(&args);

    if let Err(violation) = guard::check(&config) {
        error!(%violation, "refusing to start");
        return Err(violation.into());
    }

    info!(url = %config.trust_list_url, database = %config.database_path.display(), "starting collection");

    let store = SqliteStore::recreate(&config.database_path)
        .await
        .context("initializing database")?;

    tokio::fs::create_dir_all(&config.download_dir)
        .await
        .with_context(|| format!("creating {}", config.download_dir.display()))?;

    let client = config.client()?;
    let collector = Collector::new(client, store, &config.download_dir);

    let result = collector.run(&config.trust_list_url).await;
    collector.close().await;

    let summary: RunSummary = result?;
    if ctx.verbose {
        info!(
            without_uri = summary.without_uri,
            unavailable = summary.unavailable,
            empty = summary.empty,
            store_failures = summary.store_failures,
            "skipped providers"
        );
    }
    Ok(())
}
