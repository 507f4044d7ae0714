//! `tsl-collector inspect` - audit one container file offline.

use anyhow::{Context as _, Result};
use tsl_core::CertificateBatch;

use super::Context;
use crate::cli::args::InspectArgs;
use crate::output::render_batch;

pub async fn execute(_ctx: Context, args: InspectArgs) -> Result<()> {
    let raw = tokio::fs::read(&args.file)
        .await
        .with_context(|| format!("reading {}", args.file.display()))?;

    let batch = CertificateBatch::from_container(&raw);
    print!("{}", render_batch(&batch, args.output)?);
    Ok(())
}
