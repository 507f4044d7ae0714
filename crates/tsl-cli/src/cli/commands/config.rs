//! `tsl-collector config` - configuration management.

use anyhow::Result;
use colored::Colorize;

use super::Context;
use crate::cli::args::{ConfigArgs, ConfigCommands};

pub async fn execute(ctx: Context, args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Show => show_config(&ctx),
        ConfigCommands::Set { key, value } => set_config(ctx, &key, &value),
        ConfigCommands::Path => show_path(&ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    print!("{}", toml::to_string_pretty(&ctx.config)?);
    Ok(())
}

fn set_config(ctx: Context, key: &str, value: &str) -> Result<()> {
    let path = ctx.config_file()?;
    let mut config = ctx.config;

    config.set(key, value)?;
    config.save_to(&path)?;

    println!("{} {} set to {}.", "Success:".green().bold(), key, value.cyan());
    Ok(())
}

fn show_path(ctx: &Context) -> Result<()> {
    println!("{}", ctx.config_file()?.display());
    Ok(())
}
