//! Command-line argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::output::OutputFormat;

/// Trust-service-provider certificate collector
///
/// Downloads a trust list, fetches each provider's certificate container
/// and stores the certificates with normalized public keys in SQLite.
/// Runs `collect` when no command is given.
#[derive(Parser, Debug)]
#[command(name = "tsl-collector")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Configuration file (defaults to the user config directory)
    #[arg(short, long, env = "TSL_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Collection options when no command is given
    #[command(flatten)]
    pub collect: CollectArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download the trust list and store every provider's certificates
    Collect(CollectArgs),

    /// Parse a local certificate container without network or database
    Inspect(InspectArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

// ============================================================================
// Collect command
// ============================================================================

#[derive(Args, Debug, Default, Clone)]
pub struct CollectArgs {
    /// Trust list URL
    #[arg(long, env = "TSL_URL")]
    pub url: Option<String>,

    /// SQLite database file (recreated on every run)
    #[arg(long, env = "TSL_DATABASE")]
    pub database: Option<PathBuf>,

    /// Scratch directory for downloaded containers
    #[arg(long, env = "TSL_DOWNLOAD_DIR")]
    pub download_dir: Option<PathBuf>,

    /// Skip TLS certificate verification
    #[arg(long, env = "TSL_INSECURE")]
    pub insecure: bool,
}

// ============================================================================
// Inspect command
// ============================================================================

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Container file to read
    pub file: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Pretty)]
    pub output: OutputFormat,
}

// ============================================================================
// Config command
// ============================================================================

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,

    /// Set a configuration value
    Set {
        /// Key to set (e.g., database_path, timeout_secs)
        key: String,

        /// Value to set
        value: String,
    },

    /// Show config file path
    Path,
}
