//! Command implementations.

pub mod collect;
pub mod config;
pub mod inspect;

use std::path::PathBuf;

use crate::config::Config;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Configuration loaded from file
    pub config: Config,

    /// Explicit config file given on the command line
    pub config_path: Option<PathBuf>,

    /// Verbose output
    pub verbose: bool,
}

impl Context {
    /// File that `config set` writes to.
    pub fn config_file(&self) -> anyhow::Result<PathBuf> {
        match &self.config_path {
            Some(path) => Ok(path.clone()),
            None => Config::path(),
        }
    }
}
