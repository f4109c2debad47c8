//! LookoutCli Subcommands
//!
//! This is where you specify the subcommands of your application.
//!
//! See the `impl Configurable` below for how to specify the path to the
//! application's configuration file.

mod chains;
mod query;
mod start;

use self::{chains::ChainsCmd, query::QueryCmd, start::StartCmd};
use crate::config::{LookoutCliConfig, DEFAULT_CONFIG_FILE};
use abscissa_core::{config::Override, Command, Configurable, FrameworkError, Runnable};
use clap::Parser;
use std::path::{Path, PathBuf};

/// LookoutCli Subcommands
/// Subcommands need to be listed in an enum.
#[derive(Command, Debug, Parser, Runnable)]
pub enum LookoutCliCmd {
    /// Run the proxy and balance query server
    Start(StartCmd),

    /// Inspect the chain whitelist
    #[clap(subcommand)]
    Chains(ChainsCmd),

    /// Query chain data through the proxy
    #[clap(subcommand)]
    Query(QueryCmd),
}

/// Entry point for the application. It needs to be a struct to allow using subcommands!
#[derive(Command, Debug, Parser)]
#[clap(author, about, version)]
pub struct EntryPoint {
    #[clap(subcommand)]
    cmd: LookoutCliCmd,

    /// Enable verbose logging
    #[clap(short, long)]
    pub verbose: bool,

    /// Use the specified config file
    #[clap(short, long)]
    pub config: Option<String>,
}

impl Runnable for EntryPoint {
    fn run(&self) {
        self.cmd.run()
    }
}

/// This trait allows you to define how application configuration is loaded.
impl Configurable<LookoutCliConfig> for EntryPoint {
    /// Location of the configuration file
    ///
    /// An explicit `--config` wins. Otherwise `lookout.toml` in the working directory is used if
    /// present, and the built-in defaults apply if not.
    fn config_path(&self) -> Option<PathBuf> {
        match &self.config {
            Some(cfg) => Some(PathBuf::from(cfg)),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                default.exists().then(|| default.to_path_buf())
            }
        }
    }

    /// Apply changes to the config after it's been loaded, e.g. overriding
    /// values in a config file using command-line options.
    fn process_config(&self, config: LookoutCliConfig) -> Result<LookoutCliConfig, FrameworkError> {
        match &self.cmd {
            LookoutCliCmd::Start(cmd) => cmd.override_config(config),
            _ => Ok(config),
        }
    }
}
