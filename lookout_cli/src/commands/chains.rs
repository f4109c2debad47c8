mod list;
mod show;

use abscissa_core::{Command, Runnable};
use clap::Parser;

use self::list::ListCmd;
use self::show::ShowCmd;

/// `chains` subcommand
#[derive(Command, Debug, Parser, Runnable)]
pub enum ChainsCmd {
    /// Print the details of one whitelisted chain as JSON
    Show(ShowCmd),
    /// List the whitelisted chains
    List(ListCmd),
}
