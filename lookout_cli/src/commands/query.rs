use abscissa_core::{Command, Runnable};
use clap::Parser;

use self::balances::BalancesQueryCmd;

mod balances;

/// `query` subcommand
#[derive(Command, Debug, Parser, Runnable)]
pub enum QueryCmd {
    /// Balances of an account, now or at a point in history
    Balances(BalancesQueryCmd),
}
