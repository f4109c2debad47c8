use crate::prelude::*;
use abscissa_core::{Command, Runnable};
use clap::Parser;

#[derive(Command, Debug, Parser)]
pub struct ListCmd {}

impl Runnable for ListCmd {
    /// List all chains in whitelist order
    fn run(&self) {
        let config = APP.config();
        let registry = config.registry().unwrap_or_else(|err| {
            status_err!("{}", err);
            std::process::exit(1);
        });

        for chain in registry.list() {
            println!(
                "{:<16}{:<20}{}",
                chain.chain_name, chain.pretty_name, chain.rest_address
            );
        }
    }
}
