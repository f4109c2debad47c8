use crate::prelude::*;
use abscissa_core::{Command, Runnable};
use clap::Parser;
use serde::Serialize;

#[derive(Command, Debug, Parser)]
pub struct ShowCmd {
    pub name: String,
}

impl Runnable for ShowCmd {
    fn run(&self) {
        let config = APP.config();
        let registry = config.registry().unwrap_or_else(|err| {
            status_err!("{}", err);
            std::process::exit(1);
        });

        let chain_details = registry.lookup(&self.name).unwrap_or_else(|_| {
            status_err!("chain '{}' is not in the whitelist", self.name);
            std::process::exit(1);
        });

        // customize indentation for chain details
        let buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(buf, formatter);
        if let Err(err) = chain_details.serialize(&mut serializer) {
            status_err!("can't serialize chain details: {}", err);
            std::process::exit(1);
        }

        println!("{}", String::from_utf8_lossy(&serializer.into_inner()));
    }
}
