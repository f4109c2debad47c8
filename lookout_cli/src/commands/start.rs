//! `start` subcommand

use crate::{config::LookoutCliConfig, prelude::*};
use abscissa_core::{config, Command, FrameworkError, Runnable};
use clap::Parser;
use eyre::WrapErr;
use lookout::server;
use std::net::SocketAddr;

/// Serves the chain list, the whitelisted proxy and the balance query over HTTP.
#[derive(Command, Debug, Parser)]
pub struct StartCmd {
    /// Address to listen on, overriding `server.listen_addr`
    #[clap(short, long)]
    pub listen: Option<SocketAddr>,
}

impl Runnable for StartCmd {
    fn run(&self) {
        abscissa_tokio::run(&APP, async {
            if let Err(err) = serve(&APP.config()).await {
                status_err!("{:#}", err);
                std::process::exit(1);
            }
        })
        .unwrap_or_else(|e| {
            status_err!("executor exited with error: {}", e);
            std::process::exit(1);
        });
    }
}

async fn serve(config: &LookoutCliConfig) -> eyre::Result<()> {
    let checker = config.balance_checker()?;
    info!(
        chains = checker.router().registry().len(),
        "starting lookout server"
    );

    server::serve(config.server.listen_addr, checker)
        .await
        .wrap_err("server stopped")
}

impl config::Override<LookoutCliConfig> for StartCmd {
    fn override_config(
        &self,
        mut config: LookoutCliConfig,
    ) -> Result<LookoutCliConfig, FrameworkError> {
        if let Some(listen) = self.listen {
            config.server.listen_addr = listen;
        }

        Ok(config)
    }
}
