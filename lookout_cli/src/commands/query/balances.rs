use crate::{config::LookoutCliConfig, prelude::*};
use abscissa_core::{Command, Runnable};
use clap::Parser;
use eyre::WrapErr;
use lookout::query::{BalanceQuery, BalanceReport};

#[derive(Command, Debug, Parser)]
pub struct BalancesQueryCmd {
    /// Whitelisted chain name, e.g. cosmoshub
    pub chain: String,

    /// Bech32 account address
    pub address: String,

    /// Query at this block height. Takes precedence over --date-time
    #[clap(long)]
    pub height: Option<String>,

    /// Query at the block estimated for this instant (RFC 3339, or YYYY-MM-DDTHH:MM as UTC)
    #[clap(long)]
    pub date_time: Option<String>,
}

impl Runnable for BalancesQueryCmd {
    fn run(&self) {
        abscissa_tokio::run(&APP, async {
            match self.query(&APP.config()).await {
                Ok(report) => match serde_json::to_string_pretty(&report) {
                    Ok(report) => println!("{}", report),
                    Err(err) => {
                        status_err!("Can't convert report to JSON: {}", err);
                        std::process::exit(1);
                    }
                },
                Err(err) => {
                    status_err!("{:#}", err);
                    std::process::exit(1);
                }
            }
        })
        .unwrap_or_else(|e| {
            status_err!("executor exited with error: {}", e);
            std::process::exit(1);
        });
    }
}

impl BalancesQueryCmd {
    async fn query(&self, config: &LookoutCliConfig) -> eyre::Result<BalanceReport> {
        let checker = config.balance_checker()?;
        let query = BalanceQuery {
            chain_name: self.chain.clone(),
            address: self.address.clone(),
            height: self.height.clone(),
            date_time: self.date_time.clone(),
        };

        let report = checker
            .get_balances(&query)
            .await
            .wrap_err_with(|| format!("balance query for {} on {} failed", self.address, self.chain))?;
        if report.degraded {
            status_warn!("backend for {} unreachable, showing fallback data", self.chain);
        }

        Ok(report)
    }
}
