//! The "get balances" query: resolves the requested point in history, fetches the account's
//! bank balances through the proxy and formats them for display.
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    balances::{format_balances, BalanceEntry, BalancesResponse, FormattedBalance},
    error::QueryError,
    height::{HeightEstimate, TimestampResolver},
    proxy::{FallbackPayload, Forwarded, ProxyRouter},
    registry::AssetDirectory,
};

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct BalanceQuery {
    pub chain_name: String,
    pub address: String,
    /// Authoritative when present; `date_time` is then ignored.
    pub height: Option<String>,
    /// RFC 3339 instant, or `YYYY-MM-DDTHH:MM[:SS]` taken as UTC.
    pub date_time: Option<String>,
}

/// Where the height of a report came from.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum HeightSource {
    Explicit,
    Estimated { estimate: HeightEstimate },
    Latest,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct BalanceReport {
    pub chain_name: String,
    pub address: String,
    /// `None` only if no height was requested and the latest one couldn't be read.
    pub height: Option<u64>,
    pub height_source: HeightSource,
    pub balances: Vec<FormattedBalance>,
    /// True when any part of the report was served from fallback data.
    pub degraded: bool,
}

/// Runs balance queries against the proxied backends.
#[derive(Clone)]
pub struct BalanceChecker {
    router: ProxyRouter,
    resolver: TimestampResolver,
    assets: AssetDirectory,
}

impl BalanceChecker {
    pub fn new(router: ProxyRouter, assets: AssetDirectory) -> Self {
        BalanceChecker {
            resolver: TimestampResolver::new(router.clone()),
            router,
            assets,
        }
    }

    pub fn router(&self) -> &ProxyRouter {
        &self.router
    }

    pub fn resolver(&self) -> &TimestampResolver {
        &self.resolver
    }

    pub async fn get_balances(&self, query: &BalanceQuery) -> Result<BalanceReport, QueryError> {
        let chain_name = query.chain_name.as_str();
        self.router.registry().lookup(chain_name)?;
        let address = validate_address(&query.address)?;

        let mut degraded = false;
        let (height, height_source) = match (non_empty(&query.height), non_empty(&query.date_time))
        {
            (Some(height), _) => (Some(parse_height(height)?), HeightSource::Explicit),
            (None, Some(date_time)) => {
                let target = parse_date_time(date_time)?;
                let latest = self.resolver.latest_block(chain_name).await?;
                degraded |= latest.from_fallback;
                let estimate = self.resolver.estimate_from(&latest, target)?;
                (
                    Some(estimate.estimated_height),
                    HeightSource::Estimated { estimate },
                )
            }
            (None, None) => (None, HeightSource::Latest),
        };

        let (entries, from_fallback) = self.fetch_balances(chain_name, address, height).await?;
        degraded |= from_fallback;

        let height = match height {
            Some(height) => Some(height),
            None => match self.resolver.latest_block(chain_name).await {
                Ok(latest) => {
                    degraded |= latest.from_fallback;
                    Some(latest.height)
                }
                Err(err) => {
                    warn!(chain = chain_name, "could not read latest height: {}", err);
                    None
                }
            },
        };

        let assets = self.assets.get_assets(chain_name).await;
        let balances = format_balances(&entries, &assets);
        info!(
            chain = chain_name,
            address,
            ?height,
            count = balances.len(),
            degraded,
            "balance query complete"
        );

        Ok(BalanceReport {
            chain_name: chain_name.to_string(),
            address: address.to_string(),
            height,
            height_source,
            balances,
            degraded,
        })
    }

    /// Fetches raw balances, returning whether they came from fallback data.
    async fn fetch_balances(
        &self,
        chain_name: &str,
        address: &str,
        height: Option<u64>,
    ) -> Result<(Vec<BalanceEntry>, bool), QueryError> {
        let path = format!("cosmos/bank/v1beta1/balances/{}", address);
        let query = height.map(|h| format!("height={}", h));

        match self
            .router
            .forward(chain_name, &path, query.as_deref())
            .await?
        {
            Forwarded::Backend(response) => {
                let parsed: BalancesResponse =
                    serde_json::from_str(&response.body).map_err(|e| {
                        QueryError::UnexpectedResponse(format!(
                            "status {}: {}",
                            response.status, e
                        ))
                    })?;
                if let Some(message) = parsed.application_error() {
                    return Err(QueryError::Application(message));
                }
                if !response.is_success() {
                    return Err(QueryError::UnexpectedResponse(format!(
                        "status {}",
                        response.status
                    )));
                }

                Ok((parsed.balances, false))
            }
            Forwarded::Fallback(FallbackPayload::Balances(balances)) => Ok((balances, true)),
            Forwarded::Fallback(_) => Ok((vec![], true)),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Addresses end up in the request path, so only bech32's alphanumeric alphabet is allowed.
fn validate_address(address: &str) -> Result<&str, QueryError> {
    let address = address.trim();
    if address.is_empty() {
        return Err(QueryError::InvalidAddress("address is empty".to_string()));
    }
    if !address.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(QueryError::InvalidAddress(address.to_string()));
    }

    Ok(address)
}

fn parse_height(height: &str) -> Result<u64, QueryError> {
    match height.parse::<u64>() {
        Ok(h) if h > 0 => Ok(h),
        _ => Err(QueryError::InvalidHeight(height.to_string())),
    }
}

/// Accepts RFC 3339, or the zone-less format produced by HTML `datetime-local` inputs as UTC.
pub fn parse_date_time(value: &str) -> Result<DateTime<Utc>, QueryError> {
    if let Ok(time) = DateTime::parse_from_rfc3339(value) {
        return Ok(time.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| QueryError::InvalidTimestamp(value.to_string()))
}
