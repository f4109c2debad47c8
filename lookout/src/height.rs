//! Estimation of historical block heights from wall-clock time.
//!
//! The estimate assumes every block takes [`ASSUMED_BLOCK_INTERVAL_MS`]. It is a single linear
//! extrapolation back from the latest block: no block near the estimate is fetched to check
//! its actual time, so the result can be off by however much the chain's real cadence drifted
//! over the interval. Treat it as an approximation, not an exact historical index.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::ResolveError,
    proxy::{FallbackPayload, Forwarded, ProxyRouter},
};

/// Assumed average block time for Cosmos SDK chains.
pub const ASSUMED_BLOCK_INTERVAL_MS: u64 = 6000;

/// Path of the latest block query below a chain's REST root.
pub const LATEST_BLOCK_PATH: &str = "cosmos/base/tendermint/v1beta1/blocks/latest";

/// An estimated historical height and the data it was derived from.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct HeightEstimate {
    pub estimated_height: u64,
    pub basis_height: u64,
    pub basis_timestamp: DateTime<Utc>,
    pub target_timestamp: DateTime<Utc>,
    pub assumed_block_interval_ms: u64,
}

/// The head of the chain as reported by the latest block query.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LatestBlock {
    pub height: u64,
    pub time: DateTime<Utc>,
    /// Set when the block came from fallback data rather than the chain.
    pub from_fallback: bool,
}

#[derive(Debug, Deserialize)]
struct LatestBlockResponse {
    block: Block,
}

#[derive(Debug, Deserialize)]
struct Block {
    header: Header,
}

#[derive(Debug, Deserialize)]
struct Header {
    height: String,
    time: DateTime<Utc>,
}

/// Steps back from `basis_height` by the number of whole block intervals between `basis_time`
/// and `target`. Never estimates below height 1.
pub fn estimate_height(
    basis_height: u64,
    basis_time: DateTime<Utc>,
    target: DateTime<Utc>,
    interval_ms: u64,
) -> Result<HeightEstimate, ResolveError> {
    if target > basis_time {
        return Err(ResolveError::FutureTimestamp {
            target: target.to_rfc3339(),
            latest: basis_time.to_rfc3339(),
        });
    }

    let delta_ms = (basis_time - target).num_milliseconds().max(0) as u64;
    let blocks_back = delta_ms / interval_ms.max(1);
    let estimated_height = basis_height.saturating_sub(blocks_back).max(1);

    Ok(HeightEstimate {
        estimated_height,
        basis_height,
        basis_timestamp: basis_time,
        target_timestamp: target,
        assumed_block_interval_ms: interval_ms,
    })
}

/// Resolves timestamps to estimated heights using the latest block fetched through the proxy.
#[derive(Clone)]
pub struct TimestampResolver {
    router: ProxyRouter,
    interval_ms: u64,
}

impl TimestampResolver {
    pub fn new(router: ProxyRouter) -> Self {
        TimestampResolver {
            router,
            interval_ms: ASSUMED_BLOCK_INTERVAL_MS,
        }
    }

    /// Fetches the current head of `chain_name`.
    pub async fn latest_block(&self, chain_name: &str) -> Result<LatestBlock, ResolveError> {
        match self.router.forward(chain_name, LATEST_BLOCK_PATH, None).await? {
            Forwarded::Backend(response) => {
                if !response.is_success() {
                    return Err(ResolveError::UnexpectedResponse(format!(
                        "status {}: {}",
                        response.status, response.body
                    )));
                }
                let parsed: LatestBlockResponse = serde_json::from_str(&response.body)
                    .map_err(|e| ResolveError::UnexpectedResponse(e.to_string()))?;
                let height = parsed.block.header.height.parse::<u64>().map_err(|_| {
                    ResolveError::UnexpectedResponse(format!(
                        "invalid height '{}'",
                        parsed.block.header.height
                    ))
                })?;

                Ok(LatestBlock {
                    height,
                    time: parsed.block.header.time,
                    from_fallback: false,
                })
            }
            Forwarded::Fallback(FallbackPayload::LatestBlock { height, time }) => Ok(LatestBlock {
                height,
                time,
                from_fallback: true,
            }),
            Forwarded::Fallback(other) => Err(ResolveError::UnexpectedResponse(format!(
                "no latest block available: {:?}",
                other
            ))),
        }
    }

    /// Estimates the height at `target` from an already fetched head.
    pub fn estimate_from(
        &self,
        latest: &LatestBlock,
        target: DateTime<Utc>,
    ) -> Result<HeightEstimate, ResolveError> {
        estimate_height(latest.height, latest.time, target, self.interval_ms)
    }

    /// Estimates the height of `chain_name` at `target`.
    ///
    /// Fails with [`ResolveError::FutureTimestamp`] if `target` is after the latest block.
    pub async fn resolve(
        &self,
        chain_name: &str,
        target: DateTime<Utc>,
    ) -> Result<HeightEstimate, ResolveError> {
        let latest = self.latest_block(chain_name).await?;
        let estimate = self.estimate_from(&latest, target)?;
        debug!(
            chain = chain_name,
            estimated = estimate.estimated_height,
            basis = estimate.basis_height,
            "estimated height for {}",
            target
        );

        Ok(estimate)
    }
}
