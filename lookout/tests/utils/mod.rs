#![allow(dead_code)]

use chrono::{DateTime, SecondsFormat, Utc};
use lookout::{
    proxy::{FallbackData, HttpTransport, ProxyRouter},
    query::BalanceChecker,
    registry::{AssetDirectory, ChainDescriptor, ChainRegistry},
};
use serde_json::{json, Value};
use std::time::Duration;

/// Chain name every test registry uses for its mock backend
pub const CHAIN: &str = "cosmoshub";

/// Address with canned fallback balances on cosmoshub
pub const HUB_ADDRESS: &str = "cosmos1c4k24jzduc365kywrsvf5ujz4ya6mwympnc4en";

/// Nothing listens on the discard port, so requests to it fail at the transport level
pub const UNREACHABLE: &str = "http://127.0.0.1:9";

pub const LATEST_BLOCK_PATH: &str = "/cosmos/base/tendermint/v1beta1/blocks/latest";

pub fn balances_path(address: &str) -> String {
    format!("/cosmos/bank/v1beta1/balances/{}", address)
}

/// A router whose only chain, [`CHAIN`], is served by `rest_address`.
pub fn router_for(rest_address: &str) -> ProxyRouter {
    let registry = ChainRegistry::new(vec![ChainDescriptor::new(
        CHAIN,
        "Cosmos Hub",
        "cosmos",
        rest_address,
    )])
    .expect("invalid test registry");
    let transport = HttpTransport::new(Duration::from_secs(2)).expect("failed to build transport");

    ProxyRouter::new(registry, transport, FallbackData::new())
}

/// A checker backed by `rest_address` that loads asset lists from `registry_address`.
pub fn checker_for(rest_address: &str, registry_address: &str) -> BalanceChecker {
    let assets = AssetDirectory::new(registry_address, Duration::from_secs(2))
        .expect("failed to build asset directory");

    BalanceChecker::new(router_for(rest_address), assets)
}

pub fn latest_block_body(height: u64, time: DateTime<Utc>) -> Value {
    json!({
        "block_id": { "hash": "" },
        "block": {
            "header": {
                "chain_id": "cosmoshub-4",
                "height": height.to_string(),
                "time": time.to_rfc3339_opts(SecondsFormat::Nanos, true),
            }
        }
    })
}

pub fn asset_list_body() -> Value {
    json!({
        "chain_name": CHAIN,
        "assets": [
            {
                "description": "The native staking and governance token of the Cosmos Hub.",
                "denom_units": [
                    { "denom": "uatom", "exponent": 0 },
                    { "denom": "atom", "exponent": 6 }
                ],
                "base": "uatom",
                "name": "Cosmos Hub Atom",
                "display": "atom",
                "symbol": "ATOM"
            },
            {
                "denom_units": [
                    { "denom": "ibc/27394FB092D2ECCD56123C74F36E4C1F926001CEADA9CA97EA622B25F41E5EB2", "exponent": 0 },
                    { "denom": "usdc", "exponent": 6 }
                ],
                "base": "ibc/27394FB092D2ECCD56123C74F36E4C1F926001CEADA9CA97EA622B25F41E5EB2",
                "name": "USD Coin",
                "display": "usdc",
                "symbol": "USDC"
            }
        ]
    })
}
