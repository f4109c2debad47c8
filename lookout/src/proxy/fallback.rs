//! Canned responses served in place of a backend that can't be reached.
use crate::balances::BalanceEntry;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Value};
use std::collections::HashMap;

/// Height reported by the canned latest block.
pub const FALLBACK_BLOCK_HEIGHT: u64 = 23_456_789;

const ATOM_IBC_DENOM: &str =
    "ibc/27394FB092D2ECCD56123C74F36E4C1F926001CEADA9CA97EA622B25F41E5EB2";

// address, chain name, balances
const FALLBACK_BALANCES: [(&str, &str, &[(&str, &str)]); 3] = [
    (
        "cosmos1c4k24jzduc365kywrsvf5ujz4ya6mwympnc4en",
        "cosmoshub",
        &[("uatom", "1000000"), (ATOM_IBC_DENOM, "5000000")],
    ),
    (
        "cosmos1c4k24jzduc365kywrsvf5ujz4ya6mwympnc4en",
        "osmosis",
        &[("uosmo", "25000000")],
    ),
    (
        "osmo1vwrruj48vk8q49a7g8z08284wlvm9s6el6c7ej",
        "osmosis",
        &[("uosmo", "123456789"), (ATOM_IBC_DENOM, "50000000")],
    ),
];

/// What the fallback provider could offer for a request path.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FallbackPayload {
    Balances(Vec<BalanceEntry>),
    LatestBlock { height: u64, time: DateTime<Utc> },
    /// No substitute exists for the path. Never valid chain data.
    Unavailable,
}

impl FallbackPayload {
    /// The JSON body served to HTTP clients, shaped like the backend response it replaces.
    pub fn to_json(&self) -> Value {
        match self {
            FallbackPayload::Balances(balances) => json!({ "balances": balances }),
            FallbackPayload::LatestBlock { height, time } => json!({
                "block": {
                    "header": {
                        "height": height.to_string(),
                        "time": time.to_rfc3339_opts(SecondsFormat::Millis, true),
                    }
                }
            }),
            FallbackPayload::Unavailable => {
                json!({ "error": "Mock data not available for this endpoint" })
            }
        }
    }
}

/// Deterministic substitute data, read-only once built.
#[derive(Clone, Debug)]
pub struct FallbackData {
    balances: HashMap<(String, String), Vec<BalanceEntry>>,
    block_height: u64,
    block_time: DateTime<Utc>,
}

impl FallbackData {
    /// Builds the canned table. The latest block reports the time of construction.
    pub fn new() -> Self {
        FallbackData::with_block_time(Utc::now())
    }

    pub fn with_block_time(block_time: DateTime<Utc>) -> Self {
        let balances = FALLBACK_BALANCES
            .iter()
            .map(|(address, chain, coins)| {
                let entries = coins
                    .iter()
                    .map(|(denom, amount)| BalanceEntry::new(denom, amount))
                    .collect();
                ((address.to_string(), chain.to_string()), entries)
            })
            .collect();

        FallbackData {
            balances,
            block_height: FALLBACK_BLOCK_HEIGHT,
            block_time,
        }
    }

    /// Picks a substitute for `sub_path` on `chain_name`.
    pub fn provide(&self, sub_path: &str, chain_name: &str) -> FallbackPayload {
        if sub_path.contains("balances/") {
            let address = sub_path.rsplit('/').next().unwrap_or_default();
            let balances = self
                .balances
                .get(&(address.to_string(), chain_name.to_string()))
                .cloned()
                .unwrap_or_default();
            FallbackPayload::Balances(balances)
        } else if sub_path.contains("blocks/latest") {
            FallbackPayload::LatestBlock {
                height: self.block_height,
                time: self.block_time,
            }
        } else {
            FallbackPayload::Unavailable
        }
    }
}

impl Default for FallbackData {
    fn default() -> Self {
        FallbackData::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assay::assay;
    use chrono::TimeZone;

    const HUB_ADDRESS: &str = "cosmos1c4k24jzduc365kywrsvf5ujz4ya6mwympnc4en";

    #[assay]
    fn provides_known_balances() {
        let data = FallbackData::new();
        let payload = data.provide(
            &format!("cosmos/bank/v1beta1/balances/{}", HUB_ADDRESS),
            "cosmoshub",
        );

        assert_eq!(
            payload,
            FallbackPayload::Balances(vec![
                BalanceEntry::new("uatom", "1000000"),
                BalanceEntry::new(ATOM_IBC_DENOM, "5000000"),
            ])
        );
    }

    #[assay]
    fn balances_are_scoped_by_chain() {
        let data = FallbackData::new();
        let path = format!("cosmos/bank/v1beta1/balances/{}", HUB_ADDRESS);

        assert_eq!(
            data.provide(&path, "osmosis"),
            FallbackPayload::Balances(vec![BalanceEntry::new("uosmo", "25000000")])
        );
        assert_eq!(
            data.provide(&path, "juno"),
            FallbackPayload::Balances(vec![])
        );
    }

    #[assay]
    fn unknown_address_has_no_balances() {
        let data = FallbackData::new();
        let payload = data.provide("cosmos/bank/v1beta1/balances/cosmos1unknown", "cosmoshub");

        assert_eq!(payload, FallbackPayload::Balances(vec![]));
        assert_eq!(payload.to_json(), json!({ "balances": [] }));
    }

    #[assay]
    fn provides_latest_block() {
        let time = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let data = FallbackData::with_block_time(time);
        let payload = data.provide("cosmos/base/tendermint/v1beta1/blocks/latest", "juno");

        assert_eq!(
            payload.to_json(),
            json!({
                "block": {
                    "header": { "height": "23456789", "time": "2024-05-01T12:00:00.000Z" }
                }
            })
        );
    }

    #[assay]
    fn other_paths_are_unavailable() {
        let data = FallbackData::new();
        let payload = data.provide("cosmos/staking/v1beta1/validators", "cosmoshub");

        assert_eq!(payload, FallbackPayload::Unavailable);
        assert!(payload.to_json().get("error").is_some());
    }
}
