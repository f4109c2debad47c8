//! Contains models for deserializing `assetlist.json` for a given chain, and the per-chain asset
//! metadata mapping used to format balances.
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AssetList {
    pub chain_name: String,
    pub assets: Vec<Asset>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Asset {
    pub description: String,
    pub denom_units: Vec<DenomUnit>,
    pub base: String,
    pub name: String,
    pub display: String,
    pub symbol: String,
    pub coingecko_id: String,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct DenomUnit {
    pub denom: String,
    pub exponent: u32,
}

impl DenomUnit {
    pub fn new(denom: &str, exponent: u32) -> Self {
        DenomUnit {
            denom: denom.to_string(),
            exponent,
        }
    }
}

/// Display metadata for a single base denomination.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct AssetInfo {
    pub base_denom: String,
    pub name: String,
    pub symbol: String,
    pub display_denom: String,
    pub denom_units: Vec<DenomUnit>,
}

impl AssetInfo {
    /// The unit balances are displayed in: the unit named by `display_denom`, or the last unit if
    /// none matches. `None` when the asset lists no units.
    pub fn display_unit(&self) -> Option<&DenomUnit> {
        self.denom_units
            .iter()
            .find(|u| u.denom == self.display_denom)
            .or_else(|| self.denom_units.last())
    }
}

impl From<Asset> for AssetInfo {
    fn from(asset: Asset) -> Self {
        let base_denom = asset.base;
        let name = first_non_empty(&[&asset.name, &asset.symbol, &base_denom]);
        let symbol = first_non_empty(&[&asset.symbol, &asset.name, &base_denom]);
        let display_denom = first_non_empty(&[&asset.display, &base_denom]);

        AssetInfo {
            base_denom,
            name,
            symbol,
            display_denom,
            denom_units: asset.denom_units,
        }
    }
}

fn first_non_empty(candidates: &[&str]) -> String {
    candidates
        .iter()
        .find(|c| !c.is_empty())
        .copied()
        .unwrap_or_default()
        .to_string()
}

/// Asset metadata for one chain, keyed by base denomination.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
pub struct AssetsInfo(HashMap<String, AssetInfo>);

impl AssetsInfo {
    pub fn get(&self, base_denom: &str) -> Option<&AssetInfo> {
        self.0.get(base_denom)
    }

    pub fn insert(&mut self, info: AssetInfo) {
        self.0.insert(info.base_denom.clone(), info);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Built-in metadata for the well known staking denoms, used whenever the chain registry
    /// can't provide an asset list.
    pub fn defaults_for(chain_name: &str) -> Self {
        let mut assets = AssetsInfo::default();
        match chain_name {
            "cosmoshub" => assets.insert(AssetInfo {
                base_denom: "uatom".to_string(),
                name: "Cosmos Hub".to_string(),
                symbol: "ATOM".to_string(),
                display_denom: "atom".to_string(),
                denom_units: vec![DenomUnit::new("uatom", 0), DenomUnit::new("atom", 6)],
            }),
            "osmosis" => assets.insert(AssetInfo {
                base_denom: "uosmo".to_string(),
                name: "Osmosis".to_string(),
                symbol: "OSMO".to_string(),
                display_denom: "osmo".to_string(),
                denom_units: vec![DenomUnit::new("uosmo", 0), DenomUnit::new("osmo", 6)],
            }),
            _ => (),
        }

        assets
    }
}

impl From<AssetList> for AssetsInfo {
    fn from(list: AssetList) -> Self {
        let mut assets = AssetsInfo::default();
        list.assets
            .into_iter()
            .filter(|a| !a.base.is_empty())
            .map(AssetInfo::from)
            .for_each(|info| assets.insert(info));

        assets
    }
}

impl FromIterator<AssetInfo> for AssetsInfo {
    fn from_iter<I: IntoIterator<Item = AssetInfo>>(iter: I) -> Self {
        let mut assets = AssetsInfo::default();
        iter.into_iter().for_each(|info| assets.insert(info));

        assets
    }
}
