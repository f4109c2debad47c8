use crate::{error::AssetsError, proxy::DEFAULT_REQUEST_TIMEOUT};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

pub use self::{assets::*, chain::*};

pub mod assets;
pub mod chain;

/// Raw file root of the [chain registry](https://github.com/cosmos/chain-registry).
pub const DEFAULT_REGISTRY_BASE_URL: &str =
    "https://raw.githubusercontent.com/cosmos/chain-registry/master";

/// Retrieves per-chain asset metadata from the chain registry. Fetching is best-effort: any
/// failure is logged and answered with [`AssetsInfo::defaults_for`].
#[derive(Clone, Debug)]
pub struct AssetDirectory {
    client: Client,
    base_url: String,
}

impl AssetDirectory {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AssetsError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(AssetDirectory::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        AssetDirectory {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Returns the asset metadata for `chain_name`, or the built-in defaults if the asset list
    /// can't be retrieved or parsed.
    ///
    /// # Arguments
    ///
    /// * `chain_name` - The chain name. Must match the name of the chain's folder in the root directory of the
    /// [chain registry](https://github.com/cosmos/chain-registry).
    pub async fn get_assets(&self, chain_name: &str) -> AssetsInfo {
        match self.get_asset_list(chain_name).await {
            Ok(list) => {
                let assets = AssetsInfo::from(list);
                debug!(chain = chain_name, count = assets.len(), "loaded asset list");
                assets
            }
            Err(err) => {
                warn!(chain = chain_name, "error loading asset list, using defaults: {}", err);
                AssetsInfo::defaults_for(chain_name)
            }
        }
    }

    /// Retrieves the deserialized `assetlist.json` for a given chain.
    pub async fn get_asset_list(&self, chain_name: &str) -> Result<AssetList, AssetsError> {
        let path = format!("{}/assetlist.json", chain_name);
        let data = self.get_file_content(chain_name, &path).await?;

        parse_json(&data)
    }

    async fn get_file_content(&self, chain_name: &str, path: &str) -> Result<String, AssetsError> {
        let url = format!("{}/{}", self.base_url, path);
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AssetsError::Status {
                chain: chain_name.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}

impl Default for AssetDirectory {
    fn default() -> Self {
        let client = Client::builder()
            .timeout(DEFAULT_REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();

        AssetDirectory::with_client(client, DEFAULT_REGISTRY_BASE_URL)
    }
}

fn parse_json<T>(data: &str) -> Result<T, AssetsError>
where
    T: DeserializeOwned,
{
    serde_json::from_str(data).map_err(|e| e.into())
}
