//! LookoutCli Config
//!
//! Every field has a default, so running without a config file serves the built-in chains on
//! `127.0.0.1:3000`. See `commands.rs` for how the config file is located.
use crate::error::Error;
use lookout::{
    proxy::{FallbackData, HttpTransport, ProxyRouter, DEFAULT_REQUEST_TIMEOUT},
    query::BalanceChecker,
    registry::{
        builtin_chains, AssetDirectory, ChainDescriptor, ChainRegistry, DEFAULT_REGISTRY_BASE_URL,
    },
};
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, time::Duration};

/// Name of the config file picked up from the working directory when `--config` isn't given.
pub const DEFAULT_CONFIG_FILE: &str = "lookout.toml";

/// LookoutCli Configuration
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct LookoutCliConfig {
    pub server: ServerSection,
    pub assets: AssetsSection,
    /// The chain whitelist. Replaces the built-in chains entirely when set.
    pub chains: Vec<ChainDescriptor>,
}

impl Default for LookoutCliConfig {
    fn default() -> Self {
        LookoutCliConfig {
            server: ServerSection::default(),
            assets: AssetsSection::default(),
            chains: builtin_chains(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct ServerSection {
    pub listen_addr: SocketAddr,
    /// Applies to every outbound request, backend and asset registry alike.
    pub request_timeout_secs: u64,
}

impl Default for ServerSection {
    fn default() -> Self {
        ServerSection {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT.as_secs(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct AssetsSection {
    pub registry_base_url: String,
}

impl Default for AssetsSection {
    fn default() -> Self {
        AssetsSection {
            registry_base_url: DEFAULT_REGISTRY_BASE_URL.to_string(),
        }
    }
}

impl LookoutCliConfig {
    /// A zero timeout would fail every backend call and serve only fallback data, so it is
    /// rejected.
    pub fn request_timeout(&self) -> Result<Duration, Error> {
        match self.server.request_timeout_secs {
            0 => Err(Error::ZeroTimeout),
            secs => Ok(Duration::from_secs(secs)),
        }
    }

    /// Validates the configured chains into a registry.
    pub fn registry(&self) -> Result<ChainRegistry, Error> {
        Ok(ChainRegistry::new(self.chains.clone())?)
    }

    /// Wires up the proxy, the resolver and the asset directory.
    pub fn balance_checker(&self) -> Result<BalanceChecker, Error> {
        let timeout = self.request_timeout()?;
        let transport = HttpTransport::new(timeout)?;
        let router = ProxyRouter::new(self.registry()?, transport, FallbackData::new());
        let assets = AssetDirectory::new(&self.assets.registry_base_url, timeout)?;

        Ok(BalanceChecker::new(router, assets))
    }
}
