//! Contains the chain whitelist: the descriptors of every chain the proxy is allowed to reach and
//! the immutable registry built from them at startup.
use crate::error::{ProxyError, RegistryError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use url::Url;

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct ChainDescriptor {
    pub chain_name: String,
    pub pretty_name: String,
    pub bech32_prefix: String,
    pub rest_address: String,
}

impl ChainDescriptor {
    pub fn new(chain_name: &str, pretty_name: &str, bech32_prefix: &str, rest_address: &str) -> Self {
        ChainDescriptor {
            chain_name: chain_name.to_string(),
            pretty_name: pretty_name.to_string(),
            bech32_prefix: bech32_prefix.to_string(),
            rest_address: rest_address.to_string(),
        }
    }
}

// chain name, pretty name, bech32 prefix, REST endpoint
const BUILTIN_CHAINS: [(&str, &str, &str, &str); 10] = [
    ("cosmoshub", "Cosmos Hub", "cosmos", "https://cosmos-api.polkachu.com"),
    ("osmosis", "Osmosis", "osmo", "https://osmosis-api.polkachu.com"),
    ("akash", "Akash", "akash", "https://akash-api.polkachu.com"),
    ("juno", "Juno", "juno", "https://juno-api.polkachu.com"),
    ("stargaze", "Stargaze", "stars", "https://stargaze-api.polkachu.com"),
    ("secretnetwork", "Secret Network", "secret", "https://lcd-secret.scrtlabs.com"),
    ("celestia", "Celestia", "celestia", "https://celestia-rest.lavenderfive.com"),
    ("injective", "Injective", "inj", "https://injective-api.polkachu.com"),
    ("dydx", "dYdX", "dydx", "https://dydx-rest.lavenderfive.com"),
    ("neutron", "Neutron", "neutron", "https://neutron-rest.publicnode.com"),
];

/// Returns the descriptors of the chains supported out of the box, in display order.
pub fn builtin_chains() -> Vec<ChainDescriptor> {
    BUILTIN_CHAINS
        .iter()
        .map(|(name, pretty, prefix, rest)| ChainDescriptor::new(name, pretty, prefix, rest))
        .collect()
}

/// The whitelist of chains the proxy may forward to. Built once; there is no way to register a
/// chain afterwards.
#[derive(Clone, Debug)]
pub struct ChainRegistry {
    chains: Vec<ChainDescriptor>,
    index: HashMap<String, usize>,
}

impl ChainRegistry {
    /// Builds a registry from `chains`, preserving their order.
    ///
    /// Fails if a chain name appears twice or if a REST address is not an absolute `https` URL.
    /// Plain `http` is accepted only for loopback hosts (a local node). Trailing slashes are
    /// trimmed from REST addresses.
    pub fn new(chains: Vec<ChainDescriptor>) -> Result<Self, RegistryError> {
        let mut index = HashMap::with_capacity(chains.len());
        let mut validated = Vec::with_capacity(chains.len());

        for mut chain in chains {
            let url = Url::parse(&chain.rest_address).map_err(|source| {
                RegistryError::InvalidBackendUrl {
                    chain: chain.chain_name.clone(),
                    source,
                }
            })?;
            if url.scheme() != "https" && !is_loopback(&url) {
                return Err(RegistryError::InsecureBackend(chain.chain_name));
            }
            chain.rest_address = chain.rest_address.trim_end_matches('/').to_string();

            if index.insert(chain.chain_name.clone(), validated.len()).is_some() {
                return Err(RegistryError::DuplicateChain(chain.chain_name));
            }
            validated.push(chain);
        }

        Ok(ChainRegistry {
            chains: validated,
            index,
        })
    }

    /// The registry of [`builtin_chains`].
    pub fn builtin() -> Self {
        // the builtin table is static and known to be valid
        let chains = builtin_chains();
        let index = chains
            .iter()
            .enumerate()
            .map(|(i, c)| (c.chain_name.clone(), i))
            .collect();

        ChainRegistry { chains, index }
    }

    pub fn lookup(&self, chain_name: &str) -> Result<&ChainDescriptor, ProxyError> {
        self.index
            .get(chain_name)
            .map(|&i| &self.chains[i])
            .ok_or_else(|| ProxyError::ChainNotFound(chain_name.to_string()))
    }

    /// All registered chains in registration order
    pub fn list(&self) -> &[ChainDescriptor] {
        &self.chains
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }
}

fn is_loopback(url: &Url) -> bool {
    match url.host() {
        Some(url::Host::Domain(domain)) => domain == "localhost",
        Some(url::Host::Ipv4(ip)) => ip.is_loopback(),
        Some(url::Host::Ipv6(ip)) => ip.is_loopback(),
        None => false,
    }
}

impl Default for ChainRegistry {
    fn default() -> Self {
        ChainRegistry::builtin()
    }
}
