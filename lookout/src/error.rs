use std::net::SocketAddr;
use thiserror::Error;

// Higher level errors: QueryError, ResolveError, ProxyError
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("{0}")]
    Proxy(#[from] ProxyError),
    #[error("{0}")]
    Resolve(#[from] ResolveError),
    #[error("invalid address: {0}")]
    InvalidAddress(String),
    #[error("invalid block height: {0}")]
    InvalidHeight(String),
    #[error("invalid date/time: {0}")]
    InvalidTimestamp(String),
    #[error("{0}")]
    Application(String),
    #[error("unexpected backend response: {0}")]
    UnexpectedResponse(String),
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("{0}")]
    Proxy(#[from] ProxyError),
    #[error("selected date/time {target} is in the future (latest block time is {latest})")]
    FutureTimestamp { target: String, latest: String },
    #[error("unexpected latest block response: {0}")]
    UnexpectedResponse(String),
}

// Lower level errors; should be used by higher level errors
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("chain '{0}' not found")]
    ChainNotFound(String),
    #[error("invalid endpoint path: {0}")]
    InvalidPath(String),
    #[error("invalid outbound url: {0}")]
    Url(#[from] url::ParseError),
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("chain '{0}' is registered more than once")]
    DuplicateChain(String),
    #[error("invalid backend url for chain '{chain}': {source}")]
    InvalidBackendUrl {
        chain: String,
        source: url::ParseError,
    },
    #[error("backend for chain '{0}' must use https")]
    InsecureBackend(String),
}

#[derive(Debug, Error)]
pub enum ServeError {
    #[error("failed to bind to {0}: {1}")]
    PortBindingFailed(SocketAddr, std::io::Error),
    #[error("server crashed: {0}")]
    ServerCrashed(std::io::Error),
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("error during backend request: {0}")]
    Request(#[from] reqwest::Error),
    #[error("{0}")]
    Unreachable(String),
}

#[derive(Debug, Error)]
pub enum AssetsError {
    #[error("error during asset list request: {0}")]
    Request(#[from] reqwest::Error),
    #[error("incorrect HTTP response status ({status}) for chain: {chain}")]
    Status { chain: String, status: u16 },
    #[error("error parsing asset list: {0}")]
    InvalidAssetList(#[from] serde_json::Error),
}

impl QueryError {
    /// Whether the error stems from caller input rather than the backend.
    pub fn is_input_error(&self) -> bool {
        match self {
            QueryError::Proxy(e) => !matches!(e, ProxyError::Url(_)),
            QueryError::Resolve(ResolveError::Proxy(e)) => !matches!(e, ProxyError::Url(_)),
            QueryError::Resolve(ResolveError::FutureTimestamp { .. }) => true,
            QueryError::InvalidAddress(_)
            | QueryError::InvalidHeight(_)
            | QueryError::InvalidTimestamp(_) => true,
            _ => false,
        }
    }

    /// Whether the error names an unknown chain.
    pub fn is_chain_not_found(&self) -> bool {
        matches!(
            self,
            QueryError::Proxy(ProxyError::ChainNotFound(_))
                | QueryError::Resolve(ResolveError::Proxy(ProxyError::ChainNotFound(_)))
        )
    }
}
