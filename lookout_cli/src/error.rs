//! LookoutCli error types
use lookout::error::{AssetsError, RegistryError, ServeError, TransportError};
use thiserror::Error;

/// Failures while turning the config into running components
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid chain configuration: {0}")]
    Registry(#[from] RegistryError),
    #[error("{0}")]
    Serve(#[from] ServeError),
    #[error("failed to build backend client: {0}")]
    Transport(#[from] TransportError),
    #[error("failed to build asset registry client: {0}")]
    Assets(#[from] AssetsError),
    #[error("server.request_timeout_secs must be at least 1")]
    ZeroTimeout,
}
