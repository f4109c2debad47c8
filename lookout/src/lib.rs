#![warn(unused_qualifications)]
//! Lookout answers "what did this account hold, and when" for Cosmos SDK chains. It forwards REST
//! queries to a fixed whitelist of chain backends, estimates historical block heights from
//! wall-clock time and formats raw bank balances into display units using chain registry asset
//! metadata.
pub use error::{ProxyError, QueryError, ResolveError};

pub mod balances;
pub mod error;
pub mod height;
pub mod proxy;
pub mod query;
pub mod registry;
pub mod server;
