//! Whitelisted forwarding of REST queries to chain backends.
//!
//! A request names a chain and a path below that chain's REST root. The destination host always
//! comes from the [`ChainRegistry`]; callers only control the path and query, and paths that
//! could escape the REST root are refused before anything touches the network. When the backend
//! can't be reached the request is answered from [`FallbackData`] instead of failing.
use std::sync::Arc;
use tracing::{info, warn};
use url::Url;

use crate::{error::ProxyError, registry::ChainRegistry};

pub use self::{fallback::*, transport::*};

pub mod fallback;
pub mod transport;

/// Outcome of a forwarded request. Callers must handle degraded data explicitly.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Forwarded {
    /// The backend answered; status and body are exactly what it sent.
    Backend(BackendResponse),
    /// The backend was unreachable and the request was answered from canned data.
    Fallback(FallbackPayload),
}

impl Forwarded {
    /// Status to relay to the client. Fallback data is always served as a success.
    pub fn status(&self) -> u16 {
        match self {
            Forwarded::Backend(response) => response.status,
            Forwarded::Fallback(_) => 200,
        }
    }

    /// The body to relay to the client.
    pub fn body(&self) -> String {
        match self {
            Forwarded::Backend(response) => response.body.clone(),
            Forwarded::Fallback(payload) => payload.to_json().to_string(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Forwarded::Fallback(_))
    }
}

/// Routes requests to whitelisted chain backends.
#[derive(Clone)]
pub struct ProxyRouter {
    registry: Arc<ChainRegistry>,
    transport: Arc<dyn Transport>,
    fallback: Arc<FallbackData>,
}

impl ProxyRouter {
    pub fn new<T>(registry: ChainRegistry, transport: T, fallback: FallbackData) -> Self
    where
        T: Transport + 'static,
    {
        ProxyRouter {
            registry: Arc::new(registry),
            transport: Arc::new(transport),
            fallback: Arc::new(fallback),
        }
    }

    pub fn registry(&self) -> &ChainRegistry {
        &self.registry
    }

    /// Validates a request and builds the URL it would be forwarded to, without sending anything.
    ///
    /// # Arguments
    ///
    /// * `chain_name` - Must be registered in the [`ChainRegistry`].
    /// * `sub_path` - Path below the chain's REST root, without a leading `/`. May not contain `..`,
    ///   `//`, `?` or `#`.
    /// * `query` - Optional query string, appended verbatim. A leading `?` is added if missing.
    pub fn target_url(
        &self,
        chain_name: &str,
        sub_path: &str,
        query: Option<&str>,
    ) -> Result<Url, ProxyError> {
        let chain = self.registry.lookup(chain_name)?;

        let path = format!("/{}", sub_path);
        // the url parser treats %2e as a dot when resolving segments
        let dotted = path.to_ascii_lowercase().replace("%2e", ".");
        // a decoded `?` or `#` would restructure the outbound url
        if dotted.contains("..")
            || path.contains("//")
            || path.contains(|c| c == '?' || c == '#')
        {
            return Err(ProxyError::InvalidPath(sub_path.to_string()));
        }

        let query = match query {
            Some(q) if !q.is_empty() && !q.starts_with('?') => format!("?{}", q),
            Some(q) => q.to_string(),
            None => String::new(),
        };
        let base = Url::parse(&chain.rest_address)?;
        let url = Url::parse(&format!("{}{}{}", chain.rest_address, path, query))?;

        // the parsed url must still live below the REST root
        let root = base.path().trim_end_matches('/');
        if url.origin() != base.origin() || !url.path().starts_with(&format!("{}/", root)) {
            return Err(ProxyError::InvalidPath(sub_path.to_string()));
        }

        Ok(url)
    }

    /// Forwards a GET request to the chain's backend.
    ///
    /// Validation failures are returned before any network access. A transport failure is not
    /// an error: the request is answered with [`Forwarded::Fallback`]. There are no retries.
    pub async fn forward(
        &self,
        chain_name: &str,
        sub_path: &str,
        query: Option<&str>,
    ) -> Result<Forwarded, ProxyError> {
        let url = self.target_url(chain_name, sub_path, query)?;
        info!(chain = chain_name, "proxying request to: {}", url);

        match self.transport.get(&url).await {
            Ok(response) => Ok(Forwarded::Backend(response)),
            Err(err) => {
                warn!(chain = chain_name, "proxy error for {}: {}", url, err);
                let payload = self.fallback.provide(sub_path, chain_name);
                warn!(chain = chain_name, ?payload, "using fallback data");
                Ok(Forwarded::Fallback(payload))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::TransportError, registry::ChainDescriptor};
    use assay::assay;
    use async_trait::async_trait;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    };

    /// Records every URL it is asked for and answers with a fixed result.
    struct RecordingTransport {
        calls: AtomicUsize,
        last_url: Mutex<Option<Url>>,
        reachable: bool,
    }

    impl RecordingTransport {
        fn new(reachable: bool) -> Self {
            RecordingTransport {
                calls: AtomicUsize::new(0),
                last_url: Mutex::new(None),
                reachable,
            }
        }
    }

    #[async_trait]
    impl Transport for Arc<RecordingTransport> {
        async fn get(&self, url: &Url) -> Result<BackendResponse, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_url.lock().unwrap() = Some(url.clone());
            if self.reachable {
                Ok(BackendResponse {
                    status: 404,
                    body: r#"{"code":5,"message":"not found"}"#.to_string(),
                })
            } else {
                Err(TransportError::Unreachable("connection refused".to_string()))
            }
        }
    }

    fn router(reachable: bool) -> (ProxyRouter, Arc<RecordingTransport>) {
        let transport = Arc::new(RecordingTransport::new(reachable));
        let router = ProxyRouter::new(
            ChainRegistry::builtin(),
            transport.clone(),
            FallbackData::new(),
        );

        (router, transport)
    }

    #[assay]
    async fn rejects_unknown_chain_without_calling_out() {
        let (router, transport) = router(true);
        let result = router
            .forward("evil", "cosmos/base/tendermint/v1beta1/blocks/latest", None)
            .await;

        assert!(matches!(result, Err(ProxyError::ChainNotFound(_))));
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
    }

    #[assay]
    async fn rejects_traversal_without_calling_out() {
        let (router, transport) = router(true);
        let paths = [
            "../secret",
            "cosmos/../../etc/passwd",
            "cosmos//bank",
            "/cosmos/bank",
            "cosmos/bank/..",
            "cosmos/%2e%2e/%2e%2e/admin",
            "cosmos/bank/v1beta1/balances/cosmos1abc#x",
            "cosmos/bank/v1beta1/balances/cosmos1abc?height=1",
        ];

        for path in paths {
            let result = router.forward("cosmoshub", path, None).await;
            assert!(
                matches!(result, Err(ProxyError::InvalidPath(_))),
                "path {} was accepted",
                path
            );
        }
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
    }

    #[assay]
    async fn builds_url_from_registry() {
        let (router, transport) = router(true);
        let forwarded = router
            .forward(
                "osmosis",
                "cosmos/bank/v1beta1/balances/osmo1abc",
                Some("?height=100"),
            )
            .await
            .unwrap();

        assert_eq!(
            transport.last_url.lock().unwrap().as_ref().unwrap().as_str(),
            "https://osmosis-api.polkachu.com/cosmos/bank/v1beta1/balances/osmo1abc?height=100"
        );
        // error statuses are relayed, not replaced
        assert_eq!(forwarded.status(), 404);
        assert!(!forwarded.is_fallback());
    }

    #[assay]
    fn adds_missing_question_mark() {
        let (router, _) = router(true);
        let url = router
            .target_url("juno", "cosmos/bank/v1beta1/balances/juno1abc", Some("height=7"))
            .unwrap();

        assert_eq!(url.query(), Some("height=7"));
    }

    #[assay]
    fn keeps_backend_path_prefix() {
        let registry = ChainRegistry::new(vec![ChainDescriptor::new(
            "local",
            "Local",
            "cosmos",
            "https://node.example.com/rest/",
        )])
        .unwrap();
        let router = ProxyRouter::new(
            registry,
            Arc::new(RecordingTransport::new(true)),
            FallbackData::new(),
        );
        let url = router
            .target_url("local", "cosmos/base/tendermint/v1beta1/blocks/latest", None)
            .unwrap();

        assert_eq!(
            url.as_str(),
            "https://node.example.com/rest/cosmos/base/tendermint/v1beta1/blocks/latest"
        );
    }

    #[assay]
    async fn unreachable_backend_falls_back() {
        let (router, transport) = router(false);
        let forwarded = router
            .forward(
                "cosmoshub",
                "cosmos/bank/v1beta1/balances/cosmos1c4k24jzduc365kywrsvf5ujz4ya6mwympnc4en",
                None,
            )
            .await
            .unwrap();

        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
        assert!(forwarded.is_fallback());
        assert_eq!(forwarded.status(), 200);
        match forwarded {
            Forwarded::Fallback(FallbackPayload::Balances(balances)) => {
                assert_eq!(balances.len(), 2)
            }
            other => panic!("unexpected result {:?}", other),
        }
    }
}
