//! The outbound side of the proxy. [`Transport`] is the seam between request routing and the
//! network; [`HttpTransport`] is the reqwest implementation used in production.
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

use crate::error::TransportError;

/// Default bound on a single outbound request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// A backend response, relayed without interpretation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BackendResponse {
    pub status: u16,
    pub body: String,
}

impl BackendResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Issues a single GET. Any failure to obtain a response (connection, DNS, timeout) is a
    /// [`TransportError`]; a response with an error status is not.
    async fn get(&self, url: &Url) -> Result<BackendResponse, TransportError>;
}

#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(HttpTransport { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &Url) -> Result<BackendResponse, TransportError> {
        let response = self
            .client
            .get(url.clone())
            .header("accept", "application/json")
            .send()
            .await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(BackendResponse { status, body })
    }
}
