//! [`Transport`] backed by `reqwest`.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};

use super::transport::{DocumentRequest, RequestMethod, Transport, TransportError, TransportResponse};

/// Request timeout for native builds (the browser manages its own on wasm)
#[cfg(not(target_arch = "wasm32"))]
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// HTTP transport using a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport with the default client settings.
    pub fn new() -> Result<Self, TransportError> {
        let builder = reqwest::Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS));

        let client = builder
            .build()
            .map_err(|e| TransportError::InvalidRequest(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// Wrap an existing client (shared connection pool, custom TLS, ...).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Translate a [`DocumentRequest`] into a `reqwest::Request`.
    pub fn build_request(&self, request: &DocumentRequest) -> Result<reqwest::Request, TransportError> {
        let mut url = reqwest::Url::parse(&request.url)
            .map_err(|e| TransportError::InvalidRequest(format!("{}: {}", request.url, e)))?;

        let mut builder = match request.method {
            RequestMethod::Post => {
                let body = request.json_body().unwrap_or_default();
                self.client
                    .post(url)
                    .header(CONTENT_TYPE, "application/json")
                    .body(body)
            }
            RequestMethod::Get => {
                if let Some((name, value)) = request.query_pair() {
                    url.query_pairs_mut().append_pair(name, &value);
                }
                self.client.get(url)
            }
        };

        builder = builder.header(ACCEPT, "application/json, */*");
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        builder
            .build()
            .map_err(|e| TransportError::InvalidRequest(e.to_string()))
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl Transport for ReqwestTransport {
    async fn send(&self, request: DocumentRequest) -> Result<TransportResponse, TransportError> {
        let http_request = self.build_request(&request)?;

        let response = self
            .client
            .execute(http_request)
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        let body = response
            .bytes()
            .await
            .map(|bytes| bytes.to_vec())
            .map_err(|e| e.to_string());

        Ok(TransportResponse {
            status,
            content_type,
            body,
        })
    }
}
