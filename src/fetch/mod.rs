//! Authenticated document retrieval.
//!
//! The document endpoints answer in one of two shapes: a JSON envelope pointing
//! at an external URL, or the document bytes themselves with whatever
//! `Content-Type` the backend felt like sending. [`DocumentFetcher`] turns
//! either into a [`FetchResult`] and never lets an error escape as `Err`.

mod error;
mod http;
mod transport;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::constants::wire;
use crate::credentials::Credentials;

pub use error::{FailureKind, FetchFailure};
pub use http::ReqwestTransport;
pub use transport::{DocumentRequest, RequestMethod, Transport, TransportError, TransportResponse};

/// JSON fields that may carry the document URL, in lookup order.
const URL_FIELDS: &[&str] = &["url", "document_url"];

/// JSON fields that may carry a server error message, in lookup order.
const ERROR_FIELDS: &[&str] = &["message", "error"];

/// Opaque key of a case/backlog document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentReference {
    pub document_id: i64,
}

impl DocumentReference {
    pub fn new(document_id: i64) -> Self {
        Self { document_id }
    }
}

/// Outcome of a fetch, classified by response shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    /// JSON envelope pointing at an externally hosted document
    JsonUrl { url: String },
    /// Raw document bytes with the declared content type (possibly empty)
    BinaryPayload {
        data: Vec<u8>,
        declared_mime_type: String,
    },
    /// Nothing to show
    Failure(FetchFailure),
}

impl FetchResult {
    pub fn is_failure(&self) -> bool {
        matches!(self, FetchResult::Failure(_))
    }

    pub fn failure(&self) -> Option<&FetchFailure> {
        match self {
            FetchResult::Failure(failure) => Some(failure),
            _ => None,
        }
    }
}

/// Where and how a document endpoint is called.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    /// Endpoint URL, without the id parameter
    pub url: String,

    /// `POST` with a JSON body or `GET` with a query parameter
    #[serde(default)]
    pub method: RequestMethod,

    /// Name of the id field/query parameter
    #[serde(default = "default_id_param")]
    pub id_param: String,

    /// Header carrying the session identifier
    #[serde(default = "default_session_header")]
    pub session_header: String,
}

fn default_id_param() -> String {
    wire::DOCUMENT_ID_PARAM.to_string()
}

fn default_session_header() -> String {
    wire::SESSION_HEADER.to_string()
}

impl Endpoint {
    pub fn new(url: impl Into<String>, method: RequestMethod) -> Self {
        Self {
            url: url.into(),
            method,
            id_param: default_id_param(),
            session_header: default_session_header(),
        }
    }
}

/// Issues authenticated document requests against one endpoint.
#[derive(Clone)]
pub struct DocumentFetcher {
    transport: Arc<dyn Transport>,
    endpoint: Endpoint,
}

impl DocumentFetcher {
    pub fn new(transport: Arc<dyn Transport>, endpoint: Endpoint) -> Self {
        Self {
            transport,
            endpoint,
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Build the request for a document, including session/auth headers.
    pub fn request_for(&self, document_id: i64, credentials: &Credentials) -> DocumentRequest {
        DocumentRequest {
            method: self.endpoint.method,
            url: self.endpoint.url.clone(),
            document_id,
            id_param: self.endpoint.id_param.clone(),
            headers: vec![
                (
                    self.endpoint.session_header.clone(),
                    credentials.session_id.clone(),
                ),
                (
                    "Authorization".to_string(),
                    format!("Bearer {}", credentials.bearer_token),
                ),
            ],
        }
    }

    /// Fetch a document and classify the response shape.
    ///
    /// Incomplete credentials short-circuit to `AuthMissing` without touching
    /// the transport.
    pub async fn fetch_document(&self, document_id: i64, credentials: &Credentials) -> FetchResult {
        if !credentials.is_complete() {
            log::warn!("Document {} not requested: session credentials missing", document_id);
            return FetchResult::Failure(FetchFailure::AuthMissing);
        }

        let request = self.request_for(document_id, credentials);
        log::debug!(
            "Requesting document {} via {} {}",
            document_id,
            request.method.name(),
            request.url
        );

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                log::warn!("Document {} request failed: {}", document_id, e);
                return FetchResult::Failure(FetchFailure::network(e.to_string()));
            }
        };

        let result = interpret_response(response);
        match &result {
            FetchResult::JsonUrl { url } => {
                log::debug!("Document {} resolved to external URL {}", document_id, url)
            }
            FetchResult::BinaryPayload {
                data,
                declared_mime_type,
            } => log::debug!(
                "Document {} returned {} bytes ({})",
                document_id,
                data.len(),
                if declared_mime_type.is_empty() {
                    "no content type"
                } else {
                    declared_mime_type.as_str()
                }
            ),
            FetchResult::Failure(failure) => {
                log::warn!("Document {} fetch failed: {}", document_id, failure)
            }
        }
        result
    }
}

/// Turn a raw response into a [`FetchResult`].
pub fn interpret_response(response: TransportResponse) -> FetchResult {
    if !response.is_success() {
        let message = response
            .body
            .as_deref()
            .ok()
            .and_then(|body| string_field(body, ERROR_FIELDS))
            .unwrap_or_else(|| format!("Request failed with status {}", response.status));
        return FetchResult::Failure(FetchFailure::http(response.status, message));
    }

    let body = match response.body {
        Ok(body) => body,
        Err(e) => return FetchResult::Failure(FetchFailure::payload_read(e)),
    };

    if mime_essence(&response.content_type) == wire::JSON_MIME {
        return match string_field(&body, URL_FIELDS) {
            Some(url) => FetchResult::JsonUrl { url },
            None => FetchResult::Failure(FetchFailure::NoUrlInResponse),
        };
    }

    FetchResult::BinaryPayload {
        data: body,
        declared_mime_type: response.content_type,
    }
}

/// Lowercased media type without parameters: `"Image/PNG; q=1"` -> `"image/png"`.
pub fn mime_essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// First non-empty string value among `fields` of a JSON object body.
fn string_field(body: &[u8], fields: &[&str]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    fields.iter().find_map(|field| {
        value
            .get(field)
            .and_then(|v| v.as_str())
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string)
    })
}
