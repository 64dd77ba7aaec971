//! Transport seam between the fetcher and the HTTP stack.
//!
//! The fetcher only builds [`DocumentRequest`]s and interprets
//! [`TransportResponse`]s, so tests can swap in a scripted transport and count
//! calls without a network.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How the document id travels to the endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum RequestMethod {
    /// `POST` with a JSON body `{"document_id": <id>}`
    #[default]
    Post,
    /// `GET` with `?document_id=<id>`
    Get,
}

impl RequestMethod {
    pub fn name(&self) -> &'static str {
        match self {
            RequestMethod::Post => "POST",
            RequestMethod::Get => "GET",
        }
    }
}

/// A fully described document request, independent of any HTTP library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRequest {
    pub method: RequestMethod,
    /// Endpoint URL without the id parameter
    pub url: String,
    pub document_id: i64,
    /// Name of the id field/query parameter
    pub id_param: String,
    pub headers: Vec<(String, String)>,
}

impl DocumentRequest {
    /// JSON body for `POST` requests, `None` for `GET`.
    pub fn json_body(&self) -> Option<String> {
        match self.method {
            RequestMethod::Post => {
                let mut body = serde_json::Map::new();
                body.insert(self.id_param.clone(), self.document_id.into());
                Some(serde_json::Value::Object(body).to_string())
            }
            RequestMethod::Get => None,
        }
    }

    /// Query pair for `GET` requests, `None` for `POST`.
    pub fn query_pair(&self) -> Option<(&str, String)> {
        match self.method {
            RequestMethod::Get => Some((self.id_param.as_str(), self.document_id.to_string())),
            RequestMethod::Post => None,
        }
    }

    /// Look up a header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// What came back from the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    /// Raw `Content-Type` header value, empty when absent
    pub content_type: String,
    /// Body bytes, or the error hit while reading them
    pub body: Result<Vec<u8>, String>,
}

impl TransportResponse {
    pub fn new(status: u16, content_type: impl Into<String>, body: Vec<u8>) -> Self {
        Self {
            status,
            content_type: content_type.into(),
            body: Ok(body),
        }
    }

    /// A response whose headers arrived but whose body could not be read.
    pub fn unreadable(status: u16, content_type: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            status,
            content_type: content_type.into(),
            body: Err(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Errors raised before any response was received.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The request could not be constructed (bad URL, bad header)
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The request was sent but no response arrived
    #[error("request failed: {0}")]
    Request(String),
}

/// Executes one document request.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait Transport: Send + Sync {
    async fn send(&self, request: DocumentRequest) -> Result<TransportResponse, TransportError>;
}
