//! Client for the Document Update Service
//!
//! Talks to a Google Docs compatible REST API: batches are posted to
//! `/v1/documents/{id}:batchUpdate` and the body length is read back from
//! the document resource. Nothing is retried; a rejected batch is handed back
//! with the service's status and body untouched.

use std::time::Duration;

use mdbatch_config::{DEFAULT_ENDPOINT, DEFAULT_TIMEOUT_SECS};
use mdbatch_engine::{BatchUpdate, batch_update_path, document_path};
use reqwest::blocking::{Client, Response};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// The service answered with a non-success status.
    #[error("document service rejected the request ({status}): {}", rejection_message(.body))]
    Rejected { status: u16, body: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("unexpected response from document service: {0}")]
    InvalidResponse(String),
}

impl ServiceError {
    pub fn rejection(status: u16, body: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            body: body.into(),
        }
    }

    /// Status code of a rejected request.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// The service's own error message when it sent one, otherwise our description.
    pub fn message(&self) -> String {
        match self {
            Self::Rejected { body, .. } => rejection_message(body),
            other => other.to_string(),
        }
    }

    /// Body of a rejected request, verbatim.
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Rejected { body, .. } => Some(body),
            _ => None,
        }
    }
}

/// `error.message` of a JSON error body, or the whole body if it has none.
fn rejection_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            value
                .pointer("/error/message")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}

/// Operations the CLI needs from a document service.
pub trait DocumentService {
    /// Posts a raw `{"requests": [...]}` body and returns the service's reply.
    fn submit(&self, document_id: &str, body: &Value) -> Result<Value, ServiceError>;

    /// Index one past the last character of the document body.
    fn end_index(&self, document_id: &str) -> Result<usize, ServiceError>;

    fn batch_update(&self, document_id: &str, batch: &BatchUpdate) -> Result<Value, ServiceError> {
        let body = serde_json::to_value(batch)?;
        self.submit(document_id, &body)
    }
}

/// Reads the `endIndex` of the last structural element of a document body.
pub fn parse_end_index(document: &Value) -> Result<usize, ServiceError> {
    let content = document
        .pointer("/body/content")
        .and_then(Value::as_array)
        .ok_or_else(|| ServiceError::InvalidResponse("document has no body content".into()))?;

    content
        .last()
        .and_then(|element| element.get("endIndex"))
        .and_then(Value::as_u64)
        .map(|end| end as usize)
        .ok_or_else(|| ServiceError::InvalidResponse("body content has no endIndex".into()))
}

/// Blocking HTTP client for the Google Docs REST API.
#[derive(Debug, Clone)]
pub struct DocsClient {
    base_url: String,
    access_token: String,
    client: Client,
}

impl DocsClient {
    pub fn new(access_token: impl Into<String>) -> Result<Self, ServiceError> {
        Self::with_url(DEFAULT_ENDPOINT, access_token)
    }

    /// Create a client for a custom service URL
    pub fn with_url(
        base_url: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Result<Self, ServiceError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            base_url,
            access_token: access_token.into(),
            client,
        })
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, ServiceError> {
        self.client = Client::builder().timeout(timeout).build()?;
        Ok(self)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Turns a non-success response into [`ServiceError::Rejected`].
fn accepted(response: Response) -> Result<Response, ServiceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text()?;
    log::warn!("document service returned {status}");
    Err(ServiceError::rejection(status.as_u16(), body))
}

impl DocumentService for DocsClient {
    fn submit(&self, document_id: &str, body: &Value) -> Result<Value, ServiceError> {
        let url = self.url(&batch_update_path(document_id));
        log::debug!("POST {url}");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(body)
            .send()?;

        Ok(accepted(response)?.json()?)
    }

    fn end_index(&self, document_id: &str) -> Result<usize, ServiceError> {
        let url = self.url(&document_path(document_id));
        log::debug!("GET {url}");

        let response = self
            .client
            .get(&url)
            .query(&[("fields", "body.content.endIndex")])
            .bearer_auth(&self.access_token)
            .send()?;

        parse_end_index(&accepted(response)?.json()?)
    }
}
