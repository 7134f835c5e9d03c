//! Outbound request seam
//!
//! [`Transport`] is the one place a submission leaves the process. The
//! lifecycle only ever sees a [`SubmitRequest`] going out and a
//! [`SubmitResponse`] (or an error) coming back, so tests swap in a mock and
//! production uses [`ReqwestTransport`].

use async_trait::async_trait;
use http::{header, StatusCode};
use reqwest::Url;
use serde_json::Value;
use tracing::debug;

use crate::error::AjaxFormError;
use crate::forms::{ErrorMap, FormPayload};

/// Header marking the request as an AJAX call
pub const REQUESTED_WITH: &str = "X-Requested-With";

/// A form submission ready to be sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitRequest {
    /// The form's `action` attribute as written
    pub action: Option<String>,
    /// Document URL relative actions resolve against
    pub base_url: Option<String>,
    /// Anti-forgery token, if the form carried one
    pub token: Option<String>,
    /// Header the token is sent in
    pub token_header: String,
    /// Collected form data
    pub payload: FormPayload,
}

impl SubmitRequest {
    /// Absolute URL the request is sent to
    ///
    /// An absolute action is used as is, a relative one is joined onto the
    /// base URL, and a missing or empty action posts back to the base URL.
    ///
    /// # Errors
    ///
    /// Returns [`AjaxFormError::MissingAction`] when there is neither an
    /// action nor a base URL, and [`AjaxFormError::InvalidUrl`] when the
    /// result does not parse.
    pub fn url(&self) -> Result<Url, AjaxFormError> {
        let action = self.action.as_deref().map(str::trim).filter(|a| !a.is_empty());
        let base = self.base_url.as_deref();

        match (action, base) {
            (None, None) => Err(AjaxFormError::MissingAction),
            (None, Some(base)) => parse(base),
            (Some(action), None) => parse(action),
            (Some(action), Some(base)) => match Url::parse(action) {
                Ok(url) => Ok(url),
                Err(_) => parse(base)?
                    .join(action)
                    .map_err(|e| AjaxFormError::InvalidUrl(format!("{action}: {e}"))),
            },
        }
    }
}

fn parse(url: &str) -> Result<Url, AjaxFormError> {
    Url::parse(url).map_err(|e| AjaxFormError::InvalidUrl(format!("{url}: {e}")))
}

/// What came back from the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitResponse {
    /// HTTP status
    pub status: StatusCode,
    /// Body, when it was non-empty JSON
    pub body: Option<Value>,
}

impl SubmitResponse {
    /// Build a response
    #[must_use]
    pub const fn new(status: StatusCode, body: Option<Value>) -> Self {
        Self { status, body }
    }

    /// Whether the status is 2xx
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// The body's `message` string, if any
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.body
            .as_ref()
            .and_then(|body| body.get("message"))
            .and_then(Value::as_str)
    }

    /// The body read as a field error map
    #[must_use]
    pub fn error_map(&self) -> ErrorMap {
        ErrorMap::from_response_body(self.body.as_ref())
    }
}

/// Sends a submission and reports the server's answer
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `request`
    ///
    /// Any HTTP status is a successful send; only failures to reach the
    /// server or read its answer are errors.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be resolved or the request fails.
    async fn send(&self, request: SubmitRequest) -> Result<SubmitResponse, AjaxFormError>;
}

/// [`Transport`] backed by a `reqwest` client
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport with a default client
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn new() -> Result<Self, AjaxFormError> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self { client })
    }

    /// Use an existing client
    #[must_use]
    pub const fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: SubmitRequest) -> Result<SubmitResponse, AjaxFormError> {
        let url = request.url()?;
        let body = request.payload.into_multipart()?;

        let mut builder = self
            .client
            .post(url.clone())
            .header(REQUESTED_WITH, "XMLHttpRequest")
            .header(header::ACCEPT, mime::APPLICATION_JSON.essence_str())
            .multipart(body);
        if let Some(ref token) = request.token {
            builder = builder.header(request.token_header.as_str(), token.as_str());
        }

        let response = builder.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        let body = if bytes.is_empty() {
            None
        } else {
            match serde_json::from_slice::<Value>(&bytes) {
                Ok(value) => Some(value),
                Err(e) => {
                    debug!(%url, error = %e, "Response body is not JSON");
                    None
                }
            }
        };

        debug!(%url, %status, "Submission answered");
        Ok(SubmitResponse { status, body })
    }
}
