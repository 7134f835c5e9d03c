//! Error types and error handling
//!
//! None of these errors reach the caller of [`AjaxForm::submit`]: the
//! lifecycle logs them and takes the failure path, leaving the form editable.
//! They surface as `Result`s only from construction and configuration.
//!
//! [`AjaxForm::submit`]: crate::submission::AjaxForm::submit

use std::time::Duration;

use thiserror::Error;

/// Library error type
#[derive(Debug, Error)]
pub enum AjaxFormError {
    /// The node handed to a controller is not a `<form>` element
    #[error("Not a form element: {0}")]
    NotAForm(String),

    /// The form has no `action` and the document has no base URL to fall back on
    #[error("Form has no action and the document has no base URL")]
    MissingAction,

    /// The action could not be resolved into an absolute URL
    #[error("Invalid submission URL: {0}")]
    InvalidUrl(String),

    /// The request could not be sent or its response could not be read
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// No response arrived within the configured request timeout
    #[error("Submission timed out after {0:?}")]
    Timeout(Duration),

    /// Caller-supplied option overrides did not deserialize
    #[error("Invalid form options: {0}")]
    InvalidOptions(#[from] serde_json::Error),

    /// A file part carried an unparseable content type
    #[error("Multipart error: {0}")]
    Multipart(String),
}
