//! Display and behavior options for an AJAX form
//!
//! Options are resolved once, when a form is attached, by merging caller
//! overrides onto defaults. Unspecified keys keep their defaults. Sources:
//!
//! 1. Programmatic builders (`FormOptions::default().with_error_list(true)`)
//! 2. JSON overrides with camelCase keys ([`FormOptions::from_overrides`])
//! 3. A TOML file plus `AJAX_FORM_*` environment variables ([`FormOptions::load_from`])
//!
//! # Example Configuration
//!
//! ```toml
//! # ajax-form.toml
//! show_error_list = true
//! show_inline_errors = true
//! hide_form_after_success = false
//! disable_resubmit = false
//! retry_button_label = "Send again"
//! request_timeout_ms = 10000
//! ```

use std::path::Path;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::AjaxFormError;
use crate::forms::DEFAULT_TOKEN_FIELD;

/// Header the anti-forgery token travels in by default
pub const DEFAULT_TOKEN_HEADER: &str = "X-CSRF-TOKEN";

/// Environment variable prefix for [`FormOptions::load_from`]
pub const ENV_PREFIX: &str = "AJAX_FORM_";

/// Form options
///
/// Labels are trusted markup and are inserted into the button verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormOptions {
    /// Show an aggregate error list above the fields
    #[serde(alias = "showErrorList")]
    pub show_error_list: bool,

    /// Show each error next to its input
    #[serde(alias = "showInlineErrors")]
    pub show_inline_errors: bool,

    /// Hide the fields after a successful submission
    #[serde(alias = "hideFormAfterSuccess")]
    pub hide_form_after_success: bool,

    /// Keep the button disabled after a successful submission
    #[serde(alias = "disableReSubmit", alias = "disableResubmit")]
    pub disable_resubmit: bool,

    /// Button label while the request is in flight
    #[serde(alias = "progressButtonLabel", alias = "progressButton")]
    pub progress_button_label: String,

    /// Button label after a rejected submission; `None` restores the original
    #[serde(alias = "retryButtonLabel", alias = "retryButton")]
    pub retry_button_label: Option<String>,

    /// Button label after a successful submission when resubmission is disabled
    #[serde(alias = "doneButtonLabel", alias = "doneButton")]
    pub done_button_label: String,

    /// Request timeout in milliseconds; `0` waits forever
    #[serde(alias = "requestTimeoutMs")]
    pub request_timeout_ms: u64,

    /// Name of the hidden input holding the anti-forgery token
    #[serde(alias = "tokenField")]
    pub token_field: String,

    /// Header the token is sent in
    #[serde(alias = "tokenHeader")]
    pub token_header: String,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            show_error_list: false,
            show_inline_errors: true,
            hide_form_after_success: true,
            disable_resubmit: true,
            progress_button_label: r#"<i class="fa fa-spinner fa-pulse"></i> &nbsp; Submitting"#
                .to_string(),
            retry_button_label: Some("Try again".to_string()),
            done_button_label: r#"<i class="fa fa-check"></i> &nbsp; Done"#.to_string(),
            request_timeout_ms: 30_000,
            token_field: DEFAULT_TOKEN_FIELD.to_string(),
            token_header: DEFAULT_TOKEN_HEADER.to_string(),
        }
    }
}

impl FormOptions {
    /// Merge JSON overrides onto the defaults
    ///
    /// Keys may use the snake_case field names or camelCase names such as
    /// `showErrorList`, `retryButtonLabel` and the short `retryButton`. An
    /// explicit `null` for the retry label turns it off.
    ///
    /// # Errors
    ///
    /// Returns [`AjaxFormError::InvalidOptions`] if a value has the wrong type.
    ///
    /// # Example
    ///
    /// ```rust
    /// use ajax_validation::config::FormOptions;
    /// use serde_json::json;
    ///
    /// let options = FormOptions::from_overrides(json!({
    ///     "showErrorList": true,
    ///     "retryButtonLabel": null,
    /// }))?;
    /// assert!(options.show_error_list);
    /// assert!(options.show_inline_errors);
    /// assert_eq!(options.retry_label(), None);
    /// # Ok::<(), ajax_validation::error::AjaxFormError>(())
    /// ```
    pub fn from_overrides(overrides: serde_json::Value) -> Result<Self, AjaxFormError> {
        Ok(serde_json::from_value(overrides)?)
    }

    /// Load options from a TOML file, with `AJAX_FORM_*` environment overrides
    ///
    /// A missing file is not an error; defaults apply.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is not valid TOML or a value has the
    /// wrong type.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use ajax_validation::config::FormOptions;
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let options = FormOptions::load_from("./ajax-form.toml")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn load_from(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let options = Figment::new()
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()?;
        Ok(options)
    }

    /// Retry label, treating an empty label as absent
    #[must_use]
    pub fn retry_label(&self) -> Option<&str> {
        self.retry_button_label.as_deref().filter(|l| !l.is_empty())
    }

    /// Request timeout, `None` when disabled
    #[must_use]
    pub const fn request_timeout(&self) -> Option<Duration> {
        match self.request_timeout_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }

    /// Toggle the aggregate error list
    #[must_use]
    pub const fn with_error_list(mut self, enabled: bool) -> Self {
        self.show_error_list = enabled;
        self
    }

    /// Toggle inline errors
    #[must_use]
    pub const fn with_inline_errors(mut self, enabled: bool) -> Self {
        self.show_inline_errors = enabled;
        self
    }

    /// Toggle hiding the fields after success
    #[must_use]
    pub const fn with_hide_after_success(mut self, enabled: bool) -> Self {
        self.hide_form_after_success = enabled;
        self
    }

    /// Toggle disabling resubmission after success
    #[must_use]
    pub const fn with_disable_resubmit(mut self, enabled: bool) -> Self {
        self.disable_resubmit = enabled;
        self
    }

    /// Set the in-flight button label
    #[must_use]
    pub fn with_progress_label(mut self, label: impl Into<String>) -> Self {
        self.progress_button_label = label.into();
        self
    }

    /// Set the label shown after a rejected submission
    #[must_use]
    pub fn with_retry_label(mut self, label: impl Into<String>) -> Self {
        self.retry_button_label = Some(label.into());
        self
    }

    /// Restore the original label after a rejected submission
    #[must_use]
    pub fn without_retry_label(mut self) -> Self {
        self.retry_button_label = None;
        self
    }

    /// Set the done label
    #[must_use]
    pub fn with_done_label(mut self, label: impl Into<String>) -> Self {
        self.done_button_label = label.into();
        self
    }

    /// Set the request timeout (`Duration::ZERO` disables it)
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }
}
