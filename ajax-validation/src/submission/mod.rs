//! Submission lifecycle
//!
//! ```text
//! Idle ──submit──▶ Submitting ──2xx──────────────▶ Succeeded
//!   ▲                  │                              │ submit: close modal,
//!   │                  └──non-2xx / error / timeout─▶ Failed   no request
//!   └──────────── Failed accepts a new submit like Idle ┘
//! ```
//!
//! [`AjaxForm::submit`] drives one whole cycle. Event-loop integrations that
//! cannot hold the document across an await use [`AjaxForm::begin`] to get
//! the request and [`AjaxForm::complete`] to apply its outcome.
//!
//! # Example
//!
//! ```rust,no_run
//! use ajax_validation::prelude::*;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let mut doc = Document::new().with_base_url("https://example.com/signup");
//! let root = doc.root();
//! let form = FormBuilder::new("/users")
//!     .csrf_token("abc123")
//!     .field("email", InputType::Email).label("Email").done()
//!     .submit("Sign up")
//!     .mount(&mut doc, root);
//!
//! let mut ajax = AjaxForm::attach(&doc, form, FormOptions::default(), ReqwestTransport::new()?)?;
//! let mut event = SubmitEvent::new();
//! match ajax.submit(&mut doc, &mut event).await {
//!     SubmitOutcome::Succeeded { message } => println!("saved: {message:?}"),
//!     SubmitOutcome::Rejected { errors } => println!("{} errors", errors.count()),
//!     SubmitOutcome::Ignored => {}
//! }
//! # Ok(())
//! # }
//! ```

mod transport;

#[cfg(test)]
pub use transport::MockTransport;
pub use transport::{ReqwestTransport, SubmitRequest, SubmitResponse, Transport, REQUESTED_WITH};

use tracing::{debug, info, warn};

use crate::config::FormOptions;
use crate::controller::FormController;
use crate::dom::{Document, NodeId};
use crate::error::AjaxFormError;
use crate::forms::{ErrorMap, FormPayload};

/// Where a form is in its submission lifecycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SubmissionState {
    /// Never submitted
    #[default]
    Idle,
    /// Request in flight
    Submitting,
    /// Accepted by the server; no further requests are sent
    Succeeded,
    /// Rejected or unreachable; may be submitted again
    Failed,
}

impl SubmissionState {
    /// Whether a submit event would send a request
    #[must_use]
    pub const fn accepts_submit(self) -> bool {
        matches!(self, Self::Idle | Self::Failed)
    }
}

/// A form submit event
///
/// The lifecycle always suppresses the browser's own navigation, so every
/// event handed to [`AjaxForm`] comes back default-prevented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubmitEvent {
    default_prevented: bool,
}

impl SubmitEvent {
    /// A fresh event
    #[must_use]
    pub const fn new() -> Self {
        Self {
            default_prevented: false,
        }
    }

    /// Suppress the default navigation
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Whether navigation was suppressed
    #[must_use]
    pub const fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Result of handling a submit event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The server accepted the submission
    Succeeded {
        /// The response's `message`, if it had one
        message: Option<String>,
    },
    /// The server rejected the submission or could not be reached
    Rejected {
        /// Field errors rendered into the form
        errors: ErrorMap,
    },
    /// No request was sent, or a completion arrived out of turn
    Ignored,
}

/// A form wired for AJAX submission
#[derive(Debug)]
pub struct AjaxForm<T> {
    controller: FormController,
    transport: T,
    state: SubmissionState,
}

impl<T: Transport> AjaxForm<T> {
    /// Bind to `form` with resolved `options`
    ///
    /// # Errors
    ///
    /// Returns [`AjaxFormError::NotAForm`] if `form` is not a `<form>` element.
    pub fn attach(
        doc: &Document,
        form: NodeId,
        options: FormOptions,
        transport: T,
    ) -> Result<Self, AjaxFormError> {
        let controller = FormController::new(doc, form, options)?;
        debug!(has_token = controller.token().is_some(), "Attached AJAX form");
        Ok(Self {
            controller,
            transport,
            state: SubmissionState::Idle,
        })
    }

    /// Current lifecycle state
    #[must_use]
    pub const fn state(&self) -> SubmissionState {
        self.state
    }

    /// The feedback controller
    #[must_use]
    pub const fn controller(&self) -> &FormController {
        &self.controller
    }

    /// The transport
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Handle a submit event up to the point a request would be sent
    ///
    /// Always prevents the event's default. Returns the request to send
    /// when the form is `Idle` or `Failed`; otherwise returns `None`, after
    /// closing the enclosing modal if the form already succeeded.
    pub fn begin(&mut self, doc: &mut Document, event: &mut SubmitEvent) -> Option<SubmitRequest> {
        event.prevent_default();

        match self.state {
            SubmissionState::Submitting => {
                debug!("Submission already in flight, ignoring submit");
                None
            }
            SubmissionState::Succeeded => {
                self.controller.close_enclosing_modal(doc);
                None
            }
            SubmissionState::Idle | SubmissionState::Failed => {
                self.controller.mark_submitting(doc);
                let form = self.controller.form();
                let request = SubmitRequest {
                    action: doc.attr(form, "action").map(ToString::to_string),
                    base_url: doc.base_url().map(ToString::to_string),
                    token: self.controller.token().map(ToString::to_string),
                    token_header: self.controller.options().token_header.clone(),
                    payload: FormPayload::from_form(doc, form),
                };
                self.state = SubmissionState::Submitting;
                info!(
                    action = request.action.as_deref().unwrap_or_default(),
                    fields = request.payload.len(),
                    "Submitting form"
                );
                Some(request)
            }
        }
    }

    /// Apply the outcome of the request returned by [`begin`](Self::begin)
    ///
    /// Ignored unless the form is `Submitting`.
    pub fn complete(
        &mut self,
        doc: &mut Document,
        result: Result<SubmitResponse, AjaxFormError>,
    ) -> SubmitOutcome {
        if self.state != SubmissionState::Submitting {
            debug!(state = ?self.state, "Ignoring completion outside of a submission");
            return SubmitOutcome::Ignored;
        }

        match result {
            Ok(response) if response.is_success() => {
                let message = response.message().map(ToString::to_string);
                self.controller.clear_feedback(doc);
                if let Some(ref message) = message {
                    self.controller.add_message(doc, message);
                }
                self.controller.done(doc);
                self.state = SubmissionState::Succeeded;
                info!(status = %response.status, "Submission accepted");
                SubmitOutcome::Succeeded { message }
            }
            Ok(response) => {
                let errors = response.error_map();
                info!(
                    status = %response.status,
                    fields = errors.fields().len(),
                    "Submission rejected"
                );
                self.fail(doc, errors)
            }
            Err(e) => {
                warn!(error = %e, "Submission failed");
                self.fail(doc, ErrorMap::new())
            }
        }
    }

    fn fail(&mut self, doc: &mut Document, errors: ErrorMap) -> SubmitOutcome {
        self.controller
            .clear_feedback(doc)
            .process_errors(doc, &errors)
            .rearm(doc);
        self.state = SubmissionState::Failed;
        SubmitOutcome::Rejected { errors }
    }

    /// Run one full submit cycle for `event`
    ///
    /// The request is bounded by [`FormOptions::request_timeout`]; running
    /// out of time is handled like any other failure. Failures are rendered
    /// into the form and never returned as errors.
    pub async fn submit(&mut self, doc: &mut Document, event: &mut SubmitEvent) -> SubmitOutcome {
        let Some(request) = self.begin(doc, event) else {
            return SubmitOutcome::Ignored;
        };

        let result = match self.controller.options().request_timeout() {
            Some(limit) => tokio::time::timeout(limit, self.transport.send(request))
                .await
                .unwrap_or(Err(AjaxFormError::Timeout(limit))),
            None => self.transport.send(request).await,
        };

        self.complete(doc, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Selector;
    use crate::forms::{FormBuilder, InputType};
    use http::StatusCode;
    use serde_json::json;
    use std::time::Duration;

    fn signup(doc: &mut Document, parent: NodeId) -> NodeId {
        FormBuilder::new("/users")
            .csrf_token("tok-123")
            .field("email", InputType::Email)
            .label("Email")
            .value("jane@example.com")
            .done()
            .field("name", InputType::Text)
            .label("Name")
            .done()
            .submit("Sign up")
            .mount(doc, parent)
    }

    fn setup<T: Transport>(options: FormOptions, transport: T) -> (Document, AjaxForm<T>) {
        let mut doc = Document::new().with_base_url("https://example.com/signup");
        let root = doc.root();
        let form = signup(&mut doc, root);
        let ajax = AjaxForm::attach(&doc, form, options, transport).unwrap();
        (doc, ajax)
    }

    fn responding(status: StatusCode, body: serde_json::Value) -> MockTransport {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .times(1)
            .returning(move |_| Ok(SubmitResponse::new(status, Some(body.clone()))));
        transport
    }

    #[tokio::test]
    async fn test_one_request_per_submit_with_token_header() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|req| {
                req.token.as_deref() == Some("tok-123")
                    && req.token_header == "X-CSRF-TOKEN"
                    && req.payload.text("email") == Some("jane@example.com")
                    && req.url().map(|u| u.to_string()).ok().as_deref()
                        == Some("https://example.com/users")
            })
            .times(1)
            .returning(|_| Ok(SubmitResponse::new(StatusCode::OK, None)));
        let (mut doc, mut ajax) = setup(FormOptions::default(), transport);

        let mut event = SubmitEvent::new();
        let outcome = ajax.submit(&mut doc, &mut event).await;

        assert!(event.is_default_prevented());
        assert_eq!(outcome, SubmitOutcome::Succeeded { message: None });
        assert_eq!(ajax.state(), SubmissionState::Succeeded);
    }

    #[tokio::test]
    async fn test_success_renders_message_and_locks_button() {
        let transport = responding(StatusCode::OK, json!({"message": "Welcome aboard"}));
        let (mut doc, mut ajax) = setup(FormOptions::default(), transport);

        let outcome = ajax.submit(&mut doc, &mut SubmitEvent::new()).await;

        assert_eq!(
            outcome,
            SubmitOutcome::Succeeded {
                message: Some("Welcome aboard".to_string())
            }
        );
        let banner = doc
            .select_first(doc.root(), &Selector::class("alert-success"))
            .unwrap();
        assert_eq!(doc.text_content(banner), "Welcome aboard");

        let button = ajax.controller().button();
        assert!(button.is_disabled(&doc));
        assert_eq!(button.label(&doc), FormOptions::default().done_button_label);
        let email = doc
            .select_first(ajax.controller().form(), &Selector::attr_eq("name", "email"))
            .unwrap();
        assert!(!doc.is_visible(email));
    }

    #[tokio::test]
    async fn test_rejection_renders_errors_and_rearms() {
        let transport = responding(
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({"email": ["Required"], "name": ["Too short", "Invalid characters"]}),
        );
        let (mut doc, mut ajax) = setup(FormOptions::default().with_error_list(true), transport);

        let outcome = ajax.submit(&mut doc, &mut SubmitEvent::new()).await;

        let SubmitOutcome::Rejected { errors } = outcome else {
            panic!("expected rejection, got {outcome:?}");
        };
        assert_eq!(errors.count(), 3);
        assert_eq!(ajax.state(), SubmissionState::Failed);

        let form = ajax.controller().form();
        assert_eq!(doc.select(form, &Selector::tag("label").and_class("error")).len(), 3);
        assert_eq!(doc.select(form, &Selector::tag("li")).len(), 3);
        let button = ajax.controller().button();
        assert!(!button.is_disabled(&doc));
        assert_eq!(button.label(&doc), "Try again");
    }

    #[tokio::test]
    async fn test_transport_error_takes_failure_path() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .times(1)
            .returning(|_| Err(AjaxFormError::MissingAction));
        let (mut doc, mut ajax) = setup(FormOptions::default().without_retry_label(), transport);

        let outcome = ajax.submit(&mut doc, &mut SubmitEvent::new()).await;

        assert_eq!(
            outcome,
            SubmitOutcome::Rejected {
                errors: ErrorMap::new()
            }
        );
        let button = ajax.controller().button();
        assert!(!button.is_disabled(&doc));
        assert_eq!(button.label(&doc), "Sign up");
    }

    #[tokio::test]
    async fn test_failed_form_can_be_resubmitted() {
        let mut transport = MockTransport::new();
        let mut seq = mockall::Sequence::new();
        transport
            .expect_send()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| {
                Ok(SubmitResponse::new(
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Some(json!({"email": ["Taken"]})),
                ))
            });
        transport
            .expect_send()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(SubmitResponse::new(StatusCode::CREATED, None)));
        let (mut doc, mut ajax) = setup(FormOptions::default(), transport);

        ajax.submit(&mut doc, &mut SubmitEvent::new()).await;
        assert_eq!(ajax.state(), SubmissionState::Failed);

        ajax.submit(&mut doc, &mut SubmitEvent::new()).await;
        assert_eq!(ajax.state(), SubmissionState::Succeeded);
        let form = ajax.controller().form();
        assert!(doc.select(form, &Selector::class("has-error")).is_empty());
        assert!(ajax.controller().errors().is_empty());
    }

    #[tokio::test]
    async fn test_submit_while_submitting_sends_nothing() {
        let mut transport = MockTransport::new();
        transport.expect_send().never();
        let (mut doc, mut ajax) = setup(FormOptions::default(), transport);

        let request = ajax.begin(&mut doc, &mut SubmitEvent::new());
        assert!(request.is_some());
        assert_eq!(ajax.state(), SubmissionState::Submitting);
        assert!(ajax.controller().button().is_disabled(&doc));
        assert!(!ajax.state().accepts_submit());

        let mut second = SubmitEvent::new();
        let outcome = ajax.submit(&mut doc, &mut second).await;
        assert_eq!(outcome, SubmitOutcome::Ignored);
        assert!(second.is_default_prevented());
        assert_eq!(ajax.state(), SubmissionState::Submitting);
    }

    #[tokio::test]
    async fn test_submit_after_success_closes_modal() {
        let transport = responding(StatusCode::OK, json!({}));
        let mut doc = Document::new().with_base_url("https://example.com/");
        let root = doc.root();
        let modal = doc.create_element("div");
        doc.set_attr(modal, "class", "modal in");
        doc.append_child(root, modal);
        let form = signup(&mut doc, modal);
        let mut ajax = AjaxForm::attach(&doc, form, FormOptions::default(), transport).unwrap();

        ajax.submit(&mut doc, &mut SubmitEvent::new()).await;
        assert!(doc.is_visible(modal));

        let mut again = SubmitEvent::new();
        let outcome = ajax.submit(&mut doc, &mut again).await;
        assert_eq!(outcome, SubmitOutcome::Ignored);
        assert!(again.is_default_prevented());
        assert!(doc.is_hidden(modal));
        assert_eq!(ajax.state(), SubmissionState::Succeeded);
    }

    #[test]
    fn test_stale_completion_is_ignored() {
        let (mut doc, mut ajax) = setup(FormOptions::default(), MockTransport::new());
        let before = doc.outer_html(doc.root());

        let outcome = ajax.complete(&mut doc, Ok(SubmitResponse::new(StatusCode::OK, None)));

        assert_eq!(outcome, SubmitOutcome::Ignored);
        assert_eq!(ajax.state(), SubmissionState::Idle);
        assert_eq!(doc.outer_html(doc.root()), before);
    }

    struct SlowTransport;

    #[async_trait::async_trait]
    impl Transport for SlowTransport {
        async fn send(&self, _request: SubmitRequest) -> Result<SubmitResponse, AjaxFormError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(SubmitResponse::new(StatusCode::OK, None))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_takes_failure_path() {
        let (mut doc, mut ajax) = setup(
            FormOptions::default().with_request_timeout(Duration::from_millis(50)),
            SlowTransport,
        );

        let outcome = ajax.submit(&mut doc, &mut SubmitEvent::new()).await;

        assert_eq!(
            outcome,
            SubmitOutcome::Rejected {
                errors: ErrorMap::new()
            }
        );
        assert_eq!(ajax.state(), SubmissionState::Failed);
        let button = ajax.controller().button();
        assert!(!button.is_disabled(&doc));
        assert_eq!(button.label(&doc), "Try again");
    }
}
