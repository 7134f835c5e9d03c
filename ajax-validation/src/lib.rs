//! ajax-validation: asynchronous form submission with inline validation feedback
//!
//! Attach an [`AjaxForm`](submission::AjaxForm) to a `<form>` and its submit
//! events stop navigating. Instead the form data is posted in the background
//! with the page's anti-forgery token, and the server's answer is rendered
//! back into the form:
//!
//! - **2xx**: an optional success banner, fields hidden, button locked
//! - **anything else**: per-field `has-error` decorations, inline messages,
//!   an optional aggregate list, and a button ready to retry
//!
//! Validation failures are expected as a JSON object mapping field names to
//! message lists (Laravel's `{"errors": {...}}` envelope is unwrapped).
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use ajax_validation::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     ajax_validation::observability::init()?;
//!
//!     let mut doc = Document::new().with_base_url("https://example.com/contact");
//!     let root = doc.root();
//!     let form = FormBuilder::new("/contact")
//!         .csrf_token("abc123")
//!         .field("email", InputType::Email).label("Email").required().done()
//!         .textarea("message").label("Message").rows(4).done()
//!         .submit("Send")
//!         .mount(&mut doc, root);
//!
//!     let options = FormOptions::load_from("ajax-form.toml")?;
//!     let mut ajax = AjaxForm::attach(&doc, form, options, ReqwestTransport::new()?)?;
//!
//!     let outcome = ajax.submit(&mut doc, &mut SubmitEvent::new()).await;
//!     tracing::info!(?outcome, "Contact form submitted");
//!     println!("{}", doc.outer_html(root));
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! - [`dom`]: the element tree forms live in, with selectors and HTML output
//! - [`forms`]: form builder, payload collection and [`ErrorMap`](forms::ErrorMap)
//! - [`controller`]: feedback rendering and the submit button
//! - [`submission`]: lifecycle state machine and the HTTP transport
//! - [`config`]: display and behavior options
//! - [`observability`]: `tracing` subscriber setup

pub mod config;
pub mod controller;
pub mod dom;
pub mod error;
pub mod forms;
pub mod observability;
pub mod submission;

pub mod prelude {
    //! Convenience re-exports for common types and traits
    //!
    //! ```rust
    //! use ajax_validation::prelude::*;
    //! ```

    pub use crate::config::FormOptions;
    pub use crate::controller::{FormController, SubmitButton};
    pub use crate::dom::{Document, NodeId, Selector};
    pub use crate::error::AjaxFormError;
    pub use crate::forms::{ErrorMap, FormBuilder, FormPayload, InputType};
    pub use crate::submission::{
        AjaxForm, ReqwestTransport, SubmissionState, SubmitEvent, SubmitOutcome, SubmitRequest,
        SubmitResponse, Transport,
    };
}
