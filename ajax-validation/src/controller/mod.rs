//! Feedback rendering for a single form
//!
//! [`FormController`] owns everything the page shows about the outcome of a
//! submission: success banners, per-field error decorations in the
//! Bootstrap 3 `has-error` style, the aggregate error list, and the submit
//! button's label and enabled state.
//!
//! The controller does not own the [`Document`]. Every operation borrows it,
//! and returns the controller so calls chain:
//!
//! ```rust
//! use ajax_validation::config::FormOptions;
//! use ajax_validation::controller::FormController;
//! use ajax_validation::dom::Document;
//! use ajax_validation::forms::{FormBuilder, InputType};
//!
//! let mut doc = Document::new();
//! let root = doc.root();
//! let form = FormBuilder::new("/signup")
//!     .field("email", InputType::Email).label("Email").done()
//!     .submit("Sign up")
//!     .mount(&mut doc, root);
//!
//! let mut controller = FormController::new(&doc, form, FormOptions::default())?;
//! controller
//!     .clear_feedback(&mut doc)
//!     .add_error(&mut doc, "email", &["The email field is required.".to_string()]);
//! assert!(doc.outer_html(form).contains("has-error"));
//! # Ok::<(), ajax_validation::error::AjaxFormError>(())
//! ```

mod button;

pub use button::SubmitButton;

use tracing::debug;

use crate::config::FormOptions;
use crate::dom::{Document, NodeId, Selector};
use crate::error::AjaxFormError;
use crate::forms::ErrorMap;

const FEEDBACK_ICON: &str = r#"<i class="fa fa-times"></i>"#;
const GROUP_STATE_CLASSES: [&str; 3] = ["has-error", "has-success", "has-feedback"];

/// Renders submission feedback into one form
#[derive(Debug, Clone)]
pub struct FormController {
    form: NodeId,
    token: Option<String>,
    errors: Vec<String>,
    options: FormOptions,
    button: SubmitButton,
    // Success banners inserted outside the form
    banners: Vec<NodeId>,
}

impl FormController {
    /// Bind a controller to `form`
    ///
    /// Reads the anti-forgery token from the hidden input named
    /// [`FormOptions::token_field`] and captures the submit button's label.
    /// Both are read once; later changes to the document are not picked up.
    ///
    /// # Errors
    ///
    /// Returns [`AjaxFormError::NotAForm`] if `form` is not a `<form>` element.
    pub fn new(doc: &Document, form: NodeId, options: FormOptions) -> Result<Self, AjaxFormError> {
        match doc.tag(form) {
            Some("form") => {}
            Some(other) => return Err(AjaxFormError::NotAForm(other.to_string())),
            None => return Err(AjaxFormError::NotAForm("#text".to_string())),
        }

        let token = doc
            .select_first(form, &Selector::attr_eq("name", options.token_field.as_str()))
            .and_then(|input| doc.attr(input, "value"))
            .filter(|value| !value.is_empty())
            .map(ToString::to_string);

        Ok(Self {
            form,
            token,
            errors: Vec::new(),
            button: SubmitButton::locate(doc, form),
            options,
            banners: Vec::new(),
        })
    }

    /// The bound form element
    #[must_use]
    pub const fn form(&self) -> NodeId {
        self.form
    }

    /// Anti-forgery token captured at construction
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Messages accumulated since the last [`clear_feedback`](Self::clear_feedback)
    #[must_use]
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Resolved options
    #[must_use]
    pub const fn options(&self) -> &FormOptions {
        &self.options
    }

    /// The submit button
    #[must_use]
    pub const fn button(&self) -> &SubmitButton {
        &self.button
    }

    /// Remove every decoration a previous cycle rendered and reset the error list
    ///
    /// Only this controller's own banners are removed; banners belonging to
    /// neighbouring forms are left alone.
    pub fn clear_feedback(&mut self, doc: &mut Document) -> &mut Self {
        let mut stale = std::mem::take(&mut self.banners);
        stale.extend(doc.select(self.form, &Selector::class("messages")));
        stale.extend(doc.select(self.form, &Selector::tag("label").and_class("error")));
        stale.extend(doc.select(self.form, &Selector::class("form-control-feedback")));
        for node in stale {
            doc.remove(node);
        }

        let controls = Selector::tag("input")
            .or(Selector::tag("select"))
            .or(Selector::tag("textarea"));
        let group = Selector::class("form-group");
        for control in doc.select(self.form, &controls) {
            if let Some(g) = doc.closest(control, &group) {
                for class in GROUP_STATE_CLASSES {
                    doc.remove_class(g, class);
                }
            }
        }

        self.errors.clear();
        debug!(nodes = doc.node_count(), "Cleared feedback");
        self
    }

    /// Show a success banner just before the form
    ///
    /// The message is inserted as text, never as markup.
    pub fn add_message(&mut self, doc: &mut Document, message: &str) -> &mut Self {
        let banner = banner(doc, "alert-success");
        let text = doc.create_text(message);
        doc.append_child(banner, text);
        if doc.insert_before(self.form, banner) {
            self.banners.push(banner);
        } else {
            doc.prepend_child(self.form, banner);
        }
        debug!(message, "Rendered success message");
        self
    }

    /// Decorate the inputs named `field` and record `messages`
    ///
    /// Inline labels go under the parent of every matching input, once per
    /// parent, so a radio group split across wrappers labels each wrapper.
    /// Messages are recorded for the aggregate list even when no input is
    /// named `field` or inline errors are turned off.
    pub fn add_error(&mut self, doc: &mut Document, field: &str, messages: &[String]) -> &mut Self {
        let inputs = doc.select(self.form, &Selector::attr_eq("name", field));
        let group_selector = Selector::class("form-group");

        let mut decorated: Vec<NodeId> = Vec::new();
        for &input in &inputs {
            let Some(group) = doc.closest(input, &group_selector) else {
                continue;
            };
            if decorated.contains(&group) {
                continue;
            }
            decorated.push(group);
            doc.add_class(group, "has-feedback");
            doc.add_class(group, "has-error");
            for control in doc.select(group, &Selector::class("form-control")) {
                let icon = doc.create_element("span");
                doc.add_class(icon, "form-control-feedback");
                doc.set_attr(icon, "aria-hidden", "true");
                doc.set_markup(icon, FEEDBACK_ICON);
                doc.insert_after(control, icon);
            }
        }

        if self.options.show_inline_errors {
            let mut labelled: Vec<NodeId> = Vec::new();
            let parents: Vec<NodeId> = inputs.iter().filter_map(|&input| doc.parent(input)).collect();
            for parent in parents {
                if labelled.contains(&parent) {
                    continue;
                }
                labelled.push(parent);
                for message in messages {
                    let label = doc.create_element("label");
                    doc.add_class(label, "error");
                    doc.set_attr(label, "for", field);
                    let text = doc.create_text(message.as_str());
                    doc.append_child(label, text);
                    doc.append_child(parent, label);
                }
            }
        }

        debug!(
            field,
            count = messages.len(),
            matched = !inputs.is_empty(),
            "Rendered field errors"
        );
        self.errors.extend(messages.iter().cloned());
        self
    }

    /// Render every field of `errors`, then the aggregate list if enabled
    pub fn process_errors(&mut self, doc: &mut Document, errors: &ErrorMap) -> &mut Self {
        for (field, messages) in errors.iter() {
            self.add_error(doc, field, messages);
        }

        if self.options.show_error_list && !self.errors.is_empty() {
            let banner = banner(doc, "alert-danger");
            let list = doc.create_element("ul");
            for message in &self.errors {
                let item = doc.create_element("li");
                let text = doc.create_text(message.as_str());
                doc.append_child(item, text);
                doc.append_child(list, item);
            }
            doc.append_child(banner, list);
            doc.prepend_child(self.form, banner);
            debug!(count = self.errors.len(), "Rendered error list");
        }
        self
    }

    /// Finish a successful submission
    ///
    /// Hides the fields if configured, then either locks the button with the
    /// done label or puts it back the way it was.
    pub fn done(&mut self, doc: &mut Document) -> &mut Self {
        if self.options.hide_form_after_success {
            self.hide(doc);
        }
        if self.options.disable_resubmit {
            self.button
                .rename(doc, &self.options.done_button_label)
                .disable(doc);
        } else {
            self.button.restore(doc).enable(doc);
        }
        self
    }

    /// Re-enable the button after a rejected submission
    ///
    /// Shows the retry label when one is configured, the original otherwise.
    pub fn rearm(&mut self, doc: &mut Document) -> &mut Self {
        let button = match self.options.retry_label() {
            Some(label) => self.button.rename(doc, label),
            None => self.button.restore(doc),
        };
        button.enable(doc);
        self
    }

    /// Put the button into its in-flight state
    pub fn mark_submitting(&mut self, doc: &mut Document) -> &mut Self {
        self.button
            .rename(doc, &self.options.progress_button_label)
            .disable(doc);
        self
    }

    /// Hide every direct child of the form except the one holding the submit control
    pub fn hide(&mut self, doc: &mut Document) -> &mut Self {
        let submit = Selector::attr_eq("type", "submit");
        let children = doc.children(self.form).to_vec();
        for child in children {
            if doc.matches(child, &submit) || doc.has_descendant(child, &submit) {
                continue;
            }
            doc.hide(child);
        }
        self
    }

    /// Hide the closest `.modal` around the form
    ///
    /// Returns `false` when the form is not inside a modal.
    pub fn close_enclosing_modal(&mut self, doc: &mut Document) -> bool {
        let Some(modal) = doc.closest(self.form, &Selector::class("modal")) else {
            return false;
        };
        doc.remove_class(modal, "in");
        doc.remove_class(modal, "show");
        doc.set_attr(modal, "aria-hidden", "true");
        doc.hide(modal);
        debug!("Closed enclosing modal");
        true
    }
}

fn banner(doc: &mut Document, variant: &str) -> NodeId {
    let banner = doc.create_element("div");
    doc.set_attr(banner, "class", format!("messages alert {variant}"));
    doc.set_attr(banner, "role", "alert");
    banner
}
