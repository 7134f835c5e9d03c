//! Form data collection
//!
//! Gathers the controls a browser would submit for a form and turns them
//! into a multipart body. Values are forwarded exactly as found.

use reqwest::multipart::{Form, Part};

use crate::dom::{Document, FilePart, NodeId, Selector};
use crate::error::AjaxFormError;

/// A single submitted value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue {
    /// Plain text value
    Text(String),
    /// File upload
    File(FilePart),
}

/// The ordered name/value pairs of a form submission
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormPayload {
    entries: Vec<(String, FormValue)>,
}

impl FormPayload {
    /// Create an empty payload
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text value
    pub fn push_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), FormValue::Text(value.into())));
    }

    /// Append a file
    pub fn push_file(&mut self, name: impl Into<String>, file: FilePart) {
        self.entries.push((name.into(), FormValue::File(file)));
    }

    /// Collect the successful controls of `form`
    ///
    /// Named, enabled `input`, `select` and `textarea` elements contribute
    /// in document order. Checkboxes and radios count only when checked,
    /// button-like inputs never do, and a file input without attachments
    /// still sends one empty file part.
    #[must_use]
    pub fn from_form(doc: &Document, form: NodeId) -> Self {
        let controls = Selector::tag("input")
            .or(Selector::tag("select"))
            .or(Selector::tag("textarea"));

        let mut payload = Self::new();
        for control in doc.select(form, &controls) {
            let Some(el) = doc.element(control) else {
                continue;
            };
            let Some(name) = el.attr("name").filter(|n| !n.is_empty()) else {
                continue;
            };
            if el.attr("disabled").is_some() {
                continue;
            }

            match el.tag() {
                "select" => payload.push_select(doc, control, name),
                "textarea" => payload.push_text(name, doc.text_content(control)),
                _ => {
                    let input_type = el.attr("type").unwrap_or("text").to_ascii_lowercase();
                    match input_type.as_str() {
                        "submit" | "button" | "reset" | "image" => {}
                        "checkbox" | "radio" => {
                            if el.attr("checked").is_some() {
                                payload.push_text(name, el.attr("value").unwrap_or("on"));
                            }
                        }
                        "file" => {
                            if el.files().is_empty() {
                                payload.push_file(name, FilePart::empty());
                            }
                            for file in el.files() {
                                payload.push_file(name, file.clone());
                            }
                        }
                        _ => payload.push_text(name, el.attr("value").unwrap_or_default()),
                    }
                }
            }
        }
        payload
    }

    fn push_select(&mut self, doc: &Document, select: NodeId, name: &str) {
        let options = doc.select(select, &Selector::tag("option"));
        let multiple = doc.attr(select, "multiple").is_some();
        let mut chosen: Vec<NodeId> = options
            .iter()
            .copied()
            .filter(|&o| doc.attr(o, "selected").is_some())
            .collect();
        if !multiple {
            chosen.truncate(1);
            if chosen.is_empty() {
                chosen.extend(options.first().copied());
            }
        }
        for option in chosen {
            if doc.attr(option, "disabled").is_some() {
                continue;
            }
            let value = doc
                .attr(option, "value")
                .map_or_else(|| doc.text_content(option), ToString::to_string);
            self.push_text(name, value);
        }
    }

    /// Entries in submission order
    #[must_use]
    pub fn entries(&self) -> &[(String, FormValue)] {
        &self.entries
    }

    /// First text value submitted under `name`
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        self.entries.iter().find_map(|(n, v)| match v {
            FormValue::Text(text) if n == name => Some(text.as_str()),
            _ => None,
        })
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the payload has no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Convert into a `multipart/form-data` body
    ///
    /// # Errors
    ///
    /// Returns [`AjaxFormError::Multipart`] if a file part carries a content
    /// type that is not a valid MIME type.
    pub fn into_multipart(self) -> Result<Form, AjaxFormError> {
        let mut form = Form::new();
        for (name, value) in self.entries {
            form = match value {
                FormValue::Text(text) => form.text(name, text),
                FormValue::File(file) => {
                    let part = Part::bytes(file.bytes)
                        .file_name(file.file_name)
                        .mime_str(&file.content_type)
                        .map_err(|e| AjaxFormError::Multipart(e.to_string()))?;
                    form.part(name, part)
                }
            };
        }
        Ok(form)
    }
}
