//! Submit button state

use crate::dom::{Document, NodeId, Selector};

/// The form's submit control and the label it started with
///
/// Every operation returns the button so calls chain:
/// `button.rename(doc, "Saving…").disable(doc)`. A form without a submit
/// control yields a button whose operations do nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitButton {
    node: Option<NodeId>,
    initial_label: String,
}

impl SubmitButton {
    /// Find the first `[type=submit]` control in `form` and capture its label
    #[must_use]
    pub fn locate(doc: &Document, form: NodeId) -> Self {
        let node = doc.select_first(form, &Selector::attr_eq("type", "submit"));
        let initial_label = node.map(|n| Self::read_label(doc, n)).unwrap_or_default();
        Self {
            node,
            initial_label,
        }
    }

    /// The control, if the form has one
    #[must_use]
    pub const fn node(&self) -> Option<NodeId> {
        self.node
    }

    /// Label captured when the button was located
    #[must_use]
    pub fn initial_label(&self) -> &str {
        &self.initial_label
    }

    /// Label currently displayed
    #[must_use]
    pub fn label(&self, doc: &Document) -> String {
        self.node
            .map(|n| Self::read_label(doc, n))
            .unwrap_or_default()
    }

    /// Whether the control is disabled
    #[must_use]
    pub fn is_disabled(&self, doc: &Document) -> bool {
        self.node.is_some_and(|n| doc.attr(n, "disabled").is_some())
    }

    /// Allow clicks again
    pub fn enable(&self, doc: &mut Document) -> &Self {
        if let Some(node) = self.node {
            doc.remove_attr(node, "disabled");
        }
        self
    }

    /// Block clicks
    pub fn disable(&self, doc: &mut Document) -> &Self {
        if let Some(node) = self.node {
            doc.set_attr(node, "disabled", "");
        }
        self
    }

    /// Put the captured label back
    pub fn restore(&self, doc: &mut Document) -> &Self {
        if let Some(node) = self.node {
            Self::write_label(doc, node, &self.initial_label);
        }
        self
    }

    /// Set the `value` attribute and the displayed content to `markup`
    pub fn rename(&self, doc: &mut Document, markup: &str) -> &Self {
        if let Some(node) = self.node {
            doc.set_attr(node, "value", markup);
            if !Self::is_input(doc, node) {
                doc.set_markup(node, markup);
            }
        }
        self
    }

    fn is_input(doc: &Document, node: NodeId) -> bool {
        doc.tag(node) == Some("input")
    }

    // <input type="submit"> shows its value attribute, buttons show their content
    fn read_label(doc: &Document, node: NodeId) -> String {
        if Self::is_input(doc, node) {
            doc.attr(node, "value").unwrap_or_default().to_string()
        } else {
            doc.inner_html(node)
        }
    }

    fn write_label(doc: &mut Document, node: NodeId, label: &str) {
        if Self::is_input(doc, node) {
            doc.set_attr(node, "value", label);
        } else {
            doc.set_markup(node, label);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::FormBuilder;

    fn form_with_button(label: &str) -> (Document, NodeId) {
        let mut doc = Document::new();
        let root = doc.root();
        let form = FormBuilder::new("/x").submit(label).mount(&mut doc, root);
        (doc, form)
    }

    #[test]
    fn test_captures_initial_label() {
        let (doc, form) = form_with_button(r#"<i class="fa fa-send"></i> Send"#);
        let button = SubmitButton::locate(&doc, form);
        assert!(button.node().is_some());
        assert_eq!(button.initial_label(), r#"<i class="fa fa-send"></i> Send"#);
    }

    #[test]
    fn test_rename_disable_restore_enable_chain() {
        let (mut doc, form) = form_with_button("Send");
        let button = SubmitButton::locate(&doc, form);

        button.rename(&mut doc, "Sending").disable(&mut doc);
        assert_eq!(button.label(&doc), "Sending");
        assert!(button.is_disabled(&doc));
        let node = button.node().unwrap();
        assert_eq!(doc.attr(node, "value"), Some("Sending"));

        button.restore(&mut doc).enable(&mut doc);
        assert_eq!(button.label(&doc), "Send");
        assert!(!button.is_disabled(&doc));
        assert_eq!(button.initial_label(), "Send");
    }

    #[test]
    fn test_input_submit_uses_value() {
        let mut doc = Document::new();
        let form = doc.create_element("form");
        let root = doc.root();
        doc.append_child(root, form);
        let input = doc.create_element("input");
        doc.set_attr(input, "type", "submit");
        doc.set_attr(input, "value", "Go");
        doc.append_child(form, input);

        let button = SubmitButton::locate(&doc, form);
        assert_eq!(button.initial_label(), "Go");
        button.rename(&mut doc, "Going");
        assert_eq!(button.label(&doc), "Going");
        assert!(doc.children(input).is_empty());
        button.restore(&mut doc);
        assert_eq!(button.label(&doc), "Go");
    }

    #[test]
    fn test_missing_button_is_inert() {
        let mut doc = Document::new();
        let form = doc.create_element("form");
        let button = SubmitButton::locate(&doc, form);
        assert_eq!(button.node(), None);
        button.rename(&mut doc, "x").disable(&mut doc).enable(&mut doc);
        assert_eq!(button.label(&doc), "");
        assert!(!button.is_disabled(&doc));
    }
}
