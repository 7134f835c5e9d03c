//! Form builder API with fluent interface
//!
//! Builds forms in the Bootstrap layout the feedback contract targets: every
//! visible control sits in a `div.form-group` with a `.form-control` element,
//! the anti-forgery token is a hidden `_token` input, and the submit button
//! lives in its own group so it survives `hide()`.

use crate::dom::{Document, NodeId};

use super::field::{FieldKind, FormField, InputType, SelectOption};

/// Default name of the hidden token input
pub const DEFAULT_TOKEN_FIELD: &str = "_token";

/// Builder for constructing forms into a [`Document`]
///
/// # Examples
///
/// ```rust
/// use ajax_validation::dom::Document;
/// use ajax_validation::forms::{FormBuilder, InputType};
///
/// let mut doc = Document::new();
/// let root = doc.root();
/// let form = FormBuilder::new("/contact")
///     .id("contact-form")
///     .csrf_token("abc123")
///     .field("email", InputType::Email)
///         .label("Email Address")
///         .required()
///         .done()
///     .textarea("message")
///         .label("Message")
///         .rows(4)
///         .done()
///     .submit("Send")
///     .mount(&mut doc, root);
///
/// assert_eq!(doc.attr(form, "action"), Some("/contact"));
/// ```
#[derive(Debug, Clone)]
pub struct FormBuilder {
    action: String,
    id: Option<String>,
    class: Option<String>,
    csrf_token: Option<String>,
    token_field: String,
    enctype: Option<String>,
    fields: Vec<FormField>,
    submit_label: Option<String>,
    submit_class: Option<String>,
    custom_attrs: Vec<(String, String)>,
}

impl FormBuilder {
    /// Create a new form builder posting to `action`
    #[must_use]
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            id: None,
            class: None,
            csrf_token: None,
            token_field: DEFAULT_TOKEN_FIELD.to_string(),
            enctype: None,
            fields: Vec::new(),
            submit_label: None,
            submit_class: None,
            custom_attrs: Vec::new(),
        }
    }

    /// Set the form ID
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the form CSS class
    #[must_use]
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    /// Set the anti-forgery token rendered into the hidden token input
    #[must_use]
    pub fn csrf_token(mut self, token: impl Into<String>) -> Self {
        self.csrf_token = Some(token.into());
        self
    }

    /// Rename the hidden token input (defaults to `_token`)
    #[must_use]
    pub fn token_field(mut self, name: impl Into<String>) -> Self {
        self.token_field = name.into();
        self
    }

    /// Enable multipart form data (for file uploads)
    #[must_use]
    pub fn multipart(mut self) -> Self {
        self.enctype = Some("multipart/form-data".into());
        self
    }

    /// Add a custom attribute
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_attrs.push((name.into(), value.into()));
        self
    }

    /// Set the submit button label (markup)
    #[must_use]
    pub fn submit(mut self, label: impl Into<String>) -> Self {
        self.submit_label = Some(label.into());
        self
    }

    /// Set the submit button CSS class (defaults to `btn btn-primary`)
    #[must_use]
    pub fn submit_class(mut self, class: impl Into<String>) -> Self {
        self.submit_class = Some(class.into());
        self
    }

    // =========================================================================
    // Field Builders
    // =========================================================================

    /// Add an input field and return a field builder
    ///
    /// File inputs switch the form to multipart encoding.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, input_type: InputType) -> FieldBuilder {
        if input_type == InputType::File && self.enctype.is_none() {
            self = self.multipart();
        }
        FieldBuilder::new(self, FormField::input(name, input_type))
    }

    /// Add a textarea field and return a field builder
    #[must_use]
    pub fn textarea(self, name: impl Into<String>) -> FieldBuilder {
        FieldBuilder::new(self, FormField::textarea(name))
    }

    /// Add a select field and return a select builder
    #[must_use]
    pub fn select(self, name: impl Into<String>) -> SelectBuilder {
        SelectBuilder {
            form: self,
            field: FormField::select(name),
        }
    }

    /// Add a checkbox field and return a checkbox builder
    #[must_use]
    pub fn checkbox(self, name: impl Into<String>) -> CheckboxBuilder {
        CheckboxBuilder {
            form: self,
            field: FormField::checkbox(name),
        }
    }

    /// Add a hidden field
    #[must_use]
    pub fn hidden(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let mut field = FormField::input(name, InputType::Hidden);
        field.value = Some(value.into());
        self.fields.push(field);
        self
    }

    // =========================================================================
    // Output
    // =========================================================================

    /// Build the form under `parent` and return the `<form>` node
    pub fn mount(self, doc: &mut Document, parent: NodeId) -> NodeId {
        let form = doc.create_element("form");
        doc.set_attr(form, "action", self.action.as_str());
        doc.set_attr(form, "method", "POST");
        if let Some(ref id) = self.id {
            doc.set_attr(form, "id", id.as_str());
        }
        if let Some(ref class) = self.class {
            doc.set_attr(form, "class", class.as_str());
        }
        if let Some(ref enctype) = self.enctype {
            doc.set_attr(form, "enctype", enctype.as_str());
        }
        for (name, value) in &self.custom_attrs {
            doc.set_attr(form, name, value.as_str());
        }
        doc.append_child(parent, form);

        if let Some(ref token) = self.csrf_token {
            let input = hidden_input(doc, &self.token_field, token);
            doc.append_child(form, input);
        }

        for field in &self.fields {
            let node = mount_field(doc, field);
            doc.append_child(form, node);
        }

        if let Some(ref label) = self.submit_label {
            let group = group(doc);
            let button = doc.create_element("button");
            doc.set_attr(button, "type", "submit");
            doc.set_attr(
                button,
                "class",
                self.submit_class.as_deref().unwrap_or("btn btn-primary"),
            );
            doc.set_markup(button, label.as_str());
            doc.append_child(group, button);
            doc.append_child(form, group);
        }

        form
    }

    /// Render the form on its own as HTML
    #[must_use]
    pub fn render(self) -> String {
        let mut doc = Document::new();
        let root = doc.root();
        let form = self.mount(&mut doc, root);
        doc.outer_html(form)
    }
}

fn group(doc: &mut Document) -> NodeId {
    let group = doc.create_element("div");
    doc.add_class(group, "form-group");
    group
}

fn hidden_input(doc: &mut Document, name: &str, value: &str) -> NodeId {
    let input = doc.create_element("input");
    doc.set_attr(input, "type", "hidden");
    doc.set_attr(input, "name", name);
    doc.set_attr(input, "value", value);
    input
}

fn text_element(doc: &mut Document, tag: &str, text: &str) -> NodeId {
    let el = doc.create_element(tag);
    let content = doc.create_text(text);
    doc.append_child(el, content);
    el
}

fn mount_field(doc: &mut Document, field: &FormField) -> NodeId {
    if matches!(field.kind, FieldKind::Input(InputType::Hidden)) {
        return hidden_input(doc, &field.name, field.value.as_deref().unwrap_or_default());
    }

    let wrapper = group(doc);

    if let FieldKind::Checkbox { checked } = field.kind {
        let holder = doc.create_element("div");
        doc.add_class(holder, "checkbox");
        let label = doc.create_element("label");
        let input = doc.create_element("input");
        doc.set_attr(input, "type", "checkbox");
        doc.set_attr(input, "name", field.name.as_str());
        doc.set_attr(input, "id", field.effective_id());
        doc.set_attr(input, "value", field.value.as_deref().unwrap_or("1"));
        if checked {
            doc.set_attr(input, "checked", "");
        }
        apply_flags(doc, input, field);
        doc.append_child(label, input);
        if let Some(ref text) = field.label {
            let text = doc.create_text(format!(" {text}"));
            doc.append_child(label, text);
        }
        doc.append_child(holder, label);
        doc.append_child(wrapper, holder);
        return wrapper;
    }

    if let Some(ref text) = field.label {
        let label = text_element(doc, "label", text);
        doc.set_attr(label, "for", field.effective_id());
        doc.add_class(label, "control-label");
        doc.append_child(wrapper, label);
    }

    let control = match field.kind {
        FieldKind::Input(input_type) => {
            let input = doc.create_element("input");
            doc.set_attr(input, "type", input_type.as_str());
            doc.set_attr(input, "name", field.name.as_str());
            if let Some(ref value) = field.value {
                doc.set_attr(input, "value", value.as_str());
            }
            input
        }
        FieldKind::Textarea { rows } => {
            let textarea = text_element(doc, "textarea", field.value.as_deref().unwrap_or_default());
            doc.set_attr(textarea, "name", field.name.as_str());
            if let Some(rows) = rows {
                doc.set_attr(textarea, "rows", rows.to_string());
            }
            textarea
        }
        FieldKind::Select {
            ref options,
            ref selected,
        } => mount_select(doc, &field.name, options, selected.as_deref()),
        FieldKind::Checkbox { .. } => unreachable!("checkboxes return early"),
    };
    doc.set_attr(control, "id", field.effective_id());
    doc.add_class(control, "form-control");
    if let Some(ref placeholder) = field.placeholder {
        doc.set_attr(control, "placeholder", placeholder.as_str());
    }
    apply_flags(doc, control, field);
    doc.append_child(wrapper, control);

    if let Some(ref help) = field.help_text {
        let help = text_element(doc, "p", help);
        doc.add_class(help, "help-block");
        doc.append_child(wrapper, help);
    }

    wrapper
}

fn mount_select(
    doc: &mut Document,
    name: &str,
    options: &[SelectOption],
    selected: Option<&str>,
) -> NodeId {
    let select = doc.create_element("select");
    doc.set_attr(select, "name", name);
    for option in options {
        let node = text_element(doc, "option", &option.label);
        doc.set_attr(node, "value", option.value.as_str());
        if selected == Some(option.value.as_str()) {
            doc.set_attr(node, "selected", "");
        }
        doc.append_child(select, node);
    }
    select
}

fn apply_flags(doc: &mut Document, control: NodeId, field: &FormField) {
    if field.required {
        doc.set_attr(control, "required", "");
    }
    if field.disabled {
        doc.set_attr(control, "disabled", "");
    }
}

// =============================================================================
// Field Builders
// =============================================================================

/// Builder for input and textarea fields
pub struct FieldBuilder {
    form: FormBuilder,
    field: FormField,
}

impl FieldBuilder {
    const fn new(form: FormBuilder, field: FormField) -> Self {
        Self { form, field }
    }

    /// Set the field label
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.field.label = Some(label.into());
        self
    }

    /// Set placeholder text
    #[must_use]
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.field.placeholder = Some(placeholder.into());
        self
    }

    /// Set the current value
    #[must_use]
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.field.value = Some(value.into());
        self
    }

    /// Mark field as required
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.field.required = true;
        self
    }

    /// Mark field as disabled
    #[must_use]
    pub const fn disabled(mut self) -> Self {
        self.field.disabled = true;
        self
    }

    /// Set the element id (defaults to the name)
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.field.id = Some(id.into());
        self
    }

    /// Set help text
    #[must_use]
    pub fn help(mut self, text: impl Into<String>) -> Self {
        self.field.help_text = Some(text.into());
        self
    }

    /// Set visible rows (textarea only)
    #[must_use]
    pub const fn rows(mut self, rows: u32) -> Self {
        if let FieldKind::Textarea { rows: ref mut r } = self.field.kind {
            *r = Some(rows);
        }
        self
    }

    /// Finish this field and return to the form builder
    #[must_use]
    pub fn done(mut self) -> FormBuilder {
        self.form.fields.push(self.field);
        self.form
    }
}

/// Builder for select fields
pub struct SelectBuilder {
    form: FormBuilder,
    field: FormField,
}

impl SelectBuilder {
    /// Set the field label
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.field.label = Some(label.into());
        self
    }

    /// Add an option
    #[must_use]
    pub fn option(mut self, value: impl Into<String>, label: impl Into<String>) -> Self {
        if let FieldKind::Select {
            ref mut options, ..
        } = self.field.kind
        {
            options.push(SelectOption::new(value, label));
        }
        self
    }

    /// Mark an option as selected
    #[must_use]
    pub fn selected(mut self, value: impl Into<String>) -> Self {
        if let FieldKind::Select {
            ref mut selected, ..
        } = self.field.kind
        {
            *selected = Some(value.into());
        }
        self
    }

    /// Mark field as required
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.field.required = true;
        self
    }

    /// Finish this field and return to the form builder
    #[must_use]
    pub fn done(mut self) -> FormBuilder {
        self.form.fields.push(self.field);
        self.form
    }
}

/// Builder for checkbox fields
pub struct CheckboxBuilder {
    form: FormBuilder,
    field: FormField,
}

impl CheckboxBuilder {
    /// Set the label rendered next to the box
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.field.label = Some(label.into());
        self
    }

    /// Set the submitted value (defaults to `1`)
    #[must_use]
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.field.value = Some(value.into());
        self
    }

    /// Render the box checked
    #[must_use]
    pub const fn checked(mut self) -> Self {
        if let FieldKind::Checkbox { ref mut checked } = self.field.kind {
            *checked = true;
        }
        self
    }

    /// Finish this field and return to the form builder
    #[must_use]
    pub fn done(mut self) -> FormBuilder {
        self.form.fields.push(self.field);
        self.form
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Selector;

    #[test]
    fn test_simple_form() {
        let form = FormBuilder::new("/login")
            .field("email", InputType::Email)
            .label("Email")
            .required()
            .done()
            .field("password", InputType::Password)
            .label("Password")
            .required()
            .done()
            .submit("Login")
            .render();

        assert!(form.contains(r#"action="/login""#));
        assert!(form.contains(r#"method="POST""#));
        assert!(form.contains(r#"type="email""#));
        assert!(form.contains(r#"type="password""#));
        assert!(form.contains(r#"<button type="submit" class="btn btn-primary">Login</button>"#));
    }

    #[test]
    fn test_csrf_injection() {
        let form = FormBuilder::new("/users").csrf_token("test_token_123").render();

        assert!(form.contains(r#"<input type="hidden" name="_token" value="test_token_123">"#));
    }

    #[test]
    fn test_custom_token_field() {
        let form = FormBuilder::new("/users")
            .token_field("csrf")
            .csrf_token("t")
            .render();
        assert!(form.contains(r#"name="csrf""#));
    }

    #[test]
    fn test_bootstrap_group_layout() {
        let mut doc = Document::new();
        let root = doc.root();
        let form = FormBuilder::new("/test")
            .field("name", InputType::Text)
            .label("Full Name")
            .placeholder("Jane Doe")
            .help("As on your passport")
            .done()
            .mount(&mut doc, root);

        let input = doc
            .select_first(form, &Selector::attr_eq("name", "name"))
            .unwrap();
        let group = doc.parent(input).unwrap();
        assert!(doc.has_class(group, "form-group"));
        assert!(doc.has_class(input, "form-control"));
        assert_eq!(doc.attr(input, "placeholder"), Some("Jane Doe"));
        assert_eq!(
            doc.outer_html(group),
            concat!(
                r#"<div class="form-group">"#,
                r#"<label for="name" class="control-label">Full Name</label>"#,
                r#"<input type="text" name="name" id="name" class="form-control" placeholder="Jane Doe">"#,
                r#"<p class="help-block">As on your passport</p>"#,
                "</div>"
            )
        );
    }

    #[test]
    fn test_select_field() {
        let form = FormBuilder::new("/test")
            .select("country")
            .label("Country")
            .option("us", "United States")
            .option("ca", "Canada")
            .selected("ca")
            .done()
            .render();

        assert!(form.contains("<select"));
        assert!(form.contains(r#"<option value="us">United States</option>"#));
        assert!(form.contains(r#"<option value="ca" selected="">Canada</option>"#));
    }

    #[test]
    fn test_textarea_field() {
        let form = FormBuilder::new("/test")
            .textarea("bio")
            .rows(5)
            .value("Hello <world>")
            .done()
            .render();

        assert!(form.contains(r#"rows="5""#));
        assert!(form.contains("Hello &lt;world&gt;</textarea>"));
    }

    #[test]
    fn test_checkbox_field() {
        let form = FormBuilder::new("/test")
            .checkbox("terms")
            .label("I agree")
            .checked()
            .done()
            .render();

        assert!(form.contains(r#"type="checkbox""#));
        assert!(form.contains(r#"checked="""#));
        assert!(form.contains("I agree"));
    }

    #[test]
    fn test_hidden_field_has_no_group() {
        let mut doc = Document::new();
        let root = doc.root();
        let form = FormBuilder::new("/test").hidden("step", "2").mount(&mut doc, root);
        let children = doc.children(form);
        assert_eq!(children.len(), 1);
        assert_eq!(doc.tag(children[0]), Some("input"));
    }

    #[test]
    fn test_file_field_sets_multipart() {
        let form = FormBuilder::new("/upload")
            .field("avatar", InputType::File)
            .done()
            .render();

        assert!(form.contains(r#"enctype="multipart/form-data""#));
        assert!(form.contains(r#"type="file""#));
    }

    #[test]
    fn test_submit_label_is_markup() {
        let form = FormBuilder::new("/test")
            .submit(r#"<i class="fa fa-send"></i> Send"#)
            .submit_class("btn btn-success")
            .render();
        assert!(form.contains(r#"class="btn btn-success"><i class="fa fa-send"></i> Send</button>"#));
    }
}
