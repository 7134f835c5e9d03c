//! Form field types and input configuration

/// HTML input types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputType {
    /// Text input (default)
    #[default]
    Text,
    /// Email input
    Email,
    /// Password input (masked)
    Password,
    /// Number input
    Number,
    /// Telephone input
    Tel,
    /// URL input
    Url,
    /// Date input
    Date,
    /// Hidden input
    Hidden,
    /// File upload
    File,
}

impl InputType {
    /// Get the HTML type attribute value
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Email => "email",
            Self::Password => "password",
            Self::Number => "number",
            Self::Tel => "tel",
            Self::Url => "url",
            Self::Date => "date",
            Self::Hidden => "hidden",
            Self::File => "file",
        }
    }
}

impl std::fmt::Display for InputType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Option for select dropdowns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    /// Value attribute
    pub value: String,
    /// Display text
    pub label: String,
}

impl SelectOption {
    /// Create a new select option
    #[must_use]
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Kind of form field
#[derive(Debug, Clone)]
pub enum FieldKind {
    /// Standard input field
    Input(InputType),
    /// Textarea for multi-line text
    Textarea {
        /// Number of visible text lines
        rows: Option<u32>,
    },
    /// Select dropdown
    Select {
        /// Available options
        options: Vec<SelectOption>,
        /// Value of the selected option
        selected: Option<String>,
    },
    /// Checkbox
    Checkbox {
        /// Whether checkbox is checked
        checked: bool,
    },
}

/// A form field with all its attributes
#[derive(Debug, Clone)]
pub struct FormField {
    /// Field name (submitted as the form data key)
    pub name: String,
    /// Element id, defaults to the name
    pub id: Option<String>,
    /// Label text
    pub label: Option<String>,
    /// Current value
    pub value: Option<String>,
    /// Placeholder text
    pub placeholder: Option<String>,
    /// Help text rendered under the control
    pub help_text: Option<String>,
    /// Whether the field is required
    pub required: bool,
    /// Whether the field is disabled (excluded from submission)
    pub disabled: bool,
    /// Field kind
    pub kind: FieldKind,
}

impl FormField {
    fn with_kind(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            id: None,
            label: None,
            value: None,
            placeholder: None,
            help_text: None,
            required: false,
            disabled: false,
            kind,
        }
    }

    /// Create an input field
    #[must_use]
    pub fn input(name: impl Into<String>, input_type: InputType) -> Self {
        Self::with_kind(name, FieldKind::Input(input_type))
    }

    /// Create a textarea field
    #[must_use]
    pub fn textarea(name: impl Into<String>) -> Self {
        Self::with_kind(name, FieldKind::Textarea { rows: None })
    }

    /// Create a select field
    #[must_use]
    pub fn select(name: impl Into<String>) -> Self {
        Self::with_kind(
            name,
            FieldKind::Select {
                options: Vec::new(),
                selected: None,
            },
        )
    }

    /// Create a checkbox field
    #[must_use]
    pub fn checkbox(name: impl Into<String>) -> Self {
        Self::with_kind(name, FieldKind::Checkbox { checked: false })
    }

    /// The id attribute: explicit id or the field name
    #[must_use]
    pub fn effective_id(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.name)
    }
}
