//! Server-supplied validation errors
//!
//! An [`ErrorMap`] is what a rejected submission hands back: field name to an
//! ordered list of messages. Field order follows the response body and is
//! the order feedback is rendered in.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Validation errors keyed by field name
///
/// # Examples
///
/// ```rust
/// use ajax_validation::forms::ErrorMap;
///
/// let mut errors = ErrorMap::new();
/// errors.add("email", "is required");
/// errors.add("email", "must be a valid email address");
/// errors.add("password", "must be at least 8 characters");
///
/// assert!(errors.has_errors());
/// assert_eq!(errors.for_field("email").len(), 2);
/// assert_eq!(errors.count(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorMap {
    errors: IndexMap<String, Vec<String>>,
}

impl ErrorMap {
    /// Create an empty error map
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message to a field
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    /// Builder-style [`ErrorMap::add`]
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.add(field, message);
        self
    }

    /// Whether any field has errors
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Whether a specific field has errors
    #[must_use]
    pub fn has_field_error(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    /// Messages for one field, in order
    #[must_use]
    pub fn for_field(&self, field: &str) -> &[String] {
        self.errors.get(field).map_or(&[], Vec::as_slice)
    }

    /// Field names in map order
    #[must_use]
    pub fn fields(&self) -> Vec<&str> {
        self.errors.keys().map(String::as_str).collect()
    }

    /// Total number of messages
    #[must_use]
    pub fn count(&self) -> usize {
        self.errors.values().map(Vec::len).sum()
    }

    /// Remove all errors
    pub fn clear(&mut self) {
        self.errors.clear();
    }

    /// Append another map's messages, keeping this map's field order first
    pub fn merge(&mut self, other: &Self) {
        for (field, messages) in &other.errors {
            self.errors
                .entry(field.clone())
                .or_default()
                .extend(messages.iter().cloned());
        }
    }

    /// Iterate fields and their messages in map order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.errors
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Decode a failure response body leniently
    ///
    /// Accepts the flat `{"field": ["message", …]}` shape as well as the
    /// `{"message": "…", "errors": {…}}` envelope newer Laravel versions
    /// send. A bare string is taken as a single message, other non-array
    /// values are skipped, and anything that is not an object yields an
    /// empty map.
    #[must_use]
    pub fn from_response_body(body: Option<&Value>) -> Self {
        let Some(Value::Object(object)) = body else {
            return Self::new();
        };
        let fields = match object.get("errors") {
            Some(Value::Object(nested)) => nested,
            _ => object,
        };

        let mut map = Self::new();
        for (field, value) in fields {
            match value {
                Value::Array(items) => {
                    for item in items {
                        match item {
                            Value::String(message) => map.add(field.clone(), message.clone()),
                            other => map.add(field.clone(), other.to_string()),
                        }
                    }
                }
                Value::String(message) => map.add(field.clone(), message.clone()),
                _ => {}
            }
        }
        map
    }
}

impl<K, V> FromIterator<(K, V)> for ErrorMap
where
    K: Into<String>,
    V: IntoIterator,
    V::Item: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (field, messages) in iter {
            let field = field.into();
            for message in messages {
                map.add(field.clone(), message);
            }
        }
        map
    }
}

/// Convert from validator crate's `ValidationErrors`
///
/// Lets a Rust backend answer with exactly the payload shape the form
/// controller renders. Fields are sorted by name since the source map is
/// unordered.
impl From<validator::ValidationErrors> for ErrorMap {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let mut result = Self::new();
        for (field, field_errors) in fields {
            for error in field_errors {
                let message = error
                    .message
                    .as_ref()
                    .map_or_else(|| error.code.to_string(), ToString::to_string);
                result.add(field.to_string(), message);
            }
        }
        result
    }
}
