//! Simple element selectors
//!
//! Built with a typed API rather than parsed from strings, so field names
//! coming back from a server are always compared verbatim. A selector is a
//! list of compound tests (tag, classes, attribute equality); an element
//! matches if any entry matches. Combinators are not supported.

use super::Element;

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttrTest {
    name: String,
    value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrTest>,
}

impl Compound {
    fn matches(&self, element: &Element) -> bool {
        if let Some(ref tag) = self.tag {
            if !element.tag().eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        self.classes.iter().all(|class| element.has_class(class))
            && self
                .attrs
                .iter()
                .all(|test| element.attr(&test.name) == Some(test.value.as_str()))
    }
}

/// A list of compound selectors; an element matches if any entry matches
///
/// # Examples
///
/// ```rust
/// use ajax_validation::dom::{Document, Selector};
///
/// let mut doc = Document::new();
/// let label = doc.create_element("label");
/// doc.add_class(label, "error");
///
/// let inline_error = Selector::tag("label").and_class("error");
/// assert!(doc.matches(label, &inline_error));
/// assert!(!doc.matches(label, &Selector::tag("input").or(Selector::tag("select"))));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    alternatives: Vec<Compound>,
}

impl Selector {
    /// Match elements by tag name
    #[must_use]
    pub fn tag(tag: impl Into<String>) -> Self {
        Self::single(Compound {
            tag: Some(tag.into().to_ascii_lowercase()),
            ..Compound::default()
        })
    }

    /// Match elements carrying a class
    #[must_use]
    pub fn class(class: impl Into<String>) -> Self {
        Self::single(Compound {
            classes: vec![class.into()],
            ..Compound::default()
        })
    }

    /// Match elements with an attribute equal to `value`
    ///
    /// The value is compared verbatim, so field names such as `items[]`
    /// need no quoting.
    #[must_use]
    pub fn attr_eq(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::single(Compound {
            attrs: vec![AttrTest {
                name: name.into(),
                value: value.into(),
            }],
            ..Compound::default()
        })
    }

    /// Add a class requirement to every alternative
    #[must_use]
    pub fn and_class(mut self, class: impl Into<String>) -> Self {
        let class = class.into();
        for alt in &mut self.alternatives {
            alt.classes.push(class.clone());
        }
        self
    }

    /// Combine two selectors into a list
    #[must_use]
    pub fn or(mut self, other: Self) -> Self {
        self.alternatives.extend(other.alternatives);
        self
    }

    /// Check an element against the selector
    #[must_use]
    pub fn matches(&self, element: &Element) -> bool {
        self.alternatives.iter().any(|alt| alt.matches(element))
    }

    fn single(compound: Compound) -> Self {
        Self {
            alternatives: vec![compound],
        }
    }
}
