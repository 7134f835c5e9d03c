//! Form building, payload collection and server error maps
//!
//! - [`FormBuilder`] mounts a Bootstrap-style form into a [`Document`]
//! - [`FormPayload`] collects what a browser would submit for it
//! - [`ErrorMap`] is the field → messages payload of a rejected submission
//!
//! # Quick Start
//!
//! ```rust
//! use ajax_validation::dom::Document;
//! use ajax_validation::forms::{FormBuilder, FormPayload, InputType};
//!
//! let mut doc = Document::new();
//! let root = doc.root();
//! let form = FormBuilder::new("/users")
//!     .csrf_token("abc123")
//!     .field("email", InputType::Email)
//!         .label("Email Address")
//!         .value("jane@example.com")
//!         .done()
//!     .submit("Sign Up")
//!     .mount(&mut doc, root);
//!
//! let payload = FormPayload::from_form(&doc, form);
//! assert_eq!(payload.text("email"), Some("jane@example.com"));
//! ```
//!
//! [`Document`]: crate::dom::Document

mod builder;
mod error;
mod field;
mod payload;

pub use builder::{CheckboxBuilder, FieldBuilder, FormBuilder, SelectBuilder, DEFAULT_TOKEN_FIELD};
pub use error::ErrorMap;
pub use field::{FieldKind, FormField, InputType, SelectOption};
pub use payload::{FormPayload, FormValue};
