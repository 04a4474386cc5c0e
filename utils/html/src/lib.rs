//! # Pour HTML Utilities
//!
//! Pure helpers shared by the Pour renderer: escaping of text content and
//! attribute values, serialization of a props map into an attribute list, and
//! the table of void elements.
//!
//! None of these functions allocate when their input needs no rewriting:
//!
//! ```
//! use std::borrow::Cow;
//! use pour_html::escape_text;
//!
//! assert!(matches!(escape_text("plain"), Cow::Borrowed("plain")));
//! assert_eq!(escape_text("a < b"), "a &lt; b");
//! ```

mod attributes;
mod escape;
mod tags;

pub use attributes::{
    AttributeOptions, attribute_name, format_number, is_valid_attribute_name, serialize_attributes,
};
pub use escape::{escape_attribute, escape_text};
pub use tags::{VOID_ELEMENTS, is_valid_tag_name, is_void_element};
