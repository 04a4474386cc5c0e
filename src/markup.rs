//! Markup collaborator: escaping text and serializing attributes.

use alloc::borrow::Cow;
use core::fmt::Debug;

use pour_core::{Props, RAW_HTML_PROP};
use pour_html::AttributeOptions;

use crate::Sequence;

/// Turns text and props into markup.
///
/// Injected into the [`Renderer`](crate::Renderer); [`HtmlMarkup`] is the default.
pub trait Markup: Debug {
    /// Escapes markup-significant characters in a text leaf.
    fn escape_text<'a>(&self, text: &'a str) -> Cow<'a, str>;

    /// Appends the serialized attribute list of `props` to `sequence`.
    ///
    /// Must skip the `children` prop and the raw inner HTML prop.
    fn serialize_attributes(&self, props: &Props, sequence: &mut Sequence<'_>);
}

/// HTML escaping and attribute rules from [`pour_html`].
#[derive(Debug, Clone)]
pub struct HtmlMarkup {
    raw_html_prop: String,
}

impl Default for HtmlMarkup {
    fn default() -> Self {
        Self::new()
    }
}

impl HtmlMarkup {
    /// Creates the markup collaborator with the default raw HTML prop.
    #[must_use]
    pub fn new() -> Self {
        Self {
            raw_html_prop: RAW_HTML_PROP.to_owned(),
        }
    }

    /// Excludes `prop` instead of the default raw HTML prop from attributes.
    #[must_use]
    pub fn with_raw_html_prop(mut self, prop: impl Into<String>) -> Self {
        self.raw_html_prop = prop.into();
        self
    }
}

impl Markup for HtmlMarkup {
    fn escape_text<'a>(&self, text: &'a str) -> Cow<'a, str> {
        pour_html::escape_text(text)
    }

    fn serialize_attributes(&self, props: &Props, sequence: &mut Sequence<'_>) {
        if props.is_empty() {
            return;
        }
        let options = AttributeOptions {
            raw_html_prop: &self.raw_html_prop,
        };
        sequence.push_str(pour_html::serialize_attributes(props.as_map(), &options));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pour_core::json;

    #[test]
    fn test_custom_raw_html_prop_is_excluded() {
        let markup = HtmlMarkup::new().with_raw_html_prop("html");
        let props = Props::new()
            .with("html", "<b>raw</b>")
            .with(RAW_HTML_PROP, json!({ "__html": "kept" }))
            .with("id", "x");

        let mut sequence = Sequence::new();
        markup.serialize_attributes(&props, &mut sequence);
        assert_eq!(sequence.realize().unwrap(), r#" id="x""#);
    }
}
