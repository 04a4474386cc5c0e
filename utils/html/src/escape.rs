//! Escaping of markup-significant characters.

use std::borrow::Cow;

const fn replacement(byte: u8) -> Option<&'static str> {
    match byte {
        b'&' => Some("&amp;"),
        b'<' => Some("&lt;"),
        b'>' => Some("&gt;"),
        b'"' => Some("&quot;"),
        b'\'' => Some("&#x27;"),
        _ => None,
    }
}

/// Escapes `&`, `<`, `>`, `"` and `'` in a text leaf.
///
/// Returns the input unchanged (borrowed) when it contains none of them.
#[must_use]
pub fn escape_text(text: &str) -> Cow<'_, str> {
    let bytes = text.as_bytes();
    let Some(first) = bytes.iter().position(|&b| replacement(b).is_some()) else {
        return Cow::Borrowed(text);
    };

    let mut escaped = String::with_capacity(text.len() + 8);
    escaped.push_str(&text[..first]);

    let mut last = first;
    for (index, &byte) in bytes.iter().enumerate().skip(first) {
        if let Some(entity) = replacement(byte) {
            escaped.push_str(&text[last..index]);
            escaped.push_str(entity);
            last = index + 1;
        }
    }
    escaped.push_str(&text[last..]);

    Cow::Owned(escaped)
}

/// Escapes an attribute value.
///
/// Attribute values are always emitted double-quoted, so the same character
/// set as [`escape_text`] is sufficient.
#[must_use]
pub fn escape_attribute(value: &str) -> Cow<'_, str> {
    escape_text(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_borrowed() {
        assert!(matches!(escape_text("hello world"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_all_significant_characters() {
        assert_eq!(
            escape_text(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#x27;Jerry&#x27;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_multibyte_text_is_preserved() {
        assert_eq!(escape_text("café <b>"), "café &lt;b&gt;");
        assert_eq!(escape_text("日本語&"), "日本語&amp;");
    }

    #[test]
    fn test_already_escaped_text_is_escaped_again() {
        assert_eq!(escape_text("&amp;"), "&amp;amp;");
    }
}
