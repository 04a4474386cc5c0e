/// Elements that never have content and never take a closing tag.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Returns `true` if `tag` names a void element (ASCII case-insensitive).
#[must_use]
pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS
        .iter()
        .any(|void| void.eq_ignore_ascii_case(tag))
}

/// Returns `true` if `tag` can be written as an element name.
///
/// The first character must be an ASCII letter; the rest may be ASCII
/// alphanumerics, `-`, `_`, `.` or `:`.
#[must_use]
pub fn is_valid_tag_name(tag: &str) -> bool {
    let mut chars = tag.chars();
    chars.next().is_some_and(|first| first.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_void_elements() {
        assert!(is_void_element("br"));
        assert!(is_void_element("IMG"));
        assert!(!is_void_element("div"));
        assert!(!is_void_element("brr"));
    }

    #[test]
    fn test_tag_names() {
        assert!(is_valid_tag_name("div"));
        assert!(is_valid_tag_name("my-widget"));
        assert!(is_valid_tag_name("svg:rect"));
        assert!(!is_valid_tag_name(""));
        assert!(!is_valid_tag_name("1div"));
        assert!(!is_valid_tag_name("div onclick"));
        assert!(!is_valid_tag_name("a>"));
    }
}
