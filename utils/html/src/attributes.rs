//! Serialization of a props map into an HTML attribute list.
//!
//! Rules applied per prop, in declaration order:
//!
//! - `children` and the configured raw-HTML prop are never attributes.
//! - `className` becomes `class`, `htmlFor` becomes `for`.
//! - `null` and `false` omit the attribute; `true` emits it bare.
//! - strings and numbers emit `name="value"` with the value escaped.
//! - a `style` object is flattened into a CSS declaration list.
//! - arrays and any other object are omitted.

use core::fmt::Write as _;

use serde_json::{Map, Number, Value};

use crate::escape::escape_attribute;

/// Options controlling [`serialize_attributes`].
#[derive(Debug, Clone, Copy)]
pub struct AttributeOptions<'a> {
    /// Prop holding raw inner HTML, excluded from the attribute list.
    pub raw_html_prop: &'a str,
}

impl Default for AttributeOptions<'_> {
    fn default() -> Self {
        Self {
            raw_html_prop: "dangerouslySetInnerHTML",
        }
    }
}

/// Serializes `props` into an attribute list.
///
/// Every emitted attribute is prefixed with a single space, so the result can
/// be appended directly after the tag name. Returns an empty string when no
/// prop produces an attribute.
#[must_use]
pub fn serialize_attributes(props: &Map<String, Value>, options: &AttributeOptions<'_>) -> String {
    let mut out = String::new();

    for (key, value) in props {
        if key == "children" || key == options.raw_html_prop {
            continue;
        }
        if !is_valid_attribute_name(key) {
            continue;
        }
        let name = attribute_name(key);

        match value {
            Value::Null | Value::Bool(false) => {}
            Value::Bool(true) => {
                out.push(' ');
                out.push_str(name);
            }
            Value::String(text) => push_pair(&mut out, name, text),
            Value::Number(number) => push_pair(&mut out, name, &number_text(number)),
            Value::Object(declarations) if name == "style" => {
                let css = style_declarations(declarations);
                if !css.is_empty() {
                    push_pair(&mut out, name, &css);
                }
            }
            Value::Array(_) | Value::Object(_) => {}
        }
    }

    out
}

/// Maps a prop name onto the attribute it serializes as.
#[must_use]
pub fn attribute_name(prop: &str) -> &str {
    match prop {
        "className" => "class",
        "htmlFor" => "for",
        other => other,
    }
}

/// Returns `true` if `name` can be emitted as an attribute name.
#[must_use]
pub fn is_valid_attribute_name(name: &str) -> bool {
    !name.is_empty()
        && !name.chars().any(|c| {
            c.is_whitespace() || c.is_control() || matches!(c, '"' | '\'' | '>' | '/' | '=' | '<')
        })
}

fn push_pair(out: &mut String, name: &str, value: &str) {
    let _ = write!(out, " {name}=\"{}\"", escape_attribute(value));
}

fn number_text(number: &Number) -> String {
    if let Some(int) = number.as_i64() {
        int.to_string()
    } else if let Some(uint) = number.as_u64() {
        uint.to_string()
    } else {
        number.as_f64().map_or_else(String::new, format_number)
    }
}

fn style_declarations(declarations: &Map<String, Value>) -> String {
    let mut css = String::new();
    for (property, value) in declarations {
        let value = match value {
            Value::String(text) if !text.is_empty() => text.clone(),
            Value::Number(number) => number_text(number),
            _ => continue,
        };
        if !css.is_empty() {
            css.push(';');
        }
        css.push_str(&css_property_name(property));
        css.push(':');
        css.push_str(&value);
    }
    css
}

fn css_property_name(property: &str) -> String {
    if property.starts_with("--") {
        return property.to_owned();
    }

    let mut name = String::with_capacity(property.len() + 4);
    if property.starts_with("ms") && property[2..].starts_with(|c: char| c.is_ascii_uppercase()) {
        name.push('-');
    }
    for c in property.chars() {
        if c.is_ascii_uppercase() {
            name.push('-');
            name.push(c.to_ascii_lowercase());
        } else {
            name.push(c);
        }
    }
    name
}

/// Formats a number the way a browser stringifies it.
///
/// Integral values print without a fraction, `-0` prints as `0`, and
/// non-finite values print as `NaN`, `Infinity` and `-Infinity`. Very large
/// and very small magnitudes use exponent notation with an explicit sign.
#[must_use]
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_owned();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_owned();
    }
    if value == 0.0 {
        return "0".to_owned();
    }

    let magnitude = value.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return value.to_string();
    }

    let exponent = format!("{value:e}");
    match exponent.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
        _ => exponent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn attrs(value: Value) -> String {
        let Value::Object(map) = value else {
            panic!("expected an object");
        };
        serialize_attributes(&map, &AttributeOptions::default())
    }

    #[test]
    fn test_strings_and_numbers() {
        assert_eq!(
            attrs(json!({ "id": "main", "tabIndex": 2, "width": 1.5 })),
            r#" id="main" tabIndex="2" width="1.5""#
        );
    }

    #[test]
    fn test_renamed_props() {
        assert_eq!(
            attrs(json!({ "className": "a b", "htmlFor": "field" })),
            r#" class="a b" for="field""#
        );
    }

    #[test]
    fn test_booleans_and_null() {
        assert_eq!(
            attrs(json!({ "disabled": true, "hidden": false, "title": null })),
            " disabled"
        );
    }

    #[test]
    fn test_excluded_props() {
        assert_eq!(
            attrs(json!({
                "children": "ignored",
                "dangerouslySetInnerHTML": { "__html": "<b>x</b>" },
                "lang": "en"
            })),
            r#" lang="en""#
        );
    }

    #[test]
    fn test_values_are_escaped() {
        assert_eq!(
            attrs(json!({ "title": "\"quoted\" & <tagged>" })),
            r#" title="&quot;quoted&quot; &amp; &lt;tagged&gt;""#
        );
    }

    #[test]
    fn test_style_object() {
        assert_eq!(
            attrs(json!({
                "style": { "fontSize": "12px", "marginTop": 4, "color": "", "--accent": "red" }
            })),
            r#" style="font-size:12px;margin-top:4;--accent:red""#
        );
    }

    #[test]
    fn test_vendor_prefixed_style() {
        assert_eq!(css_property_name("WebkitTransition"), "-webkit-transition");
        assert_eq!(css_property_name("msTransform"), "-ms-transform");
    }

    #[test]
    fn test_invalid_names_and_structured_values_skipped() {
        assert_eq!(
            attrs(json!({ "on click": "x", "a\"b": "y", "data": [1, 2], "meta": { "a": 1 } })),
            ""
        );
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(42.0), "42");
        assert_eq!(format_number(-3.25), "-3.25");
        assert_eq!(format_number(0.1), "0.1");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(f64::INFINITY), "Infinity");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(1.5e-7), "1.5e-7");
    }
}
