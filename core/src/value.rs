//! Decoding node trees from untyped JSON.
//!
//! Shapes recognized by [`Node::from_value`]:
//!
//! | JSON | Node |
//! |---|---|
//! | `null`, `false` | [`Node::Empty`] |
//! | string | [`Node::Text`] |
//! | number | [`Node::Number`] |
//! | array | [`Node::List`] |
//! | `{ "tag": "div", "props": {..}, "children": .. }` | [`Node::Element`] |
//!
//! Anything else (`true`, objects without a string `tag`) becomes
//! [`Node::Foreign`] and fails when rendered.

use serde_json::Value;

use crate::{Element, Node, Props};

impl Node {
    /// Converts a JSON value into a node tree.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Null | Value::Bool(false) => Self::Empty,
            Value::String(text) => Self::Text(text),
            Value::Number(number) => number
                .as_f64()
                .map_or_else(|| Self::Foreign(Value::Number(number)), Self::Number),
            Value::Array(items) => Self::List(items.into_iter().map(Self::from_value).collect()),
            Value::Object(mut object) => {
                let Some(tag) = object.get("tag").and_then(Value::as_str).map(str::to_owned) else {
                    return Self::Foreign(Value::Object(object));
                };
                let props = match object.remove("props") {
                    Some(Value::Object(props)) => Props::from(props),
                    _ => Props::new(),
                };
                let children = object.remove("children").map(Self::from_value);
                let element = Element::new(tag).with_props(props);
                match children {
                    Some(Self::List(children)) => element.children(children),
                    Some(child) => element.child(child),
                    None => element,
                }
                .into()
            }
            other @ Value::Bool(true) => Self::Foreign(other),
        }
    }
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        Self::from_value(value)
    }
}
