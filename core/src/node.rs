//! The node tree consumed by renderers.

use alloc::{borrow::Cow, rc::Rc, string::String, vec::Vec};
use core::fmt::{self, Debug};

use serde_json::Value;

use crate::{ComponentRef, NodeId, Props};

/// Prop that makes an element render raw, unescaped inner HTML.
pub const RAW_HTML_PROP: &str = "dangerouslySetInnerHTML";

/// One unit of the input tree.
///
/// Element and component nodes are reference counted: cloning them shares the
/// node and its [`NodeId`].
#[derive(Debug, Clone, Default)]
pub enum Node {
    /// Renders nothing.
    #[default]
    Empty,
    /// Escaped text.
    Text(String),
    /// A number, rendered in its canonical decimal form.
    Number(f64),
    /// A sequence of nodes, possibly nested.
    List(Vec<Node>),
    /// A tag with attributes and children.
    Element(Rc<Element>),
    /// A node rendered by a component.
    Component(Rc<ComponentRef>),
    /// A dynamically typed value that matched no node shape.
    Foreign(Value),
}

impl Node {
    /// A text leaf.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// A list of nodes.
    pub fn list<N: Into<Self>>(nodes: impl IntoIterator<Item = N>) -> Self {
        Self::List(nodes.into_iter().map(Into::into).collect())
    }

    /// Returns `true` if this node renders nothing without inspecting children.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Identity of element and component nodes.
    #[must_use]
    pub fn id(&self) -> Option<NodeId> {
        match self {
            Self::Element(element) => Some(element.id()),
            Self::Component(component) => Some(component.id()),
            _ => None,
        }
    }

    /// Returns `true` if both nodes are the same element or component.
    #[must_use]
    pub fn same(&self, other: &Self) -> bool {
        matches!((self.id(), other.id()), (Some(a), Some(b)) if a == b)
    }

    /// Short description of the node's shape, used in diagnostics.
    #[must_use]
    pub fn descriptor(&self) -> Cow<'_, str> {
        match self {
            Self::Empty => Cow::Borrowed("empty"),
            Self::Text(_) => Cow::Borrowed("text"),
            Self::Number(_) => Cow::Borrowed("number"),
            Self::List(nodes) => Cow::Owned(format!("list of {}", nodes.len())),
            Self::Element(element) => Cow::Owned(format!("<{}>", element.tag())),
            Self::Component(component) => Cow::Owned(format!("component {}", component.name())),
            Self::Foreign(value) => Cow::Owned(describe_value(value)),
        }
    }
}

pub(crate) fn describe_value(value: &Value) -> String {
    const MAX: usize = 64;

    let kind = match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };
    let mut shown = value.to_string();
    if shown.len() > MAX {
        let mut cut = MAX;
        while !shown.is_char_boundary(cut) {
            cut -= 1;
        }
        shown.truncate(cut);
        shown.push('…');
    }
    format!("{kind} {shown}")
}

impl From<()> for Node {
    fn from((): ()) -> Self {
        Self::Empty
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Cow<'_, str>> for Node {
    fn from(value: Cow<'_, str>) -> Self {
        Self::Text(value.into_owned())
    }
}

macro_rules! impl_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Node {
                #[allow(
                    clippy::cast_precision_loss,
                    clippy::cast_lossless,
                    clippy::unnecessary_cast
                )]
                fn from(value: $ty) -> Self {
                    Self::Number(value as f64)
                }
            }
        )*
    };
}

impl_from_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl From<bool> for Node {
    /// `false` renders nothing; `true` is not a renderable shape.
    fn from(value: bool) -> Self {
        if value {
            Self::Foreign(Value::Bool(true))
        } else {
            Self::Empty
        }
    }
}

impl<T: Into<Self>> From<Option<T>> for Node {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Empty, Into::into)
    }
}

impl<T: Into<Self>> From<Vec<T>> for Node {
    fn from(value: Vec<T>) -> Self {
        Self::list(value)
    }
}

impl From<Element> for Node {
    fn from(value: Element) -> Self {
        Self::Element(Rc::new(value))
    }
}

impl From<ComponentRef> for Node {
    fn from(value: ComponentRef) -> Self {
        Self::Component(Rc::new(value))
    }
}

/// A tag with props and children.
pub struct Element {
    id: NodeId,
    tag: String,
    props: Props,
    children: Vec<Node>,
}

impl Element {
    /// Creates an element with no props and no children.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            id: NodeId::next(),
            tag: tag.into(),
            props: Props::new(),
            children: Vec::new(),
        }
    }

    /// Replaces the props.
    #[must_use]
    pub fn with_props(mut self, props: Props) -> Self {
        self.props = props;
        self
    }

    /// Adds a single prop.
    #[must_use]
    pub fn prop(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.props.insert(key, value);
        self
    }

    /// Appends a child.
    #[must_use]
    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Appends several children.
    #[must_use]
    pub fn children<N: Into<Node>>(mut self, children: impl IntoIterator<Item = N>) -> Self {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    /// Sets raw inner HTML. Children are not rendered while it is present.
    #[must_use]
    pub fn inner_html(self, html: impl Into<String>) -> Self {
        self.prop(RAW_HTML_PROP, serde_json::json!({ "__html": html.into() }))
    }

    /// Identity of this node.
    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    /// Tag name.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Props, serialized as attributes.
    #[must_use]
    pub const fn props(&self) -> &Props {
        &self.props
    }

    /// Child nodes.
    #[must_use]
    pub fn child_nodes(&self) -> &[Node] {
        &self.children
    }

    /// Raw inner HTML stored under `prop`, if any.
    ///
    /// Accepts either a string or an object with an `__html` string.
    #[must_use]
    pub fn raw_html(&self, prop: &str) -> Option<&str> {
        match self.props.get(prop)? {
            Value::String(html) => Some(html),
            Value::Object(object) => object.get("__html").and_then(Value::as_str),
            _ => None,
        }
    }
}

impl Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("id", &self.id)
            .field("tag", &self.tag)
            .field("props", &self.props)
            .field("children", &self.children)
            .finish()
    }
}

/// Shorthand for [`Element::new`].
pub fn element(tag: impl Into<String>) -> Element {
    Element::new(tag)
}
