//! # Pour Core
//!
//! The data model shared by the Pour renderer and the code that builds trees
//! for it: [`Node`] trees made of text, numbers, [`Element`]s and
//! [`ComponentRef`]s, the [`Props`] they carry, the [`Context`] flowing down
//! the tree, and the [`Component`] trait implemented by stateful components.
//!
//! ```
//! use pour_core::{ComponentRef, Node, element};
//!
//! let badge = ComponentRef::function("Badge", |scope| {
//!     let label = scope.props().get_str("label").unwrap_or_default().to_owned();
//!     Ok(element("span").prop("className", "badge").child(label).into())
//! })
//! .prop("label", "new");
//!
//! let tree: Node = element("p").child("Status: ").child(badge).into();
//! assert!(tree.id().is_some());
//! ```

extern crate alloc;

pub mod component;
pub mod context;
pub mod id;
pub mod node;
pub mod props;
mod value;

pub use component::{
    Component, ComponentKind, ComponentRef, Lifecycle, Scope, State, StateSetter, StateSlot,
};
pub use context::Context;
pub use id::NodeId;
pub use node::{Element, Node, RAW_HTML_PROP, element};
pub use props::Props;

/// Error raised by component code.
///
/// Propagated unmodified to the caller of the render pass.
pub type ComponentError = anyhow::Error;

/// Result type used by component code.
pub type Result<T, E = ComponentError> = core::result::Result<T, E>;

pub use serde_json::{Value, json};
