#![doc = include_str!("../README.md")]
#![allow(clippy::multiple_crate_versions)]
#![allow(clippy::future_not_send)]

extern crate alloc;

pub mod bridge;
pub mod config;
pub mod context;
mod dispatcher;
pub mod error;
pub mod logging;
pub mod markup;
mod renderer;
pub mod sequence;

pub use bridge::SyncBridge;
pub use config::{MarkerPlacement, RenderConfig};
pub use context::{ContextPolicy, DeclaredContext, Evaluated};
pub use error::{ConfigError, RenderError};
pub use markup::{HtmlMarkup, Markup};
pub use renderer::{Renderer, RendererBuilder, render_to_string};
pub use sequence::{PassStats, Sequence};

#[doc(inline)]
pub use pour_core::{
    Component, ComponentError, ComponentKind, ComponentRef, Context, Element, Lifecycle, Node,
    NodeId, Props, RAW_HTML_PROP, Result, Scope, State, StateSetter, StateSlot, Value, element,
    json,
};

pub mod prelude {
    //! Commonly used types for building and rendering trees.
    //!
    //! ```
    //! use pour::prelude::*;
    //!
    //! let html = render_to_string(element("em").child("hi")).unwrap();
    //! assert_eq!(html, r#"<em data-pour-root="">hi</em>"#);
    //! ```
    pub use super::{
        Component, ComponentRef, Context, Lifecycle, Node, Props, Renderer, Scope, element, json,
        render_to_string,
    };
}
