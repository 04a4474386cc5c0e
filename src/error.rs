//! Errors surfaced by a render pass.
//!
//! Every failure is fatal to the pass that raised it: there is no retry, no
//! fallback markup and no partial output. Hosts translate a [`RenderError`]
//! into whatever response suits them.

use core::fmt;

use pour_core::ComponentError;

/// Error returned by a failed render pass.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// A node matched none of the renderable shapes.
    #[error("unknown node type: {descriptor}")]
    UnknownNodeType {
        /// Description of the offending node.
        descriptor: String,
    },
    /// An element's tag cannot be emitted as markup.
    #[error("invalid tag name `{tag}`")]
    InvalidTag {
        /// The rejected tag.
        tag: String,
    },
    /// A component function, lifecycle hook, pending computation or render
    /// failed. The component's error is carried unmodified.
    #[error(transparent)]
    ComponentEvaluation(#[from] ComponentError),
    /// The output sink refused a write.
    #[error("failed to write rendered markup")]
    Write(#[from] fmt::Error),
}

impl RenderError {
    /// Returns the component's own error, if this failure came from one.
    #[must_use]
    pub const fn component_error(&self) -> Option<&ComponentError> {
        match self {
            Self::ComponentEvaluation(error) => Some(error),
            _ => None,
        }
    }
}

/// Error returned when loading a [`RenderConfig`](crate::RenderConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration is not valid JSON for the expected shape.
    #[error("failed to parse render configuration: {0}")]
    Json(#[from] serde_json::Error),
    /// A configured attribute or prop name cannot be used.
    #[error("invalid {field} `{value}`")]
    InvalidName {
        /// The configuration field.
        field: &'static str,
        /// The rejected value.
        value: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("database offline")]
    struct Offline;

    #[test]
    fn test_component_error_is_transparent() {
        let error = RenderError::from(ComponentError::new(Offline));
        assert_eq!(error.to_string(), "database offline");
        assert!(
            error
                .component_error()
                .is_some_and(|inner| inner.downcast_ref::<Offline>().is_some())
        );
    }

    #[test]
    fn test_unknown_node_type_display() {
        let error = RenderError::UnknownNodeType {
            descriptor: "boolean true".to_owned(),
        };
        assert_eq!(error.to_string(), "unknown node type: boolean true");
        assert!(error.component_error().is_none());
    }
}
