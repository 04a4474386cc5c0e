//! Render configuration.

use pour_core::RAW_HTML_PROP;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Which elements carry the identity marker attribute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerPlacement {
    /// Every element.
    #[default]
    Every,
    /// Only the first element of each pass.
    Root,
    /// No element.
    None,
}

/// Settings shared by every pass of a [`Renderer`](crate::Renderer).
///
/// ```
/// use pour::{MarkerPlacement, RenderConfig};
///
/// let config = RenderConfig::from_json_str(r#"{ "marker_placement": "root" }"#).unwrap();
/// assert_eq!(config.marker_placement, MarkerPlacement::Root);
/// assert_eq!(config.marker_attribute, "data-pour-root");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Name of the identity marker attribute.
    pub marker_attribute: String,
    /// Value of the identity marker attribute.
    pub marker_value: String,
    /// Which elements carry the marker.
    pub marker_placement: MarkerPlacement,
    /// Prop holding raw inner HTML.
    pub raw_html_prop: String,
    /// Reuse the output of nodes encountered more than once in a pass.
    pub cache: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            marker_attribute: "data-pour-root".to_owned(),
            marker_value: String::new(),
            marker_placement: MarkerPlacement::Every,
            raw_html_prop: RAW_HTML_PROP.to_owned(),
            cache: true,
        }
    }
}

impl RenderConfig {
    /// Parses and validates a JSON configuration. Missing fields take their
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] for malformed input and
    /// [`ConfigError::InvalidName`] for unusable names.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the configured names can be used.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidName`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !pour_html::is_valid_attribute_name(&self.marker_attribute) {
            return Err(ConfigError::InvalidName {
                field: "marker_attribute",
                value: self.marker_attribute.clone(),
            });
        }
        if self.raw_html_prop.is_empty() {
            return Err(ConfigError::InvalidName {
                field: "raw_html_prop",
                value: self.raw_html_prop.clone(),
            });
        }
        Ok(())
    }

    /// The marker as it appears inside a start tag, with a leading space.
    #[must_use]
    pub fn marker(&self) -> String {
        format!(
            " {}=\"{}\"",
            self.marker_attribute,
            pour_html::escape_attribute(&self.marker_value)
        )
    }
}
