//! The public entry point: one [`Renderer`], many passes.

use alloc::boxed::Box;
use core::fmt::{self, Write};
use std::time::Instant;

use pour_core::{Context, Node};

use crate::{
    ConfigError, ContextPolicy, DeclaredContext, HtmlMarkup, Markup, PassStats, RenderConfig,
    RenderError, Sequence, dispatcher::Pass, sequence::Realizer,
};

/// Renders node trees to markup.
///
/// A renderer holds configuration and collaborators only. Every call starts a
/// fresh pass with its own sequence, identity cache and task pool, so a
/// renderer can be reused freely on one thread.
///
/// ```
/// use pour::{Context, Renderer, element};
///
/// let renderer = Renderer::new();
/// let html = renderer
///     .render(&element("p").child("Hello").into(), &Context::new())
///     .unwrap();
/// assert_eq!(html, r#"<p data-pour-root="">Hello</p>"#);
/// ```
pub struct Renderer {
    config: RenderConfig,
    marker: String,
    markup: Box<dyn Markup>,
    context_policy: Box<dyn ContextPolicy>,
}

impl fmt::Debug for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Renderer")
            .field("config", &self.config)
            .field("markup", &self.markup)
            .field("context_policy", &self.context_policy)
            .finish()
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    /// Creates a renderer with the default configuration and collaborators.
    #[must_use]
    pub fn new() -> Self {
        let config = RenderConfig::default();
        Self {
            marker: config.marker(),
            config,
            markup: Box::new(HtmlMarkup::new()),
            context_policy: Box::new(DeclaredContext),
        }
    }

    /// Starts configuring a renderer.
    #[must_use]
    pub fn builder() -> RendererBuilder {
        RendererBuilder::default()
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub(crate) fn markup(&self) -> &dyn Markup {
        &*self.markup
    }

    pub(crate) fn context_policy(&self) -> &dyn ContextPolicy {
        &*self.context_policy
    }

    /// Renders `node` under `context` and returns the markup.
    ///
    /// # Errors
    ///
    /// Fails on the first unknown node, invalid tag or component error. No
    /// partial output is returned.
    pub fn render(&self, node: &Node, context: &Context) -> Result<String, RenderError> {
        self.render_with_stats(node, context).map(|(html, _)| html)
    }

    /// Renders `node` with an empty context.
    ///
    /// # Errors
    ///
    /// See [`render`](Self::render).
    pub fn render_to_string(&self, node: &Node) -> Result<String, RenderError> {
        self.render(node, &Context::new())
    }

    /// Renders `node` into `out`. Nothing is written if the pass fails.
    ///
    /// # Errors
    ///
    /// See [`render`](Self::render). Also fails if `out` refuses the write.
    pub fn render_into<W: Write>(
        &self,
        node: &Node,
        context: &Context,
        out: &mut W,
    ) -> Result<(), RenderError> {
        let html = self.render(node, context)?;
        out.write_str(&html)?;
        Ok(())
    }

    /// Renders `node` and reports what the pass did.
    ///
    /// # Errors
    ///
    /// See [`render`](Self::render).
    pub fn render_with_stats(
        &self,
        node: &Node,
        context: &Context,
    ) -> Result<(String, PassStats), RenderError> {
        let span = tracing::info_span!("render_pass", root = %node.descriptor());
        let _entered = span.enter();
        let started = Instant::now();

        let pass = Pass::new(self);
        let mut sequence = Sequence::new();
        let mut realizer = Realizer::new(self.config.cache);
        let mut html = String::new();

        let result = pass
            .render(&mut sequence, node, context)
            .and_then(|()| realizer.realize(sequence))
            .and_then(|()| {
                realizer.write(&mut html, &self.marker, self.config.marker_placement)
            });
        if let Err(error) = result {
            tracing::debug!(%error, elapsed = ?started.elapsed(), "render pass failed");
            return Err(error);
        }

        let mut stats = realizer.stats();
        stats.bridge_waits = pass.bridge().waits();
        tracing::debug!(
            bytes = html.len(),
            segments = stats.segments,
            cache_hits = stats.cache_hits,
            cache_misses = stats.cache_misses,
            bridge_waits = stats.bridge_waits,
            elapsed = ?started.elapsed(),
            "render pass finished"
        );
        Ok((html, stats))
    }
}

/// Renders `node` with a default [`Renderer`] and an empty context.
///
/// # Errors
///
/// See [`Renderer::render`].
pub fn render_to_string(node: impl Into<Node>) -> Result<String, RenderError> {
    Renderer::new().render_to_string(&node.into())
}

/// Builder for [`Renderer`].
#[derive(Debug, Default)]
pub struct RendererBuilder {
    config: RenderConfig,
    markup: Option<Box<dyn Markup>>,
    context_policy: Option<Box<dyn ContextPolicy>>,
}

impl RendererBuilder {
    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: RenderConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the markup collaborator.
    ///
    /// A custom collaborator is responsible for skipping the configured raw
    /// HTML prop when it serializes attributes.
    #[must_use]
    pub fn with_markup(mut self, markup: impl Markup + 'static) -> Self {
        self.markup = Some(Box::new(markup));
        self
    }

    /// Replaces the context collaborator.
    #[must_use]
    pub fn with_context_policy(mut self, policy: impl ContextPolicy + 'static) -> Self {
        self.context_policy = Some(Box::new(policy));
        self
    }

    /// Builds the renderer.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidName`] if the configuration does not
    /// validate.
    pub fn build(self) -> Result<Renderer, ConfigError> {
        let Self {
            config,
            markup,
            context_policy,
        } = self;
        config.validate()?;

        let markup = markup.unwrap_or_else(|| {
            Box::new(HtmlMarkup::new().with_raw_html_prop(config.raw_html_prop.clone()))
        });
        Ok(Renderer {
            marker: config.marker(),
            config,
            markup,
            context_policy: context_policy.unwrap_or_else(|| Box::new(DeclaredContext)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MarkerPlacement;
    use pour_core::{ComponentRef, element};

    #[test]
    fn test_failed_pass_writes_nothing() {
        let mut out = String::from("kept");
        let node = Node::list([Node::from(element("p").child("x")), Node::from(true)]);
        let error = Renderer::new()
            .render_into(&node, &Context::new(), &mut out)
            .unwrap_err();
        assert!(matches!(error, RenderError::UnknownNodeType { .. }));
        assert_eq!(out, "kept");
    }

    #[test]
    fn test_stats_count_cache_hits() {
        let shared: Node = element("hr").into();
        let node = Node::list([shared.clone(), shared.clone(), shared]);
        let (html, stats) = Renderer::new()
            .render_with_stats(&node, &Context::new())
            .unwrap();
        assert_eq!(html, r#"<hr data-pour-root=""><hr data-pour-root=""><hr data-pour-root="">"#);
        assert_eq!(stats.cache_misses, 1);
        assert_eq!(stats.cache_hits, 2);
        assert_eq!(stats.bridge_waits, 0);
    }

    #[test]
    fn test_builder_rejects_invalid_config() {
        let result = Renderer::builder()
            .with_config(RenderConfig {
                marker_attribute: String::new(),
                ..RenderConfig::default()
            })
            .build();
        assert!(matches!(result, Err(ConfigError::InvalidName { .. })));
    }

    #[test]
    fn test_custom_raw_html_prop() {
        let renderer = Renderer::builder()
            .with_config(RenderConfig {
                raw_html_prop: "html".to_owned(),
                marker_placement: MarkerPlacement::None,
                ..RenderConfig::default()
            })
            .build()
            .unwrap();
        let node: Node = element("div").prop("html", "<i>x</i>").child("no").into();
        assert_eq!(
            renderer.render_to_string(&node).unwrap(),
            "<div><i>x</i></div>"
        );
    }

    #[test]
    fn test_free_render_to_string() {
        let greeting = ComponentRef::function("Greeting", |_| Ok(Node::text("hi")));
        assert_eq!(render_to_string(greeting).unwrap(), "hi");
    }
}
