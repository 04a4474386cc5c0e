//! Traversal of the node tree into an emission sequence.
//!
//! A [`Pass`] lives for one call to the renderer. Leaves become text segments
//! at once; elements and components are registered as cached delegates keyed
//! by their [`NodeId`](pour_core::NodeId), so their producers run during
//! realization and a node met twice is only expanded once.

use pour_core::{
    ComponentKind, ComponentRef, Context, Element, Node, Scope, State, StateSlot,
};

use crate::{
    Evaluated, MarkerPlacement, RenderError, Renderer, Sequence, bridge::SyncBridge,
};

/// State of one render pass.
pub(crate) struct Pass<'r> {
    renderer: &'r Renderer,
    bridge: SyncBridge,
}

impl<'r> Pass<'r> {
    pub(crate) fn new(renderer: &'r Renderer) -> Self {
        Self {
            renderer,
            bridge: SyncBridge::new(),
        }
    }

    pub(crate) const fn bridge(&self) -> &SyncBridge {
        &self.bridge
    }

    /// Registers the segment sources of `node` in `sequence`.
    pub(crate) fn render<'p>(
        &'p self,
        sequence: &mut Sequence<'p>,
        node: &Node,
        context: &Context,
    ) -> Result<(), RenderError> {
        match node {
            Node::Empty => {}
            Node::Text(text) => {
                sequence.push_str(self.renderer.markup().escape_text(text).into_owned());
            }
            Node::Number(number) => sequence.push_str(pour_html::format_number(*number)),
            Node::List(nodes) => {
                for child in nodes {
                    self.render(sequence, child, context)?;
                }
            }
            Node::Element(element) => {
                let element = element.clone();
                let context = context.clone();
                sequence.delegate_cached(element.id(), move |inner| {
                    self.render_element(inner, &element, &context)
                });
            }
            Node::Component(component) => {
                let component = component.clone();
                let context = context.clone();
                sequence.delegate_cached(component.id(), move |inner| {
                    self.evaluate_component(inner, &component, &context)
                });
            }
            Node::Foreign(_) => {
                return Err(RenderError::UnknownNodeType {
                    descriptor: node.descriptor().into_owned(),
                });
            }
        }
        Ok(())
    }

    fn render_element<'p>(
        &'p self,
        sequence: &mut Sequence<'p>,
        element: &Element,
        context: &Context,
    ) -> Result<(), RenderError> {
        let tag = element.tag();
        if !pour_html::is_valid_tag_name(tag) {
            return Err(RenderError::InvalidTag {
                tag: tag.to_owned(),
            });
        }
        let config = self.renderer.config();

        sequence.push_str(format!("<{tag}"));
        self.renderer
            .markup()
            .serialize_attributes(element.props(), sequence);
        if config.marker_placement != MarkerPlacement::None {
            sequence.push_marker();
        }
        sequence.push_str(">");

        if pour_html::is_void_element(tag) {
            return Ok(());
        }

        if let Some(html) = element.raw_html(&config.raw_html_prop) {
            sequence.push_str(html.to_owned());
        } else {
            for child in element.child_nodes() {
                self.render(sequence, child, context)?;
            }
        }

        sequence.push_str(format!("</{tag}>"));
        Ok(())
    }

    fn evaluate_component<'p>(
        &'p self,
        sequence: &mut Sequence<'p>,
        component: &ComponentRef,
        ambient: &Context,
    ) -> Result<(), RenderError> {
        let policy = self.renderer.context_policy();
        let inbound = policy.inbound(component, ambient);
        let slot = StateSlot::new(State::new());
        let scope = Scope::new(
            component.props(),
            component.children(),
            &inbound,
            &slot,
            self.bridge.spawner(),
        );

        let (tree, outbound) = match component.kind() {
            ComponentKind::Stateless(function) => {
                tracing::debug!(component = component.name(), id = %component.id(), "evaluating stateless component");
                let tree = function(&scope)?;
                let outbound =
                    policy.outbound(component, Evaluated::Stateless { result: &tree }, ambient);
                (tree, outbound)
            }
            ComponentKind::Stateful(construct) => {
                tracing::debug!(component = component.name(), id = %component.id(), "evaluating stateful component");
                let mut instance = construct(component.props(), &inbound);
                slot.reset(instance.initial_state(&scope));

                slot.open();
                let mounted = instance
                    .will_mount(&scope)
                    .and_then(|lifecycle| self.bridge.await_sync(lifecycle));
                slot.close();
                mounted?;

                let tree = instance.render(&scope)?;
                let outbound = policy.outbound(
                    component,
                    Evaluated::Stateful {
                        instance: &*instance,
                        scope: &scope,
                    },
                    ambient,
                );
                (tree, outbound)
            }
        };

        self.render(sequence, &tree, &outbound)
    }
}
