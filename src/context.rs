//! Context collaborator: what a component sees, and what it passes on.

use core::fmt::{self, Debug};

use pour_core::{Component, ComponentRef, Context, Node, Scope};

/// What a component produced, handed to [`ContextPolicy::outbound`].
pub enum Evaluated<'a> {
    /// A stateless component returned `result`.
    Stateless {
        /// The rendered subtree.
        result: &'a Node,
    },
    /// A stateful component instance finished rendering.
    Stateful {
        /// The instance.
        instance: &'a dyn Component,
        /// The scope the instance rendered with.
        scope: &'a Scope<'a>,
    },
}

impl Debug for Evaluated<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stateless { result } => f
                .debug_struct("Stateless")
                .field("result", &result.descriptor())
                .finish(),
            Self::Stateful { scope, .. } => f
                .debug_struct("Stateful")
                .field("scope", scope)
                .finish_non_exhaustive(),
        }
    }
}

/// Computes the contexts around a component.
///
/// Injected into the [`Renderer`](crate::Renderer); [`DeclaredContext`] is the default.
pub trait ContextPolicy: Debug {
    /// Context visible to the component itself.
    fn inbound(&self, component: &ComponentRef, ambient: &Context) -> Context;

    /// Context visible to the component's subtree.
    fn outbound(
        &self,
        component: &ComponentRef,
        evaluated: Evaluated<'_>,
        ambient: &Context,
    ) -> Context;
}

/// Components read only the keys they declare, and stateful components may
/// add entries for their descendants through
/// [`Component::child_context`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclaredContext;

impl ContextPolicy for DeclaredContext {
    fn inbound(&self, component: &ComponentRef, ambient: &Context) -> Context {
        ambient.restrict(component.context_types())
    }

    fn outbound(
        &self,
        _component: &ComponentRef,
        evaluated: Evaluated<'_>,
        ambient: &Context,
    ) -> Context {
        match evaluated {
            Evaluated::Stateless { .. } => ambient.clone(),
            Evaluated::Stateful { instance, scope } => instance
                .child_context(scope)
                .map_or_else(|| ambient.clone(), |child| ambient.extend(&child)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::LocalPool;
    use pour_core::{Props, Result, State, StateSlot, json};

    struct Provider;

    impl Component for Provider {
        fn create(_props: &Props, _context: &Context) -> Self {
            Self
        }

        fn render(&self, _scope: &Scope<'_>) -> Result<Node> {
            Ok(Node::Empty)
        }

        fn child_context(&self, _scope: &Scope<'_>) -> Option<Context> {
            Some(Context::new().with("locale", "fr"))
        }
    }

    #[test]
    fn test_inbound_is_restricted_to_declared_keys() {
        let ambient: Context = [("theme", json!("dark")), ("user", json!("ada"))]
            .into_iter()
            .collect();
        let component = ComponentRef::function("Themed", |_| Ok(Node::Empty)).reads(&["theme"]);

        let inbound = DeclaredContext.inbound(&component, &ambient);
        assert_eq!(inbound.get("theme"), Some(&json!("dark")));
        assert!(!inbound.contains("user"));

        let undeclared = ComponentRef::function("Plain", |_| Ok(Node::Empty));
        assert!(DeclaredContext.inbound(&undeclared, &ambient).is_empty());
    }

    #[test]
    fn test_outbound_merges_child_context() {
        let ambient = Context::new().with("locale", "en").with("theme", "dark");
        let component = ComponentRef::class::<Provider>();
        let instance = Provider;
        let slot = StateSlot::new(State::new());
        let pool = LocalPool::new();
        let spawner = pool.spawner();
        let props = Props::new();
        let children = Node::Empty;
        let scope = Scope::new(&props, &children, &ambient, &slot, &spawner);

        let outbound = DeclaredContext.outbound(
            &component,
            Evaluated::Stateful {
                instance: &instance,
                scope: &scope,
            },
            &ambient,
        );
        assert_eq!(outbound.get("locale"), Some(&json!("fr")));
        assert_eq!(outbound.get("theme"), Some(&json!("dark")));
        assert_eq!(ambient.get("locale"), Some(&json!("en")));
    }

    #[test]
    fn test_stateless_outbound_is_ambient() {
        let ambient = Context::new().with("a", 1);
        let component = ComponentRef::function("Leaf", |_| Ok(Node::Empty));
        let outbound = DeclaredContext.outbound(
            &component,
            Evaluated::Stateless {
                result: &Node::Empty,
            },
            &ambient,
        );
        assert!(outbound.ptr_eq(&ambient));
    }
}
