//! Components: nodes rendered by running code instead of expanding a tag.
//!
//! Two flavours exist:
//!
//! - **stateless** components are plain functions of their [`Scope`];
//! - **stateful** components implement [`Component`]. A fresh instance is
//!   created for every encounter during a render pass, its
//!   [`will_mount`](Component::will_mount) hook runs (and may return a pending
//!   computation that the renderer waits for), then [`render`](Component::render)
//!   produces the subtree. The instance is dropped afterwards.
//!
//! ```
//! use pour_core::{Component, ComponentRef, Context, Lifecycle, Node, Props, Result, Scope};
//! use serde_json::json;
//!
//! struct Greeting;
//!
//! impl Component for Greeting {
//!     fn create(_props: &Props, _context: &Context) -> Self {
//!         Self
//!     }
//!
//!     fn will_mount(&mut self, scope: &Scope<'_>) -> Result<Lifecycle> {
//!         scope.set_state([("name", json!("Ada"))]);
//!         Ok(Lifecycle::Ready)
//!     }
//!
//!     fn render(&self, scope: &Scope<'_>) -> Result<Node> {
//!         let name = scope.state().get("name").and_then(|v| v.as_str()).unwrap_or("stranger").to_owned();
//!         Ok(Node::text(format!("Hello, {name}")))
//!     }
//! }
//!
//! let node = ComponentRef::class::<Greeting>();
//! assert_eq!(node.name(), "Greeting");
//! ```

use alloc::{borrow::Cow, boxed::Box, rc::Rc, string::String, vec::Vec};
use core::{
    any::type_name,
    cell::{Cell, Ref, RefCell},
    fmt::{self, Debug},
    future::Future,
};

use futures::{
    FutureExt,
    executor::LocalSpawner,
    future::LocalBoxFuture,
    task::{LocalSpawnExt, SpawnError},
};
use serde_json::{Map, Value};

use crate::{Context, Node, NodeId, Props, Result};

/// State held by a stateful component instance.
pub type State = Map<String, Value>;

/// Outcome of a component's pre-render hook.
pub enum Lifecycle {
    /// The hook finished synchronously; render may proceed immediately.
    Ready,
    /// The hook started work that must settle before render runs.
    Pending(LocalBoxFuture<'static, Result<()>>),
}

impl Lifecycle {
    /// Wraps a future as a pending computation.
    pub fn pending(future: impl Future<Output = Result<()>> + 'static) -> Self {
        Self::Pending(future.boxed_local())
    }

    /// Returns `true` if render has to wait for a pending computation.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }
}

impl Debug for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready => f.write_str("Ready"),
            Self::Pending(_) => f.write_str("Pending(..)"),
        }
    }
}

/// A component with internal state and a pre-render lifecycle hook.
pub trait Component: 'static {
    /// Constructs an instance for one encounter of the component node.
    fn create(props: &Props, context: &Context) -> Self
    where
        Self: Sized;

    /// Context keys this component may read. Everything else is hidden from it.
    #[must_use]
    fn context_types() -> &'static [&'static str]
    where
        Self: Sized,
    {
        &[]
    }

    /// State the instance starts with.
    fn initial_state(&self, _scope: &Scope<'_>) -> State {
        State::new()
    }

    /// Runs before render. State set through the scope, synchronously or by the
    /// returned pending computation, is visible to [`render`](Self::render).
    ///
    /// # Errors
    ///
    /// Any error aborts the render pass.
    fn will_mount(&mut self, _scope: &Scope<'_>) -> Result<Lifecycle> {
        Ok(Lifecycle::Ready)
    }

    /// Produces the subtree for this instance.
    ///
    /// # Errors
    ///
    /// Any error aborts the render pass.
    fn render(&self, scope: &Scope<'_>) -> Result<Node>;

    /// Context entries made visible to this instance's descendants.
    fn child_context(&self, _scope: &Scope<'_>) -> Option<Context> {
        None
    }
}

type StatelessFn = dyn Fn(&Scope<'_>) -> Result<Node>;
type Constructor = dyn Fn(&Props, &Context) -> Box<dyn Component>;

/// How a [`ComponentRef`] produces its subtree.
#[derive(Clone)]
pub enum ComponentKind {
    /// A plain function of props, children and context.
    Stateless(Rc<StatelessFn>),
    /// A type implementing [`Component`].
    Stateful(Rc<Constructor>),
}

impl Debug for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stateless(_) => f.write_str("Stateless"),
            Self::Stateful(_) => f.write_str("Stateful"),
        }
    }
}

/// A node that renders by invoking a component.
pub struct ComponentRef {
    id: NodeId,
    name: Cow<'static, str>,
    props: Props,
    children: Node,
    context_types: &'static [&'static str],
    kind: ComponentKind,
}

impl ComponentRef {
    /// Creates a reference to a stateless component.
    pub fn function(
        name: impl Into<Cow<'static, str>>,
        render: impl Fn(&Scope<'_>) -> Result<Node> + 'static,
    ) -> Self {
        Self {
            id: NodeId::next(),
            name: name.into(),
            props: Props::new(),
            children: Node::Empty,
            context_types: &[],
            kind: ComponentKind::Stateless(Rc::new(render)),
        }
    }

    /// Creates a reference to the stateful component `C`.
    #[must_use]
    pub fn class<C: Component>() -> Self {
        Self {
            id: NodeId::next(),
            name: Cow::Borrowed(short_type_name::<C>()),
            props: Props::new(),
            children: Node::Empty,
            context_types: C::context_types(),
            kind: ComponentKind::Stateful(Rc::new(
                |props: &Props, context: &Context| -> Box<dyn Component> {
                    Box::new(C::create(props, context))
                },
            )),
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

    /// Sets the children handed to the component through its scope.
    #[must_use]
    pub fn with_children(mut self, children: impl Into<Node>) -> Self {
        self.children = children.into();
        self
    }

    /// Declares the context keys the component may read.
    #[must_use]
    pub const fn reads(mut self, keys: &'static [&'static str]) -> Self {
        self.context_types = keys;
        self
    }

    /// Identity of this node.
    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    /// Diagnostic name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Props passed to the component.
    #[must_use]
    pub const fn props(&self) -> &Props {
        &self.props
    }

    /// Children passed to the component.
    #[must_use]
    pub const fn children(&self) -> &Node {
        &self.children
    }

    /// Context keys the component declared.
    #[must_use]
    pub const fn context_types(&self) -> &'static [&'static str] {
        self.context_types
    }

    /// Stateless or stateful.
    #[must_use]
    pub const fn kind(&self) -> &ComponentKind {
        &self.kind
    }

    /// Returns `true` for components implementing [`Component`].
    #[must_use]
    pub const fn is_stateful(&self) -> bool {
        matches!(self.kind, ComponentKind::Stateful(_))
    }
}

impl Debug for ComponentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentRef")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("props", &self.props)
            .finish_non_exhaustive()
    }
}

fn short_type_name<T>() -> &'static str {
    let full = type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

struct StateCell {
    state: RefCell<State>,
    queued: RefCell<Vec<(String, Value)>>,
    open: Cell<bool>,
}

impl StateCell {
    fn merge(&self, entries: impl IntoIterator<Item = (String, Value)>) {
        let Ok(mut state) = self.state.try_borrow_mut() else {
            self.queued.borrow_mut().extend(entries);
            return;
        };
        let queued = core::mem::take(&mut *self.queued.borrow_mut());
        for (key, value) in queued.into_iter().chain(entries) {
            state.insert(key, value);
        }
    }
}

/// State storage of one component instance.
///
/// Updates are only accepted while the slot is open, which the renderer
/// arranges for the duration of the pre-render hook and its pending
/// computation. An update made while the state is borrowed is queued and
/// merged, in order, as soon as the borrow ends.
#[derive(Clone)]
pub struct StateSlot(Rc<StateCell>);

impl StateSlot {
    /// Creates a closed slot holding `initial`.
    #[must_use]
    pub fn new(initial: State) -> Self {
        Self(Rc::new(StateCell {
            state: RefCell::new(initial),
            queued: RefCell::new(Vec::new()),
            open: Cell::new(false),
        }))
    }

    /// Replaces the whole state, discarding queued updates.
    pub fn reset(&self, state: State) {
        self.0.queued.borrow_mut().clear();
        match self.0.state.try_borrow_mut() {
            Ok(mut current) => *current = state,
            Err(_) => self.0.queued.borrow_mut().extend(state),
        }
    }

    /// Starts accepting updates.
    pub fn open(&self) {
        self.0.open.set(true);
    }

    /// Stops accepting updates. Queued updates are merged first.
    pub fn close(&self) {
        self.flush();
        self.0.open.set(false);
    }

    /// Returns `true` while updates are accepted.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.0.open.get()
    }

    /// Borrows the current state, merging queued updates first when possible.
    #[must_use]
    pub fn get(&self) -> Ref<'_, State> {
        self.flush();
        self.0.state.borrow()
    }

    /// Clones the current state.
    #[must_use]
    pub fn snapshot(&self) -> State {
        self.get().clone()
    }

    /// Returns a setter bound to this slot.
    #[must_use]
    pub fn setter(&self) -> StateSetter {
        StateSetter(self.clone())
    }

    fn flush(&self) {
        if !self.0.queued.borrow().is_empty() {
            self.0.merge([]);
        }
    }
}

impl Debug for StateSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("StateSlot");
        match self.0.state.try_borrow() {
            Ok(state) => debug.field("state", &*state),
            Err(_) => debug.field("state", &"<updating>"),
        };
        debug
            .field("queued", &self.0.queued.borrow().len())
            .field("open", &self.0.open.get())
            .finish()
    }
}

/// Applies partial state to a component instance.
///
/// Cloneable so it can be moved into a pending computation. Updates made after
/// the pre-render hook settled are dropped with a warning.
#[derive(Clone, Debug)]
pub struct StateSetter(StateSlot);

impl StateSetter {
    /// Shallow-merges `partial` into the state. Returns `false` if the update
    /// was dropped because the hook has already settled.
    ///
    /// Safe to call while the state is borrowed, for example with a value
    /// computed from [`Scope::state`] in the same expression.
    pub fn set<K: Into<String>, V: Into<Value>>(
        &self,
        partial: impl IntoIterator<Item = (K, V)>,
    ) -> bool {
        if !self.0.is_open() {
            tracing::warn!("state update ignored: the pre-render hook has already settled");
            return false;
        }
        self.0
            .0
            .merge(partial.into_iter().map(|(key, value)| (key.into(), value.into())));
        true
    }

    /// Computes the partial state from the current state, then merges it.
    pub fn update(&self, updater: impl FnOnce(&State) -> State) -> bool {
        let partial = updater(&self.0.get());
        self.set(partial)
    }
}

/// Everything a component can see while it runs.
pub struct Scope<'a> {
    props: &'a Props,
    children: &'a Node,
    context: &'a Context,
    state: &'a StateSlot,
    spawner: &'a LocalSpawner,
}

impl<'a> Scope<'a> {
    /// Assembles a scope. Called by renderers.
    #[must_use]
    pub const fn new(
        props: &'a Props,
        children: &'a Node,
        context: &'a Context,
        state: &'a StateSlot,
        spawner: &'a LocalSpawner,
    ) -> Self {
        Self {
            props,
            children,
            context,
            state,
            spawner,
        }
    }

    /// Props of the component node.
    #[must_use]
    pub const fn props(&self) -> &'a Props {
        self.props
    }

    /// Children of the component node.
    #[must_use]
    pub const fn children(&self) -> &'a Node {
        self.children
    }

    /// The inbound context, restricted to the declared keys.
    #[must_use]
    pub const fn context(&self) -> &'a Context {
        self.context
    }

    /// Borrows the instance state.
    ///
    /// Setting state while the borrow is alive is allowed; the update becomes
    /// visible once the borrow is dropped.
    #[must_use]
    pub fn state(&self) -> Ref<'a, State> {
        self.state.get()
    }

    /// Shallow-merges `partial` into the instance state.
    ///
    /// Only effective during the pre-render hook.
    pub fn set_state<K: Into<String>, V: Into<Value>>(
        &self,
        partial: impl IntoIterator<Item = (K, V)>,
    ) -> bool {
        self.setter().set(partial)
    }

    /// A setter that can be moved into a pending computation.
    #[must_use]
    pub fn setter(&self) -> StateSetter {
        self.state.setter()
    }

    /// Spawner of the render pass. See [`spawn_local`](Self::spawn_local).
    #[must_use]
    pub const fn spawner(&self) -> &'a LocalSpawner {
        self.spawner
    }

    /// Spawns a cooperative task on the render pass.
    ///
    /// Spawned tasks are polled until they stall right after the pre-render
    /// hook returns, and again while the renderer waits for a pending
    /// computation. Tasks still unfinished when the pass ends are dropped.
    ///
    /// # Errors
    ///
    /// Fails if the pass has already finished.
    pub fn spawn_local(&self, task: impl Future<Output = ()> + 'static) -> Result<(), SpawnError> {
        self.spawner.spawn_local(task)
    }
}

impl Debug for Scope<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("props", self.props)
            .field("context", self.context)
            .finish_non_exhaustive()
    }
}
