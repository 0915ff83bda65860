//! Intercepting facades
//!
//! A [`Facade`] presents the type surface of a bean (or of a set of
//! interfaces) and routes every call through its resolver chain. Calls that
//! touch properties feed the shared [`PathTracker`] and emit events to the
//! facade's listeners.

mod factory;

pub use factory::FacadeFactory;

use crate::config::FacadeConfig;
use crate::error::{FacadeError, Result};
use crate::event::{EventListener, EventMulticaster, FacadeEvent, MethodInvocationEvent};
use crate::model::method::capitalize;
use crate::model::{CollectionKind, MethodDef, ObjectRef, TypeDef, Value, OBJECT};
use crate::path::PathTracker;
use crate::resolver::{ExecutionContext, ResolverChain};
use crate::store::PropertyStore;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock, Weak};
use tracing::{debug, trace};

// ---------------------------------------------------------------------------
// Declared type
// ---------------------------------------------------------------------------

/// The type surface a facade presents: one base class plus interfaces
#[derive(Debug, Clone)]
pub struct FacadeType {
    base: Arc<TypeDef>,
    interfaces: Vec<Arc<TypeDef>>,
}

impl FacadeType {
    pub(crate) fn new(base: Arc<TypeDef>, interfaces: Vec<Arc<TypeDef>>) -> Self {
        Self { base, interfaces }
    }

    pub fn base(&self) -> &Arc<TypeDef> {
        &self.base
    }

    pub fn interfaces(&self) -> &[Arc<TypeDef>] {
        &self.interfaces
    }

    /// Base class name, or the interface names when the base is the root class
    pub fn name(&self) -> String {
        if self.base.name() == OBJECT && !self.interfaces.is_empty() {
            self.interfaces
                .iter()
                .map(|i| i.name())
                .collect::<Vec<_>>()
                .join(", ")
        } else {
            self.base.name().to_string()
        }
    }

    pub fn is_assignable_to(&self, type_name: &str) -> bool {
        self.base.is_subtype_of(type_name)
            || self.interfaces.iter().any(|i| i.is_subtype_of(type_name))
    }

    /// Collection shape of the base class or any interface
    pub fn collection(&self) -> Option<CollectionKind> {
        self.base
            .collection()
            .or_else(|| self.interfaces.iter().find_map(|i| i.collection()))
    }

    pub fn find_method(&self, name: &str, arity: usize) -> Option<Arc<MethodDef>> {
        self.base
            .find_method(name, arity)
            .or_else(|| self.interfaces.iter().find_map(|i| i.find_method(name, arity)))
    }
}

// ---------------------------------------------------------------------------
// Intercepted calls
// ---------------------------------------------------------------------------

/// Listener and parent management calls, never reported as method invocations
#[derive(Debug, Clone)]
pub enum ObservableCall {
    AddListener(EventListener),
    RemoveListener(EventListener),
    RemoveAllListeners,
    GetParent,
    SetParent(Option<Facade>),
    MulticastEvent(FacadeEvent),
}

/// A call routed through the resolver chain
#[derive(Debug, Clone)]
pub enum Call {
    Method {
        method: Arc<MethodDef>,
        args: Vec<Value>,
    },
    Observable(ObservableCall),
}

impl Call {
    /// Method name, or the protocol name of an observable call
    pub fn name(&self) -> &str {
        match self {
            Call::Method { method, .. } => method.name(),
            Call::Observable(ObservableCall::AddListener(_)) => "addListener",
            Call::Observable(ObservableCall::RemoveListener(_)) => "removeListener",
            Call::Observable(ObservableCall::RemoveAllListeners) => "removeAllListeners",
            Call::Observable(ObservableCall::GetParent) => "getParent",
            Call::Observable(ObservableCall::SetParent(_)) => "setParent",
            Call::Observable(ObservableCall::MulticastEvent(_)) => "multicastEvent",
        }
    }
}

// ---------------------------------------------------------------------------
// Facade
// ---------------------------------------------------------------------------

pub(crate) struct FacadeInner {
    declared: FacadeType,
    shell: ObjectRef,
    delegate: Option<ObjectRef>,
    store: PropertyStore,
    multicaster: EventMulticaster,
    chain: OnceLock<ResolverChain>,
    tracker: PathTracker,
    factory: FacadeFactory,
}

/// Handle to an intercepting facade.
///
/// Clones share the same facade. Equality and hashing follow facade
/// identity, never the wrapped state.
#[derive(Clone)]
pub struct Facade {
    inner: Arc<FacadeInner>,
}

/// Non-owning reference to a facade, used for parent links
#[derive(Clone)]
pub struct WeakFacade {
    inner: Weak<FacadeInner>,
}

impl WeakFacade {
    pub fn upgrade(&self) -> Option<Facade> {
        self.inner.upgrade().map(|inner| Facade { inner })
    }
}

impl fmt::Debug for WeakFacade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WeakFacade({:p})", self.inner.as_ptr())
    }
}

impl Facade {
    pub(crate) fn new(
        declared: FacadeType,
        shell: ObjectRef,
        delegate: Option<ObjectRef>,
        tracker: PathTracker,
        factory: FacadeFactory,
    ) -> Self {
        Self {
            inner: Arc::new(FacadeInner {
                declared,
                shell,
                delegate,
                store: PropertyStore::new(),
                multicaster: EventMulticaster::new(),
                chain: OnceLock::new(),
                tracker,
                factory,
            }),
        }
    }

    pub fn declared_type(&self) -> &FacadeType {
        &self.inner.declared
    }

    /// Whether this facade can stand in for the named type
    pub fn is_assignable_to(&self, type_name: &str) -> bool {
        self.inner.declared.is_assignable_to(type_name)
    }

    /// The wrapped instance, absent for facades built over bare types
    pub fn delegate(&self) -> Option<&ObjectRef> {
        self.inner.delegate.as_ref()
    }

    pub(crate) fn shell(&self) -> &ObjectRef {
        &self.inner.shell
    }

    /// Field value captured in the facade's own shell when it was built
    pub fn field(&self, name: &str) -> Value {
        self.inner.shell.read_field(name)
    }

    pub fn property_store(&self) -> &PropertyStore {
        &self.inner.store
    }

    pub fn path_tracker(&self) -> &PathTracker {
        &self.inner.tracker
    }

    /// Render the path accumulated since the last render, then clear it
    pub fn render_current_path(&self) -> String {
        self.inner.tracker.render()
    }

    pub(crate) fn event_multicaster(&self) -> &EventMulticaster {
        &self.inner.multicaster
    }

    pub(crate) fn factory(&self) -> &FacadeFactory {
        &self.inner.factory
    }

    fn config(&self) -> &FacadeConfig {
        self.inner.factory.config()
    }

    pub fn downgrade(&self) -> WeakFacade {
        WeakFacade {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Stable per-facade hash
    pub fn identity_hash(&self) -> i64 {
        Arc::as_ptr(&self.inner) as usize as i64
    }

    /// Whether the resolver chain has been built
    pub fn is_initialized(&self) -> bool {
        self.inner.chain.get().is_some()
    }

    // -----------------------------------------------------------------------
    // Domain calls
    // -----------------------------------------------------------------------

    /// Call a method declared by the facade's type
    pub fn invoke(&self, method: &str, args: &[Value]) -> Result<Value> {
        let method = self
            .inner
            .declared
            .find_method(method, args.len())
            .ok_or_else(|| FacadeError::unsupported(self.inner.declared.name(), method))?;
        self.dispatch(Call::Method {
            method,
            args: args.to_vec(),
        })
    }

    /// Read a property through its `get<X>` or `is<X>` accessor
    pub fn get(&self, property: &str) -> Result<Value> {
        let name = MethodDef::accessor_names(property)
            .into_iter()
            .find(|name| self.inner.declared.find_method(name, 0).is_some())
            .ok_or_else(|| {
                FacadeError::unsupported(self.inner.declared.name(), format!("get {}", property))
            })?;
        self.invoke(&name, &[])
    }

    /// Write a property through its `set<X>` mutator
    pub fn set(&self, property: &str, value: impl Into<Value>) -> Result<()> {
        let name = format!("set{}", capitalize(property));
        self.invoke(&name, &[value.into()]).map(|_| ())
    }

    /// Read one element of a list- or map-shaped facade
    pub fn element(&self, key: impl Into<Value>) -> Result<Value> {
        self.invoke("get", &[key.into()])
    }

    // -----------------------------------------------------------------------
    // Observable protocol
    // -----------------------------------------------------------------------

    pub fn add_listener(&self, listener: impl Into<EventListener>) -> Result<()> {
        self.dispatch(Call::Observable(ObservableCall::AddListener(listener.into())))
            .map(|_| ())
    }

    pub fn remove_listener(&self, listener: &EventListener) -> Result<()> {
        self.dispatch(Call::Observable(ObservableCall::RemoveListener(
            listener.clone(),
        )))
        .map(|_| ())
    }

    pub fn remove_all_listeners(&self) -> Result<()> {
        self.dispatch(Call::Observable(ObservableCall::RemoveAllListeners))
            .map(|_| ())
    }

    pub fn parent(&self) -> Result<Option<Facade>> {
        let parent = self.dispatch(Call::Observable(ObservableCall::GetParent))?;
        Ok(parent.as_facade().cloned())
    }

    /// Set or clear the parent that propagable events are forwarded to.
    ///
    /// No cycle detection is done; callers keep the parent links a tree.
    pub fn set_parent(&self, parent: Option<&Facade>) -> Result<()> {
        self.dispatch(Call::Observable(ObservableCall::SetParent(parent.cloned())))
            .map(|_| ())
    }

    pub fn multicast_event(&self, event: FacadeEvent) -> Result<()> {
        self.dispatch(Call::Observable(ObservableCall::MulticastEvent(event)))
            .map(|_| ())
    }

    // -----------------------------------------------------------------------
    // Dispatch
    // -----------------------------------------------------------------------

    fn chain(&self) -> &ResolverChain {
        self.inner.chain.get_or_init(|| {
            let chain = ResolverChain::standard(self.inner.delegate.is_some());
            debug!("built resolver chain {:?} for {}", chain.names(), self);
            chain
        })
    }

    fn dispatch(&self, call: Call) -> Result<Value> {
        let executable = self
            .chain()
            .resolve(self, &call)
            .ok_or_else(|| FacadeError::unsupported(self.inner.declared.name(), call.name()))?;

        if let Call::Method { method, args } = &call {
            trace!("{}.{} resolved", self, method.name());
            self.inner.tracker.on_method_call(method, args);
            self.inner
                .multicaster
                .multicast(&FacadeEvent::MethodInvocation(MethodInvocationEvent {
                    source: self.clone(),
                    method: Arc::clone(method),
                    args: args.clone(),
                }));
        }

        executable(&ExecutionContext::new(self))
    }

    // -----------------------------------------------------------------------
    // Result handling shared by the resolvers
    // -----------------------------------------------------------------------

    /// Wrap an inheritable object in a facade sharing this facade's tracker
    pub(crate) fn rewrap(&self, value: Value) -> Result<Value> {
        match value {
            Value::Object(object)
                if self.config().rewrap_results && object.type_def().is_inheritable() =>
            {
                let facade = self.factory().over(Value::Object(object), self.path_tracker())?;
                Ok(Value::Facade(facade))
            }
            other => Ok(other),
        }
    }

    /// Rewrap a returned value, adopting a freshly built facade as a child
    pub(crate) fn adopt(&self, value: Value) -> Result<Value> {
        let wrapped = matches!(value, Value::Object(_));
        let value = self.rewrap(value)?;
        if wrapped && self.config().bind_rewrapped_parent {
            self.bind_child(&value);
        }
        Ok(value)
    }

    /// Make this facade the parent of `value` when it is another facade
    pub(crate) fn bind_child(&self, value: &Value) {
        if let Value::Facade(child) = value {
            if child != self {
                child.event_multicaster().set_parent(Some(self));
            }
        }
    }
}

impl PartialEq for Facade {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Facade {}

impl Hash for Facade {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.inner).hash(state);
    }
}

impl fmt::Display for Facade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "facade of {}", self.inner.declared.name())
    }
}

impl fmt::Debug for Facade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Facade")
            .field("type", &self.inner.declared.name())
            .field("delegate", &self.inner.delegate)
            .field("address", &Arc::as_ptr(&self.inner))
            .finish()
    }
}
