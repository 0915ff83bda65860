use super::{EventCategory, EventListener, FacadeEvent};
use crate::error::Result;
use crate::facade::{Facade, WeakFacade};
use indexmap::IndexMap;
use parking_lot::{ReentrantMutex, RwLock};
use std::cell::RefCell;
use tracing::trace;

type Registry = IndexMap<EventCategory, Vec<EventListener>>;

/// Per-facade listener registry with propagation to a parent facade.
///
/// One reentrant mutex guards the registry and is held while local listeners
/// run. Registration changes from other threads wait for an in-flight
/// dispatch to finish, while a listener may still call back into the facade
/// that notified it on the same thread.
#[derive(Default)]
pub struct EventMulticaster {
    listeners: ReentrantMutex<RefCell<Registry>>,
    parent: RwLock<Option<WeakFacade>>,
}

impl EventMulticaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener under every category it handles
    pub fn add_listener(&self, listener: EventListener) -> Result<()> {
        let categories = listener.categories()?;
        let guard = self.listeners.lock();
        let mut registry = guard.borrow_mut();
        for category in categories {
            let registered = registry.entry(category).or_default();
            if !registered.iter().any(|known| known.same_as(&listener)) {
                registered.push(listener.clone());
            }
        }
        Ok(())
    }

    /// Unregister a listener from every category it handles
    pub fn remove_listener(&self, listener: &EventListener) -> Result<()> {
        let categories = listener.categories()?;
        let guard = self.listeners.lock();
        let mut registry = guard.borrow_mut();
        for category in categories {
            if let Some(registered) = registry.get_mut(&category) {
                registered.retain(|known| !known.same_as(listener));
            }
        }
        Ok(())
    }

    pub fn remove_all_listeners(&self) {
        self.listeners.lock().borrow_mut().clear();
    }

    /// Number of registrations for a category
    pub fn listener_count(&self, category: EventCategory) -> usize {
        self.listeners
            .lock()
            .borrow()
            .get(&category)
            .map_or(0, Vec::len)
    }

    /// Deliver an event: parent first for propagable events, then local listeners
    /// in registration order.
    ///
    /// The parent is notified before this registry is locked. Listeners on
    /// two facades that call into each other from different threads can
    /// deadlock.
    pub fn multicast(&self, event: &FacadeEvent) {
        let category = event.category();
        if category.is_propagable() {
            if let Some(parent) = self.parent() {
                trace!("propagating {:?} to {}", category, parent);
                parent.event_multicaster().multicast(event);
            }
        }

        let guard = self.listeners.lock();
        let snapshot = guard.borrow().get(&category).cloned().unwrap_or_default();
        for listener in &snapshot {
            listener.deliver(event);
        }
    }

    /// Parent facade, if one is set and still alive
    pub fn parent(&self) -> Option<Facade> {
        self.parent.read().as_ref().and_then(WeakFacade::upgrade)
    }

    pub fn set_parent(&self, parent: Option<&Facade>) {
        *self.parent.write() = parent.map(Facade::downgrade);
    }
}

impl std::fmt::Debug for EventMulticaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let counts: Vec<_> = {
            let guard = self.listeners.lock();
            let registry = guard.borrow();
            registry
                .iter()
                .map(|(category, listeners)| (*category, listeners.len()))
                .collect()
        };
        f.debug_struct("EventMulticaster")
            .field("listeners", &counts)
            .field("has_parent", &self.parent().is_some())
            .finish()
    }
}
