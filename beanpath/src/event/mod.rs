//! Facade events and the listeners that consume them

mod multicaster;
mod tracker;

pub use multicaster::EventMulticaster;
pub use tracker::PropertyAccessTracker;

use crate::error::{FacadeError, Result};
use crate::facade::Facade;
use crate::model::{MethodDef, Value};
use std::fmt;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Event payloads
// ---------------------------------------------------------------------------

/// A domain method was called on a facade
#[derive(Debug, Clone)]
pub struct MethodInvocationEvent {
    pub source: Facade,
    pub method: Arc<MethodDef>,
    pub args: Vec<Value>,
}

/// A property (or collection element) was read
#[derive(Debug, Clone)]
pub struct PropertyAccessEvent {
    pub source: Facade,
    pub property_name: String,
    pub value: Value,
}

/// A property was written
#[derive(Debug, Clone)]
pub struct PropertyChangeEvent {
    pub source: Facade,
    pub property_name: String,
    pub old_value: Value,
    pub new_value: Value,
}

/// Category a listener subscribes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventCategory {
    MethodInvocation,
    PropertyAccess,
    PropertyChange,
}

impl EventCategory {
    /// Propagable events are also delivered to the parent facade
    pub fn is_propagable(self) -> bool {
        matches!(self, Self::PropertyAccess | Self::PropertyChange)
    }
}

/// Any event emitted by a facade
#[derive(Debug, Clone)]
pub enum FacadeEvent {
    MethodInvocation(MethodInvocationEvent),
    PropertyAccess(PropertyAccessEvent),
    PropertyChange(PropertyChangeEvent),
}

impl FacadeEvent {
    pub fn category(&self) -> EventCategory {
        match self {
            Self::MethodInvocation(_) => EventCategory::MethodInvocation,
            Self::PropertyAccess(_) => EventCategory::PropertyAccess,
            Self::PropertyChange(_) => EventCategory::PropertyChange,
        }
    }

    /// Facade the event originated from
    pub fn source(&self) -> &Facade {
        match self {
            Self::MethodInvocation(e) => &e.source,
            Self::PropertyAccess(e) => &e.source,
            Self::PropertyChange(e) => &e.source,
        }
    }
}

// ---------------------------------------------------------------------------
// Listeners
// ---------------------------------------------------------------------------

pub type MethodInvocationFn = Arc<dyn Fn(&MethodInvocationEvent) + Send + Sync>;
pub type PropertyAccessFn = Arc<dyn Fn(&PropertyAccessEvent) + Send + Sync>;
pub type PropertyChangeFn = Arc<dyn Fn(&PropertyChangeEvent) + Send + Sync>;

/// A listener interested in several categories at once
pub trait EventObserver: Send + Sync {
    /// Categories this observer wants; must not be empty
    fn categories(&self) -> Vec<EventCategory>;

    fn on_event(&self, event: &FacadeEvent);
}

/// A registered listener.
///
/// Each single-category variant holds the one callback its category needs.
/// Listeners are identified by the callback allocation, so registering a
/// clone of the same listener twice is a no-op.
#[derive(Clone)]
pub enum EventListener {
    MethodInvocation(MethodInvocationFn),
    PropertyAccess(PropertyAccessFn),
    PropertyChange(PropertyChangeFn),
    Observer(Arc<dyn EventObserver>),
}

impl EventListener {
    pub fn on_method_invocation<F>(callback: F) -> Self
    where
        F: Fn(&MethodInvocationEvent) + Send + Sync + 'static,
    {
        Self::MethodInvocation(Arc::new(callback))
    }

    pub fn on_property_access<F>(callback: F) -> Self
    where
        F: Fn(&PropertyAccessEvent) + Send + Sync + 'static,
    {
        Self::PropertyAccess(Arc::new(callback))
    }

    pub fn on_property_change<F>(callback: F) -> Self
    where
        F: Fn(&PropertyChangeEvent) + Send + Sync + 'static,
    {
        Self::PropertyChange(Arc::new(callback))
    }

    pub fn observer(observer: Arc<dyn EventObserver>) -> Self {
        Self::Observer(observer)
    }

    /// Categories this listener is registered under
    pub fn categories(&self) -> Result<Vec<EventCategory>> {
        let mut categories = match self {
            Self::MethodInvocation(_) => vec![EventCategory::MethodInvocation],
            Self::PropertyAccess(_) => vec![EventCategory::PropertyAccess],
            Self::PropertyChange(_) => vec![EventCategory::PropertyChange],
            Self::Observer(observer) => observer.categories(),
        };
        categories.sort();
        categories.dedup();
        if categories.is_empty() {
            return Err(FacadeError::invalid_argument(
                "listener does not handle any event category",
            ));
        }
        Ok(categories)
    }

    /// Whether both handles refer to the same listener
    pub fn same_as(&self, other: &EventListener) -> bool {
        self.identity() == other.identity()
    }

    fn identity(&self) -> *const () {
        match self {
            Self::MethodInvocation(f) => Arc::as_ptr(f) as *const (),
            Self::PropertyAccess(f) => Arc::as_ptr(f) as *const (),
            Self::PropertyChange(f) => Arc::as_ptr(f) as *const (),
            Self::Observer(o) => Arc::as_ptr(o) as *const (),
        }
    }

    pub(crate) fn deliver(&self, event: &FacadeEvent) {
        match (self, event) {
            (Self::MethodInvocation(f), FacadeEvent::MethodInvocation(e)) => f(e),
            (Self::PropertyAccess(f), FacadeEvent::PropertyAccess(e)) => f(e),
            (Self::PropertyChange(f), FacadeEvent::PropertyChange(e)) => f(e),
            (Self::Observer(o), event) => o.on_event(event),
            _ => {}
        }
    }
}

impl fmt::Debug for EventListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Self::MethodInvocation(_) => "MethodInvocation",
            Self::PropertyAccess(_) => "PropertyAccess",
            Self::PropertyChange(_) => "PropertyChange",
            Self::Observer(_) => "Observer",
        };
        write!(f, "EventListener::{}({:p})", kind, self.identity())
    }
}

impl<T: EventObserver + 'static> From<Arc<T>> for EventListener {
    fn from(observer: Arc<T>) -> Self {
        Self::Observer(observer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Silent;

    impl EventObserver for Silent {
        fn categories(&self) -> Vec<EventCategory> {
            Vec::new()
        }

        fn on_event(&self, _event: &FacadeEvent) {}
    }

    #[test]
    fn test_only_access_and_change_propagate() {
        assert!(!EventCategory::MethodInvocation.is_propagable());
        assert!(EventCategory::PropertyAccess.is_propagable());
        assert!(EventCategory::PropertyChange.is_propagable());
    }

    #[test]
    fn test_observer_without_categories_is_rejected() {
        let listener = EventListener::from(Arc::new(Silent));
        assert!(matches!(
            listener.categories(),
            Err(FacadeError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_listener_identity_follows_allocation() {
        let listener = EventListener::on_property_access(|_| {});
        let clone = listener.clone();
        let other = EventListener::on_property_access(|_| {});
        assert!(listener.same_as(&clone));
        assert!(!listener.same_as(&other));
        assert_eq!(
            listener.categories().unwrap(),
            vec![EventCategory::PropertyAccess]
        );
    }
}
