//! Executable resolution chain
//!
//! Every intercepted call is offered to an ordered list of resolvers. The
//! first resolver that recognises the call returns an [`Executable`], a
//! one-shot unit of behaviour run against an [`ExecutionContext`].

mod delegate;
mod element;
mod identity;
mod observable;
mod property;

pub use delegate::DelegateResolver;
pub use element::ElementResolver;
pub use identity::IdentityResolver;
pub use observable::ObservableResolver;
pub use property::PropertyStoreResolver;

use crate::error::Result;
use crate::event::{FacadeEvent, PropertyAccessEvent, PropertyChangeEvent};
use crate::facade::{Call, Facade};
use crate::model::Value;
use crate::store::PropertyStore;
use std::fmt;

/// Behaviour chosen for one intercepted call
pub type Executable<'a> = Box<dyn FnOnce(&ExecutionContext<'_>) -> Result<Value> + 'a>;

/// What an executable may touch while it runs: the facade's property store
/// and its event multicaster
pub struct ExecutionContext<'a> {
    facade: &'a Facade,
}

impl<'a> ExecutionContext<'a> {
    pub(crate) fn new(facade: &'a Facade) -> Self {
        Self { facade }
    }

    pub fn property_store(&self) -> &PropertyStore {
        self.facade.property_store()
    }

    /// Deliver an event through the facade's multicaster
    pub fn multicast(&self, event: FacadeEvent) {
        self.facade.event_multicaster().multicast(&event);
    }

    pub(crate) fn emit_access(&self, property_name: impl Into<String>, value: &Value) {
        self.multicast(FacadeEvent::PropertyAccess(PropertyAccessEvent {
            source: self.facade.clone(),
            property_name: property_name.into(),
            value: value.clone(),
        }));
    }

    pub(crate) fn emit_change(&self, property_name: &str, old_value: Value, new_value: Value) {
        self.multicast(FacadeEvent::PropertyChange(PropertyChangeEvent {
            source: self.facade.clone(),
            property_name: property_name.to_string(),
            old_value,
            new_value,
        }));
    }
}

/// One link of the chain
pub trait ExecutableResolver: Send + Sync {
    fn name(&self) -> &'static str;

    /// Build an executable for `call`, or `None` to defer to the next resolver
    fn resolve<'a>(&self, facade: &'a Facade, call: &'a Call) -> Option<Executable<'a>>;
}

/// Ordered resolvers of one facade
pub struct ResolverChain {
    resolvers: Vec<Box<dyn ExecutableResolver>>,
}

impl ResolverChain {
    /// Standard chain; delegate forwarding is included only for facades over an instance
    pub fn standard(with_delegate: bool) -> Self {
        let mut resolvers: Vec<Box<dyn ExecutableResolver>> =
            vec![Box::new(ObservableResolver), Box::new(ElementResolver)];
        if with_delegate {
            resolvers.push(Box::new(DelegateResolver));
        }
        resolvers.push(Box::new(PropertyStoreResolver));
        resolvers.push(Box::new(IdentityResolver));
        Self { resolvers }
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.resolvers.iter().map(|r| r.name()).collect()
    }

    /// First executable produced by any resolver, in chain order
    pub fn resolve<'a>(&self, facade: &'a Facade, call: &'a Call) -> Option<Executable<'a>> {
        self.resolvers
            .iter()
            .find_map(|resolver| resolver.resolve(facade, call))
    }
}

impl fmt::Debug for ResolverChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolverChain")
            .field("resolvers", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delegate_resolver_only_with_delegate() {
        assert_eq!(
            ResolverChain::standard(true).names(),
            vec!["observable", "element", "delegate", "property-store", "identity"]
        );
        assert_eq!(
            ResolverChain::standard(false).names(),
            vec!["observable", "element", "property-store", "identity"]
        );
    }
}
