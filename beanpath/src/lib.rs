//! # beanpath
//!
//! Intercepting facades over bean-like object graphs.
//!
//! A facade stands in for a bean and watches every call made through it.
//! Navigating the facade (a getter, an indexed element, a nested getter)
//! leaves a trail in a [`PathTracker`], so a caller checking a value can ask
//! where that value lives, for example `activities[1].start`, without ever
//! spelling the path out.
//!
//! ## Quick start
//!
//! ```
//! use beanpath::{FacadeFactory, TypeDefBuilder, TypeRegistry, Value, ValueType};
//! use std::sync::Arc;
//!
//! let registry = Arc::new(TypeRegistry::new());
//! registry
//!     .register(TypeDefBuilder::class("Activity").property("start", ValueType::Str))
//!     .unwrap();
//! registry
//!     .register(TypeDefBuilder::class("Person").property("activities", ValueType::object("List")))
//!     .unwrap();
//!
//! let activity = registry.instantiate("Activity").unwrap();
//! let person = registry.instantiate("Person").unwrap();
//! let activities = registry.new_list([Value::Null, Value::from(activity)]).unwrap();
//! person.write_field("activities", Value::from(activities)).unwrap();
//!
//! let factory = FacadeFactory::new(registry);
//! let facade = factory.over(person, &factory.tracker()).unwrap();
//!
//! facade
//!     .get("activities").unwrap()
//!     .into_facade().unwrap()
//!     .element(1).unwrap()
//!     .into_facade().unwrap()
//!     .get("start").unwrap();
//! assert_eq!(facade.render_current_path(), "activities[1].start");
//! ```
//!
//! ## Building blocks
//!
//! - [`model`]: declared types, instances and values
//! - [`PathTracker`]: segment stack rendered into dotted paths
//! - [`PropertyStore`]: backing for facades without an instance
//! - [`event`]: events, listeners and the per-facade multicaster
//! - [`resolver`]: the chain that picks the behaviour of each call
//! - [`Facade`] and [`FacadeFactory`]: the facades themselves

pub mod config;
pub mod error;
pub mod event;
pub mod facade;
pub mod model;
pub mod path;
pub mod resolver;
pub mod store;

pub use config::FacadeConfig;
pub use error::{ErrorSeverity, FacadeError, Result, Severity};
pub use event::{
    EventCategory, EventListener, EventMulticaster, EventObserver, FacadeEvent,
    MethodInvocationEvent, PropertyAccessEvent, PropertyAccessTracker, PropertyChangeEvent,
};
pub use facade::{Call, Facade, FacadeFactory, FacadeType, ObservableCall, WeakFacade};
pub use model::{
    CollectionKind, FieldDef, IdentityMethod, MapKey, MethodBody, MethodDef, MethodKind, Object,
    ObjectRef, TypeDef, TypeDefBuilder, TypeKind, TypeRegistry, Value, ValueType, Visibility,
};
pub use path::{PathTracker, PropertyPath};
pub use resolver::{ExecutableResolver, ExecutionContext, ResolverChain};
pub use store::{PropertySnapshot, PropertyStore};
