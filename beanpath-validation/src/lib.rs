//! # beanpath-validation
//!
//! Constraint checks over [`beanpath`] facades. A [`ValidationSession`] wraps
//! a bean, the caller reads values through the facade, and each failed check
//! is reported together with the path of the value that failed it.
//!
//! ```
//! use beanpath::{FacadeFactory, TypeDefBuilder, TypeRegistry, ValueType};
//! use beanpath_validation::{not_blank, CollectingReporter, ValidationSession};
//! use std::sync::Arc;
//!
//! let registry = Arc::new(TypeRegistry::new());
//! registry
//!     .register(TypeDefBuilder::class("Person").property("name", ValueType::Str))
//!     .unwrap();
//! let person = registry.instantiate("Person").unwrap();
//! person.write_field("name", "  ".into()).unwrap();
//!
//! let session = ValidationSession::new(FacadeFactory::new(registry), CollectingReporter::new());
//! let facade = session.wrap(person).unwrap();
//!
//! assert!(!session.check(facade.get("name").unwrap(), &not_blank()));
//! assert_eq!(session.reporter().paths(), vec!["name"]);
//! ```

mod constraint;
mod error;
mod report;
mod session;

pub use constraint::{constraint, not_blank, required, Constraint, FnConstraint};
pub use error::{Result, ValidationError};
pub use report::{CollectingReporter, ConstraintViolation, TracingReporter, ViolationReporter};
pub use session::ValidationSession;
