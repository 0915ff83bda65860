//! Declarative bean model
//!
//! Beans are described by registered [`TypeDef`]s rather than discovered at
//! runtime. A type lists its fields and methods up front, and every method's
//! role in the accessor/mutator protocol is fixed when it is declared.

pub mod method;
pub mod object;
pub mod registry;
pub mod types;
pub mod value;

pub use method::{decapitalize, IdentityMethod, MethodBody, MethodDef, MethodKind, NativeFn};
pub use object::{Elements, Object, ObjectRef};
pub use registry::{TypeRegistry, ARRAY_LIST, HASH_MAP, LIST, MAP, OBJECT};
pub use types::{
    CollectionKind, FieldDef, Initializer, TypeDef, TypeDefBuilder, TypeKind, ValueType,
    Visibility,
};
pub use value::{MapKey, Value};
