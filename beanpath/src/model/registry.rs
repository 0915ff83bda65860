//! Registry of declared types

use crate::error::{FacadeError, Result};
use crate::model::method::MethodDef;
use crate::model::object::{Object, ObjectRef};
use crate::model::types::{CollectionKind, TypeDef, TypeDefBuilder, TypeKind, ValueType};
use crate::model::value::Value;
use indexmap::IndexMap;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// Name of the root class every class ultimately extends
pub const OBJECT: &str = "Object";
/// Built-in list interface
pub const LIST: &str = "List";
/// Built-in map interface
pub const MAP: &str = "Map";
/// Built-in concrete list class
pub const ARRAY_LIST: &str = "ArrayList";
/// Built-in concrete map class
pub const HASH_MAP: &str = "HashMap";

/// Name-indexed registry of [`TypeDef`]s.
///
/// A new registry already holds the root `Object` class, the `List` and
/// `Map` interfaces and their `ArrayList` / `HashMap` implementations.
/// Types must be registered after the types they extend or implement.
pub struct TypeRegistry {
    root: Arc<TypeDef>,
    types: RwLock<IndexMap<String, Arc<TypeDef>>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        let root = Arc::new(root_type());
        let mut types = IndexMap::new();
        types.insert(OBJECT.to_string(), Arc::clone(&root));
        let registry = Self {
            root,
            types: RwLock::new(types),
        };
        for builder in builtin_types() {
            // Built-ins reference only each other and the root, in order
            if let Err(error) = registry.register(builder) {
                debug!("skipping built-in type: {}", error);
            }
        }
        registry
    }

    /// Register a type, resolving its superclass and interfaces by name.
    ///
    /// Classes without an explicit superclass extend `Object`.
    pub fn register(&self, builder: TypeDefBuilder) -> Result<Arc<TypeDef>> {
        let mut types = self.types.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        if types.contains_key(builder.name()) {
            return Err(FacadeError::invalid_argument(format!(
                "type '{}' is already registered",
                builder.name()
            )));
        }

        let superclass = match (builder.kind(), builder.superclass_name()) {
            (TypeKind::Interface, Some(name)) => {
                return Err(FacadeError::invalid_argument(format!(
                    "interface '{}' cannot extend class '{}'",
                    builder.name(),
                    name
                )));
            }
            (TypeKind::Interface, None) => None,
            (TypeKind::Class, name) => {
                let name = name.unwrap_or(OBJECT);
                let superclass = types
                    .get(name)
                    .cloned()
                    .ok_or_else(|| FacadeError::UnknownType(name.to_string()))?;
                if superclass.is_interface() || superclass.is_final() {
                    return Err(FacadeError::invalid_argument(format!(
                        "'{}' cannot extend '{}'",
                        builder.name(),
                        name
                    )));
                }
                Some(superclass)
            }
        };

        let interfaces = builder
            .interface_names()
            .iter()
            .map(|name| {
                let interface = types
                    .get(name)
                    .cloned()
                    .ok_or_else(|| FacadeError::UnknownType(name.clone()))?;
                if !interface.is_interface() {
                    return Err(FacadeError::invalid_argument(format!(
                        "'{}' is not an interface",
                        name
                    )));
                }
                Ok(interface)
            })
            .collect::<Result<Vec<_>>>()?;

        let type_def = Arc::new(builder.build(superclass, interfaces));
        debug!("registered type {}", type_def.name());
        types.insert(type_def.name().to_string(), Arc::clone(&type_def));
        Ok(type_def)
    }

    /// Look up a type by name
    pub fn get(&self, name: &str) -> Option<Arc<TypeDef>> {
        self.types
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(name)
            .cloned()
    }

    /// Look up a type by name, failing with [`FacadeError::UnknownType`]
    pub fn lookup(&self, name: &str) -> Result<Arc<TypeDef>> {
        self.get(name)
            .ok_or_else(|| FacadeError::UnknownType(name.to_string()))
    }

    /// The root class
    pub fn object_type(&self) -> Arc<TypeDef> {
        Arc::clone(&self.root)
    }

    /// Registered type names in registration order
    pub fn type_names(&self) -> Vec<String> {
        self.types
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .keys()
            .cloned()
            .collect()
    }

    /// Create an instance of a class, running its initializers
    pub fn instantiate(&self, name: &str) -> Result<ObjectRef> {
        let type_def = self.lookup(name)?;
        if type_def.is_interface() {
            return Err(FacadeError::invalid_argument(format!(
                "cannot instantiate interface '{}'",
                name
            )));
        }
        Ok(Object::new(type_def))
    }

    /// Create an `ArrayList` holding the given values
    pub fn new_list<I, V>(&self, values: I) -> Result<ObjectRef>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let list = self.instantiate(ARRAY_LIST)?;
        for value in values {
            list.push(value)?;
        }
        Ok(list)
    }

    /// Create a `HashMap` holding the given entries
    pub fn new_map<I, K, V>(&self, entries: I) -> Result<ObjectRef>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Value>,
        V: Into<Value>,
    {
        let map = self.instantiate(HASH_MAP)?;
        for (key, value) in entries {
            map.put(key, value)?;
        }
        Ok(map)
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("types", &self.type_names())
            .finish()
    }
}

fn root_type() -> TypeDef {
    TypeDefBuilder::class(OBJECT)
        .method(MethodDef::new("equals", vec![ValueType::Any], Some(ValueType::Bool)).intrinsic())
        .method(MethodDef::new("hashCode", Vec::new(), Some(ValueType::Int)).intrinsic())
        .method(MethodDef::new("toString", Vec::new(), Some(ValueType::Str)).intrinsic())
        .build(None, Vec::new())
}

fn size_method() -> MethodDef {
    MethodDef::new("size", Vec::new(), Some(ValueType::Int))
}

fn builtin_types() -> Vec<TypeDefBuilder> {
    vec![
        TypeDefBuilder::interface(LIST)
            .collection(CollectionKind::List)
            .method(MethodDef::new("get", vec![ValueType::Int], Some(ValueType::Any)))
            .method(size_method()),
        TypeDefBuilder::interface(MAP)
            .collection(CollectionKind::Map)
            .method(MethodDef::new("get", vec![ValueType::Any], Some(ValueType::Any)))
            .method(MethodDef::new(
                "put",
                vec![ValueType::Any, ValueType::Any],
                Some(ValueType::Any),
            ))
            .method(size_method()),
        TypeDefBuilder::class(ARRAY_LIST)
            .implements(LIST)
            .method(
                MethodDef::new("get", vec![ValueType::Int], Some(ValueType::Any))
                    .with_body(|this, args| this.element(&args[0])),
            )
            .method(
                MethodDef::new("add", vec![ValueType::Any], Some(ValueType::Bool)).with_body(
                    |this, args| {
                        this.push(args[0].clone())?;
                        Ok(Value::Bool(true))
                    },
                ),
            )
            .method(size_method().with_body(|this, _| Ok(Value::from(this.len())))),
        TypeDefBuilder::class(HASH_MAP)
            .implements(MAP)
            .method(
                MethodDef::new("get", vec![ValueType::Any], Some(ValueType::Any))
                    .with_body(|this, args| this.element(&args[0])),
            )
            .method(
                MethodDef::new(
                    "put",
                    vec![ValueType::Any, ValueType::Any],
                    Some(ValueType::Any),
                )
                .with_body(|this, args| this.put(args[0].clone(), args[1].clone())),
            )
            .method(size_method().with_body(|this, _| Ok(Value::from(this.len())))),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_are_seeded() {
        let registry = TypeRegistry::new();
        assert_eq!(
            registry.type_names(),
            vec![OBJECT, LIST, MAP, ARRAY_LIST, HASH_MAP]
        );
        let list = registry.lookup(ARRAY_LIST).unwrap();
        assert!(list.is_subtype_of(LIST));
        assert!(list.is_subtype_of(OBJECT));
        assert_eq!(list.collection(), Some(CollectionKind::List));
    }

    #[test]
    fn test_register_defaults_superclass_to_root() {
        let registry = TypeRegistry::new();
        let person = registry
            .register(TypeDefBuilder::class("Person").property("name", ValueType::Str))
            .unwrap();
        assert_eq!(person.superclass().map(|s| s.name()), Some(OBJECT));
        assert!(person.find_method("hashCode", 0).is_some());
    }

    #[test]
    fn test_register_rejects_duplicates_and_unknown_names() {
        let registry = TypeRegistry::new();
        registry.register(TypeDefBuilder::interface("Named")).unwrap();
        assert!(matches!(
            registry.register(TypeDefBuilder::interface("Named")),
            Err(FacadeError::InvalidArgument(_))
        ));
        assert_eq!(
            registry
                .register(TypeDefBuilder::class("Ghost").implements("Haunted"))
                .unwrap_err(),
            FacadeError::UnknownType("Haunted".into())
        );
    }

    #[test]
    fn test_cannot_extend_final_class() {
        let registry = TypeRegistry::new();
        registry
            .register(TypeDefBuilder::class("Sealed").make_final())
            .unwrap();
        assert!(registry
            .register(TypeDefBuilder::class("Child").extends("Sealed"))
            .is_err());
    }

    #[test]
    fn test_collections_behave_natively() {
        let registry = TypeRegistry::new();
        let list = registry.new_list(["a", "b"]).unwrap();
        assert_eq!(list.invoke("get", &[Value::from(1)]).unwrap(), Value::from("b"));
        assert_eq!(list.invoke("size", &[]).unwrap(), Value::from(2));

        let map = registry.new_map([("Frank", 1)]).unwrap();
        assert_eq!(map.invoke("get", &[Value::from("Frank")]).unwrap(), Value::from(1));
        assert_eq!(map.invoke("get", &[Value::from("Joe")]).unwrap(), Value::Null);
        assert!(registry.instantiate(LIST).is_err());
    }
}
