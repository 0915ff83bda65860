//! Type schema: declared types, their fields, and their methods
//!
//! A [`TypeDef`] plays the part of a class or interface. Types are assembled
//! with a [`TypeDefBuilder`] and registered in a
//! [`TypeRegistry`](crate::TypeRegistry), which resolves superclass and
//! interface names into shared `Arc<TypeDef>` links.

use crate::error::Result;
use crate::model::method::MethodDef;
use crate::model::object::{Object, ObjectRef};
use crate::model::value::Value;
use std::fmt;
use std::sync::Arc;

/// Declared type of a field, parameter or return value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueType {
    /// Accepts every value
    Any,
    Bool,
    Int,
    Float,
    /// String, possibly null
    Str,
    /// Reference to a registered type, possibly null
    Object(String),
}

impl ValueType {
    /// Reference to a registered type by name
    pub fn object(name: impl Into<String>) -> Self {
        ValueType::Object(name.into())
    }

    /// Primitive types never hold null
    pub fn is_primitive(&self) -> bool {
        matches!(self, ValueType::Bool | ValueType::Int | ValueType::Float)
    }

    /// Zero value: `false`, `0`, `0.0` for primitives, null otherwise
    pub fn zero_value(&self) -> Value {
        match self {
            ValueType::Bool => Value::Bool(false),
            ValueType::Int => Value::Int(0),
            ValueType::Float => Value::Float(0.0),
            _ => Value::Null,
        }
    }

    pub fn object_type_name(&self) -> Option<&str> {
        match self {
            ValueType::Object(name) => Some(name.as_str()),
            _ => None,
        }
    }

    /// Check whether `value` may be stored in a slot of this type
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (ValueType::Any, _) => true,
            (ValueType::Bool, Value::Bool(_)) => true,
            (ValueType::Int, Value::Int(_)) => true,
            (ValueType::Float, Value::Float(_)) => true,
            (ValueType::Str, Value::Str(_) | Value::Null) => true,
            (ValueType::Object(_), Value::Null) => true,
            (ValueType::Object(name), Value::Object(object)) => {
                object.type_def().is_subtype_of(name)
            }
            (ValueType::Object(name), Value::Facade(facade)) => facade.is_assignable_to(name),
            _ => false,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Any => write!(f, "any"),
            ValueType::Bool => write!(f, "bool"),
            ValueType::Int => write!(f, "int"),
            ValueType::Float => write!(f, "float"),
            ValueType::Str => write!(f, "string"),
            ValueType::Object(name) => write!(f, "{}", name),
        }
    }
}

/// Access level of a type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Package,
    Private,
}

impl Visibility {
    /// Public and protected types can be extended from outside their module
    pub fn is_accessible(self) -> bool {
        matches!(self, Visibility::Public | Visibility::Protected)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Class,
    Interface,
}

/// Shape of collection-like types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionKind {
    List,
    Map,
}

/// A field declared on a type
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    name: String,
    value_type: ValueType,
    is_static: bool,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            value_type,
            is_static: false,
        }
    }

    /// A type-level field, never part of an instance snapshot
    pub fn new_static(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            is_static: true,
            ..Self::new(name, value_type)
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value_type(&self) -> &ValueType {
        &self.value_type
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }
}

/// Constructor logic run by [`Object::new`] and skipped by [`Object::shell`]
pub type Initializer = Arc<dyn Fn(&Object) + Send + Sync>;

/// A registered class or interface
pub struct TypeDef {
    name: String,
    kind: TypeKind,
    visibility: Visibility,
    is_final: bool,
    collection: Option<CollectionKind>,
    superclass: Option<Arc<TypeDef>>,
    interfaces: Vec<Arc<TypeDef>>,
    fields: Vec<FieldDef>,
    methods: Vec<Arc<MethodDef>>,
    initializer: Option<Initializer>,
}

impl TypeDef {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    pub fn is_final(&self) -> bool {
        self.is_final
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn superclass(&self) -> Option<&Arc<TypeDef>> {
        self.superclass.as_ref()
    }

    /// Interfaces implemented directly by this type
    pub fn interfaces(&self) -> &[Arc<TypeDef>] {
        &self.interfaces
    }

    /// Fields declared directly on this type, static ones included
    pub fn declared_fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Methods declared directly on this type
    pub fn declared_methods(&self) -> &[Arc<MethodDef>] {
        &self.methods
    }

    pub fn initializer(&self) -> Option<&Initializer> {
        self.initializer.as_ref()
    }

    /// Collection shape declared directly on this type
    pub fn declared_collection(&self) -> Option<CollectionKind> {
        self.collection
    }

    /// Collection shape of this type or any supertype
    pub fn collection(&self) -> Option<CollectionKind> {
        self.collection
            .or_else(|| self.superclass.as_ref().and_then(|s| s.collection()))
            .or_else(|| self.interfaces.iter().find_map(|i| i.collection()))
    }

    /// A class that is neither final nor hidden can serve as a facade base
    pub fn is_inheritable(&self) -> bool {
        self.kind == TypeKind::Class && !self.is_final && self.visibility.is_accessible()
    }

    /// This type followed by its superclass chain up to the root
    pub fn ancestors(self: &Arc<Self>) -> impl Iterator<Item = Arc<TypeDef>> {
        std::iter::successors(Some(Arc::clone(self)), |t| t.superclass.clone())
    }

    /// Whether this type is, extends, or implements the named type
    pub fn is_subtype_of(&self, name: &str) -> bool {
        self.name == name
            || self
                .superclass
                .as_ref()
                .is_some_and(|s| s.is_subtype_of(name))
            || self.interfaces.iter().any(|i| i.is_subtype_of(name))
    }

    /// Every interface implemented by this type or its ancestors, deduplicated
    pub fn all_interfaces(&self) -> Vec<Arc<TypeDef>> {
        let mut result: Vec<Arc<TypeDef>> = Vec::new();
        self.collect_interfaces(&mut result);
        result
    }

    fn collect_interfaces(&self, into: &mut Vec<Arc<TypeDef>>) {
        for interface in &self.interfaces {
            if !into.iter().any(|known| known.name == interface.name) {
                into.push(Arc::clone(interface));
                interface.collect_interfaces(into);
            }
        }
        if let Some(superclass) = &self.superclass {
            superclass.collect_interfaces(into);
        }
    }

    /// Non-static fields across the superclass chain, root type first
    pub fn instance_fields(&self) -> Vec<FieldDef> {
        let mut fields = self
            .superclass
            .as_ref()
            .map(|s| s.instance_fields())
            .unwrap_or_default();
        fields.extend(self.fields.iter().filter(|f| !f.is_static).cloned());
        fields
    }

    /// Look up an instance field anywhere in the superclass chain
    pub fn find_field(&self, name: &str) -> Option<FieldDef> {
        self.fields
            .iter()
            .find(|f| !f.is_static && f.name == name)
            .cloned()
            .or_else(|| self.superclass.as_ref().and_then(|s| s.find_field(name)))
    }

    /// Find a method by name and arity: superclass chain first, then interfaces
    pub fn find_method(&self, name: &str, arity: usize) -> Option<Arc<MethodDef>> {
        self.find_class_method(name, arity, false).or_else(|| {
            self.all_interfaces().into_iter().find_map(|interface| {
                interface
                    .methods
                    .iter()
                    .find(|m| m.name() == name && m.arity() == arity)
                    .cloned()
            })
        })
    }

    /// Find the nearest method with a native body along the superclass chain
    pub fn find_invocable(&self, name: &str, arity: usize) -> Option<Arc<MethodDef>> {
        self.find_class_method(name, arity, true)
    }

    fn find_class_method(&self, name: &str, arity: usize, invocable: bool) -> Option<Arc<MethodDef>> {
        self.methods
            .iter()
            .find(|m| m.name() == name && m.arity() == arity && (!invocable || m.is_invocable()))
            .cloned()
            .or_else(|| {
                self.superclass
                    .as_ref()
                    .and_then(|s| s.find_class_method(name, arity, invocable))
            })
    }
}

impl fmt::Debug for TypeDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDef")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("is_final", &self.is_final)
            .field("superclass", &self.superclass.as_ref().map(|s| s.name.clone()))
            .field(
                "interfaces",
                &self.interfaces.iter().map(|i| i.name.clone()).collect::<Vec<_>>(),
            )
            .field("fields", &self.fields)
            .field("methods", &self.methods.len())
            .finish()
    }
}

/// Builder for [`TypeDef`]; supertypes are referenced by name
pub struct TypeDefBuilder {
    name: String,
    kind: TypeKind,
    visibility: Visibility,
    is_final: bool,
    collection: Option<CollectionKind>,
    superclass: Option<String>,
    interfaces: Vec<String>,
    fields: Vec<FieldDef>,
    methods: Vec<MethodDef>,
    initializer: Option<Initializer>,
}

impl TypeDefBuilder {
    fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            visibility: Visibility::Public,
            is_final: false,
            collection: None,
            superclass: None,
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            initializer: None,
        }
    }

    /// Start a class; it extends the root type unless [`extends`](Self::extends) says otherwise
    pub fn class(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Class)
    }

    pub fn interface(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Interface)
    }

    /// Forbid subclassing
    pub fn make_final(mut self) -> Self {
        self.is_final = true;
        self
    }

    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn extends(mut self, superclass: impl Into<String>) -> Self {
        self.superclass = Some(superclass.into());
        self
    }

    pub fn implements(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    pub fn field(mut self, name: impl Into<String>, value_type: ValueType) -> Self {
        self.fields.push(FieldDef::new(name, value_type));
        self
    }

    pub fn static_field(mut self, name: impl Into<String>, value_type: ValueType) -> Self {
        self.fields.push(FieldDef::new_static(name, value_type));
        self
    }

    pub fn method(mut self, method: MethodDef) -> Self {
        self.methods.push(method);
        self
    }

    /// Field-backed property with an accessor and a mutator.
    ///
    /// Boolean properties get an `is<X>` accessor, everything else `get<X>`.
    pub fn property(self, name: &str, value_type: ValueType) -> Self {
        let setter = MethodDef::setter(name, value_type.clone()).with_body(field_setter(name));
        self.readonly_property(name, value_type).method(setter)
    }

    /// Field-backed property with an accessor only
    pub fn readonly_property(self, name: &str, value_type: ValueType) -> Self {
        let getter = if value_type == ValueType::Bool {
            MethodDef::flag(name)
        } else {
            MethodDef::getter(name, value_type.clone())
        };
        let field = name.to_string();
        self.field(name, value_type)
            .method(getter.with_body(move |this, _| Ok(this.read_field(&field))))
    }

    /// Abstract accessor and mutator, as declared by an interface
    pub fn abstract_property(self, name: &str, value_type: ValueType) -> Self {
        let getter = if value_type == ValueType::Bool {
            MethodDef::flag(name)
        } else {
            MethodDef::getter(name, value_type.clone())
        };
        self.method(getter).method(MethodDef::setter(name, value_type))
    }

    /// Constructor logic, run on [`Object::new`] only
    pub fn initializer<F>(mut self, initializer: F) -> Self
    where
        F: Fn(&Object) + Send + Sync + 'static,
    {
        self.initializer = Some(Arc::new(initializer));
        self
    }

    pub(crate) fn collection(mut self, kind: CollectionKind) -> Self {
        self.collection = Some(kind);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    pub(crate) fn superclass_name(&self) -> Option<&str> {
        self.superclass.as_deref()
    }

    pub(crate) fn interface_names(&self) -> &[String] {
        &self.interfaces
    }

    pub(crate) fn build(
        self,
        superclass: Option<Arc<TypeDef>>,
        interfaces: Vec<Arc<TypeDef>>,
    ) -> TypeDef {
        TypeDef {
            name: self.name,
            kind: self.kind,
            visibility: self.visibility,
            is_final: self.is_final,
            collection: self.collection,
            superclass,
            interfaces,
            fields: self.fields,
            methods: self.methods.into_iter().map(Arc::new).collect(),
            initializer: self.initializer,
        }
    }
}

fn field_setter(name: &str) -> impl Fn(&ObjectRef, &[Value]) -> Result<Value> + Send + Sync + 'static {
    let field = name.to_string();
    move |this, args| {
        let value = args.first().cloned().unwrap_or_default();
        this.write_field(&field, value)?;
        Ok(Value::Null)
    }
}

impl fmt::Debug for TypeDefBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDefBuilder")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("superclass", &self.superclass)
            .field("interfaces", &self.interfaces)
            .finish()
    }
}
