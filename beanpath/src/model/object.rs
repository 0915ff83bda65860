//! Bean instances with interior-mutable slots

use crate::error::{FacadeError, Result};
use crate::model::types::{CollectionKind, TypeDef};
use crate::model::value::{MapKey, Value};
use indexmap::IndexMap;
use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Shared handle to a bean instance
pub type ObjectRef = Arc<Object>;

/// Element storage of collection-shaped instances
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Elements {
    #[default]
    None,
    List(Vec<Value>),
    Map(IndexMap<MapKey, Value>),
}

impl Elements {
    fn for_kind(kind: Option<CollectionKind>) -> Self {
        match kind {
            Some(CollectionKind::List) => Elements::List(Vec::new()),
            Some(CollectionKind::Map) => Elements::Map(IndexMap::new()),
            None => Elements::None,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Elements::None => 0,
            Elements::List(items) => items.len(),
            Elements::Map(entries) => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Default)]
struct Slots {
    fields: IndexMap<String, Value>,
    elements: Elements,
}

/// An instance of a registered [`TypeDef`]
pub struct Object {
    type_def: Arc<TypeDef>,
    slots: RwLock<Slots>,
}

impl Object {
    /// Allocate an instance and run every initializer, root type first
    pub(crate) fn new(type_def: Arc<TypeDef>) -> ObjectRef {
        let object = Self::shell(type_def);
        let mut lineage: Vec<_> = object.type_def.ancestors().collect();
        lineage.reverse();
        for ancestor in lineage {
            if let Some(initializer) = ancestor.initializer() {
                initializer(&*object);
            }
        }
        object
    }

    /// Allocate an instance holding zero values, without running any initializer
    pub(crate) fn shell(type_def: Arc<TypeDef>) -> ObjectRef {
        let fields = type_def
            .instance_fields()
            .into_iter()
            .map(|field| {
                let zero = field.value_type().zero_value();
                (field.name().to_string(), zero)
            })
            .collect();
        let elements = Elements::for_kind(type_def.collection());
        Arc::new(Self {
            type_def,
            slots: RwLock::new(Slots { fields, elements }),
        })
    }

    pub fn type_def(&self) -> &Arc<TypeDef> {
        &self.type_def
    }

    pub fn type_name(&self) -> &str {
        self.type_def.name()
    }

    fn read(&self) -> RwLockReadGuard<'_, Slots> {
        self.slots.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Slots> {
        self.slots.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Current value of a field; null when the type has no such field
    pub fn read_field(&self, name: &str) -> Value {
        self.read().fields.get(name).cloned().unwrap_or_default()
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.read().fields.contains_key(name)
    }

    /// Assign a field, checking the value against the field's declared type
    pub fn write_field(&self, name: &str, value: Value) -> Result<()> {
        let field = self.type_def.find_field(name).ok_or_else(|| {
            FacadeError::invalid_argument(format!("{} has no field '{}'", self.type_name(), name))
        })?;
        if !field.value_type().accepts(&value) {
            return Err(FacadeError::invalid_argument(format!(
                "field {}.{} of type {} cannot hold {}",
                self.type_name(),
                name,
                field.value_type(),
                value.type_name()
            )));
        }
        self.write().fields.insert(name.to_string(), value);
        Ok(())
    }

    /// Element at a list index or map key
    pub fn element(&self, key: &Value) -> Result<Value> {
        let slots = self.read();
        match &slots.elements {
            Elements::List(items) => {
                let index = key.as_int().ok_or_else(|| {
                    FacadeError::invalid_argument(format!(
                        "list index must be an int, got {}",
                        key.type_name()
                    ))
                })?;
                usize::try_from(index)
                    .ok()
                    .and_then(|i| items.get(i))
                    .cloned()
                    .ok_or_else(|| {
                        FacadeError::method_failed(
                            "get",
                            format!("index {} out of bounds for length {}", index, items.len()),
                        )
                    })
            }
            Elements::Map(entries) => {
                let key = MapKey::try_from(key)?;
                Ok(entries.get(&key).cloned().unwrap_or_default())
            }
            Elements::None => Err(FacadeError::unsupported(self.type_name(), "get")),
        }
    }

    /// Append to a list-shaped instance
    pub fn push(&self, value: impl Into<Value>) -> Result<()> {
        match &mut self.write().elements {
            Elements::List(items) => {
                items.push(value.into());
                Ok(())
            }
            _ => Err(FacadeError::unsupported(self.type_name(), "add")),
        }
    }

    /// Insert into a map-shaped instance, returning the previous value or null
    pub fn put(&self, key: impl Into<Value>, value: impl Into<Value>) -> Result<Value> {
        let key: Value = key.into();
        let key = MapKey::try_from(&key)?;
        match &mut self.write().elements {
            Elements::Map(entries) => Ok(entries.insert(key, value.into()).unwrap_or_default()),
            _ => Err(FacadeError::unsupported(self.type_name(), "put")),
        }
    }

    /// Number of elements; zero for non-collection instances
    pub fn len(&self) -> usize {
        self.read().elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn elements(&self) -> Elements {
        self.read().elements.clone()
    }

    pub(crate) fn set_elements(&self, elements: Elements) {
        self.write().elements = elements;
    }

    /// Call a method by name on this instance, with no interception.
    ///
    /// Resolves the nearest native implementation along the superclass chain.
    pub fn invoke(self: &Arc<Self>, name: &str, args: &[Value]) -> Result<Value> {
        let method = self
            .type_def
            .find_invocable(name, args.len())
            .ok_or_else(|| FacadeError::unsupported(self.type_name(), name))?;
        method.invoke(self, args)
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{:x}", self.type_name(), self as *const Self as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::{TypeDefBuilder, ValueType};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counted_type(counter: Arc<AtomicUsize>) -> Arc<TypeDef> {
        Arc::new(
            TypeDefBuilder::class("Counter")
                .property("label", ValueType::Str)
                .field("height", ValueType::Int)
                .initializer(move |this| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    let _ = this.write_field("label", Value::from("fresh"));
                })
                .build(None, Vec::new()),
        )
    }

    #[test]
    fn test_new_runs_initializer_and_shell_does_not() {
        let counter = Arc::new(AtomicUsize::new(0));
        let type_def = counted_type(Arc::clone(&counter));

        let created = Object::new(Arc::clone(&type_def));
        assert_eq!(created.read_field("label"), Value::from("fresh"));
        assert_eq!(counter.load(Ordering::SeqCst), 1);

        let shell = Object::shell(type_def);
        assert_eq!(shell.read_field("label"), Value::Null);
        assert_eq!(shell.read_field("height"), Value::Int(0));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_write_field_checks_type() {
        let object = Object::shell(counted_type(Arc::new(AtomicUsize::new(0))));
        assert!(object.write_field("height", Value::from(180)).is_ok());
        assert!(matches!(
            object.write_field("height", Value::from("tall")),
            Err(FacadeError::InvalidArgument(_))
        ));
        assert!(object.write_field("missing", Value::Null).is_err());
    }

    #[test]
    fn test_invoke_runs_native_accessor() {
        let object = Object::shell(counted_type(Arc::new(AtomicUsize::new(0))));
        object.invoke("setLabel", &[Value::from("x")]).unwrap();
        assert_eq!(object.invoke("getLabel", &[]).unwrap(), Value::from("x"));
        assert!(matches!(
            object.invoke("getWeight", &[]),
            Err(FacadeError::UnsupportedOperation { .. })
        ));
    }

    #[test]
    fn test_non_collection_has_no_elements() {
        let object = Object::shell(counted_type(Arc::new(AtomicUsize::new(0))));
        assert!(object.is_empty());
        assert!(object.push(Value::from(1)).is_err());
        assert!(object.element(&Value::from(0)).is_err());
    }
}
