//! Dynamic values flowing through facades

use crate::error::{FacadeError, Result};
use crate::facade::Facade;
use crate::model::object::ObjectRef;
use std::fmt;
use std::sync::Arc;

/// A value read from, or passed into, a bean or facade
///
/// Scalars compare by value; objects and facades compare by identity.
#[derive(Clone, Default)]
pub enum Value {
    /// Absent reference
    #[default]
    Null,
    /// Boolean scalar
    Bool(bool),
    /// Integer scalar
    Int(i64),
    /// Floating point scalar
    Float(f64),
    /// String scalar
    Str(String),
    /// Plain bean instance
    Object(ObjectRef),
    /// Intercepting facade
    Facade(Facade),
}

impl Value {
    /// Check whether this is the null value
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_facade(&self) -> Option<&Facade> {
        match self {
            Value::Facade(f) => Some(f),
            _ => None,
        }
    }

    /// Convert into a facade, failing for any other kind of value
    ///
    /// Convenient when chaining calls through nested facades.
    pub fn into_facade(self) -> Result<Facade> {
        match self {
            Value::Facade(f) => Ok(f),
            other => Err(FacadeError::invalid_argument(format!(
                "expected a facade, got {}",
                other.type_name()
            ))),
        }
    }

    /// Get the type name as a string for error messages
    pub fn type_name(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(_) => "bool".to_string(),
            Value::Int(_) => "int".to_string(),
            Value::Float(_) => "float".to_string(),
            Value::Str(_) => "string".to_string(),
            Value::Object(o) => o.type_name().to_string(),
            Value::Facade(f) => f.declared_type().name(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            (Value::Facade(a), Value::Facade(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Bool(b) => write!(f, "Bool({})", b),
            Value::Int(i) => write!(f, "Int({})", i),
            Value::Float(x) => write!(f, "Float({})", x),
            Value::Str(s) => write!(f, "Str({:?})", s),
            Value::Object(o) => write!(f, "Object({:?})", o),
            Value::Facade(facade) => write!(f, "Facade({:?})", facade),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Str(s) => write!(f, "{}", s),
            Value::Object(o) => write!(f, "{}@{:x}", o.type_name(), Arc::as_ptr(o) as usize),
            Value::Facade(facade) => write!(f, "{}", facade),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        Value::Int(value as i64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<ObjectRef> for Value {
    fn from(value: ObjectRef) -> Self {
        Value::Object(value)
    }
}

impl From<&ObjectRef> for Value {
    fn from(value: &ObjectRef) -> Self {
        Value::Object(Arc::clone(value))
    }
}

impl From<Facade> for Value {
    fn from(value: Facade) -> Self {
        Value::Facade(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

/// The hashable subset of [`Value`], used to key map-shaped beans
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MapKey {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl TryFrom<&Value> for MapKey {
    type Error = FacadeError;

    fn try_from(value: &Value) -> Result<Self> {
        match value {
            Value::Bool(b) => Ok(MapKey::Bool(*b)),
            Value::Int(i) => Ok(MapKey::Int(*i)),
            Value::Str(s) => Ok(MapKey::Str(s.clone())),
            other => Err(FacadeError::invalid_argument(format!(
                "{} cannot be used as a map key",
                other.type_name()
            ))),
        }
    }
}

impl From<MapKey> for Value {
    fn from(key: MapKey) -> Self {
        match key {
            MapKey::Bool(b) => Value::Bool(b),
            MapKey::Int(i) => Value::Int(i),
            MapKey::Str(s) => Value::Str(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalars_compare_by_value() {
        assert_eq!(Value::from("Frank"), Value::Str("Frank".into()));
        assert_eq!(Value::from(5), Value::Int(5));
        assert_ne!(Value::from(5), Value::from(5.0));
        assert_eq!(Value::from(None::<&str>), Value::Null);
    }

    #[test]
    fn test_display_renders_raw_scalars() {
        assert_eq!(Value::from("Frank").to_string(), "Frank");
        assert_eq!(Value::from(15).to_string(), "15");
        assert_eq!(Value::Null.to_string(), "null");
    }

    #[test]
    fn test_map_key_rejects_null() {
        assert!(MapKey::try_from(&Value::Null).is_err());
        assert_eq!(
            MapKey::try_from(&Value::from("k")).unwrap(),
            MapKey::Str("k".into())
        );
    }

    #[test]
    fn test_into_facade_rejects_scalar() {
        let err = Value::from(3).into_facade().unwrap_err();
        assert!(matches!(err, FacadeError::InvalidArgument(_)));
    }
}
