//! Method definitions and the accessor/mutator classification grammar
//!
//! Every method carries a [`MethodKind`] computed once, when the method is
//! defined. The dispatch chain and the path tracker both consult that kind
//! instead of re-parsing method names on every call.

use crate::error::{FacadeError, Result};
use crate::model::object::ObjectRef;
use crate::model::types::ValueType;
use crate::model::value::Value;
use std::fmt;
use std::sync::Arc;

/// Native method body: receives the target object and the call arguments
pub type NativeFn = Arc<dyn Fn(&ObjectRef, &[Value]) -> Result<Value> + Send + Sync>;

/// The three identity methods every type inherits from the root type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentityMethod {
    Equals,
    HashCode,
    ToString,
}

/// Role a method plays in the bean protocol
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MethodKind {
    /// `get<X>()` or boolean `is<X>()`, reading property `x`
    Accessor(String),
    /// `set<X>(value)`, writing property `x`
    Mutator(String),
    /// `get(key)` on a list or map
    ElementAccessor,
    /// `equals`, `hashCode`, `toString`
    Identity(IdentityMethod),
    /// Anything else
    Operation,
}

impl MethodKind {
    /// Classify a method from its name, parameter count and return type.
    ///
    /// Accessors take no argument and mutators exactly one; `getItem(int)`
    /// is an operation for dispatch purposes. Path tracking uses the name
    /// alone, see [`MethodDef::path_segment`].
    ///
    /// ```
    /// use beanpath::{MethodKind, ValueType};
    ///
    /// assert_eq!(
    ///     MethodKind::classify("getDateOfBirth", 0, Some(&ValueType::Str)),
    ///     MethodKind::Accessor("dateOfBirth".into())
    /// );
    /// assert_eq!(
    ///     MethodKind::classify("get", 1, Some(&ValueType::Any)),
    ///     MethodKind::ElementAccessor
    /// );
    /// ```
    pub fn classify(name: &str, arity: usize, returns: Option<&ValueType>) -> Self {
        match (name, arity) {
            ("equals", 1) => return MethodKind::Identity(IdentityMethod::Equals),
            ("hashCode", 0) => return MethodKind::Identity(IdentityMethod::HashCode),
            ("toString", 0) => return MethodKind::Identity(IdentityMethod::ToString),
            ("get", 1) => return MethodKind::ElementAccessor,
            _ => {}
        }

        if let Some(rest) = name.strip_prefix("get") {
            if !rest.is_empty() && arity == 0 {
                return MethodKind::Accessor(decapitalize(rest));
            }
        }
        if let Some(rest) = name.strip_prefix("set") {
            if !rest.is_empty() && arity == 1 {
                return MethodKind::Mutator(decapitalize(rest));
            }
        }
        if let Some(rest) = name.strip_prefix("is") {
            if !rest.is_empty() && arity == 0 && returns == Some(&ValueType::Bool) {
                return MethodKind::Accessor(decapitalize(rest));
            }
        }
        MethodKind::Operation
    }

    /// Property touched by an accessor or mutator
    pub fn property_name(&self) -> Option<&str> {
        match self {
            MethodKind::Accessor(name) | MethodKind::Mutator(name) => Some(name.as_str()),
            _ => None,
        }
    }
}

/// Lower-camel-case a property name taken from a method name.
///
/// Only the first character is lowered, so `URL` becomes `uRL`.
pub fn decapitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Path segment named by a method, judged by its name alone.
///
/// Unlike [`MethodKind::classify`], arity does not matter here: an indexed
/// getter such as `getItem(int)` still names the `item` segment.
fn path_segment(name: &str, returns: Option<&ValueType>) -> Option<String> {
    let property = name
        .strip_prefix("get")
        .or_else(|| name.strip_prefix("set"))
        .or_else(|| name.strip_prefix("is").filter(|_| returns == Some(&ValueType::Bool)))?;
    (!property.is_empty()).then(|| decapitalize(property))
}

/// Upper-case the first character of a property name
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// How a method is executed
#[derive(Clone)]
pub enum MethodBody {
    /// Implemented by a native closure
    Native(NativeFn),
    /// Declared without an implementation
    Abstract,
    /// Identity behaviour supplied by the facade machinery itself
    Intrinsic,
}

impl fmt::Debug for MethodBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MethodBody::Native(_) => write!(f, "Native(<fn>)"),
            MethodBody::Abstract => write!(f, "Abstract"),
            MethodBody::Intrinsic => write!(f, "Intrinsic"),
        }
    }
}

/// A method declared on a type
#[derive(Debug, Clone)]
pub struct MethodDef {
    name: String,
    params: Vec<ValueType>,
    returns: Option<ValueType>,
    kind: MethodKind,
    segment: Option<String>,
    required: bool,
    default_impl: Option<String>,
    body: MethodBody,
}

impl MethodDef {
    /// Declare an abstract method; its kind is classified from the signature.
    pub fn new(name: impl Into<String>, params: Vec<ValueType>, returns: Option<ValueType>) -> Self {
        let name = name.into();
        let kind = MethodKind::classify(&name, params.len(), returns.as_ref());
        let segment = path_segment(&name, returns.as_ref());
        Self {
            name,
            params,
            returns,
            kind,
            segment,
            required: false,
            default_impl: None,
            body: MethodBody::Abstract,
        }
    }

    /// Declare an abstract `get<Property>()` accessor
    pub fn getter(property: &str, value_type: ValueType) -> Self {
        Self::new(format!("get{}", capitalize(property)), Vec::new(), Some(value_type))
    }

    /// Declare an abstract boolean `is<Property>()` accessor
    pub fn flag(property: &str) -> Self {
        Self::new(format!("is{}", capitalize(property)), Vec::new(), Some(ValueType::Bool))
    }

    /// Declare an abstract `set<Property>(value)` mutator
    pub fn setter(property: &str, value_type: ValueType) -> Self {
        Self::new(format!("set{}", capitalize(property)), vec![value_type], None)
    }

    /// Attach a native implementation
    pub fn with_body<F>(mut self, body: F) -> Self
    where
        F: Fn(&ObjectRef, &[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        self.body = MethodBody::Native(Arc::new(body));
        self
    }

    pub(crate) fn intrinsic(mut self) -> Self {
        self.body = MethodBody::Intrinsic;
        self
    }

    /// Mark the return value as never absent.
    ///
    /// An interface-typed required accessor on a store-backed facade
    /// synthesises a nested facade instead of returning null.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Name the concrete type instantiated when a default value is synthesised
    pub fn with_default_impl(mut self, type_name: impl Into<String>) -> Self {
        self.default_impl = Some(type_name.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[ValueType] {
        &self.params
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Return type, `None` for methods returning nothing
    pub fn returns(&self) -> Option<&ValueType> {
        self.returns.as_ref()
    }

    pub fn kind(&self) -> &MethodKind {
        &self.kind
    }

    /// Property segment this method pushes onto a path tracker, if any
    pub fn path_segment(&self) -> Option<&str> {
        self.segment.as_deref()
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn default_impl(&self) -> Option<&str> {
        self.default_impl.as_deref()
    }

    pub fn body(&self) -> &MethodBody {
        &self.body
    }

    pub fn is_abstract(&self) -> bool {
        matches!(self.body, MethodBody::Abstract)
    }

    /// Whether the method has a body that can be called directly
    pub fn is_invocable(&self) -> bool {
        matches!(self.body, MethodBody::Native(_))
    }

    /// Call the native body on `target`, bypassing any interception
    pub fn invoke(&self, target: &ObjectRef, args: &[Value]) -> Result<Value> {
        let MethodBody::Native(body) = &self.body else {
            return Err(FacadeError::unsupported(target.type_name(), &self.name));
        };
        if args.len() != self.params.len() {
            return Err(FacadeError::invalid_argument(format!(
                "{}.{} expects {} argument(s), got {}",
                target.type_name(),
                self.name,
                self.params.len(),
                args.len()
            )));
        }
        body(target, args)
    }

    /// Candidate accessor names for a property: `get<X>` then `is<X>`
    pub fn accessor_names(property: &str) -> [String; 2] {
        let capitalized = capitalize(property);
        [format!("get{}", capitalized), format!("is{}", capitalized)]
    }
}
