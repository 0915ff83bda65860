//! The predicate contract consumed by validation sessions

use beanpath::Value;
use std::fmt;
use std::sync::Arc;

/// A named predicate over a single value
pub trait Constraint: Send + Sync {
    fn name(&self) -> &str;

    /// Whether `value` satisfies the constraint
    fn test(&self, value: &Value) -> bool;

    /// Inactive constraints are skipped and always pass
    fn is_active(&self) -> bool {
        true
    }

    /// Human readable description used in violation reports
    fn description(&self) -> Option<&str> {
        None
    }
}

type Predicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Constraint built from a name and a closure
#[derive(Clone)]
pub struct FnConstraint {
    name: String,
    predicate: Predicate,
    active: bool,
    description: Option<String>,
}

impl FnConstraint {
    /// Copy of this constraint, active only when `active` holds
    pub fn when(&self, active: bool) -> Self {
        Self {
            active,
            ..self.clone()
        }
    }

    pub fn with_description(&self, description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            ..self.clone()
        }
    }

    pub fn with_name(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }
}

impl Constraint for FnConstraint {
    fn name(&self) -> &str {
        &self.name
    }

    fn test(&self, value: &Value) -> bool {
        (self.predicate)(value)
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl fmt::Debug for FnConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnConstraint")
            .field("name", &self.name)
            .field("active", &self.active)
            .field("description", &self.description)
            .finish()
    }
}

/// Create a constraint from a name and a predicate
///
/// ```
/// use beanpath::Value;
/// use beanpath_validation::{constraint, Constraint};
///
/// let positive = constraint("positive", |v| v.as_int().is_some_and(|i| i > 0));
/// assert!(positive.test(&Value::from(3)));
/// assert!(!positive.test(&Value::Null));
/// ```
pub fn constraint<F>(name: impl Into<String>, predicate: F) -> FnConstraint
where
    F: Fn(&Value) -> bool + Send + Sync + 'static,
{
    FnConstraint {
        name: name.into(),
        predicate: Arc::new(predicate),
        active: true,
        description: None,
    }
}

/// Value must not be null
pub fn required() -> FnConstraint {
    constraint("required", |value| !value.is_null())
}

/// String value must contain a non-whitespace character; null passes
pub fn not_blank() -> FnConstraint {
    constraint("notBlank", |value| match value {
        Value::Null => true,
        Value::Str(s) => !s.trim().is_empty(),
        _ => false,
    })
}
