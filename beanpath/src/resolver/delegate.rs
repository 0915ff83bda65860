use super::{Executable, ExecutableResolver, ExecutionContext};
use crate::error::Result;
use crate::facade::{Call, Facade};
use crate::model::{MethodDef, MethodKind, ObjectRef, Value};
use std::slice;

/// Forwards calls to the wrapped instance.
///
/// Applies only when the instance's own type has a callable body for the
/// method; abstract methods defer to the next resolver.
#[derive(Debug, Default)]
pub struct DelegateResolver;

impl ExecutableResolver for DelegateResolver {
    fn name(&self) -> &'static str {
        "delegate"
    }

    fn resolve<'a>(&self, facade: &'a Facade, call: &'a Call) -> Option<Executable<'a>> {
        let Call::Method { method, args } = call else {
            return None;
        };
        if matches!(method.kind(), MethodKind::Identity(_)) {
            return None;
        }
        let delegate = facade.delegate()?;
        let target = delegate
            .type_def()
            .find_invocable(method.name(), args.len())?;

        let executable: Executable<'a> = match method.kind() {
            MethodKind::Accessor(property) => Box::new(move |context: &ExecutionContext<'_>| {
                let value = target.invoke(delegate, &[])?;
                context.emit_access(property.as_str(), &value);
                facade.adopt(value)
            }),
            MethodKind::Mutator(property) => Box::new(move |context: &ExecutionContext<'_>| {
                let old_value = current_value(delegate, property)?;
                let new_value = facade.rewrap(args.first().cloned().unwrap_or_default())?;
                facade.bind_child(&new_value);
                target.invoke(delegate, slice::from_ref(&new_value))?;
                context.emit_change(property, old_value, new_value);
                Ok(Value::Null)
            }),
            _ => Box::new(move |_: &ExecutionContext<'_>| {
                let args = args
                    .iter()
                    .map(|arg| facade.rewrap(arg.clone()))
                    .collect::<Result<Vec<_>>>()?;
                let result = target.invoke(delegate, &args)?;
                facade.rewrap(result)
            }),
        };
        Some(executable)
    }
}

/// Read a property through its accessor, null when the type has none
fn current_value(delegate: &ObjectRef, property: &str) -> Result<Value> {
    let accessor = MethodDef::accessor_names(property)
        .iter()
        .find_map(|name| delegate.type_def().find_invocable(name, 0));
    match accessor {
        Some(accessor) => accessor.invoke(delegate, &[]),
        None => Ok(Value::Null),
    }
}
