use super::{Executable, ExecutableResolver, ExecutionContext};
use crate::facade::{Call, Facade};
use crate::model::MethodKind;
use std::sync::Arc;

/// `get(key)` on list- or map-shaped facades.
///
/// Reads the element from the backing instance and reports it as an access
/// to property `[key]`.
#[derive(Debug, Default)]
pub struct ElementResolver;

impl ExecutableResolver for ElementResolver {
    fn name(&self) -> &'static str {
        "element"
    }

    fn resolve<'a>(&self, facade: &'a Facade, call: &'a Call) -> Option<Executable<'a>> {
        let Call::Method { method, args } = call else {
            return None;
        };
        if *method.kind() != MethodKind::ElementAccessor
            || facade.declared_type().collection().is_none()
        {
            return None;
        }
        let key = args.first()?;
        let target = Arc::clone(facade.delegate().unwrap_or_else(|| facade.shell()));
        let accessor = target.type_def().find_invocable(method.name(), args.len())?;

        Some(Box::new(move |context: &ExecutionContext<'_>| {
            let element = accessor.invoke(&target, args)?;
            context.emit_access(format!("[{}]", key), &element);
            facade.adopt(element)
        }))
    }
}
