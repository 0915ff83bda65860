use super::{Executable, ExecutableResolver, ExecutionContext};
use crate::error::Result;
use crate::facade::{Call, Facade};
use crate::model::{MethodDef, MethodKind, Value, ValueType};
use tracing::trace;

/// Accessors and mutators backed by the facade's property store.
///
/// An accessor reading a property that was never set synthesises a default:
/// the zero value for primitives, and for required object-typed accessors
/// either an instance of the method's default implementation type or a
/// nested facade over the returned interface. Synthesised values are stored,
/// so later reads see the same value.
#[derive(Debug, Default)]
pub struct PropertyStoreResolver;

impl ExecutableResolver for PropertyStoreResolver {
    fn name(&self) -> &'static str {
        "property-store"
    }

    fn resolve<'a>(&self, facade: &'a Facade, call: &'a Call) -> Option<Executable<'a>> {
        let Call::Method { method, args } = call else {
            return None;
        };
        match method.kind() {
            MethodKind::Accessor(property) => Some(Box::new(move |context: &ExecutionContext<'_>| {
                let store = context.property_store();
                let value = match store.get(property).filter(|v| !v.is_null()) {
                    Some(stored) => stored,
                    None => {
                        let synthesized = synthesize_default(facade, method)?;
                        if !synthesized.is_null() {
                            store.set(property.as_str(), synthesized.clone());
                        }
                        synthesized
                    }
                };
                context.emit_access(property.as_str(), &value);
                Ok(value)
            })),
            MethodKind::Mutator(property) => Some(Box::new(move |context: &ExecutionContext<'_>| {
                let store = context.property_store();
                let old_value = store
                    .get(property)
                    .filter(|v| !v.is_null())
                    .unwrap_or_else(|| {
                        method
                            .params()
                            .first()
                            .map(ValueType::zero_value)
                            .unwrap_or_default()
                    });
                let new_value = facade.rewrap(args.first().cloned().unwrap_or_default())?;
                facade.bind_child(&new_value);
                store.set(property.as_str(), new_value.clone());
                context.emit_change(property, old_value, new_value);
                Ok(Value::Null)
            })),
            _ => None,
        }
    }
}

fn synthesize_default(facade: &Facade, method: &MethodDef) -> Result<Value> {
    let Some(returns) = method.returns() else {
        return Ok(Value::Null);
    };
    if returns.is_primitive() {
        return Ok(returns.zero_value());
    }
    if !method.is_required() || !facade.factory().config().synthesize_defaults {
        return Ok(Value::Null);
    }

    let factory = facade.factory();
    if let Some(type_name) = method.default_impl() {
        trace!("synthesizing {} for {}", type_name, method.name());
        let instance = factory.registry().instantiate(type_name)?;
        let value = facade.rewrap(Value::Object(instance))?;
        facade.bind_child(&value);
        return Ok(value);
    }

    let Some(type_name) = returns.object_type_name() else {
        return Ok(Value::Null);
    };
    let is_interface = factory
        .registry()
        .get(type_name)
        .is_some_and(|t| t.is_interface());
    if !is_interface {
        return Ok(Value::Null);
    }
    trace!("synthesizing nested facade of {} for {}", type_name, method.name());
    let nested = Value::Facade(factory.implementing(&[type_name], facade.path_tracker())?);
    facade.bind_child(&nested);
    Ok(nested)
}
