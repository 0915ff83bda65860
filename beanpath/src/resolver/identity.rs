use super::{Executable, ExecutableResolver, ExecutionContext};
use crate::facade::{Call, Facade};
use crate::model::{IdentityMethod, MethodKind, Value};

/// `equals`, `hashCode` and `toString` answered by the facade itself
#[derive(Debug, Default)]
pub struct IdentityResolver;

impl ExecutableResolver for IdentityResolver {
    fn name(&self) -> &'static str {
        "identity"
    }

    fn resolve<'a>(&self, facade: &'a Facade, call: &'a Call) -> Option<Executable<'a>> {
        let Call::Method { method, args } = call else {
            return None;
        };
        let MethodKind::Identity(identity) = method.kind() else {
            return None;
        };
        let identity = *identity;
        Some(Box::new(move |_: &ExecutionContext<'_>| {
            Ok(match identity {
                IdentityMethod::Equals => {
                    Value::Bool(args.first().and_then(Value::as_facade) == Some(facade))
                }
                IdentityMethod::HashCode => Value::Int(facade.identity_hash()),
                IdentityMethod::ToString => Value::Str(facade.to_string()),
            })
        }))
    }
}
