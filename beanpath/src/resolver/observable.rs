use super::{Executable, ExecutableResolver, ExecutionContext};
use crate::facade::{Call, Facade, ObservableCall};
use crate::model::Value;

/// Listener and parent bookkeeping, handed straight to the multicaster
#[derive(Debug, Default)]
pub struct ObservableResolver;

impl ExecutableResolver for ObservableResolver {
    fn name(&self) -> &'static str {
        "observable"
    }

    fn resolve<'a>(&self, facade: &'a Facade, call: &'a Call) -> Option<Executable<'a>> {
        let Call::Observable(call) = call else {
            return None;
        };
        let multicaster = facade.event_multicaster();
        Some(Box::new(move |_: &ExecutionContext<'_>| {
            match call {
                ObservableCall::AddListener(listener) => multicaster.add_listener(listener.clone())?,
                ObservableCall::RemoveListener(listener) => multicaster.remove_listener(listener)?,
                ObservableCall::RemoveAllListeners => multicaster.remove_all_listeners(),
                ObservableCall::GetParent => return Ok(Value::from(multicaster.parent())),
                ObservableCall::SetParent(parent) => multicaster.set_parent(parent.as_ref()),
                ObservableCall::MulticastEvent(event) => multicaster.multicast(event),
            }
            Ok(Value::Null)
        }))
    }
}
