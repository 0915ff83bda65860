use super::{EventCategory, EventObserver, FacadeEvent};
use crate::path::PropertyPath;
use std::sync::Mutex;

/// Observer rebuilding the accessed path from facade events.
///
/// A method invocation starts a new path; every property access, including
/// those propagated up from nested facades, nests one segment deeper.
#[derive(Debug, Default)]
pub struct PropertyAccessTracker {
    current: Mutex<PropertyPath>,
}

impl PropertyAccessTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_path(&self) -> PropertyPath {
        self.current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl EventObserver for PropertyAccessTracker {
    fn categories(&self) -> Vec<EventCategory> {
        vec![EventCategory::MethodInvocation, EventCategory::PropertyAccess]
    }

    fn on_event(&self, event: &FacadeEvent) {
        let mut current = self
            .current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        match event {
            FacadeEvent::MethodInvocation(_) => *current = PropertyPath::root(),
            FacadeEvent::PropertyAccess(access) => {
                *current = current.nested(access.property_name.as_str());
            }
            FacadeEvent::PropertyChange(_) => {}
        }
    }
}
