use super::{Facade, FacadeType};
use crate::config::FacadeConfig;
use crate::error::{FacadeError, Result};
use crate::model::{Object, ObjectRef, TypeDef, TypeRegistry, Value};
use crate::path::PathTracker;
use std::sync::Arc;
use tracing::{debug, trace};

/// Builds facades over instances or over bare types
#[derive(Clone)]
pub struct FacadeFactory {
    registry: Arc<TypeRegistry>,
    config: Arc<FacadeConfig>,
}

impl FacadeFactory {
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self::with_config(registry, FacadeConfig::default())
    }

    pub fn with_config(registry: Arc<TypeRegistry>, config: FacadeConfig) -> Self {
        Self {
            registry,
            config: Arc::new(config),
        }
    }

    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    pub fn config(&self) -> &FacadeConfig {
        &self.config
    }

    /// Fresh tracker carrying the configured base path
    pub fn tracker(&self) -> PathTracker {
        PathTracker::with_base(self.config.base_path.clone())
    }

    /// Wrap an instance.
    ///
    /// The facade extends the nearest inheritable ancestor of the instance's
    /// type and implements every interface that type implements. Its shell is
    /// allocated without running initializers and receives a shallow copy of
    /// the fields declared directly on the instance's type; fields the shell
    /// cannot hold are skipped. Wrapping a facade returns it unchanged.
    pub fn over(&self, target: impl Into<Value>, tracker: &PathTracker) -> Result<Facade> {
        let object = match target.into() {
            Value::Facade(facade) => return Ok(facade),
            Value::Object(object) => object,
            other => {
                return Err(FacadeError::invalid_argument(format!(
                    "cannot build a facade over {}",
                    other.type_name()
                )))
            }
        };

        let runtime = Arc::clone(object.type_def());
        let base = runtime
            .ancestors()
            .find(|t| t.is_inheritable())
            .ok_or_else(|| FacadeError::Configuration {
                type_name: runtime.name().to_string(),
            })?;
        let shell = Object::shell(Arc::clone(&base));
        copy_state(&object, &shell);

        let declared = FacadeType::new(base, runtime.all_interfaces());
        debug!("facade of {} over {:?}", declared.name(), object);
        Ok(Facade::new(
            declared,
            shell,
            Some(object),
            tracker.clone(),
            self.clone(),
        ))
    }

    /// Build a store-backed facade over bare types.
    ///
    /// The first type is either a class to extend, which must be inheritable,
    /// or an interface, in which case the facade extends the root class. All
    /// remaining types must be interfaces.
    pub fn implementing(&self, types: &[&str], tracker: &PathTracker) -> Result<Facade> {
        let (first, rest) = types
            .split_first()
            .ok_or_else(|| FacadeError::invalid_argument("no types to implement"))?;

        let first = self.registry.lookup(first)?;
        let mut interfaces = Vec::with_capacity(types.len());
        let base = if first.is_interface() {
            interfaces.push(first);
            self.registry.object_type()
        } else if first.is_inheritable() {
            first
        } else {
            return Err(FacadeError::Configuration {
                type_name: first.name().to_string(),
            });
        };
        for name in rest {
            let interface = self.registry.lookup(name)?;
            if !interface.is_interface() {
                return Err(FacadeError::invalid_argument(format!(
                    "'{}' is not an interface",
                    name
                )));
            }
            interfaces.push(interface);
        }

        let shell = Object::shell(Arc::clone(&base));
        let declared = FacadeType::new(base, interfaces);
        debug!("facade of {} over property store", declared.name());
        Ok(Facade::new(declared, shell, None, tracker.clone(), self.clone()))
    }
}

/// Shallow-copy the fields declared directly on the source's own type
fn copy_state(source: &ObjectRef, shell: &ObjectRef) {
    let runtime: &TypeDef = source.type_def();
    if !shell.type_def().is_subtype_of(runtime.name()) {
        trace!(
            "{} cannot hold the state of {}, nothing copied",
            shell.type_name(),
            runtime.name()
        );
        return;
    }
    for field in runtime.declared_fields().iter().filter(|f| !f.is_static()) {
        let value = source.read_field(field.name());
        if let Err(reason) = shell.write_field(field.name(), value) {
            trace!("skipped field {}.{}: {}", runtime.name(), field.name(), reason);
        }
    }
    if runtime.collection().is_some() {
        shell.set_elements(source.elements());
    }
}

impl std::fmt::Debug for FacadeFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FacadeFactory")
            .field("config", &self.config)
            .finish()
    }
}
