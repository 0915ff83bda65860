//! Shared bean fixtures for integration tests
#![allow(dead_code)]

use beanpath::{
    FacadeConfig, Facade, FacadeFactory, MethodDef, ObjectRef, TypeDefBuilder, TypeRegistry,
    Value, ValueType, Visibility,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Registry with the test domain model and a factory over it
pub struct Fixture {
    pub registry: Arc<TypeRegistry>,
    pub factory: FacadeFactory,
    pub activity_inits: Arc<AtomicUsize>,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_config(FacadeConfig::default())
    }

    pub fn with_config(config: FacadeConfig) -> Self {
        let registry = Arc::new(TypeRegistry::new());
        let activity_inits = Arc::new(AtomicUsize::new(0));
        register_model(&registry, Arc::clone(&activity_inits));
        let factory = FacadeFactory::with_config(Arc::clone(&registry), config);
        Self {
            registry,
            factory,
            activity_inits,
        }
    }

    pub fn initializer_runs(&self) -> usize {
        self.activity_inits.load(Ordering::SeqCst)
    }

    pub fn activity(&self, name: &str, start: &str) -> ObjectRef {
        let activity = self.registry.instantiate("Activity").unwrap();
        activity.write_field("name", Value::from(name)).unwrap();
        activity.write_field("start", Value::from(start)).unwrap();
        activity
    }

    /// Person with two activities, three colleagues and three favorites
    pub fn person(&self) -> ObjectRef {
        let person = self.registry.instantiate("Person").unwrap();
        person
            .write_field("dateOfBirth", Value::from("1970-01-01"))
            .unwrap();

        let activities = self
            .registry
            .new_list([
                self.activity("swimming", "08:00"),
                self.activity("running", "09:30"),
            ])
            .unwrap();
        person.write_field("activities", activities.into()).unwrap();

        let colleagues = self
            .registry
            .new_map([("Jack", 11), ("John", 14), ("Frank", 13)])
            .unwrap();
        person.write_field("colleagues", colleagues.into()).unwrap();

        let favorites = self
            .registry
            .new_map([(5, "Winnie the Pooh"), (10, "Batman"), (15, "Darth Vader")])
            .unwrap();
        person.write_field("favorites", favorites.into()).unwrap();
        person
    }

    pub fn default_name(&self, first: &str, last: &str) -> ObjectRef {
        let name = self.registry.instantiate("DefaultName").unwrap();
        name.write_field("first", Value::from(first)).unwrap();
        name.write_field("last", Value::from(last)).unwrap();
        name
    }

    pub fn wrap(&self, target: impl Into<Value>) -> Facade {
        self.factory.over(target, &self.factory.tracker()).unwrap()
    }

    pub fn contact(&self) -> Facade {
        self.factory
            .implementing(&["Contact"], &self.factory.tracker())
            .unwrap()
    }
}

fn register_model(registry: &TypeRegistry, activity_inits: Arc<AtomicUsize>) {
    registry
        .register(
            TypeDefBuilder::interface("Name")
                .abstract_property("first", ValueType::Str)
                .abstract_property("last", ValueType::Str),
        )
        .unwrap();
    registry
        .register(
            TypeDefBuilder::class("DefaultName")
                .make_final()
                .implements("Name")
                .property("first", ValueType::Str)
                .property("last", ValueType::Str),
        )
        .unwrap();
    registry
        .register(
            TypeDefBuilder::class("Activity")
                .property("name", ValueType::Str)
                .property("start", ValueType::Str)
                .initializer(move |this| {
                    activity_inits.fetch_add(1, Ordering::SeqCst);
                    let _ = this.write_field("name", Value::from("unnamed"));
                }),
        )
        .unwrap();
    registry
        .register(
            TypeDefBuilder::class("Person")
                .property("dateOfBirth", ValueType::Str)
                .property("activities", ValueType::object("List"))
                .property("colleagues", ValueType::object("Map"))
                .property("favorites", ValueType::object("Map"))
                .property("name", ValueType::object("Name"))
                .property("retired", ValueType::Bool)
                .property("height", ValueType::Int)
                .method(
                    MethodDef::new("greet", vec![ValueType::Str], Some(ValueType::Str)).with_body(
                        |_, args| Ok(Value::from(format!("hello {}", args[0]))),
                    ),
                ),
        )
        .unwrap();

    registry
        .register(TypeDefBuilder::interface("Address").abstract_property("city", ValueType::Str))
        .unwrap();
    registry
        .register(
            TypeDefBuilder::interface("Contact")
                .abstract_property("email", ValueType::Str)
                .abstract_property("age", ValueType::Int)
                .abstract_property("verified", ValueType::Bool)
                .method(MethodDef::getter("address", ValueType::object("Address")).required())
                .method(MethodDef::getter("mentor", ValueType::object("Contact")))
                .method(MethodDef::setter("mentor", ValueType::object("Contact")))
                .method(
                    MethodDef::getter("tags", ValueType::object("List"))
                        .required()
                        .with_default_impl("ArrayList"),
                )
                .method(MethodDef::new("summary", Vec::new(), Some(ValueType::Str))),
        )
        .unwrap();

    registry
        .register(TypeDefBuilder::class("BaseHolder").field("inheritedValue", ValueType::Str))
        .unwrap();
    registry
        .register(
            TypeDefBuilder::class("ValueHolder")
                .extends("BaseHolder")
                .field("instanceValue", ValueType::Str)
                .field("nestedInstance", ValueType::object("DefaultName"))
                .static_field("instances", ValueType::Int),
        )
        .unwrap();
    registry
        .register(
            TypeDefBuilder::class("SealedHolder")
                .extends("BaseHolder")
                .make_final()
                .field("sealedValue", ValueType::Str),
        )
        .unwrap();
    registry
        .register(TypeDefBuilder::class("Hidden").visibility(Visibility::Package))
        .unwrap();
}
