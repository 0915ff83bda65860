//! Facade construction and dispatch behaviour

mod common;

use beanpath::{EventListener, FacadeConfig, FacadeError, Value};
use common::Fixture;
use std::sync::{Arc, Mutex};

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

#[test]
fn test_final_class_facade_is_assignable_to_its_interfaces() {
    let fixture = Fixture::new();
    let facade = fixture.wrap(fixture.default_name("Frank", "Sinatra"));

    assert!(facade.is_assignable_to("Name"));
    assert!(!facade.is_assignable_to("DefaultName"));
    assert_eq!(facade.declared_type().base().name(), "Object");
    assert_eq!(facade.get("first").unwrap(), Value::from("Frank"));
}

#[test]
fn test_copies_only_fields_declared_on_the_runtime_type() {
    let fixture = Fixture::new();
    let nested = fixture.default_name("Frank", "Sinatra");
    let holder = fixture.registry.instantiate("ValueHolder").unwrap();
    holder.write_field("inheritedValue", "inherited".into()).unwrap();
    holder.write_field("instanceValue", "instance".into()).unwrap();
    holder
        .write_field("nestedInstance", Value::from(&nested))
        .unwrap();

    let facade = fixture.wrap(Arc::clone(&holder));

    assert_eq!(facade.field("instanceValue"), Value::from("instance"));
    assert_eq!(facade.field("nestedInstance"), Value::from(&nested));
    assert_eq!(facade.field("inheritedValue"), Value::Null);
    assert_eq!(facade.field("instances"), Value::Null);
    assert!(Arc::ptr_eq(facade.delegate().unwrap(), &holder));
}

#[test]
fn test_fields_that_cannot_be_held_are_skipped() {
    let fixture = Fixture::new();
    let sealed = fixture.registry.instantiate("SealedHolder").unwrap();
    sealed.write_field("sealedValue", "sealed".into()).unwrap();

    let facade = fixture.wrap(sealed);

    assert_eq!(facade.declared_type().base().name(), "BaseHolder");
    assert_eq!(facade.field("sealedValue"), Value::Null);
}

#[test]
fn test_wrapping_does_not_run_initializers() {
    let fixture = Fixture::new();
    let activity = fixture.activity("swimming", "08:00");
    assert_eq!(fixture.initializer_runs(), 1);

    let facade = fixture.wrap(activity);

    assert_eq!(fixture.initializer_runs(), 1);
    assert_eq!(facade.field("name"), Value::from("swimming"));
}

#[test]
fn test_wrapping_a_facade_returns_it_unchanged() {
    let fixture = Fixture::new();
    let facade = fixture.wrap(fixture.person());

    let again = fixture.wrap(facade.clone());

    assert_eq!(again, facade);
}

#[test]
fn test_scalars_cannot_be_wrapped() {
    let fixture = Fixture::new();
    let tracker = fixture.factory.tracker();

    for value in [Value::Null, Value::from(3), Value::from("text")] {
        assert!(matches!(
            fixture.factory.over(value, &tracker),
            Err(FacadeError::InvalidArgument(_))
        ));
    }
}

#[test]
fn test_implementing_requires_types() {
    let fixture = Fixture::new();
    let err = fixture
        .factory
        .implementing(&[], &fixture.factory.tracker())
        .unwrap_err();
    assert!(matches!(err, FacadeError::InvalidArgument(_)));
}

#[test]
fn test_implementing_rejects_types_without_inheritable_base() {
    let fixture = Fixture::new();
    let tracker = fixture.factory.tracker();

    for name in ["DefaultName", "Hidden"] {
        assert_eq!(
            fixture.factory.implementing(&[name], &tracker).unwrap_err(),
            FacadeError::Configuration {
                type_name: name.to_string()
            }
        );
    }
}

#[test]
fn test_implementing_validates_remaining_types() {
    let fixture = Fixture::new();
    let tracker = fixture.factory.tracker();

    assert!(matches!(
        fixture.factory.implementing(&["Contact", "Person"], &tracker),
        Err(FacadeError::InvalidArgument(_))
    ));
    assert_eq!(
        fixture
            .factory
            .implementing(&["Contact", "Pet"], &tracker)
            .unwrap_err(),
        FacadeError::UnknownType("Pet".into())
    );

    let facade = fixture
        .factory
        .implementing(&["Person", "Contact"], &tracker)
        .unwrap();
    assert!(facade.is_assignable_to("Person"));
    assert!(facade.is_assignable_to("Contact"));
    assert!(facade.delegate().is_none());
}

// ---------------------------------------------------------------------------
// Store-backed facades
// ---------------------------------------------------------------------------

#[test]
fn test_primitive_accessors_default_to_zero() {
    let fixture = Fixture::new();
    let contact = fixture.contact();

    assert_eq!(contact.get("age").unwrap(), Value::Int(0));
    assert_eq!(contact.get("verified").unwrap(), Value::Bool(false));
    assert_eq!(contact.get("email").unwrap(), Value::Null);
    assert_eq!(contact.get("mentor").unwrap(), Value::Null);
}

#[test]
fn test_synthesized_nested_facade_is_cached() {
    let fixture = Fixture::new();
    let contact = fixture.contact();

    let first = contact.get("address").unwrap().into_facade().unwrap();
    let second = contact.get("address").unwrap().into_facade().unwrap();

    assert_eq!(first, second);
    assert!(first.is_assignable_to("Address"));
    assert_eq!(first.parent().unwrap(), Some(contact.clone()));
    assert_eq!(contact.property_store().get("address"), Some(Value::Facade(first)));
}

#[test]
fn test_default_implementation_is_instantiated() {
    let fixture = Fixture::new();
    let contact = fixture.contact();

    let tags = contact.get("tags").unwrap().into_facade().unwrap();

    assert_eq!(tags.declared_type().base().name(), "ArrayList");
    assert_eq!(tags.invoke("size", &[]).unwrap(), Value::Int(0));
    assert_eq!(contact.get("tags").unwrap(), Value::Facade(tags));
}

#[test]
fn test_synthesis_can_be_disabled() {
    let fixture = Fixture::with_config(FacadeConfig {
        synthesize_defaults: false,
        ..FacadeConfig::default()
    });
    let contact = fixture.contact();

    assert_eq!(contact.get("address").unwrap(), Value::Null);
    assert_eq!(contact.get("age").unwrap(), Value::Int(0));
}

#[test]
fn test_store_mutator_reports_old_and_new_values() {
    let fixture = Fixture::new();
    let contact = fixture.contact();
    let changes = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&changes);
    contact
        .add_listener(EventListener::on_property_change(move |event| {
            sink.lock().unwrap().push((
                event.property_name.clone(),
                event.old_value.clone(),
                event.new_value.clone(),
            ));
        }))
        .unwrap();

    contact.set("age", 41).unwrap();
    contact.set("age", 42).unwrap();
    contact.set("email", "frank@example.com").unwrap();

    assert_eq!(
        *changes.lock().unwrap(),
        vec![
            ("age".to_string(), Value::Int(0), Value::Int(41)),
            ("age".to_string(), Value::Int(41), Value::Int(42)),
            (
                "email".to_string(),
                Value::Null,
                Value::from("frank@example.com")
            ),
        ]
    );
    assert_eq!(contact.get("age").unwrap(), Value::Int(42));
    let snapshot = contact.property_store().snapshot();
    assert_eq!(snapshot.keys().collect::<Vec<_>>(), vec!["age", "email"]);
}

#[test]
fn test_store_mutator_binds_facade_values_as_children() {
    let fixture = Fixture::new();
    let contact = fixture.contact();
    let mentor = fixture.contact();

    contact.set("mentor", mentor.clone()).unwrap();

    assert_eq!(mentor.parent().unwrap(), Some(contact.clone()));
    assert_eq!(contact.get("mentor").unwrap(), Value::Facade(mentor));
}

// ---------------------------------------------------------------------------
// Delegate forwarding
// ---------------------------------------------------------------------------

#[test]
fn test_delegate_mutator_writes_through() {
    let fixture = Fixture::new();
    let person = fixture.person();
    let facade = fixture.wrap(Arc::clone(&person));
    let changes = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&changes);
    facade
        .add_listener(EventListener::on_property_change(move |event| {
            sink.lock()
                .unwrap()
                .push((event.old_value.clone(), event.new_value.clone()));
        }))
        .unwrap();

    facade.set("dateOfBirth", "1980-02-02").unwrap();

    assert_eq!(person.read_field("dateOfBirth"), Value::from("1980-02-02"));
    assert_eq!(
        *changes.lock().unwrap(),
        vec![(Value::from("1970-01-01"), Value::from("1980-02-02"))]
    );
}

#[test]
fn test_delegate_mutator_binds_facade_argument() {
    let fixture = Fixture::new();
    let person = fixture.person();
    let facade = fixture.wrap(Arc::clone(&person));
    let name = fixture.wrap(fixture.default_name("Frank", "Sinatra"));

    facade.set("name", name.clone()).unwrap();

    assert_eq!(name.parent().unwrap(), Some(facade.clone()));
    assert_eq!(person.read_field("name"), Value::Facade(name));
}

#[test]
fn test_delegate_failures_pass_through_unchanged() {
    let fixture = Fixture::new();
    let facade = fixture.wrap(fixture.person());
    let activities = facade.get("activities").unwrap().into_facade().unwrap();

    let err = activities.element(7).unwrap_err();

    assert_eq!(
        err,
        FacadeError::method_failed("get", "index 7 out of bounds for length 2")
    );
}

#[test]
fn test_results_are_not_rewrapped_when_disabled() {
    let fixture = Fixture::with_config(FacadeConfig {
        rewrap_results: false,
        ..FacadeConfig::default()
    });
    let facade = fixture.wrap(fixture.person());

    let activities = facade.get("activities").unwrap();

    assert!(activities.as_object().is_some());
}

#[test]
fn test_rewrapped_results_are_children_of_the_caller() {
    let fixture = Fixture::new();
    let facade = fixture.wrap(fixture.person());

    let activities = facade.get("activities").unwrap().into_facade().unwrap();
    assert_eq!(activities.parent().unwrap(), Some(facade.clone()));

    let unbound = Fixture::with_config(FacadeConfig {
        bind_rewrapped_parent: false,
        ..FacadeConfig::default()
    });
    let facade = unbound.wrap(unbound.person());
    let activities = facade.get("activities").unwrap().into_facade().unwrap();
    assert_eq!(activities.parent().unwrap(), None);
}

// ---------------------------------------------------------------------------
// Unsupported calls and identity
// ---------------------------------------------------------------------------

#[test]
fn test_unknown_and_abstract_operations_are_unsupported() {
    let fixture = Fixture::new();
    let contact = fixture.contact();
    let person = fixture.wrap(fixture.person());

    assert!(matches!(
        contact.invoke("summary", &[]),
        Err(FacadeError::UnsupportedOperation { .. })
    ));
    assert!(matches!(
        person.invoke("fly", &[]),
        Err(FacadeError::UnsupportedOperation { .. })
    ));
    assert!(matches!(
        person.get("weight"),
        Err(FacadeError::UnsupportedOperation { .. })
    ));
}

#[test]
fn test_unsupported_call_emits_nothing() {
    let fixture = Fixture::new();
    let contact = fixture.contact();
    let invocations = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&invocations);
    contact
        .add_listener(EventListener::on_method_invocation(move |_| {
            *counter.lock().unwrap() += 1;
        }))
        .unwrap();

    let _ = contact.invoke("summary", &[]);
    contact.get("email").unwrap();

    assert_eq!(*invocations.lock().unwrap(), 1);
    assert_eq!(contact.render_current_path(), "email");
}

#[test]
fn test_identity_methods() {
    let fixture = Fixture::new();
    let first = fixture.wrap(fixture.default_name("Frank", "Sinatra"));
    let second = fixture.wrap(fixture.default_name("Frank", "Sinatra"));

    assert_eq!(
        first.invoke("equals", &[Value::Facade(first.clone())]).unwrap(),
        Value::Bool(true)
    );
    assert_eq!(
        first.invoke("equals", &[Value::Facade(second.clone())]).unwrap(),
        Value::Bool(false)
    );
    assert_eq!(
        first.invoke("hashCode", &[]).unwrap(),
        first.invoke("hashCode", &[]).unwrap()
    );
    assert_ne!(
        first.invoke("hashCode", &[]).unwrap(),
        second.invoke("hashCode", &[]).unwrap()
    );
    assert_eq!(
        first.invoke("toString", &[]).unwrap(),
        Value::from("facade of Name")
    );
}

#[test]
fn test_chain_is_built_on_first_call() {
    let fixture = Fixture::new();
    let contact = fixture.contact();

    assert!(!contact.is_initialized());
    contact.get("email").unwrap();
    assert!(contact.is_initialized());
}
