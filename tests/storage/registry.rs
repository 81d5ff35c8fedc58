//! Integration tests for the type registry and stock kinds
//!
//! Tests registration, privilege gates, constructors, and property copy.

use std::sync::Arc;

use strongbox_foundation::{EntityId, ErrorKind, Namespace, Privilege, Value};
use strongbox_stock::{Item, register_stock, stock_registry, tags};
use strongbox_storage::{EntityCore, PropertyKind, RegistryBuilder, TypeInfo};

#[test]
fn stock_registration() {
    let registry = stock_registry().unwrap();
    assert_eq!(registry.len(), 5);

    let artifact = registry.require(tags::ARTIFACT).unwrap();
    assert_eq!(artifact.min_privilege(), Privilege::Administrator);
    assert_eq!(artifact.namespace(), Namespace::Item);

    let character = registry.require(tags::CHARACTER).unwrap();
    assert_eq!(character.namespace(), Namespace::Character);
    assert!(!registry.require(tags::CORPSE).unwrap().has_constructor());
}

#[test]
fn duplicate_tag_is_rejected() {
    let mut builder = RegistryBuilder::new();
    register_stock(&mut builder).unwrap();
    let err = builder
        .register(TypeInfo::new(tags::ITEM, Namespace::Item, Item::shell))
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DuplicateType(_)));
}

#[test]
fn unknown_tag() {
    let registry = stock_registry().unwrap();
    assert!(registry.get("dragon").is_none());
    assert!(matches!(
        registry.require("dragon").unwrap_err().kind,
        ErrorKind::UnknownType(_)
    ));
}

#[test]
fn corpse_cannot_be_constructed() {
    let registry = stock_registry().unwrap();
    let corpse = registry.require(tags::CORPSE).unwrap();
    let id = EntityId::new(0x4000_0001);

    assert!(corpse.shell(id).is_ok());
    assert!(matches!(
        corpse.construct(id).unwrap_err().kind,
        ErrorKind::NoParameterlessConstructor(_)
    ));
}

#[test]
fn constructor_checks_namespace() {
    let registry = stock_registry().unwrap();
    let err = registry
        .require(tags::ITEM)
        .unwrap()
        .construct(EntityId::new(7))
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::WrongNamespace { .. }));
}

#[test]
fn properties_copy_between_entities() {
    let registry = stock_registry().unwrap();
    let info = registry.require(tags::ITEM).unwrap();
    let mut source = info.construct(EntityId::new(0x4000_0001)).unwrap();
    let mut target = info.construct(EntityId::new(0x4000_0002)).unwrap();

    let name = info.property("name").unwrap();
    name.write(&mut *source, Value::from("lamp")).unwrap();
    info.property("owner")
        .unwrap()
        .write(&mut *source, Value::Entity(EntityId::new(3)))
        .unwrap();
    for property in info.properties() {
        property.copy(&*source, &mut *target).unwrap();
    }

    assert_eq!(name.read(&*target).unwrap(), Value::Text(Arc::from("lamp")));
    assert_eq!(info.property("owner").unwrap().kind(), PropertyKind::Reference);
    assert_eq!(
        target.downcast_ref::<Item>().unwrap().data.owner,
        EntityId::new(3)
    );
}

#[test]
fn property_type_mismatch_is_reported() {
    let registry = stock_registry().unwrap();
    let info = registry.require(tags::ITEM).unwrap();
    let mut item = info.construct(EntityId::new(0x4000_0001)).unwrap();

    let err = info
        .property("hue")
        .unwrap()
        .write(&mut *item, Value::from("red"))
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::PropertyMismatch { .. }));

    let plain = Item::shell(EntityCore::new(EntityId::new(0x4000_0002), tags::ITEM));
    let body = registry.require(tags::CHARACTER).unwrap().property("body").unwrap();
    assert!(matches!(
        body.read(&*plain).unwrap_err().kind,
        ErrorKind::PropertyMismatch { .. }
    ));
}
