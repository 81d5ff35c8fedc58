//! Integration tests for property values
//!
//! Tests value construction, extraction, and kind names.

use std::collections::BTreeMap;
use std::sync::Arc;

use strongbox_foundation::{EntityId, Point3, Value};

#[test]
fn conversions() {
    assert_eq!(Value::from(true).as_bool(), Some(true));
    assert_eq!(Value::from(7i64).as_int(), Some(7));
    assert_eq!(Value::from("rope").as_text(), Some("rope"));
    assert_eq!(
        Value::from(Point3::new(1, 2, 3)).as_point(),
        Some(Point3::new(1, 2, 3))
    );
}

#[test]
fn nil_is_an_empty_reference() {
    assert_eq!(Value::Nil.as_entity(), Some(EntityId::null()));
    assert_eq!(Value::Int(1).as_entity(), None);
}

#[test]
fn map_fields() {
    let mut fields = BTreeMap::new();
    fields.insert(Arc::from("str"), Value::Int(12));
    let value = Value::Map(fields);

    assert_eq!(value.field("str").and_then(Value::as_int), Some(12));
    assert!(value.field("dex").is_none());
    assert!(Value::Int(1).field("str").is_none());
}

#[test]
fn map_clone_is_independent() {
    let mut fields = BTreeMap::new();
    fields.insert(Arc::from("luck"), Value::Int(1));
    let original = Value::Map(fields);

    let mut copy = original.clone();
    if let Value::Map(inner) = &mut copy {
        inner.insert(Arc::from("luck"), Value::Int(9));
    }
    assert_eq!(original.field("luck").and_then(Value::as_int), Some(1));
}

#[test]
fn kind_names() {
    assert_eq!(Value::Nil.kind_name(), "nil");
    assert_eq!(Value::Entity(EntityId::new(3)).kind_name(), "entity");
    assert_eq!(Value::Map(BTreeMap::new()).kind_name(), "map");
}
