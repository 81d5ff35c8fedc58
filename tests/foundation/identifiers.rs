//! Integration tests for identifiers and privileges
//!
//! Tests namespace partitioning, the null sentinel, and privilege ordering.

use strongbox_foundation::{EntityId, Namespace, Privilege};

// =============================================================================
// Namespaces
// =============================================================================

#[test]
fn namespaces_do_not_overlap() {
    let character = Namespace::Character.range();
    let item = Namespace::Item.range();
    assert!(character.end() < item.start());
}

#[test]
fn id_knows_its_namespace() {
    assert_eq!(
        EntityId::new(Namespace::Character.first()).namespace(),
        Some(Namespace::Character)
    );
    assert_eq!(
        EntityId::new(Namespace::Item.last()).namespace(),
        Some(Namespace::Item)
    );
    assert_eq!(EntityId::null().namespace(), None);
}

#[test]
fn null_is_the_default_reference() {
    let id = EntityId::default();
    assert!(id.is_null());
    assert_eq!(id.non_null(), None);
    assert_eq!(format!("{id}"), "Entity(null)");
}

#[test]
fn ids_order_by_raw_value() {
    let a = EntityId::new(0x4000_0001);
    let b = EntityId::new(0x4000_0002);
    assert!(a < b);
    assert_eq!(format!("{b}"), "Entity(0x40000002)");
}

// =============================================================================
// Privileges
// =============================================================================

#[test]
fn privileges_are_totally_ordered() {
    for pair in Privilege::ALL.windows(2) {
        assert!(pair[0] < pair[1]);
    }
    assert_eq!(Privilege::default(), Privilege::Player);
}

#[test]
fn satisfies_is_at_least() {
    assert!(Privilege::GameMaster.satisfies(Privilege::Player));
    assert!(Privilege::GameMaster.satisfies(Privilege::GameMaster));
    assert!(!Privilege::GameMaster.satisfies(Privilege::Administrator));
}

#[test]
fn privilege_wire_values_round_trip() {
    for privilege in Privilege::ALL {
        assert_eq!(Privilege::from_u8(privilege.as_u8()), Some(privilege));
    }
    assert_eq!(Privilege::from_u8(200), None);
}
