//! Integration tests for identity allocation
//!
//! Tests per-namespace monotonicity, restart persistence, and observation.

use proptest::prelude::*;
use strongbox_foundation::{EntityId, Namespace};
use strongbox_storage::IdentityAllocator;

#[test]
fn namespaces_advance_independently() {
    let mut allocator = IdentityAllocator::new();
    let c1 = allocator.allocate(Namespace::Character).unwrap();
    let i1 = allocator.allocate(Namespace::Item).unwrap();
    let c2 = allocator.allocate(Namespace::Character).unwrap();

    assert_eq!(c1.namespace(), Some(Namespace::Character));
    assert_eq!(i1.namespace(), Some(Namespace::Item));
    assert!(c2 > c1);
    assert_eq!(allocator.issued(Namespace::Character), 2);
    assert_eq!(allocator.issued(Namespace::Item), 1);
}

#[test]
fn cloned_state_never_reissues() {
    let mut allocator = IdentityAllocator::new();
    let burned = allocator.allocate(Namespace::Item).unwrap();

    let mut restarted = allocator.clone();
    assert_ne!(restarted.allocate(Namespace::Item).unwrap(), burned);
    assert!(restarted.has_issued(burned));
}

#[test]
fn observe_skips_past_loaded_ids() {
    let mut allocator = IdentityAllocator::new();
    let loaded = EntityId::new(Namespace::Item.first() + 500);
    allocator.observe(loaded).unwrap();

    assert!(allocator.allocate(Namespace::Item).unwrap() > loaded);
    assert_eq!(
        allocator.peek(Namespace::Character),
        Some(EntityId::new(Namespace::Character.first()))
    );
}

proptest! {
    #[test]
    fn allocation_is_strictly_increasing(picks in prop::collection::vec(any::<bool>(), 1..200)) {
        let mut allocator = IdentityAllocator::new();
        let mut last = [EntityId::null(); 2];
        for pick in picks {
            let ns = if pick { Namespace::Item } else { Namespace::Character };
            let id = allocator.allocate(ns).unwrap();
            prop_assert!(id > last[ns.index()]);
            prop_assert_eq!(id.namespace(), Some(ns));
            last[ns.index()] = id;
        }
    }
}
