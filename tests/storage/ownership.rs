//! Integration tests for the ownership graph
//!
//! Tests attach/detach, child order, cycle rejection, and traversal.

use proptest::prelude::*;
use strongbox_foundation::{EntityId, ErrorKind};
use strongbox_storage::OwnershipGraph;

fn id(n: u32) -> EntityId {
    EntityId::new(0x4000_0000 + n)
}

// =============================================================================
// Structure
// =============================================================================

#[test]
fn attach_appends_in_order() {
    let mut graph = OwnershipGraph::new();
    graph.attach(id(2), id(1)).unwrap();
    graph.attach(id(3), id(1)).unwrap();
    graph.attach(id(4), id(1)).unwrap();

    assert_eq!(graph.children(id(1)).collect::<Vec<_>>(), vec![id(2), id(3), id(4)]);
    assert_eq!(graph.position(id(4)), Some(2));
}

#[test]
fn reattach_moves_between_parents() {
    let mut graph = OwnershipGraph::new();
    graph.attach(id(3), id(1)).unwrap();
    graph.attach(id(3), id(2)).unwrap();

    assert_eq!(graph.parent(id(3)), Some(id(2)));
    assert!(!graph.has_children(id(1)));
    assert_eq!(graph.child_count(id(2)), 1);
    assert_eq!(graph.edge_count(), 1);
}

#[test]
fn detach_returns_former_parent() {
    let mut graph = OwnershipGraph::new();
    graph.attach(id(2), id(1)).unwrap();

    assert_eq!(graph.detach(id(2)), Some(id(1)));
    assert_eq!(graph.detach(id(2)), None);
    assert_eq!(graph.parent(id(2)), None);
}

// =============================================================================
// Cycles
// =============================================================================

#[test]
fn self_attach_is_a_cycle() {
    let mut graph = OwnershipGraph::new();
    let err = graph.attach(id(1), id(1)).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::CycleDetected { .. }));
}

#[test]
fn attaching_under_a_descendant_is_rejected_without_change() {
    let mut graph = OwnershipGraph::new();
    graph.attach(id(2), id(1)).unwrap();
    graph.attach(id(3), id(2)).unwrap();

    let err = graph.attach(id(1), id(3)).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::CycleDetected { .. }));
    assert_eq!(graph.parent(id(1)), None);
    assert_eq!(graph.children(id(3)).count(), 0);
}

// =============================================================================
// Traversal
// =============================================================================

#[test]
fn ancestors_and_root() {
    let mut graph = OwnershipGraph::new();
    graph.attach(id(2), id(1)).unwrap();
    graph.attach(id(3), id(2)).unwrap();

    assert_eq!(graph.ancestors(id(3)).collect::<Vec<_>>(), vec![id(2), id(1)]);
    assert_eq!(graph.root_of(id(3)), id(1));
    assert!(graph.is_ancestor(id(1), id(3)));
    assert!(!graph.is_ancestor(id(3), id(1)));
}

#[test]
fn descendants_are_preorder() {
    let mut graph = OwnershipGraph::new();
    graph.attach(id(2), id(1)).unwrap();
    graph.attach(id(4), id(2)).unwrap();
    graph.attach(id(3), id(1)).unwrap();

    assert_eq!(graph.descendants(id(1)), vec![id(2), id(4), id(3)]);
}

proptest! {
    #[test]
    fn random_attaches_keep_a_forest(ops in prop::collection::vec((1u32..10, 1u32..10), 1..100)) {
        let mut graph = OwnershipGraph::new();
        for (child, parent) in ops {
            let _ = graph.attach(id(child), id(parent));
            for n in 1..10 {
                prop_assert!(!graph.ancestors(id(n)).any(|a| a == id(n)));
                if let Some(parent) = graph.parent(id(n)) {
                    let listed = graph.children(parent).filter(|c| *c == id(n)).count();
                    prop_assert_eq!(listed, 1);
                }
            }
        }
        let listed: usize = (1..10).map(|n| graph.child_count(id(n))).sum();
        prop_assert_eq!(listed, graph.edge_count());
    }
}
