//! Randomly shaped containment forests survive a save/load cycle.

use proptest::prelude::*;
use strongbox_foundation::EntityId;
use strongbox_persist::{PersistConfig, load_from_bytes, save_to_bytes};
use strongbox_stock::{stock_registry, tags};
use strongbox_storage::World;

use crate::snapshot;

/// Builds a forest where entity `i` goes into the container picked by
/// `parents[i]`, if that pick is an earlier container.
fn forest(parents: &[Option<usize>]) -> World {
    let mut world = World::new(stock_registry().unwrap());
    let mut containers: Vec<EntityId> = Vec::new();
    for (i, parent) in parents.iter().enumerate() {
        let tag = if i % 2 == 0 { tags::CONTAINER } else { tags::ITEM };
        let id = world.spawn(tag).unwrap();
        if let Some(pick) = parent {
            if !containers.is_empty() {
                let target = containers[pick % containers.len()];
                world.attach(id, target).unwrap();
            }
        }
        if tag == tags::CONTAINER {
            containers.push(id);
        }
    }
    world
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn forest_round_trips(parents in prop::collection::vec(prop::option::of(0usize..16), 0..40)) {
        let world = forest(&parents);
        let (bytes, _) = save_to_bytes(&world).unwrap();
        let (loaded, report) =
            load_from_bytes(&bytes, stock_registry().unwrap(), &PersistConfig::durable()).unwrap();

        prop_assert!(report.orphaned.is_empty());
        prop_assert_eq!(snapshot(&loaded), snapshot(&world));
        for id in world.ids() {
            prop_assert_eq!(
                loaded.children(id).collect::<Vec<_>>(),
                world.children(id).collect::<Vec<_>>()
            );
            prop_assert_eq!(loaded.totals(id), world.totals(id));
        }
    }
}
