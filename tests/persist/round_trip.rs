//! Save/load preserves identities, values, references, and structure.

use strongbox_foundation::{Namespace, Privilege};
use strongbox_persist::{PersistConfig, load_from_bytes, save_to_bytes};
use strongbox_stock::{Character, Corpse, Item, stock_registry};

use crate::{shard, snapshot};

#[test]
fn every_entity_comes_back_unchanged() {
    let shard = shard();
    let (bytes, report) = save_to_bytes(&shard.world).unwrap();
    let (loaded, load) =
        load_from_bytes(&bytes, stock_registry().unwrap(), &PersistConfig::durable()).unwrap();

    assert_eq!(report.records, shard.world.len());
    assert_eq!(load.loaded, shard.world.len());
    assert!(load.skipped.is_empty());
    assert!(load.orphaned.is_empty());
    assert_eq!(load.cleared_references, 0);
    assert_eq!(snapshot(&loaded), snapshot(&shard.world));
}

#[test]
fn references_point_at_loaded_entities() {
    let shard = shard();
    let (bytes, _) = save_to_bytes(&shard.world).unwrap();
    let (loaded, _) =
        load_from_bytes(&bytes, stock_registry().unwrap(), &PersistConfig::fast()).unwrap();

    let gm = loaded.get_as::<Character>(shard.gm).unwrap();
    assert_eq!(gm.privilege, Privilege::GameMaster);
    assert_eq!(gm.backpack, shard.pack);
    assert_eq!(loaded.parent(shard.pack), Some(shard.gm));

    assert_eq!(loaded.get_as::<Character>(shard.pet).unwrap().master, shard.gm);
    let sword = loaded.get_as::<Item>(shard.sword).unwrap();
    assert_eq!(sword.data.owner, shard.gm);
    assert_eq!(sword.data.attributes.get("damage"), 12);

    let corpse = loaded.get_as::<Corpse>(shard.corpse).unwrap();
    assert_eq!(corpse.killer, shard.gm);
    assert_eq!(corpse.item.owner, shard.pet);
}

#[test]
fn children_keep_their_order_and_totals() {
    let shard = shard();
    let (bytes, _) = save_to_bytes(&shard.world).unwrap();
    let (loaded, _) =
        load_from_bytes(&bytes, stock_registry().unwrap(), &PersistConfig::fast()).unwrap();

    assert_eq!(
        loaded.children(shard.pack).collect::<Vec<_>>(),
        shard.world.children(shard.pack).collect::<Vec<_>>()
    );
    assert_eq!(loaded.totals(shard.pack), shard.world.totals(shard.pack));
    assert_eq!(loaded.totals(shard.chest), shard.world.totals(shard.chest));
    assert_eq!(loaded.totals(shard.chest).unwrap().weight, 7);
}

#[test]
fn allocator_never_reissues_a_saved_id() {
    let shard = shard();
    let (bytes, _) = save_to_bytes(&shard.world).unwrap();
    let (mut loaded, _) =
        load_from_bytes(&bytes, stock_registry().unwrap(), &PersistConfig::fast()).unwrap();

    let next = loaded.allocate(Namespace::Item).unwrap();
    assert!(!shard.world.contains(next));
    assert!(next > shard.corpse);
    let character = loaded.allocate(Namespace::Character).unwrap();
    assert!(character > shard.pet);
}

#[test]
fn loaded_world_starts_clean() {
    let shard = shard();
    let (bytes, _) = save_to_bytes(&shard.world).unwrap();
    let (mut loaded, _) =
        load_from_bytes(&bytes, stock_registry().unwrap(), &PersistConfig::fast()).unwrap();

    assert!(loaded.take_changed().is_empty());
}
