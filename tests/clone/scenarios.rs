//! Duplication across the stock kinds, placement, and persistence.

use std::collections::BTreeSet;

use strongbox_clone::{
    Actor, Atomicity, DuplicateOptions, NullAuditSink, Placement, duplicate,
};
use strongbox_foundation::{EntityId, ErrorKind, Namespace, Point3, Privilege, Region};
use strongbox_persist::{PersistConfig, load_from_bytes, save_to_bytes};
use strongbox_stock::{Character, Corpse, Item, stock_registry, tags};

use crate::{game_master, vault};

#[test]
fn chest_copy_is_a_fresh_isomorphic_tree() {
    let mut vault = vault();
    let before: BTreeSet<EntityId> = vault.world.ids().collect();

    let dup = duplicate(
        &mut vault.world,
        vault.chest,
        None,
        &DuplicateOptions::new(),
        &mut NullAuditSink,
    )
    .unwrap();

    assert!(dup.done);
    assert_eq!(dup.len(), 5);
    let fresh: BTreeSet<EntityId> = dup.created.iter().map(|(_, copy)| *copy).collect();
    assert_eq!(fresh.len(), 5);
    assert!(fresh.is_disjoint(&before));
    assert!(fresh.iter().all(|id| id.namespace() == Some(Namespace::Item)));

    let copy = dup.copy().unwrap();
    let pouch = dup.copies_of(vault.pouch).next().unwrap();
    assert_eq!(vault.world.parent(pouch), Some(copy));
    assert_eq!(vault.world.children(copy).count(), 2);
    assert_eq!(vault.world.children(pouch).count(), 2);
    assert_eq!(vault.world.totals(copy), vault.world.totals(vault.chest));
}

#[test]
fn copy_aliases_references_and_owns_attributes() {
    let mut vault = vault();
    let dup = duplicate(
        &mut vault.world,
        vault.chest,
        None,
        &DuplicateOptions::new(),
        &mut NullAuditSink,
    )
    .unwrap();
    let ruby = dup.copies_of(vault.ruby).next().unwrap();

    let copied = &mut vault.world.get_as_mut::<Item>(ruby).unwrap().data;
    assert_eq!(copied.owner, vault.owner);
    assert_eq!(copied.attributes.get("luster"), 9);
    copied.attributes.set("luster", 1);

    let original = &vault.world.get_as::<Item>(vault.ruby).unwrap().data;
    assert_eq!(original.attributes.get("luster"), 9);
}

#[test]
fn player_cannot_copy_a_character() {
    let mut vault = vault();
    let player = Actor::new(vault.owner, Privilege::Player);
    let allocator = vault.world.allocator().clone();

    let err = duplicate(
        &mut vault.world,
        vault.owner,
        Some(player),
        &DuplicateOptions::new(),
        &mut NullAuditSink,
    )
    .unwrap_err();

    assert!(matches!(err.kind, ErrorKind::AccessDenied { .. }));
    assert_eq!(vault.world.allocator(), &allocator);
    assert!(vault.world.take_changed().is_empty());
}

#[test]
fn game_master_copy_lands_in_their_backpack() {
    let mut vault = vault();
    let gm = game_master(&mut vault.world);
    let pack = vault.world.get_as::<Character>(gm.id).unwrap().backpack;

    let options =
        DuplicateOptions::new().with_placement(Placement::for_actor(&vault.world, gm.id).unwrap());
    let dup = duplicate(&mut vault.world, vault.chest, Some(gm), &options, &mut NullAuditSink)
        .unwrap();

    let copy = dup.copy().unwrap();
    assert_eq!(vault.world.parent(copy), Some(pack));
    assert_eq!(vault.world.totals(pack).unwrap().items, 5);
    assert!(vault.world.is_changed(copy));
}

#[test]
fn equipped_item_is_copied_into_the_wearers_backpack() {
    let mut vault = vault();
    let gm = game_master(&mut vault.world);
    let pack = vault.world.get_as::<Character>(gm.id).unwrap().backpack;
    let ring = vault.world.spawn(tags::ITEM).unwrap();
    vault.world.attach(ring, gm.id).unwrap();

    let dup = duplicate(
        &mut vault.world,
        ring,
        Some(gm),
        &DuplicateOptions::new(),
        &mut NullAuditSink,
    )
    .unwrap();

    let copy = dup.copy().unwrap();
    assert_eq!(vault.world.parent(copy), Some(pack));
    assert_eq!(vault.world.parent(ring), Some(gm.id));
    assert_eq!(vault.world.children(gm.id).count(), 2);
}

#[test]
fn copies_can_be_dropped_at_a_world_position() {
    let mut vault = vault();
    let spot = Point3::new(-4, 7, 2);
    let options = DuplicateOptions::new()
        .with_placement(Placement::World {
            location: spot,
            region: Region(3),
        })
        .with_amount(2);

    let dup = duplicate(&mut vault.world, vault.pouch, None, &options, &mut NullAuditSink).unwrap();

    assert_eq!(dup.copies.len(), 2);
    assert_eq!(dup.len(), 6);
    for copy in &dup.copies {
        let core = vault.world.require(*copy).unwrap().core();
        assert_eq!(vault.world.parent(*copy), None);
        assert_eq!(core.location, spot);
        assert_eq!(core.region, Region(3));
    }
    assert_eq!(vault.world.children(vault.pouch).count(), 2);
}

#[test]
fn corpse_contents_follow_atomicity() {
    let mut vault = vault();
    let corpse = Corpse::create(&mut vault.world, vault.owner, EntityId::null()).unwrap();
    vault.world.attach(corpse, vault.chest).unwrap();
    let total = vault.world.len();

    let strict = duplicate(
        &mut vault.world,
        vault.chest,
        None,
        &DuplicateOptions::new(),
        &mut NullAuditSink,
    );
    assert!(matches!(
        strict.unwrap_err().kind,
        ErrorKind::NoParameterlessConstructor(_)
    ));
    assert_eq!(vault.world.len(), total);

    let lenient = duplicate(
        &mut vault.world,
        vault.chest,
        None,
        &DuplicateOptions::new().with_atomicity(Atomicity::BestEffort),
        &mut NullAuditSink,
    )
    .unwrap();
    assert!(!lenient.done);
    assert_eq!(lenient.skipped, vec![corpse]);
    assert_eq!(lenient.len(), 5);
}

#[test]
fn copies_survive_a_save() {
    let mut vault = vault();
    let dup = duplicate(
        &mut vault.world,
        vault.chest,
        None,
        &DuplicateOptions::new(),
        &mut NullAuditSink,
    )
    .unwrap();

    let (bytes, _) = save_to_bytes(&vault.world).unwrap();
    let (loaded, report) =
        load_from_bytes(&bytes, stock_registry().unwrap(), &PersistConfig::durable()).unwrap();

    assert_eq!(report.loaded, vault.world.len());
    for (original, copy) in &dup.created {
        assert_eq!(
            loaded.get(*copy).unwrap().tag(),
            vault.world.get(*original).unwrap().tag()
        );
    }
    let ruby = dup.copies_of(vault.ruby).next().unwrap();
    assert_eq!(loaded.get_as::<Item>(ruby).unwrap().data.owner, vault.owner);
    assert_eq!(
        loaded.children(dup.copy().unwrap()).collect::<Vec<_>>(),
        vault.world.children(dup.copy().unwrap()).collect::<Vec<_>>()
    );
    assert!(loaded.get(dup.copy().unwrap()).unwrap().tag() == tags::CONTAINER);
}
