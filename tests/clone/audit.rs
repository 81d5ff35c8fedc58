//! Every duplication attempt leaves exactly one audit record.

use strongbox_clone::{
    Actor, AuditOutcome, DuplicateOptions, MemoryAuditSink, duplicate,
};
use strongbox_foundation::{EntityId, Privilege};
use strongbox_stock::{Corpse, tags};

use crate::{game_master, vault};

#[test]
fn outcomes_are_recorded_in_order() {
    let mut vault = vault();
    let gm = game_master(&mut vault.world);
    let player = Actor::new(vault.owner, Privilege::Player);
    let corpse = Corpse::create(&mut vault.world, vault.owner, EntityId::null()).unwrap();
    let artifact = vault.world.spawn(tags::ARTIFACT).unwrap();
    let mut sink = MemoryAuditSink::new(16);
    let options = DuplicateOptions::new();

    let made = duplicate(&mut vault.world, vault.chest, Some(gm), &options, &mut sink).unwrap();
    let _ = duplicate(&mut vault.world, artifact, Some(gm), &options, &mut sink);
    let _ = duplicate(&mut vault.world, corpse, Some(gm), &options, &mut sink);
    let _ = duplicate(&mut vault.world, vault.owner, Some(player), &options, &mut sink);

    let outcomes: Vec<AuditOutcome> = sink.records().map(|r| r.outcome.clone()).collect();
    assert_eq!(
        outcomes,
        vec![
            AuditOutcome::Completed,
            AuditOutcome::Denied,
            AuditOutcome::NoConstructor,
            AuditOutcome::Denied,
        ]
    );

    let first = sink.records().next().unwrap();
    assert_eq!(first.actor, Some(gm.id));
    assert_eq!(first.source, vault.chest);
    assert_eq!(first.copies, made.copies);
    assert_eq!(first.created, 5);
    assert!(sink.records().skip(1).all(|r| r.created == 0 && r.copies.is_empty()));
}

#[test]
fn missing_source_is_recorded_as_failure() {
    let mut vault = vault();
    let mut sink = MemoryAuditSink::new(4);
    let ghost = EntityId::new(0x4000_0F00);

    assert!(duplicate(&mut vault.world, ghost, None, &DuplicateOptions::new(), &mut sink).is_err());

    let record = sink.last().unwrap();
    assert_eq!(record.actor, None);
    assert_eq!(record.source, ghost);
    assert!(matches!(record.outcome, AuditOutcome::Failed(_)));
    assert!(!record.outcome.is_success());
}
