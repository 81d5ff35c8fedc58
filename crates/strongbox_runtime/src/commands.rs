//! The `inspect`, `verify`, and `demo` commands.

use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use strongbox_clone::{
    Actor, DuplicateOptions, Duplication, Placement, TracingAuditSink, duplicate,
};
use strongbox_foundation::{EntityId, Error, Point3, Privilege, Region};
use strongbox_persist::{
    LoadReport, PersistConfig, SaveReport, Summary, load_from_bytes, load_from_file,
    save_to_file, summarize,
};
use strongbox_stock::{Character, Container, Item, ItemData, stock_registry, tags};
use strongbox_storage::World;
use tracing::info;

use crate::error::Result;

fn read(path: &Path) -> Result<Vec<u8>> {
    fs::read(path)
        .map_err(|e| Error::io(format!("failed to read file '{}': {e}", path.display())).into())
}

// =============================================================================
// Inspect
// =============================================================================

/// Reads a save's header and record frames.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a save.
pub fn inspect(path: &Path) -> Result<Summary> {
    let bytes = read(path)?;
    Ok(summarize(&bytes)?)
}

// =============================================================================
// Verify
// =============================================================================

/// Findings of [`verify`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Verification {
    /// Records in the file.
    pub records: usize,
    /// What the strict load reported.
    pub report: LoadReport,
    /// Problems found. Empty for a healthy save.
    pub issues: Vec<String>,
}

impl Verification {
    /// Returns true if no problems were found.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

impl fmt::Display for Verification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} records, {} loaded, {} references cleared",
            self.records, self.report.loaded, self.report.cleared_references
        )?;
        if self.is_clean() {
            return writeln!(f, "ok");
        }
        for issue in &self.issues {
            writeln!(f, "  {issue}")?;
        }
        Ok(())
    }
}

/// Loads a save with strict payload checks and looks for inconsistencies.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the load fails outright.
/// Recoverable problems are listed in the returned [`Verification`].
pub fn verify(path: &Path) -> Result<Verification> {
    let bytes = read(path)?;
    let summary = summarize(&bytes)?;
    let mut issues = Vec::new();
    if !summary.counts_match() {
        issues.push("header record counts disagree with the records".to_string());
    }

    let (world, report) = load_from_bytes(&bytes, stock_registry()?, &PersistConfig::durable())?;
    for (tag, id) in &report.skipped {
        issues.push(format!("{id}: unknown type '{tag}'"));
    }
    for id in &report.orphaned {
        issues.push(format!("{id}: saved parent could not be restored"));
    }
    for id in world.ids() {
        if !summary.header.allocator.has_issued(id) {
            issues.push(format!("{id}: not yet issued by the saved allocator"));
        }
    }

    Ok(Verification {
        records: summary.records.len(),
        report,
        issues,
    })
}

// =============================================================================
// Demo
// =============================================================================

/// What [`demo`] did.
#[derive(Clone, Debug)]
pub struct DemoOutcome {
    /// The duplication of the treasure chest.
    pub duplication: Duplication,
    /// The save.
    pub save: SaveReport,
    /// Entities in the world when it was saved.
    pub entities: usize,
    /// Entities after loading the save back.
    pub reloaded: usize,
}

impl fmt::Display for DemoOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "duplicated {} entities ({} skipped)",
            self.duplication.len(),
            self.duplication.skipped.len()
        )?;
        writeln!(
            f,
            "saved {} records in {} bytes",
            self.save.records, self.save.bytes
        )?;
        write!(f, "reloaded {} of {} entities", self.reloaded, self.entities)
    }
}

fn spawn_item(world: &mut World, name: &str, weight: u32, parent: EntityId) -> Result<EntityId> {
    let id = world.spawn(tags::ITEM)?;
    if let Some(item) = world.get_as_mut::<Item>(id) {
        item.data = ItemData::named(name, weight);
    }
    world.attach(id, parent)?;
    Ok(id)
}

fn spawn_container(world: &mut World, name: &str) -> Result<EntityId> {
    let id = world.spawn(tags::CONTAINER)?;
    if let Some(container) = world.get_as_mut::<Container>(id) {
        container.item = ItemData::named(name, 2);
    }
    Ok(id)
}

/// Builds a small world, has a game master duplicate a treasure chest into
/// their backpack, saves the world to `path`, and loads it back.
///
/// # Errors
///
/// Returns an error if any step fails.
pub fn demo(path: &Path) -> Result<DemoOutcome> {
    let mut world = World::new(stock_registry()?);

    let gm = world.spawn(tags::CHARACTER)?;
    if let Some(character) = world.get_as_mut::<Character>(gm) {
        character.name = Arc::from("Mordecai");
        character.privilege = Privilege::GameMaster;
    }
    world.move_to_world(gm, Point3::new(1496, 1628, 10), Region(1))?;
    Character::equip_backpack(&mut world, gm)?;

    let chest = spawn_container(&mut world, "treasure chest")?;
    world.move_to_world(chest, Point3::new(1497, 1628, 10), Region(1))?;
    spawn_item(&mut world, "gold coin", 0, chest)?;
    let pouch = spawn_container(&mut world, "pouch")?;
    world.attach(pouch, chest)?;
    spawn_item(&mut world, "ruby", 1, pouch)?;
    spawn_item(&mut world, "jade", 1, pouch)?;
    let relic = world.spawn(tags::ARTIFACT)?;
    world.attach(relic, chest)?;

    let actor = Actor::character(&world, gm)?;
    let options = DuplicateOptions::new().with_placement(Placement::for_actor(&world, gm)?);
    let duplication = duplicate(&mut world, chest, Some(actor), &options, &mut TracingAuditSink)?;

    let save = save_to_file(&world, path, &PersistConfig::default())?;
    let (reloaded, report) = load_from_file(path, stock_registry()?, &PersistConfig::durable())?;
    info!(loaded = report.loaded, "demo world reloaded");

    Ok(DemoOutcome {
        duplication,
        save,
        entities: world.len(),
        reloaded: reloaded.len(),
    })
}
