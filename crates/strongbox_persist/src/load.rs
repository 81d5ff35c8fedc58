//! Reading worlds.
//!
//! Loading runs two passes over the records. The instantiation pass builds
//! an empty shell for every record with a registered tag and registers it
//! with the [`Resolver`]; no payload is read. The decode pass then decodes
//! every payload into its shell. Because every identifier is known before
//! any payload is interpreted, a record may reference records that come
//! before or after it.
//!
//! Containment links are collected while decoding and attached afterwards,
//! sorted by parent and position, so children come back in their saved
//! order whatever the record order.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use strongbox_foundation::{EntityId, Error, Result};
use strongbox_storage::{TypeRegistry, World};
use tracing::{info, warn};

use crate::config::PersistConfig;
use crate::format::read_file;
use crate::resolver::Resolver;

/// Outcome of a load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Entities now in the world.
    pub loaded: usize,
    /// Records skipped because their tag is not registered.
    pub skipped: Vec<(String, EntityId)>,
    /// References that pointed outside the save and were cleared.
    pub cleared_references: usize,
    /// Entities whose saved parent link could not be restored; they are
    /// left as world roots.
    pub orphaned: Vec<EntityId>,
}

/// Loads a world from save bytes.
///
/// # Errors
///
/// Returns an error if the framing is invalid, a payload cannot be decoded,
/// or the two passes detect an ordering violation. Unknown tags are not
/// errors; they are skipped and listed in the report.
pub fn load_from_bytes(
    bytes: &[u8],
    registry: Arc<TypeRegistry>,
    config: &PersistConfig,
) -> Result<(World, LoadReport)> {
    let (header, frames) = read_file(bytes)?;
    if header.records() != frames.len() as u64 {
        warn!(
            announced = header.records(),
            found = frames.len(),
            "header record count disagrees with file"
        );
    }

    let mut report = LoadReport::default();
    let mut accepted = Vec::with_capacity(frames.len());
    for frame in &frames {
        match registry.get(frame.tag) {
            Some(info) => accepted.push((frame, info)),
            None => {
                warn!(tag = frame.tag, id = %frame.id, "unknown type tag, record skipped");
                report.skipped.push((frame.tag.to_string(), frame.id));
            }
        }
    }

    let mut resolver = Resolver::new(accepted.iter().map(|(frame, _)| frame.id));

    for (frame, info) in &accepted {
        let shell = info
            .shell(frame.id)
            .map_err(|e| e.with_frame(format!("instantiating {} ({})", frame.id, frame.tag)))?;
        resolver.register(shell)?;
    }
    resolver.begin_decode()?;

    let mut links = Vec::new();
    for (frame, _) in &accepted {
        let context = || format!("decoding {} ({})", frame.id, frame.tag);
        let (common, trailing) = resolver
            .decode(frame.id, frame.payload)
            .map_err(|e| e.with_frame(context()))?;
        if trailing > 0 {
            if config.strict_payloads {
                return Err(Error::invalid_data(format!(
                    "{trailing} trailing bytes after payload"
                ))
                .with_frame(context()));
            }
            warn!(id = %frame.id, tag = frame.tag, trailing, "payload not fully consumed");
        }
        if !common.parent.is_null() {
            links.push((common.parent, common.order, frame.id));
        }
    }

    let (shells, cleared) = resolver.finish();
    report.cleared_references = cleared;

    let mut world = World::with_allocator(Arc::clone(&registry), header.allocator);
    for shell in shells.into_values() {
        world.insert(shell)?;
    }

    links.sort_unstable();
    for (parent, _, child) in links {
        if let Err(e) = world.attach(child, parent) {
            warn!(%child, %parent, error = %e, "containment link dropped");
            report.orphaned.push(child);
        }
    }
    world.update_all_totals();
    world.take_changed();

    report.loaded = world.len();
    info!(
        loaded = report.loaded,
        skipped = report.skipped.len(),
        cleared = report.cleared_references,
        "load completed"
    );
    Ok((world, report))
}

/// Loads a world from a save file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or [`load_from_bytes`] fails.
pub fn load_from_file<P: AsRef<Path>>(
    path: P,
    registry: Arc<TypeRegistry>,
    config: &PersistConfig,
) -> Result<(World, LoadReport)> {
    let path = path.as_ref();
    let bytes = fs::read(path)
        .map_err(|e| Error::io(format!("failed to read file '{}': {e}", path.display())))?;
    load_from_bytes(&bytes, registry, config)
        .map_err(|e| e.with_frame(format!("loading '{}'", path.display())))
}
