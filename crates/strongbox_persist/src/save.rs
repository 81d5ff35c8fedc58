//! Writing worlds.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use strongbox_codec::Encoder;
use strongbox_foundation::{EntityId, Error, Namespace, Result};
use strongbox_storage::{Entity, World};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::config::PersistConfig;
use crate::format::{CommonSection, Header, RecordFrame, write_file};

/// Outcome of a save.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveReport {
    /// Records written.
    pub records: usize,
    /// File size in bytes.
    pub bytes: usize,
    /// Records per namespace.
    pub per_namespace: BTreeMap<Namespace, u32>,
}

/// Lists every live entity once: each root, then its subtree in pre-order.
fn walk(world: &World) -> Vec<EntityId> {
    let mut order = Vec::with_capacity(world.len());
    for root in world.roots() {
        order.push(root);
        order.extend(world.graph().descendants(root));
    }
    order
}

fn encode_payload(world: &World, entity: &dyn Entity) -> Vec<u8> {
    let id = entity.id();
    let order = world
        .graph()
        .position(id)
        .and_then(|pos| u32::try_from(pos).ok())
        .unwrap_or(0);
    let mut enc = Encoder::new();
    CommonSection {
        location: entity.core().location,
        region: entity.core().region,
        parent: world.parent(id).unwrap_or_default(),
        order,
    }
    .encode(&mut enc);
    entity.encode(&mut enc);
    enc.into_bytes()
}

/// Serializes a world.
///
/// Borrowing the world for the whole walk keeps the snapshot consistent.
///
/// # Errors
///
/// Returns an error if the header cannot be serialized.
pub fn save_to_bytes(world: &World) -> Result<(Vec<u8>, SaveReport)> {
    let mut header = Header::new(world.allocator().clone());
    let mut payloads = Vec::with_capacity(world.len());

    for id in walk(world) {
        let entity = world.require(id)?;
        if entity.core().is_deleted() {
            continue;
        }
        header.count(id);
        payloads.push((entity.tag(), id, encode_payload(world, entity)));
    }

    let frames: Vec<RecordFrame<'_>> = payloads
        .iter()
        .map(|(tag, id, payload)| RecordFrame {
            tag: *tag,
            id: *id,
            payload: payload.as_slice(),
        })
        .collect();
    let bytes = write_file(&header, &frames)?;

    let report = SaveReport {
        records: frames.len(),
        bytes: bytes.len(),
        per_namespace: header.counts,
    };
    Ok((bytes, report))
}

fn io_error(action: &str, path: &Path, e: &std::io::Error) -> Error {
    Error::io(format!("failed to {action} '{}': {e}", path.display()))
}

/// Path of the backup kept for `path`.
#[must_use]
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".bak");
    PathBuf::from(name)
}

/// Saves a world to a file, replacing any previous save atomically.
///
/// The new save is written in full to a temporary file in the same
/// directory and renamed over `path` only once complete. On error the
/// previous save is untouched.
///
/// # Errors
///
/// Returns an error if serialization or any file operation fails.
pub fn save_to_file<P: AsRef<Path>>(
    world: &World,
    path: P,
    config: &PersistConfig,
) -> Result<SaveReport> {
    let path = path.as_ref();
    let (bytes, report) = save_to_bytes(world)?;

    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(dir)
        .map_err(|e| io_error("create temporary file in", dir, &e))?;
    temp.write_all(&bytes)
        .map_err(|e| io_error("write", temp.path(), &e))?;
    temp.flush().map_err(|e| io_error("flush", temp.path(), &e))?;
    if config.sync {
        temp.as_file()
            .sync_all()
            .map_err(|e| io_error("sync", temp.path(), &e))?;
    }

    if config.keep_backup && path.exists() {
        let backup = backup_path(path);
        fs::copy(path, &backup).map_err(|e| io_error("back up", path, &e))?;
        debug!(backup = %backup.display(), "previous save backed up");
    }

    temp.persist(path)
        .map_err(|e| io_error("replace", path, &e.error))?;

    info!(
        records = report.records,
        bytes = report.bytes,
        path = %path.display(),
        "save completed"
    );
    Ok(report)
}
