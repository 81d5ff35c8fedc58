//! Save file framing.
//!
//! A save is the magic bytes, a length-prefixed `MessagePack` header, and
//! one record per entity. Record payloads open with a common section
//! (placement and containment) written by this module, followed by the
//! entity's own versioned section.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use strongbox_codec::{Decoder, Encoder};
use strongbox_foundation::{EntityId, Error, ErrorKind, Namespace, Point3, Region, Result};
use strongbox_storage::IdentityAllocator;

/// Leading bytes of every save file.
pub const MAGIC: &[u8; 4] = b"SBOX";

/// Current save file format version.
pub const FORMAT_VERSION: u32 = 1;

const COMMON_VERSION: u32 = 0;

/// Save file header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Format version that wrote the file.
    pub format_version: u32,
    /// Allocator state at save time.
    pub allocator: IdentityAllocator,
    /// Number of records per namespace.
    pub counts: BTreeMap<Namespace, u32>,
}

impl Header {
    /// Creates a header for the current format.
    #[must_use]
    pub fn new(allocator: IdentityAllocator) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            allocator,
            counts: BTreeMap::new(),
        }
    }

    /// Counts one record for `id`'s namespace.
    pub fn count(&mut self, id: EntityId) {
        if let Some(ns) = id.namespace() {
            *self.counts.entry(ns).or_default() += 1;
        }
    }

    /// Total records announced by the header.
    #[must_use]
    pub fn records(&self) -> u64 {
        self.counts.values().map(|n| u64::from(*n)).sum()
    }

    /// Serializes the header.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        rmp_serde::to_vec_named(self)
            .map_err(|e| Error::new(ErrorKind::SerializationError(e.to_string())))
    }

    /// Deserializes a header and checks its version.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails or the file was written by
    /// a newer format.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let header: Self = rmp_serde::from_slice(bytes)
            .map_err(|e| Error::new(ErrorKind::SerializationError(e.to_string())))?;
        if header.format_version > FORMAT_VERSION {
            return Err(Error::new(ErrorKind::UnsupportedVersion {
                what: "save file".to_string(),
                version: header.format_version,
            }));
        }
        Ok(header)
    }
}

/// One record as stored in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordFrame<'a> {
    /// Type tag.
    pub tag: &'a str,
    /// Entity identifier.
    pub id: EntityId,
    /// Common section plus type section.
    pub payload: &'a [u8],
}

/// Placement and containment, written ahead of every type section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommonSection {
    /// World or in-container position.
    pub location: Point3,
    /// World region.
    pub region: Region,
    /// Parent, or null for a world root.
    pub parent: EntityId,
    /// Index within the parent's children.
    pub order: u32,
}

impl CommonSection {
    /// Writes the section.
    pub fn encode(&self, enc: &mut Encoder) {
        enc.write_version(COMMON_VERSION);
        enc.write_point(self.location);
        enc.write_region(self.region);
        enc.write_reference(self.parent);
        enc.write_encoded_u32(self.order);
    }

    /// Reads the section. The parent is kept as stored, so a link to a
    /// parent missing from the load still reaches the loader and is
    /// reported as orphaned there.
    ///
    /// # Errors
    ///
    /// Returns an error on malformed input or a loader invariant violation.
    pub fn decode(dec: &mut Decoder<'_>) -> Result<Self> {
        dec.read_version(COMMON_VERSION, "common section")?;
        Ok(Self {
            location: dec.read_point()?,
            region: dec.read_region()?,
            parent: dec.read_reference()?,
            order: dec.read_encoded_u32()?,
        })
    }
}

/// Assembles a save file from a header and records.
///
/// # Errors
///
/// Returns an error if the header cannot be serialized or a record is larger
/// than 4 GiB.
pub fn write_file(header: &Header, frames: &[RecordFrame<'_>]) -> Result<Vec<u8>> {
    let head = header.to_bytes()?;
    let head_len = u32::try_from(head.len())
        .map_err(|_| Error::new(ErrorKind::Internal("header larger than 4 GiB".to_string())))?;

    if let Some(frame) = frames.iter().find(|f| u32::try_from(f.payload.len()).is_err()) {
        return Err(Error::new(ErrorKind::Internal(format!(
            "record {} ({}) larger than 4 GiB",
            frame.id, frame.tag
        ))));
    }

    let body_len: usize = frames.iter().map(|f| f.tag.len() + f.payload.len() + 14).sum();
    let mut out = Vec::with_capacity(MAGIC.len() + 4 + head.len() + body_len);
    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&head_len.to_le_bytes());
    out.extend_from_slice(&head);

    let mut enc = Encoder::with_capacity(body_len);
    for frame in frames {
        enc.write_str(frame.tag);
        enc.write_reference(frame.id);
        enc.write_bytes(frame.payload);
    }
    out.extend_from_slice(enc.as_bytes());
    Ok(out)
}

/// Splits a save file into its header and records.
///
/// # Errors
///
/// Returns an error if the magic bytes are wrong, the file is truncated, or
/// the header cannot be read.
pub fn read_file(bytes: &[u8]) -> Result<(Header, Vec<RecordFrame<'_>>)> {
    if bytes.len() < MAGIC.len() + 4 {
        return Err(Error::unexpected_eof(MAGIC.len() + 4, bytes.len()));
    }
    if &bytes[..MAGIC.len()] != MAGIC {
        return Err(Error::invalid_data("not a strongbox save file"));
    }
    let mut len_bytes = [0u8; 4];
    len_bytes.copy_from_slice(&bytes[MAGIC.len()..MAGIC.len() + 4]);
    let head_len = usize::try_from(u32::from_le_bytes(len_bytes))
        .map_err(|_| Error::invalid_data("header length does not fit in memory"))?;
    let body = &bytes[MAGIC.len() + 4..];
    if body.len() < head_len {
        return Err(Error::unexpected_eof(head_len, body.len()));
    }
    let header = Header::from_bytes(&body[..head_len])?;

    let mut dec = Decoder::new(&body[head_len..]);
    let mut frames = Vec::new();
    while !dec.is_empty() {
        let tag = dec.read_str()?;
        let id = dec.read_reference()?;
        let payload = dec
            .read_bytes()
            .map_err(|e| e.with_frame(format!("reading record {id} ({tag})")))?;
        frames.push(RecordFrame { tag, id, payload });
    }
    Ok((header, frames))
}

/// One record as listed by [`summarize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSummary {
    /// Type tag.
    pub tag: String,
    /// Entity identifier.
    pub id: EntityId,
    /// Payload size in bytes.
    pub payload_len: usize,
}

/// Overview of a save file produced without decoding any payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    /// The header.
    pub header: Header,
    /// Records in file order.
    pub records: Vec<RecordSummary>,
    /// Total file size.
    pub bytes: usize,
}

impl Summary {
    /// Counts records per type tag.
    #[must_use]
    pub fn tag_counts(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for record in &self.records {
            *counts.entry(record.tag.as_str()).or_default() += 1;
        }
        counts
    }

    /// Returns true if the header's counts agree with the records.
    #[must_use]
    pub fn counts_match(&self) -> bool {
        let mut actual: BTreeMap<Namespace, u32> = BTreeMap::new();
        for record in &self.records {
            if let Some(ns) = record.id.namespace() {
                *actual.entry(ns).or_default() += 1;
            }
        }
        actual == self.header.counts
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "format v{}, {} records, {} bytes",
            self.header.format_version,
            self.records.len(),
            self.bytes
        )?;
        for ns in Namespace::ALL {
            writeln!(
                f,
                "  {ns}: {} records, next id {}",
                self.header.counts.get(&ns).copied().unwrap_or(0),
                self.header
                    .allocator
                    .peek(ns)
                    .map_or_else(|| "exhausted".to_string(), |id| id.to_string())
            )?;
        }
        for (tag, count) in self.tag_counts() {
            writeln!(f, "  {tag}: {count}")?;
        }
        Ok(())
    }
}

/// Reads a save's header and record frames without decoding payloads.
///
/// # Errors
///
/// Returns an error if the file framing is invalid.
pub fn summarize(bytes: &[u8]) -> Result<Summary> {
    let (header, frames) = read_file(bytes)?;
    Ok(Summary {
        header,
        records: frames
            .iter()
            .map(|f| RecordSummary {
                tag: f.tag.to_string(),
                id: f.id,
                payload_len: f.payload.len(),
            })
            .collect(),
        bytes: bytes.len(),
    })
}
