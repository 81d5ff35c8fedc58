//! Integration tests for the codec
//!
//! Tests field framing, version gating, truncation, and reference lookup.

use strongbox_codec::{Decoder, Encoder, ReferenceLookup};
use strongbox_foundation::{EntityId, ErrorKind, Point3, Region, Result};

/// Knows identifiers below a threshold; anything above is absent.
struct Below(u32);

impl ReferenceLookup for Below {
    fn lookup(&self, id: EntityId) -> Result<bool> {
        Ok(id.raw() < self.0)
    }
}

// =============================================================================
// Framing
// =============================================================================

#[test]
fn fields_read_back_in_order() {
    let mut enc = Encoder::new();
    enc.write_version(3);
    enc.write_str("lantern");
    enc.write_u16(0x0A15);
    enc.write_i64(-40);
    enc.write_bool(true);
    enc.write_point(Point3::new(-1, 2, -3));
    enc.write_region(Region(4));
    let bytes = enc.into_bytes();

    let mut dec = Decoder::new(&bytes);
    assert_eq!(dec.read_version(3, "lantern").unwrap(), 3);
    assert_eq!(dec.read_str().unwrap(), "lantern");
    assert_eq!(dec.read_u16().unwrap(), 0x0A15);
    assert_eq!(dec.read_i64().unwrap(), -40);
    assert!(dec.read_bool().unwrap());
    assert_eq!(dec.read_point().unwrap(), Point3::new(-1, 2, -3));
    assert_eq!(dec.read_region().unwrap(), Region(4));
    dec.finish().unwrap();
}

#[test]
fn newer_version_is_rejected() {
    let mut enc = Encoder::new();
    enc.write_version(5);
    let bytes = enc.into_bytes();

    let err = Decoder::new(&bytes).read_version(4, "torch").unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::UnsupportedVersion { version: 5, .. }
    ));
}

#[test]
fn truncated_input_reports_shortfall() {
    let bytes = [1u8, 2];
    let err = Decoder::new(&bytes).read_u32().unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::UnexpectedEof {
            needed: 4,
            remaining: 2
        }
    ));
}

#[test]
fn trailing_bytes_fail_finish() {
    let bytes = [0u8; 3];
    let mut dec = Decoder::new(&bytes);
    dec.read_u8().unwrap();
    assert_eq!(dec.remaining(), 2);
    assert!(matches!(dec.finish().unwrap_err().kind, ErrorKind::InvalidData(_)));
}

// =============================================================================
// References
// =============================================================================

#[test]
fn absent_references_resolve_to_null() {
    let mut enc = Encoder::new();
    enc.write_reference(EntityId::new(5));
    enc.write_reference(EntityId::new(50));
    enc.write_reference(EntityId::null());
    let bytes = enc.into_bytes();
    let lookup = Below(10);

    let mut dec = Decoder::with_lookup(&bytes, &lookup);
    assert_eq!(dec.read_entity().unwrap(), EntityId::new(5));
    assert_eq!(dec.read_entity().unwrap(), EntityId::null());
    assert_eq!(dec.read_entity().unwrap(), EntityId::null());
}

#[test]
fn raw_reference_ignores_lookup() {
    let mut enc = Encoder::new();
    enc.write_reference(EntityId::new(50));
    let bytes = enc.into_bytes();
    let lookup = Below(10);

    let mut dec = Decoder::with_lookup(&bytes, &lookup);
    assert_eq!(dec.read_reference().unwrap(), EntityId::new(50));
}

#[test]
fn reference_lists_drop_absent_entries() {
    let mut enc = Encoder::new();
    enc.write_references(&[EntityId::new(1), EntityId::new(99), EntityId::new(2)]);
    let bytes = enc.into_bytes();
    let lookup = Below(10);

    let ids = Decoder::with_lookup(&bytes, &lookup).read_entities().unwrap();
    assert_eq!(ids, vec![EntityId::new(1), EntityId::new(2)]);
}
