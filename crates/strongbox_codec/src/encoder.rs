//! Append-only binary writer.

use strongbox_foundation::{EntityId, Point3, Region};

/// Little-endian writer for entity payloads.
///
/// Writes are infallible; the buffer grows as needed.
#[derive(Debug, Clone, Default)]
pub struct Encoder {
    buf: Vec<u8>,
}

impl Encoder {
    /// Creates an empty encoder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an encoder with preallocated capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Writes a schema version. Always the first field of a layer.
    pub fn write_version(&mut self, version: u32) {
        self.write_encoded_u32(version);
    }

    /// Writes a single byte.
    pub fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    /// Writes a boolean as one byte.
    pub fn write_bool(&mut self, v: bool) {
        self.buf.push(u8::from(v));
    }

    /// Writes a `u16`.
    pub fn write_u16(&mut self, v: u16) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    /// Writes a `u32`.
    pub fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    /// Writes an `i32`.
    pub fn write_i32(&mut self, v: i32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    /// Writes a `u64`.
    pub fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    /// Writes an `i64`.
    pub fn write_i64(&mut self, v: i64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    /// Writes a `u32` in 7-bit groups, low group first.
    pub fn write_encoded_u32(&mut self, mut v: u32) {
        while v >= 0x80 {
            #[allow(clippy::cast_possible_truncation)]
            self.buf.push((v as u8) | 0x80);
            v >>= 7;
        }
        #[allow(clippy::cast_possible_truncation)]
        self.buf.push(v as u8);
    }

    /// Writes an element count, saturating at `u32::MAX`, and returns how
    /// many elements the caller must write after it.
    pub fn write_count(&mut self, len: usize) -> usize {
        let count = u32::try_from(len).unwrap_or(u32::MAX);
        self.write_encoded_u32(count);
        len.min(count as usize)
    }

    /// Writes a length-prefixed UTF-8 string.
    ///
    /// Strings longer than `u32::MAX` bytes are cut at the last character
    /// boundary that fits.
    pub fn write_str(&mut self, s: &str) {
        let mut end = s.len().min(u32::MAX as usize);
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        self.write_bytes(&s.as_bytes()[..end]);
    }

    /// Writes raw bytes with a length prefix.
    ///
    /// Only the first `u32::MAX` bytes are written.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        let n = self.write_count(bytes.len());
        self.buf.extend_from_slice(&bytes[..n]);
    }

    /// Writes an entity reference. The null reference is written as `0`.
    pub fn write_reference(&mut self, id: EntityId) {
        self.write_u32(id.raw());
    }

    /// Writes a counted list of entity references.
    ///
    /// Only the first `u32::MAX` references are written.
    pub fn write_references(&mut self, ids: &[EntityId]) {
        let n = self.write_count(ids.len());
        for id in &ids[..n] {
            self.write_reference(*id);
        }
    }

    /// Writes a point.
    pub fn write_point(&mut self, p: Point3) {
        self.write_i32(p.x);
        self.write_i32(p.y);
        self.write_i32(p.z);
    }

    /// Writes a region.
    pub fn write_region(&mut self, r: Region) {
        self.write_u16(r.0);
    }

    /// Returns the number of bytes written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns true if nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Borrows the bytes written so far.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the encoder and returns the written bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}
