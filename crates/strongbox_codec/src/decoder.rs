//! Bounds-checked binary reader.

use strongbox_foundation::{EntityId, Error, ErrorKind, Point3, Region, Result};

/// Answers whether a referenced identifier exists while payloads decode.
///
/// Implemented by the loader's reference resolver. A lookup returns:
/// - `Ok(true)` when a shell is registered under the identifier
/// - `Ok(false)` when the identifier is absent from the save, in which case
///   the reference is cleared
/// - `Err` when the identifier is known to the save but has no shell,
///   which means pass ordering was broken and the load must stop
pub trait ReferenceLookup {
    /// Looks up an identifier.
    ///
    /// # Errors
    ///
    /// Returns a loader invariant error if the identifier is present in the
    /// save but was never instantiated.
    fn lookup(&self, id: EntityId) -> Result<bool>;
}

/// Reader over one entity payload.
pub struct Decoder<'a> {
    bytes: &'a [u8],
    pos: usize,
    refs: Option<&'a dyn ReferenceLookup>,
}

impl<'a> Decoder<'a> {
    /// Creates a decoder without reference resolution.
    ///
    /// [`Decoder::read_entity`] then returns stored identifiers unchanged.
    #[must_use]
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            pos: 0,
            refs: None,
        }
    }

    /// Creates a decoder that resolves references through `refs`.
    #[must_use]
    pub fn with_lookup(bytes: &'a [u8], refs: &'a dyn ReferenceLookup) -> Self {
        Self {
            bytes,
            pos: 0,
            refs: Some(refs),
        }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let remaining = self.remaining();
        if n > remaining {
            return Err(Error::unexpected_eof(n, remaining));
        }
        let slice = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let slice = self.take(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(slice);
        Ok(out)
    }

    /// Reads a schema version and rejects versions newer than `current`.
    ///
    /// # Errors
    ///
    /// Returns an error on truncated input or an unsupported version.
    pub fn read_version(&mut self, current: u32, what: &str) -> Result<u32> {
        let version = self.read_encoded_u32()?;
        if version > current {
            return Err(Error::new(ErrorKind::UnsupportedVersion {
                what: what.to_string(),
                version,
            }));
        }
        Ok(version)
    }

    /// Reads a single byte.
    ///
    /// # Errors
    ///
    /// Returns an error on truncated input.
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    /// Reads a boolean.
    ///
    /// # Errors
    ///
    /// Returns an error on truncated input or a byte other than 0 or 1.
    pub fn read_bool(&mut self) -> Result<bool> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(Error::invalid_data(format!("invalid boolean byte {other}"))),
        }
    }

    /// Reads a `u16`.
    ///
    /// # Errors
    ///
    /// Returns an error on truncated input.
    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.take_array()?))
    }

    /// Reads a `u32`.
    ///
    /// # Errors
    ///
    /// Returns an error on truncated input.
    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.take_array()?))
    }

    /// Reads an `i32`.
    ///
    /// # Errors
    ///
    /// Returns an error on truncated input.
    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(i32::from_le_bytes(self.take_array()?))
    }

    /// Reads a `u64`.
    ///
    /// # Errors
    ///
    /// Returns an error on truncated input.
    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(u64::from_le_bytes(self.take_array()?))
    }

    /// Reads an `i64`.
    ///
    /// # Errors
    ///
    /// Returns an error on truncated input.
    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(i64::from_le_bytes(self.take_array()?))
    }

    /// Reads a 7-bit group encoded `u32`.
    ///
    /// # Errors
    ///
    /// Returns an error on truncated input or an encoding longer than
    /// five groups.
    pub fn read_encoded_u32(&mut self) -> Result<u32> {
        let mut value: u32 = 0;
        for shift in (0..35).step_by(7) {
            let byte = self.read_u8()?;
            let group = u32::from(byte & 0x7F);
            if shift == 28 && group > 0x0F {
                return Err(Error::invalid_data("encoded integer overflows u32"));
            }
            value |= group << shift;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(Error::invalid_data("encoded integer longer than five bytes"))
    }

    fn read_len(&mut self) -> Result<usize> {
        let len = self.read_encoded_u32()?;
        usize::try_from(len).map_err(|_| Error::invalid_data("length exceeds address space"))
    }

    /// Reads a length-prefixed UTF-8 string.
    ///
    /// # Errors
    ///
    /// Returns an error on truncated input or invalid UTF-8.
    pub fn read_str(&mut self) -> Result<&'a str> {
        let len = self.read_len()?;
        let bytes = self.take(len)?;
        std::str::from_utf8(bytes).map_err(|e| Error::invalid_data(format!("invalid UTF-8: {e}")))
    }

    /// Reads length-prefixed raw bytes.
    ///
    /// # Errors
    ///
    /// Returns an error on truncated input.
    pub fn read_bytes(&mut self) -> Result<&'a [u8]> {
        let len = self.read_len()?;
        self.take(len)
    }

    /// Reads a stored entity reference without resolving it.
    ///
    /// # Errors
    ///
    /// Returns an error on truncated input.
    pub fn read_reference(&mut self) -> Result<EntityId> {
        Ok(EntityId::new(self.read_u32()?))
    }

    /// Reads an entity reference and resolves it through the lookup.
    ///
    /// References to identifiers absent from the save come back as
    /// [`EntityId::null`]. Without a lookup, the stored identifier is
    /// returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error on truncated input, or a loader invariant error
    /// from the lookup.
    pub fn read_entity(&mut self) -> Result<EntityId> {
        let id = self.read_reference()?;
        self.resolve(id)
    }

    /// Resolves an identifier read earlier through the lookup.
    ///
    /// # Errors
    ///
    /// Returns a loader invariant error from the lookup.
    pub fn resolve(&self, id: EntityId) -> Result<EntityId> {
        if id.is_null() {
            return Ok(id);
        }
        match self.refs {
            Some(refs) if !refs.lookup(id)? => Ok(EntityId::null()),
            _ => Ok(id),
        }
    }

    /// Reads a counted list of references, dropping those that resolve to null.
    ///
    /// # Errors
    ///
    /// Returns an error on truncated input, or a loader invariant error
    /// from the lookup.
    pub fn read_entities(&mut self) -> Result<Vec<EntityId>> {
        let len = self.read_len()?;
        let mut out = Vec::with_capacity(len.min(self.remaining() / 4));
        for _ in 0..len {
            let id = self.read_entity()?;
            if !id.is_null() {
                out.push(id);
            }
        }
        Ok(out)
    }

    /// Reads a point.
    ///
    /// # Errors
    ///
    /// Returns an error on truncated input.
    pub fn read_point(&mut self) -> Result<Point3> {
        Ok(Point3::new(
            self.read_i32()?,
            self.read_i32()?,
            self.read_i32()?,
        ))
    }

    /// Reads a region.
    ///
    /// # Errors
    ///
    /// Returns an error on truncated input.
    pub fn read_region(&mut self) -> Result<Region> {
        Ok(Region(self.read_u16()?))
    }

    /// Returns the number of unread bytes.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    /// Returns the current read offset.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns true if every byte has been read.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Checks that the payload was fully consumed.
    ///
    /// # Errors
    ///
    /// Returns an error naming the number of trailing bytes.
    pub fn finish(&self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(Error::invalid_data(format!(
                "{} trailing bytes after payload",
                self.remaining()
            )))
        }
    }
}
