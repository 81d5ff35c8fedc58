//! Per-item named modifiers.

use std::collections::BTreeMap;
use std::sync::Arc;

use strongbox_codec::{Decoder, Encoder};
use strongbox_foundation::{Error, Result, Value};

/// Minimum encoded size of one entry: a one-byte name length and an `i64`.
const MIN_ENTRY_BYTES: usize = 9;

/// Mutable bag of integer modifiers owned by one item.
///
/// Exposed read-only to the generic copy pass; duplicates receive their own
/// copy through the item's `after_duplicate` hook.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: BTreeMap<Arc<str>, i64>,
}

impl Attributes {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the modifier for `name`, or 0.
    #[must_use]
    pub fn get(&self, name: &str) -> i64 {
        self.entries.get(name).copied().unwrap_or(0)
    }

    /// Sets a modifier. Setting 0 removes it.
    pub fn set(&mut self, name: &str, value: i64) {
        if value == 0 {
            self.entries.remove(name);
        } else {
            self.entries.insert(Arc::from(name), value);
        }
    }

    /// Returns the number of non-zero modifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no modifier is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates modifiers in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_ref(), *v))
    }

    /// Snapshots the modifiers as an owned map value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Map(
            self.entries
                .iter()
                .map(|(k, v)| (Arc::clone(k), Value::Int(*v)))
                .collect(),
        )
    }

    pub(crate) fn encode(&self, enc: &mut Encoder) {
        let count = enc.write_count(self.entries.len());
        for (name, value) in self.entries.iter().take(count) {
            enc.write_str(name);
            enc.write_i64(*value);
        }
    }

    pub(crate) fn decode(dec: &mut Decoder<'_>) -> Result<Self> {
        let count = dec.read_encoded_u32()? as usize;
        if count > dec.remaining() / MIN_ENTRY_BYTES {
            return Err(Error::invalid_data(format!(
                "attribute count {count} exceeds payload"
            )));
        }
        let mut attributes = Self::new();
        for _ in 0..count {
            let name = dec.read_str()?;
            let value = dec.read_i64()?;
            attributes.set(name, value);
        }
        Ok(attributes)
    }
}
