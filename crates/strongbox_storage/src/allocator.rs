//! Identifier allocation per namespace.
//!
//! The `IdentityAllocator` hands out identifiers in increasing order and
//! never reissues one, not even after the entity it named is deleted.
//! There is no rollback: an identifier consumed by a construction that is
//! later abandoned stays burned.

use strongbox_foundation::{EntityId, Error, ErrorKind, Namespace, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Issues unique identifiers, one monotonic counter per namespace.
///
/// The allocator is persisted in the save header so that restarts resume
/// after the highest identifier ever issued.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IdentityAllocator {
    /// Next raw identifier to issue, indexed by [`Namespace::index`].
    /// `None` once the namespace is exhausted.
    next: [Option<u32>; 2],
}

impl Default for IdentityAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityAllocator {
    /// Creates an allocator positioned at the start of every namespace.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next: Namespace::ALL.map(|ns| Some(ns.first())),
        }
    }

    /// Issues the next identifier in `namespace`.
    ///
    /// # Errors
    ///
    /// Returns an error if the namespace has no identifiers left.
    pub fn allocate(&mut self, namespace: Namespace) -> Result<EntityId> {
        let slot = &mut self.next[namespace.index()];
        let raw = slot.ok_or_else(|| Error::new(ErrorKind::NamespaceExhausted(namespace)))?;
        *slot = if raw == namespace.last() {
            None
        } else {
            Some(raw + 1)
        };
        Ok(EntityId::new(raw))
    }

    /// Returns the identifier the next call to [`allocate`](Self::allocate)
    /// would issue, if any remain.
    #[must_use]
    pub fn peek(&self, namespace: Namespace) -> Option<EntityId> {
        self.next[namespace.index()].map(EntityId::new)
    }

    /// Returns how many identifiers have been issued in `namespace`.
    #[must_use]
    pub fn issued(&self, namespace: Namespace) -> u64 {
        let end = self.next[namespace.index()].map_or(u64::from(namespace.last()) + 1, u64::from);
        end - u64::from(namespace.first())
    }

    /// Advances past an identifier that already exists, such as one read
    /// from a save file.
    ///
    /// Has no effect if the allocator is already beyond `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` belongs to no namespace.
    pub fn observe(&mut self, id: EntityId) -> Result<()> {
        let namespace = id
            .namespace()
            .ok_or_else(|| Error::invalid_data(format!("{id:?} belongs to no namespace")))?;
        let slot = &mut self.next[namespace.index()];
        if let Some(next) = *slot {
            if id.raw() >= next {
                *slot = if id.raw() == namespace.last() {
                    None
                } else {
                    Some(id.raw() + 1)
                };
            }
        }
        Ok(())
    }

    /// Returns true if `id` has been issued by this allocator.
    #[must_use]
    pub fn has_issued(&self, id: EntityId) -> bool {
        let Some(namespace) = id.namespace() else {
            return false;
        };
        match self.next[namespace.index()] {
            Some(next) => id.raw() < next,
            None => true,
        }
    }
}
