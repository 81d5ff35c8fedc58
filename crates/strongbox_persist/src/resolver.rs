//! The reference resolver used during two-phase load.
//!
//! The resolver owns every shell created by the instantiation pass. It is
//! write-only while instantiating and read-only while decoding; the phase
//! is tracked explicitly and crossing it the wrong way is a
//! [`LoaderInvariant`](strongbox_foundation::ErrorKind::LoaderInvariant)
//! error.
//!
//! Lookups distinguish two kinds of miss. An identifier listed in the
//! manifest but not yet registered means the passes ran out of order, which
//! is fatal. An identifier absent from the manifest belongs to an entity
//! that is not in this save (deleted, or skipped for an unknown tag); the
//! reference is cleared and counted.

use std::cell::Cell;
use std::collections::{BTreeMap, BTreeSet};

use strongbox_codec::{Decoder, ReferenceLookup};
use strongbox_foundation::{EntityId, Error, ErrorContext, Result};
use strongbox_storage::Entity;
use tracing::debug;

use crate::format::CommonSection;

/// Which load pass the resolver is serving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Shells are being registered; nothing may be looked up.
    Instantiating,
    /// Payloads are being decoded; nothing may be registered.
    Decoding,
}

/// Identifier index consulted by decoders.
#[derive(Debug, Default)]
pub struct ShellIndex {
    manifest: BTreeSet<EntityId>,
    registered: BTreeSet<EntityId>,
    cleared: Cell<usize>,
}

impl ShellIndex {
    /// Returns true if `id` has a shell.
    #[must_use]
    pub fn is_registered(&self, id: EntityId) -> bool {
        self.registered.contains(&id)
    }

    /// Returns true if `id` is expected in this load.
    #[must_use]
    pub fn is_expected(&self, id: EntityId) -> bool {
        self.manifest.contains(&id)
    }

    /// Number of references cleared so far.
    #[must_use]
    pub fn cleared(&self) -> usize {
        self.cleared.get()
    }
}

impl ReferenceLookup for ShellIndex {
    fn lookup(&self, id: EntityId) -> Result<bool> {
        if self.registered.contains(&id) {
            return Ok(true);
        }
        if self.manifest.contains(&id) {
            return Err(Error::loader_invariant(format!(
                "{id} is in the save but has no shell"
            ))
            .with_context(ErrorContext::new().with_entity(id)));
        }
        self.cleared.set(self.cleared.get() + 1);
        debug!(%id, "reference cleared");
        Ok(false)
    }
}

/// Identifier to shell table for one load.
#[derive(Debug)]
pub struct Resolver {
    phase: Phase,
    index: ShellIndex,
    shells: BTreeMap<EntityId, Box<dyn Entity>>,
}

impl Resolver {
    /// Creates a resolver expecting exactly the identifiers in `manifest`.
    #[must_use]
    pub fn new(manifest: impl IntoIterator<Item = EntityId>) -> Self {
        Self {
            phase: Phase::Instantiating,
            index: ShellIndex {
                manifest: manifest.into_iter().collect(),
                ..ShellIndex::default()
            },
            shells: BTreeMap::new(),
        }
    }

    /// Returns the current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns the identifier index.
    #[must_use]
    pub fn index(&self) -> &ShellIndex {
        &self.index
    }

    /// Registers a freshly instantiated shell.
    ///
    /// # Errors
    ///
    /// Returns a loader invariant error if decoding has begun or the shell
    /// is not in the manifest, and an invalid data error if its identifier
    /// is already registered.
    pub fn register(&mut self, shell: Box<dyn Entity>) -> Result<()> {
        let id = shell.id();
        if self.phase != Phase::Instantiating {
            return Err(Error::loader_invariant(format!(
                "{id} registered after decoding began"
            )));
        }
        if !self.index.manifest.contains(&id) {
            return Err(Error::loader_invariant(format!("{id} is not in the manifest")));
        }
        if !self.index.registered.insert(id) {
            return Err(Error::invalid_data(format!("{id} appears twice in the save")));
        }
        self.shells.insert(id, shell);
        Ok(())
    }

    /// Ends the instantiation pass.
    ///
    /// # Errors
    ///
    /// Returns a loader invariant error if a manifest entry never received
    /// a shell.
    pub fn begin_decode(&mut self) -> Result<()> {
        if let Some(missing) = self
            .index
            .manifest
            .iter()
            .find(|id| !self.index.registered.contains(id))
        {
            return Err(Error::loader_invariant(format!(
                "{missing} was never instantiated"
            )));
        }
        self.phase = Phase::Decoding;
        Ok(())
    }

    /// Looks up a registered shell.
    ///
    /// Returns `Ok(None)` for identifiers absent from this save.
    ///
    /// # Errors
    ///
    /// Returns a loader invariant error if called while instantiating, or
    /// if `id` is expected but has no shell.
    pub fn resolve(&self, id: EntityId) -> Result<Option<&dyn Entity>> {
        if self.phase != Phase::Decoding {
            return Err(Error::loader_invariant(format!(
                "{id} resolved before instantiation finished"
            )));
        }
        if id.is_null() || !self.index.lookup(id)? {
            return Ok(None);
        }
        self.shells
            .get(&id)
            .map(|shell| Some(&**shell))
            .ok_or_else(|| Error::loader_invariant(format!("{id} registered without a shell")))
    }

    /// Decodes one payload into its shell.
    ///
    /// Restores placement from the common section and returns it together
    /// with the number of unread trailing bytes.
    ///
    /// # Errors
    ///
    /// Returns a loader invariant error if called while instantiating or
    /// `id` has no shell, or any error raised by the entity's decoder.
    pub fn decode(&mut self, id: EntityId, payload: &[u8]) -> Result<(CommonSection, usize)> {
        if self.phase != Phase::Decoding {
            return Err(Error::loader_invariant(format!(
                "{id} decoded before instantiation finished"
            )));
        }
        let shell = self
            .shells
            .get_mut(&id)
            .ok_or_else(|| Error::loader_invariant(format!("{id} has no shell to decode into")))?;

        let mut dec = Decoder::with_lookup(payload, &self.index);
        let common = CommonSection::decode(&mut dec)?;
        let core = shell.core_mut();
        core.location = common.location;
        core.region = common.region;
        shell.decode(&mut dec)?;
        Ok((common, dec.remaining()))
    }

    /// Consumes the resolver, returning every shell and the number of
    /// cleared references.
    #[must_use]
    pub fn finish(self) -> (BTreeMap<EntityId, Box<dyn Entity>>, usize) {
        (self.shells, self.index.cleared())
    }
}
