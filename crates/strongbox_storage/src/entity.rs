//! The entity contract every persisted type implements.

use std::any::Any;
use std::fmt;

use strongbox_codec::{Decoder, Encoder};
use strongbox_foundation::{EntityId, Point3, Region, Result};

/// State common to every entity.
///
/// Containment is not stored here. It lives in the
/// [`OwnershipGraph`](crate::OwnershipGraph) and only changes through
/// `attach` and `detach`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityCore {
    id: EntityId,
    tag: &'static str,
    /// Position in world space, or relative position inside the parent.
    pub location: Point3,
    /// Region for world-placed entities.
    pub region: Region,
    deleted: bool,
    totals: Totals,
}

impl EntityCore {
    /// Creates the core of a fresh entity placed nowhere.
    #[must_use]
    pub fn new(id: EntityId, tag: &'static str) -> Self {
        Self {
            id,
            tag,
            location: Point3::default(),
            region: Region::INTERNAL,
            deleted: false,
            totals: Totals::default(),
        }
    }

    /// Returns the entity's identifier.
    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Returns the entity's registered type tag.
    #[must_use]
    pub fn tag(&self) -> &'static str {
        self.tag
    }

    /// Returns true once the entity has been deleted.
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    pub(crate) fn mark_deleted(&mut self) {
        self.deleted = true;
    }

    /// Returns the cached totals.
    #[must_use]
    pub fn totals(&self) -> Totals {
        self.totals
    }

    pub(crate) fn set_totals(&mut self, totals: Totals) {
        self.totals = totals;
    }
}

/// Derived aggregate over an entity and everything it contains.
///
/// Recomputed by [`World::update_totals`](crate::World::update_totals);
/// never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    /// Number of descendants.
    pub items: u32,
    /// Own weight plus the weight of every descendant.
    pub weight: u32,
}

/// Upcasting helper so registered property accessors can reach the
/// concrete type behind a `dyn Entity`.
pub trait AsAny {
    /// Borrows `self` as `Any`.
    fn as_any(&self) -> &dyn Any;
    /// Mutably borrows `self` as `Any`.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A persisted object participating in the graph.
///
/// Implementations own their type-specific state and its codec. `encode`
/// writes a schema version first and `decode` reads it first, branching on
/// it to accept older layouts. Cross-entity references are stored as
/// identifiers and read with [`Decoder::read_entity`], which tolerates
/// referenced entities that are still empty shells.
pub trait Entity: AsAny + fmt::Debug + Send {
    /// Borrows the common state.
    fn core(&self) -> &EntityCore;

    /// Mutably borrows the common state.
    fn core_mut(&mut self) -> &mut EntityCore;

    /// Writes the type-specific payload.
    fn encode(&self, enc: &mut Encoder);

    /// Reads the type-specific payload into this shell.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload is malformed or from a newer schema.
    fn decode(&mut self, dec: &mut Decoder<'_>) -> Result<()>;

    /// Returns true if this entity can hold children.
    fn accepts_children(&self) -> bool {
        false
    }

    /// Own weight, excluding children.
    fn weight(&self) -> u32 {
        0
    }

    /// Fixes up a fresh duplicate after the generic property copy.
    ///
    /// Called on the source with the copy that was just built from it.
    fn after_duplicate(&self, _copy: &mut dyn Entity) {}

    /// Returns the entity's identifier.
    fn id(&self) -> EntityId {
        self.core().id()
    }

    /// Returns the entity's type tag.
    fn tag(&self) -> &'static str {
        self.core().tag()
    }
}

impl<'a> dyn Entity + 'a {
    /// Downcasts to a concrete entity type.
    #[must_use]
    pub fn downcast_ref<T: Entity + Any>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Mutably downcasts to a concrete entity type.
    #[must_use]
    pub fn downcast_mut<T: Entity + Any>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}
