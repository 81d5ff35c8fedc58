//! Who duplicates, where copies go, and what happens on failure.

use strongbox_foundation::{EntityId, Error, ErrorKind, Point3, Privilege, Region, Result};
use strongbox_stock::Character;
use strongbox_storage::World;

// =============================================================================
// Actor
// =============================================================================

/// The character on whose behalf a duplication runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Actor {
    /// The acting entity.
    pub id: EntityId,
    /// Access level checked against each type's minimum privilege.
    pub privilege: Privilege,
}

impl Actor {
    /// Creates an actor.
    #[must_use]
    pub fn new(id: EntityId, privilege: Privilege) -> Self {
        Self { id, privilege }
    }

    /// Reads the actor's privilege from a character in the world.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` is not a character.
    pub fn character(world: &World, id: EntityId) -> Result<Self> {
        let character = world
            .get_as::<Character>(id)
            .ok_or_else(|| Error::entity_not_found(id))?;
        Ok(Self::new(id, character.privilege))
    }
}

// =============================================================================
// Placement
// =============================================================================

/// Where each top-level copy is put.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Placement {
    /// Next to the source: into its parent, or at its world position.
    #[default]
    InPlace,
    /// Into a container.
    Container(EntityId),
    /// At a world position.
    World {
        /// Position.
        location: Point3,
        /// Map region.
        region: Region,
    },
}

impl Placement {
    /// Into the actor's backpack, or at the actor's feet if there is none.
    ///
    /// # Errors
    ///
    /// Returns an error if `actor` is not a character.
    pub fn for_actor(world: &World, actor: EntityId) -> Result<Self> {
        let character = world
            .get_as::<Character>(actor)
            .ok_or_else(|| Error::entity_not_found(actor))?;
        if world.resolve(character.backpack).is_some() {
            return Ok(Self::Container(character.backpack));
        }
        let core = world.require(actor)?.core();
        Ok(Self::World {
            location: core.location,
            region: core.region,
        })
    }

    /// Resolves the placement against `source`, checking that a container
    /// target can hold children.
    ///
    /// In place, a source carried directly by a character is copied into
    /// that character's backpack, or to its feet without one, never onto
    /// the character itself.
    pub(crate) fn resolve(self, world: &World, source: EntityId) -> Result<Target> {
        let target = match self {
            Self::InPlace => match world.parent(source) {
                Some(parent) if world.get_as::<Character>(parent).is_some() => {
                    return Self::for_actor(world, parent)?.resolve(world, source);
                }
                Some(parent) => Target::Container(parent),
                None => {
                    let core = world.require(source)?.core();
                    Target::World(core.location, core.region)
                }
            },
            Self::Container(id) => Target::Container(id),
            Self::World { location, region } => Target::World(location, region),
        };
        if let Target::Container(id) = target {
            if !world.require(id)?.accepts_children() {
                return Err(Error::new(ErrorKind::ChildrenNotSupported(id)));
            }
        }
        Ok(target)
    }
}

/// A placement with [`Placement::InPlace`] resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Target {
    Container(EntityId),
    World(Point3, Region),
}

impl Target {
    /// Puts a fresh copy at this target.
    pub(crate) fn place(self, world: &mut World, copy: EntityId) -> Result<()> {
        match self {
            Self::Container(parent) => world.attach(copy, parent),
            Self::World(location, region) => world.move_to_world(copy, location, region),
        }
    }
}

// =============================================================================
// Atomicity
// =============================================================================

/// What a failure part-way through a subtree leaves behind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Atomicity {
    /// The whole subtree is checked before anything is created, and any
    /// copies already made are deleted if a later step fails.
    #[default]
    AllOrNothing,
    /// Descendants that cannot be copied are skipped. Copies already made
    /// stay in place and the result reports `done == false`.
    BestEffort,
}

// =============================================================================
// Options
// =============================================================================

/// Configuration for one duplicate call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DuplicateOptions {
    /// Where copies go.
    pub placement: Placement,
    /// Failure behaviour.
    pub atomicity: Atomicity,
    /// Number of copies of the source; at least one is made.
    pub amount: u16,
}

impl Default for DuplicateOptions {
    fn default() -> Self {
        Self {
            placement: Placement::InPlace,
            atomicity: Atomicity::AllOrNothing,
            amount: 1,
        }
    }
}

impl DuplicateOptions {
    /// Creates the default options: one copy, in place, all or nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the placement.
    #[must_use]
    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    /// Builder method to set the atomicity.
    #[must_use]
    pub fn with_atomicity(mut self, atomicity: Atomicity) -> Self {
        self.atomicity = atomicity;
        self
    }

    /// Builder method to set the number of copies.
    #[must_use]
    pub fn with_amount(mut self, amount: u16) -> Self {
        self.amount = amount;
        self
    }

    /// Number of copies actually made.
    #[must_use]
    pub fn copies(&self) -> u16 {
        self.amount.max(1)
    }
}
