//! Entity identifiers, namespaces, and world placement.

use std::fmt;
use std::ops::RangeInclusive;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Broad entity category owning a disjoint range of identifiers.
///
/// Ranges never overlap, so an identifier is unique within its namespace
/// and also across the whole world.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Namespace {
    /// Characters and other mobile actors.
    Character,
    /// Items, containers, and anything that can be carried.
    Item,
}

impl Namespace {
    /// All namespaces, in allocation-table order.
    pub const ALL: [Namespace; 2] = [Namespace::Character, Namespace::Item];

    /// Returns the inclusive range of raw identifiers owned by this namespace.
    #[must_use]
    pub const fn range(self) -> RangeInclusive<u32> {
        match self {
            Self::Character => 0x0000_0001..=0x3FFF_FFFF,
            Self::Item => 0x4000_0000..=0x7FFF_FFFF,
        }
    }

    /// Returns the first identifier issued in this namespace.
    #[must_use]
    pub const fn first(self) -> u32 {
        *self.range().start()
    }

    /// Returns the last identifier that may be issued in this namespace.
    #[must_use]
    pub const fn last(self) -> u32 {
        *self.range().end()
    }

    /// Returns the position of this namespace in [`Namespace::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Character => 0,
            Self::Item => 1,
        }
    }

    /// Returns the lowercase name used in save headers and logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Character => "character",
            Self::Item => "item",
        }
    }

    /// Returns the namespace that owns a raw identifier.
    #[must_use]
    pub fn of(raw: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|ns| ns.range().contains(&raw))
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Opaque entity identifier.
///
/// Identifiers are immutable once assigned and never reissued, even after
/// the entity they named has been deleted. The raw value `0` is the null
/// sentinel used for empty references.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EntityId(u32);

impl EntityId {
    /// Creates an identifier from its raw value.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the sentinel value representing "no entity".
    #[must_use]
    pub const fn null() -> Self {
        Self(0)
    }

    /// Returns true if this is the null sentinel value.
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    /// Returns the raw integer value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Returns the namespace this identifier belongs to, if any.
    #[must_use]
    pub fn namespace(self) -> Option<Namespace> {
        Namespace::of(self.0)
    }

    /// Converts the null sentinel to `None`.
    #[must_use]
    pub const fn non_null(self) -> Option<Self> {
        if self.is_null() { None } else { Some(self) }
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::null()
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "EntityId(null)")
        } else {
            write!(f, "EntityId({:#010x})", self.0)
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "Entity(null)")
        } else {
            write!(f, "Entity({:#010x})", self.0)
        }
    }
}

/// Position in world space or inside a container.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point3 {
    /// East-west coordinate.
    pub x: i32,
    /// North-south coordinate.
    pub y: i32,
    /// Altitude.
    pub z: i32,
}

impl Point3 {
    /// Creates a point.
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for Point3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// World region (map facet) an unparented entity is placed in.
///
/// `Region::INTERNAL` marks entities that are not visible in any region,
/// which is where contained and freshly constructed entities live.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Region(pub u16);

impl Region {
    /// The region of entities with no world placement.
    pub const INTERNAL: Region = Region(0x7F);
}
