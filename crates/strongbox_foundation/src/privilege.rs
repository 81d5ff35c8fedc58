//! Access levels.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Totally ordered access level of an actor.
///
/// Entity types declare a minimum privilege required to construct them
/// outside of loading; the clone engine refuses to duplicate an entity
/// whose type demands more than the acting character holds.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Privilege {
    /// Ordinary player.
    #[default]
    Player,
    /// Helper staff.
    Counselor,
    /// Game master.
    GameMaster,
    /// Event staff.
    Seer,
    /// Shard administrator.
    Administrator,
    /// Developer.
    Developer,
    /// Shard owner.
    Owner,
}

impl Privilege {
    /// All privileges in ascending order.
    pub const ALL: [Privilege; 7] = [
        Privilege::Player,
        Privilege::Counselor,
        Privilege::GameMaster,
        Privilege::Seer,
        Privilege::Administrator,
        Privilege::Developer,
        Privilege::Owner,
    ];

    /// Returns the wire representation.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Parses the wire representation.
    #[must_use]
    pub fn from_u8(raw: u8) -> Option<Self> {
        Self::ALL.get(usize::from(raw)).copied()
    }

    /// Returns true if this privilege satisfies `required`.
    #[must_use]
    pub fn satisfies(self, required: Privilege) -> bool {
        self >= required
    }
}

impl fmt::Display for Privilege {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Player => "player",
            Self::Counselor => "counselor",
            Self::GameMaster => "game-master",
            Self::Seer => "seer",
            Self::Administrator => "administrator",
            Self::Developer => "developer",
            Self::Owner => "owner",
        };
        f.write_str(name)
    }
}
