//! Generic property values.
//!
//! Values carry attribute data between entities during the property-copy
//! pass of duplication. They are immutable once built: text is shared
//! through `Arc<str>`, while composite maps own their contents so that a
//! cloned `Value` never aliases mutable state.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::entity::{EntityId, Point3};

/// A property value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Value {
    /// Absence of a value.
    #[default]
    Nil,
    /// Boolean value.
    Bool(bool),
    /// 64-bit signed integer.
    Int(i64),
    /// Shared, immutable text.
    Text(Arc<str>),
    /// A point.
    Point(Point3),
    /// Reference to another entity (aliased on copy).
    Entity(EntityId),
    /// Owned composite of named values (deep-copied on copy).
    Map(BTreeMap<Arc<str>, Value>),
}

impl Value {
    /// Returns the name of this value's variant, for error messages.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Nil => "nil",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Text(_) => "text",
            Self::Point(_) => "point",
            Self::Entity(_) => "entity",
            Self::Map(_) => "map",
        }
    }

    /// Returns true if this value is nil.
    #[must_use]
    pub const fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }

    /// Attempts to extract a boolean value.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Attempts to extract an integer value.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Attempts to extract text.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to extract a point.
    #[must_use]
    pub const fn as_point(&self) -> Option<Point3> {
        match self {
            Self::Point(p) => Some(*p),
            _ => None,
        }
    }

    /// Attempts to extract an entity reference.
    ///
    /// `Nil` is accepted as the empty reference.
    #[must_use]
    pub const fn as_entity(&self) -> Option<EntityId> {
        match self {
            Self::Entity(id) => Some(*id),
            Self::Nil => Some(EntityId::null()),
            _ => None,
        }
    }

    /// Attempts to borrow a composite map.
    #[must_use]
    pub fn as_map(&self) -> Option<&BTreeMap<Arc<str>, Value>> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Looks up a field of a composite map.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.as_map().and_then(|m| m.get(name))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(Arc::from(s))
    }
}

impl From<Arc<str>> for Value {
    fn from(s: Arc<str>) -> Self {
        Self::Text(s)
    }
}

impl From<Point3> for Value {
    fn from(p: Point3) -> Self {
        Self::Point(p)
    }
}

impl From<EntityId> for Value {
    fn from(id: EntityId) -> Self {
        Self::Entity(id)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => write!(f, "nil"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Text(s) => write!(f, "{s:?}"),
            Self::Point(p) => write!(f, "{p}"),
            Self::Entity(id) => write!(f, "{id}"),
            Self::Map(m) => {
                write!(f, "{{")?;
                for (i, (k, v)) in m.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, "}}")
            }
        }
    }
}
