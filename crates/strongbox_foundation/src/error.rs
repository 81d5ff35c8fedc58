//! Error types for the Strongbox system.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;

use thiserror::Error;

use crate::entity::{EntityId, Namespace};
use crate::privilege::Privilege;

/// The main error type for Strongbox operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Pushes a frame onto this error's context, creating it if needed.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        let context = self.context.take().unwrap_or_default();
        self.context = Some(context.with_frame(frame));
        self
    }

    /// Creates an entity not found error.
    #[must_use]
    pub fn entity_not_found(id: EntityId) -> Self {
        Self::new(ErrorKind::EntityNotFound(id))
    }

    /// Creates an unknown type tag error.
    #[must_use]
    pub fn unknown_type(tag: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownType(tag.into()))
    }

    /// Creates an ownership cycle error.
    #[must_use]
    pub fn cycle(child: EntityId, parent: EntityId) -> Self {
        Self::new(ErrorKind::CycleDetected { child, parent })
    }

    /// Creates an access denied error.
    #[must_use]
    pub fn access_denied(required: Privilege, actual: Privilege) -> Self {
        Self::new(ErrorKind::AccessDenied { required, actual })
    }

    /// Creates a missing parameterless constructor error.
    #[must_use]
    pub fn no_constructor(tag: impl Into<String>) -> Self {
        Self::new(ErrorKind::NoParameterlessConstructor(tag.into()))
    }

    /// Creates a truncated input error.
    #[must_use]
    pub fn unexpected_eof(needed: usize, remaining: usize) -> Self {
        Self::new(ErrorKind::UnexpectedEof { needed, remaining })
    }

    /// Creates an invalid data error.
    #[must_use]
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidData(message.into()))
    }

    /// Creates a loader invariant violation.
    #[must_use]
    pub fn loader_invariant(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::LoaderInvariant(message.into()))
    }

    /// Creates a property mismatch error.
    #[must_use]
    pub fn property_mismatch(property: &str, expected: &str, actual: &str) -> Self {
        Self::new(ErrorKind::PropertyMismatch {
            property: property.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        })
    }

    /// Creates an I/O error.
    #[must_use]
    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::IoError(message.into()))
    }

    /// Returns true if a load hitting this error must be abandoned
    /// rather than continued with a partially resolved graph.
    #[must_use]
    pub fn is_fatal_for_load(&self) -> bool {
        matches!(self.kind, ErrorKind::LoaderInvariant(_))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// Entity is not present in the world.
    #[error("entity not found: {0:?}")]
    EntityNotFound(EntityId),

    /// Identifier does not belong to the namespace its type requires.
    #[error("{id:?} is not in the {expected} namespace")]
    WrongNamespace {
        /// The offending identifier.
        id: EntityId,
        /// The namespace the type allocates from.
        expected: Namespace,
    },

    /// No identifiers remain in a namespace.
    #[error("namespace exhausted: {0}")]
    NamespaceExhausted(Namespace),

    /// Type tag has no registration.
    #[error("unknown type tag: {0}")]
    UnknownType(String),

    /// Type tag was registered twice.
    #[error("type tag already registered: {0}")]
    DuplicateType(String),

    /// Attaching would make an entity its own ancestor.
    #[error("ownership cycle: {child:?} cannot be placed inside {parent:?}")]
    CycleDetected {
        /// The entity being attached.
        child: EntityId,
        /// The requested parent.
        parent: EntityId,
    },

    /// The requested parent cannot hold children.
    #[error("{0:?} cannot hold children")]
    ChildrenNotSupported(EntityId),

    /// The type offers no zero-argument construction path.
    #[error("type {0} has no parameterless constructor")]
    NoParameterlessConstructor(String),

    /// The actor's privilege is below the type's minimum.
    #[error("access denied: requires {required}, actor has {actual}")]
    AccessDenied {
        /// Minimum privilege of the type.
        required: Privilege,
        /// Privilege held by the actor.
        actual: Privilege,
    },

    /// A property value did not fit the property.
    #[error("property {property}: expected {expected}, got {actual}")]
    PropertyMismatch {
        /// Property name.
        property: String,
        /// Expected value kind.
        expected: String,
        /// Actual value kind.
        actual: String,
    },

    /// Input ended before a field was complete.
    #[error("unexpected end of data: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEof {
        /// Bytes the field required.
        needed: usize,
        /// Bytes that were left.
        remaining: usize,
    },

    /// A record was written by a newer schema than this build understands.
    #[error("unsupported {what} version {version}")]
    UnsupportedVersion {
        /// What was being decoded.
        what: String,
        /// The version found in the data.
        version: u32,
    },

    /// Malformed persisted data.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Two-phase load ordering was broken.
    #[error("loader invariant violated: {0}")]
    LoaderInvariant(String),

    /// Header serialization failed.
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// File system failure.
    #[error("I/O error: {0}")]
    IoError(String),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Save file or operation name.
    pub source: Option<String>,
    /// Entity being processed.
    pub entity: Option<EntityId>,
    /// Trail of operations leading to the error, innermost first.
    pub stack: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Sets the entity.
    #[must_use]
    pub fn with_entity(mut self, entity: EntityId) -> Self {
        self.entity = Some(entity);
        self
    }

    /// Adds a stack frame.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.stack.push(frame.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.source {
            write!(f, "in {source}")?;
        }
        if let Some(entity) = self.entity {
            write!(f, " at {entity}")?;
        }
        if !self.stack.is_empty() {
            writeln!(f)?;
            for frame in &self.stack {
                writeln!(f, "  while {frame}")?;
            }
        }
        Ok(())
    }
}
