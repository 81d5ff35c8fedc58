//! Identity allocation, type registry, ownership graph, and world arena for Strongbox.
//!
//! This crate provides:
//! - [`IdentityAllocator`] - Monotonic, never-reused identifiers per namespace
//! - [`TypeRegistry`] - Type tags mapped to shell factories, constructors,
//!   privilege gates, and copyable property descriptors
//! - [`OwnershipGraph`] - The acyclic parent/child containment forest
//! - [`World`] - The process-wide entity table keyed by identifier

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod allocator;
pub mod entity;
pub mod ownership;
pub mod registry;
pub mod world;

pub use allocator::IdentityAllocator;
pub use entity::{Entity, EntityCore, Totals};
pub use ownership::OwnershipGraph;
pub use registry::{Property, PropertyKind, RegistryBuilder, TypeInfo, TypeRegistry};
pub use world::World;
