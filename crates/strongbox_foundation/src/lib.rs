//! Identifiers, privileges, property values, and errors for Strongbox.
//!
//! This crate provides:
//! - [`EntityId`] - Opaque entity identifiers partitioned into [`Namespace`]s
//! - [`Privilege`] - Ordered access levels used to gate construction
//! - [`Value`] - Generic property values for the clone engine
//! - [`Error`] - Rich error types with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod entity;
pub mod error;
pub mod privilege;
pub mod value;

pub use entity::{EntityId, Namespace, Point3, Region};
pub use error::{Error, ErrorContext, ErrorKind};
pub use privilege::Privilege;
pub use value::Value;

/// Result type used throughout Strongbox.
pub type Result<T> = std::result::Result<T, Error>;
