//! Privilege-gated duplication of entity subtrees for Strongbox.
//!
//! This crate provides:
//! - [`duplicate`] - Copies an entity and everything it contains
//! - [`DuplicateOptions`] - Placement, atomicity, and copy count
//! - [`Placement`] - Where copies go
//! - [`Atomicity`] - All-or-nothing or best-effort subtrees
//! - [`AuditSink`] - Receives one [`AuditRecord`] per call
//!
//! Copies are built from the registry: the type's parameterless
//! constructor, then every registered property copied from the source,
//! then the source's `after_duplicate` hook. References are copied as
//! identifiers, so a copy points at the same entities as its source.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod audit;
pub mod duplicate;
pub mod options;

pub use audit::{AuditOutcome, AuditRecord, AuditSink, MemoryAuditSink, NullAuditSink, TracingAuditSink};
pub use duplicate::{Duplication, duplicate};
pub use options::{Actor, Atomicity, DuplicateOptions, Placement};
