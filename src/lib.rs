//! Strongbox - Persistent object graph engine
//!
//! This crate re-exports all layers of the Strongbox system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 4: strongbox_runtime    - CLI, logging setup
//! Layer 3: strongbox_clone      - Subtree duplication, audit records
//!          strongbox_persist    - Save files, two-phase load
//! Layer 2: strongbox_stock      - Items, containers, corpses, characters
//! Layer 1: strongbox_storage    - World, type registry, ownership, allocator
//!          strongbox_codec      - Versioned binary payloads
//! Layer 0: strongbox_foundation - Core types (EntityId, Value, Error)
//! ```

pub use strongbox_clone as clone;
pub use strongbox_codec as codec;
pub use strongbox_foundation as foundation;
pub use strongbox_persist as persist;
pub use strongbox_runtime as runtime;
pub use strongbox_stock as stock;
pub use strongbox_storage as storage;
