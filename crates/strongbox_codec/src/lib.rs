//! Versioned binary encoder and decoder for Strongbox entity records.
//!
//! This crate provides:
//! - [`Encoder`] - Append-only little-endian writer
//! - [`Decoder`] - Bounds-checked reader with reference resolution
//! - [`ReferenceLookup`] - The seam through which a decoder asks the loader
//!   whether a referenced identifier exists
//!
//! Every entity layer writes its own schema version before its fields and
//! reads it back first, branching on it to parse older layouts.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod decoder;
pub mod encoder;

pub use decoder::{Decoder, ReferenceLookup};
pub use encoder::Encoder;
