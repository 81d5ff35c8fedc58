//! Integration tests for Layers 1 and 2: Codec, Storage, Stock
//!
//! Tests for the codec, identity allocation, the type registry, the
//! ownership graph, and the world arena.

mod allocator;
mod codec;
mod ownership;
mod registry;
