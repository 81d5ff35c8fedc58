//! Persistence for Strongbox worlds.
//!
//! This crate provides:
//! - [`save_to_file`] / [`save_to_bytes`] - Walk the ownership forest and write one record per entity
//! - [`load_from_file`] / [`load_from_bytes`] - Two-phase load: instantiate every shell, then decode
//! - [`Resolver`] - The identifier table consulted while payloads are decoded
//! - [`summarize`] - Read a save's header and record frames without decoding payloads
//! - [`PersistConfig`] - Backup, fsync, and strictness settings
//!
//! # File layout
//!
//! ```text
//! "SBOX" | header_len: u32 | header (MessagePack) | record*
//! record  = tag: str | id: u32 | payload_len: varint | payload
//! payload = common section | type section
//! ```
//!
//! Saves are written to a temporary file in the destination directory and
//! renamed over the previous save, so a failed write leaves the last good
//! save in place.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod format;
pub mod load;
pub mod resolver;
pub mod save;

pub use config::PersistConfig;
pub use format::{FORMAT_VERSION, Header, RecordFrame, Summary, summarize};
pub use load::{LoadReport, load_from_bytes, load_from_file};
pub use resolver::{Phase, Resolver, ShellIndex};
pub use save::{SaveReport, save_to_bytes, save_to_file};
