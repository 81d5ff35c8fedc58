//! Command-line tools and logging setup for Strongbox.
//!
//! This crate provides:
//! - [`CliConfig`] - Hand-parsed command-line arguments
//! - [`inspect`], [`verify`], [`demo`] - The `strongbox` subcommands
//! - [`logging::init`] - A `tracing` subscriber filtered by `RUST_LOG`

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;

pub use cli::{CliConfig, Command, HELP};
pub use commands::{DemoOutcome, Verification, demo, inspect, verify};
pub use error::{CliError, Result};
