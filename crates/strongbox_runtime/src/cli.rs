//! Command-line parsing.

use std::path::PathBuf;

use crate::error::CliError;

/// What the binary was asked to do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Print a save's header and record counts without decoding payloads.
    Inspect(PathBuf),
    /// Load a save strictly and check it for inconsistencies.
    Verify(PathBuf),
    /// Build a sample world, duplicate part of it, and save it.
    Demo(PathBuf),
}

/// CLI configuration parsed from arguments.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CliConfig {
    /// The subcommand, if one was given.
    pub command: Option<Command>,
    /// Raise the default log level to debug.
    pub verbose: bool,
    /// Print usage and exit.
    pub show_help: bool,
    /// Print the version and exit.
    pub show_version: bool,
}

impl CliConfig {
    /// Parses arguments, skipping the program name.
    ///
    /// # Errors
    ///
    /// Returns a usage error for unknown options, unknown subcommands, or a
    /// subcommand without its file argument.
    pub fn parse<I, S>(args: I) -> Result<Self, CliError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut config = Self::default();
        let mut positional = Vec::new();

        for arg in args.into_iter().skip(1).map(Into::into) {
            match arg.as_str() {
                "-h" | "--help" => config.show_help = true,
                "-V" | "--version" => config.show_version = true,
                "-v" | "--verbose" => config.verbose = true,
                flag if flag.starts_with('-') => {
                    return Err(CliError::Usage(format!("unknown option: {flag}")));
                }
                _ => positional.push(arg),
            }
        }

        let mut positional = positional.into_iter();
        let Some(name) = positional.next() else {
            return Ok(config);
        };
        let file = positional
            .next()
            .map(PathBuf::from)
            .ok_or_else(|| CliError::Usage(format!("{name} requires a file")))?;
        if let Some(extra) = positional.next() {
            return Err(CliError::Usage(format!("unexpected argument: {extra}")));
        }
        config.command = Some(match name.as_str() {
            "inspect" => Command::Inspect(file),
            "verify" => Command::Verify(file),
            "demo" => Command::Demo(file),
            other => return Err(CliError::Usage(format!("unknown command: {other}"))),
        });
        Ok(config)
    }
}

/// Usage text.
pub const HELP: &str = "\
Strongbox - persistent object graph tools

USAGE:
    strongbox [OPTIONS] <COMMAND> <FILE>

COMMANDS:
    inspect <FILE>    Print the header and record counts of a save
    verify <FILE>     Load a save strictly and report problems
    demo <FILE>       Build, duplicate, and save a sample world

OPTIONS:
    -v, --verbose     Log at debug level (RUST_LOG overrides)
    -h, --help        Print this help
    -V, --version     Print the version
";
