//! Strongbox CLI entry point.

use std::env;
use std::process::ExitCode;

use strongbox_runtime::{CliConfig, Command, HELP, Result, demo, inspect, logging, verify};

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("\x1b[31mError: {e}\x1b[0m");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let config = CliConfig::parse(env::args())?;

    if config.show_help {
        print!("{HELP}");
        return Ok(ExitCode::SUCCESS);
    }
    if config.show_version {
        println!("strongbox {}", env!("CARGO_PKG_VERSION"));
        return Ok(ExitCode::SUCCESS);
    }

    logging::init(config.verbose);

    match config.command {
        None => {
            eprint!("{HELP}");
            Ok(ExitCode::FAILURE)
        }
        Some(Command::Inspect(path)) => {
            print!("{}", inspect(&path)?);
            Ok(ExitCode::SUCCESS)
        }
        Some(Command::Verify(path)) => {
            let verification = verify(&path)?;
            print!("{verification}");
            Ok(if verification.is_clean() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Some(Command::Demo(path)) => {
            println!("{}", demo(&path)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}
