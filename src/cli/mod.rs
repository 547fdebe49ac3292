//! Command-line layer: argument parsing, command dispatch and terminal output.

use std::process::ExitCode;

use anyhow::Result;

mod args;
mod commands;
mod exit_code;
mod exit_status;
mod report;
mod run;

pub use args::{Arguments, Command, CommonArgs, DiscoverCommand};
pub use commands::{CommandResult, CommandSummary};
pub use exit_status::ExitStatus;

use exit_code::exit_status_from_result;

pub fn run_cli(args: Arguments) -> Result<ExitCode> {
    let verbose = args.verbose();

    let Some(args) = args.with_command_or_help() else {
        return Ok(ExitStatus::Success.into());
    };

    let result = run::run(args)?;
    report::print(&result, verbose);

    Ok(exit_status_from_result(&result).into())
}
