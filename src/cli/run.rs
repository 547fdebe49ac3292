use anyhow::{Result, bail};

use super::{
    args::{Arguments, Command},
    commands::{CommandResult, discover::discover, init::init},
};

/// Dispatch to the command handler.
pub fn run(Arguments { command }: Arguments) -> Result<CommandResult> {
    match command {
        Some(Command::Discover(cmd)) => discover(cmd),
        Some(Command::Init) => init(),
        None => bail!("No command provided. Use --help to see available commands."),
    }
}
