//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `discover`: Run the metadata pipeline and report components and issues
//! - `init`: Initialize a tagscope configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Discover(cmd)) => cmd.common.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

/// Common arguments shared by pipeline commands.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Directory to search for the config file and resolve `sourceRoot` against
    #[arg(long, env = "TAGSCOPE_SOURCE_ROOT")]
    pub source_root: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Args)]
pub struct DiscoverCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Only report issues, skip the component list
    #[arg(long)]
    pub quiet: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Discover components and report their metadata issues
    Discover(DiscoverCommand),
    /// Initialize a new .tagscoperc.json configuration file
    Init,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_discover_args() {
        let argv = ["tagscope", "discover", "--source-root", "web", "-v"];
        let args = Arguments::try_parse_from(argv).unwrap();
        assert!(args.verbose());
        let Some(Command::Discover(cmd)) = args.command else {
            panic!("expected discover");
        };
        assert_eq!(cmd.common.source_root, Some(PathBuf::from("web")));
        assert!(!cmd.quiet);
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Arguments::command().debug_assert();
    }
}
