pub mod discover;
mod helper;
pub mod init;

use crate::core::meta::ComponentRecord;
use crate::issues::Issue;

#[derive(Debug)]
pub enum CommandSummary {
    Discover(DiscoverSummary),
    Init(InitSummary),
}

#[derive(Debug)]
pub struct DiscoverSummary {
    pub components: Vec<ComponentRecord>,
    pub plugins: Vec<String>,
    /// Print only issues.
    pub quiet: bool,
}

#[derive(Debug)]
pub struct InitSummary {
    pub created: bool,
}

/// Result of running a tagscope command.
#[derive(Debug)]
pub struct CommandResult {
    pub summary: CommandSummary,
    pub error_count: usize,
    pub warning_count: usize,
    /// All issues found during the run, sorted by location.
    pub issues: Vec<Issue>,
    /// Number of files that failed to parse.
    pub parse_error_count: usize,
    /// Number of source files that were scanned.
    pub source_files_checked: usize,
}
