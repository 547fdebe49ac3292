use super::{CommandResult, CommandSummary};
use crate::issues::{Issue, Rule, Severity};

pub fn finish(
    summary: CommandSummary,
    mut issues: Vec<Issue>,
    source_files_checked: usize,
) -> CommandResult {
    issues.sort_by_key(Issue::sort_key);

    let parse_error_count = issues
        .iter()
        .filter(|i| i.rule() == Rule::ParseError)
        .count();

    let error_count = issues
        .iter()
        .filter(|i| i.severity() == Severity::Error)
        .count();

    CommandResult {
        summary,
        error_count,
        warning_count: issues.len() - error_count,
        issues,
        parse_error_count,
        source_files_checked,
    }
}
