//! Terminal output for command results.

use std::io::{self, Write};

use colored::Colorize;

use super::commands::{CommandResult, CommandSummary, DiscoverSummary, InitSummary};
use crate::config::CONFIG_FILE_NAME;
use crate::reporter::{
    SUCCESS_MARK, print_components_to, print_parse_warning_to, print_success_to, report_to,
};

pub fn print(result: &CommandResult, verbose: bool) {
    print_to(result, verbose, &mut io::stdout().lock());
}

fn print_to<W: Write>(result: &CommandResult, verbose: bool, writer: &mut W) {
    match &result.summary {
        CommandSummary::Discover(summary) => print_discover(result, summary, writer),
        CommandSummary::Init(summary) => print_init(summary, writer),
    }

    print_parse_warning_to(result.parse_error_count, verbose, writer);
}

fn print_discover<W: Write>(result: &CommandResult, summary: &DiscoverSummary, writer: &mut W) {
    if !summary.quiet && !summary.components.is_empty() {
        let _ = writeln!(
            writer,
            "{} ({})",
            "Components".bold(),
            summary.plugins.join(", ").dimmed()
        );
        print_components_to(&summary.components, writer);
        let _ = writeln!(writer);
    }

    if result.issues.is_empty() {
        print_success_to(
            result.source_files_checked,
            summary.components.len(),
            writer,
        );
    } else {
        report_to(&result.issues, writer);
    }
}

fn print_init<W: Write>(summary: &InitSummary, writer: &mut W) {
    if summary.created {
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            format!("Created {}", CONFIG_FILE_NAME).green()
        );
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::core::meta::ComponentRecord;

    fn discover_result(components: Vec<ComponentRecord>, quiet: bool) -> CommandResult {
        CommandResult {
            summary: CommandSummary::Discover(DiscoverSummary {
                components,
                plugins: vec!["lit-element".to_string()],
                quiet,
            }),
            error_count: 0,
            warning_count: 0,
            issues: Vec::new(),
            parse_error_count: 0,
            source_files_checked: 2,
        }
    }

    fn render(result: &CommandResult, verbose: bool) -> String {
        colored::control::set_override(false);
        let mut out = Vec::new();
        print_to(result, verbose, &mut out);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_discover_output() {
        let mut button = ComponentRecord {
            tag_name: "x-button".to_string(),
            class_name: "Button".to_string(),
            ..Default::default()
        };
        button.location.file_path = "src/button.ts".to_string();

        assert_eq!(
            render(&discover_result(vec![button], false), false),
            "Components (lit-element)\n  x-button  Button  src/button.ts\n\n\
             \u{2713} Discovered 1 component in 2 source files - no issues found\n"
        );
    }

    #[test]
    fn test_quiet_discover_skips_component_list() {
        let button = ComponentRecord {
            tag_name: "x-button".to_string(),
            ..Default::default()
        };
        let mut result = discover_result(vec![button], true);
        result.parse_error_count = 1;

        assert_eq!(
            render(&result, false),
            "\u{2713} Discovered 1 component in 2 source files - no issues found\n\
             warning: 1 file(s) could not be parsed (use -v for details)\n"
        );
    }
}
