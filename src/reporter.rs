//! Report formatting and printing utilities.
//!
//! Issues are displayed cargo-style. Kept out of the core so the engine can be
//! used as a library without printing side effects.

use std::io::{self, Write};

use colored::Colorize;
use unicode_width::UnicodeWidthStr;

use crate::core::meta::ComponentRecord;
use crate::issues::{Issue, Report, ReportLocation, Severity};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Print issues in cargo-style format to stdout.
pub fn report(issues: &[Issue]) {
    report_to(issues, &mut io::stdout().lock());
}

/// Print issues to a custom writer, sorted by location, followed by a summary line.
pub fn report_to<W: Write>(issues: &[Issue], writer: &mut W) {
    if issues.is_empty() {
        return;
    }

    let mut sorted = issues.to_vec();
    sorted.sort_by_key(Issue::sort_key);

    let max_line_width = calculate_max_line_width(&sorted);

    for issue in &sorted {
        print_issue(issue, writer, max_line_width);
    }

    print_summary(&sorted, writer);
}

/// One line per component: tag, class, file and member counts.
pub fn print_components_to<W: Write>(components: &[ComponentRecord], writer: &mut W) {
    let tag_width = components
        .iter()
        .map(|c| UnicodeWidthStr::width(c.tag_name.as_str()))
        .max()
        .unwrap_or(0);

    for component in components {
        let counts = [
            (component.properties.len(), "prop", "props"),
            (component.events.len(), "event", "events"),
            (component.methods.len(), "method", "methods"),
            (component.slots.len(), "slot", "slots"),
        ]
        .iter()
        .filter(|(n, _, _)| *n > 0)
        .map(|(n, one, many)| format!("{} {}", n, if *n == 1 { one } else { many }))
        .collect::<Vec<_>>();

        let tag = format!("{:<width$}", component.tag_name, width = tag_width);
        let _ = writeln!(
            writer,
            "  {}  {}  {}{}",
            tag.bold(),
            component.class_name,
            component.location.file_path.dimmed(),
            if counts.is_empty() {
                String::new()
            } else {
                format!(" ({})", counts.join(", "))
            }
        );
    }
}

/// Print a success message when the run produced no issues.
pub fn print_success_to<W: Write>(source_files: usize, components: usize, writer: &mut W) {
    let _ = writeln!(
        writer,
        "{} {}",
        SUCCESS_MARK.green(),
        format!(
            "Discovered {} {} in {} source {} - no issues found",
            components,
            if components == 1 {
                "component"
            } else {
                "components"
            },
            source_files,
            if source_files == 1 { "file" } else { "files" }
        )
        .green()
    );
}

/// Print a warning about files that could not be parsed.
pub fn print_parse_warning_to<W: Write>(count: usize, verbose: bool, writer: &mut W) {
    if count > 0 && !verbose {
        let _ = writeln!(
            writer,
            "{} {} file(s) could not be parsed (use {} for details)",
            "warning:".bold().yellow(),
            count,
            "-v".cyan()
        );
    }
}

// ============================================================
// Internal Functions
// ============================================================

fn print_issue<W: Write>(issue: &Issue, writer: &mut W, max_line_width: usize) {
    let loc = issue.location();
    let (file_path, line, col, source_line) = extract_location_info(&loc);

    let severity = issue.report_severity();
    let severity_str = match severity {
        Severity::Error => "error".bold().red(),
        Severity::Warning => "warning".bold().yellow(),
    };

    let _ = writeln!(
        writer,
        "{}: {}  {}",
        severity_str,
        issue.message(),
        issue.report_rule().to_string().dimmed().cyan()
    );

    if line > 0 {
        let _ = writeln!(writer, "  {} {}:{}:{}", "-->".blue(), file_path, line, col);
    } else {
        let _ = writeln!(writer, "  {} {}", "-->".blue(), file_path);
    }

    if let Some(source_line) = source_line.filter(|s| !s.is_empty()) {
        let caret_char = match severity {
            Severity::Error => "^".red(),
            Severity::Warning => "^".yellow(),
        };

        let _ = writeln!(
            writer,
            "{:>width$} {}",
            "",
            "|".blue(),
            width = max_line_width
        );
        let _ = writeln!(
            writer,
            "{:>width$} {} {}",
            line.to_string().blue(),
            "|".blue(),
            source_line,
            width = max_line_width
        );

        // col is 1-based; pad by display width so wide characters line up.
        let prefix = if col > 1 {
            source_line.chars().take(col - 1).collect::<String>()
        } else {
            String::new()
        };
        let caret_padding = UnicodeWidthStr::width(prefix.as_str());
        let _ = writeln!(
            writer,
            "{:>width$} {} {:>padding$}{}",
            "",
            "|".blue(),
            "",
            caret_char,
            width = max_line_width,
            padding = caret_padding
        );
    }

    if let Some(details) = issue.details() {
        let _ = writeln!(
            writer,
            "{:>width$} {} {} {}",
            "",
            "=".blue(),
            "note:".bold(),
            details,
            width = max_line_width
        );
    }

    if let Some(hint) = issue.hint() {
        let _ = writeln!(
            writer,
            "{:>width$} {} {} {}",
            "",
            "=".blue(),
            "hint:".bold().cyan(),
            hint,
            width = max_line_width
        );
    }

    let _ = writeln!(writer);
}

fn print_summary<W: Write>(issues: &[Issue], writer: &mut W) {
    let total_errors = issues
        .iter()
        .filter(|i| i.report_severity() == Severity::Error)
        .count();
    let total_warnings = issues
        .iter()
        .filter(|i| i.report_severity() == Severity::Warning)
        .count();
    let total_problems = total_errors + total_warnings;

    if total_problems > 0 {
        let _ = writeln!(
            writer,
            "{} {} problems ({} {}, {} {})",
            FAILURE_MARK.red(),
            total_problems,
            total_errors,
            if total_errors == 1 { "error" } else { "errors" }.red(),
            total_warnings,
            if total_warnings == 1 {
                "warning"
            } else {
                "warnings"
            }
            .yellow()
        );
    }
}

fn extract_location_info<'a>(
    loc: &'a ReportLocation<'a>,
) -> (&'a str, usize, usize, Option<&'a str>) {
    match loc {
        ReportLocation::Source(ctx) => (
            ctx.file_path.as_str(),
            ctx.line,
            ctx.col,
            Some(ctx.source_line.as_str()),
        ),
        ReportLocation::File { path } => (path, 0, 0, None),
    }
}

fn calculate_max_line_width(issues: &[Issue]) -> usize {
    issues
        .iter()
        .filter_map(|i| match i.location() {
            ReportLocation::Source(ctx) => Some(ctx.line),
            ReportLocation::File { .. } => None,
        })
        .max()
        .map(|n| n.to_string().len())
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::core::meta::PropertyRecord;
    use crate::core::model::SourceLocation;
    use crate::issues::{InvalidTagNameIssue, MissingTitleIssue, ParseErrorIssue};

    fn render(issues: &[Issue]) -> String {
        colored::control::set_override(false);
        let mut out = Vec::new();
        report_to(issues, &mut out);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_report_cargo_style() {
        let mut context = SourceLocation::new("src/button.ts", 4, 4);
        context.source_line = " * @cssprop".to_string();
        let issues = vec![
            Issue::from(ParseErrorIssue {
                file_path: "src/broken.ts".to_string(),
                error: "Failed to parse src/broken.ts".to_string(),
            }),
            Issue::from(MissingTitleIssue {
                context,
                tag: "cssprop".to_string(),
                example: "@cssprop --bg-color - The background color of this component.",
            }),
            Issue::from(InvalidTagNameIssue {
                context: SourceLocation::new("src/button.ts", 12, 1),
                tag_name: "XButton".to_string(),
                reason: "Tag can not contain upper case characters.".to_string(),
            }),
        ];

        insta::assert_snapshot!(render(&issues), @r"
        error: Failed to parse src/broken.ts  parse-error
          --> src/broken.ts

        warning: Tag `@cssprop` is missing a title.  missing-title
          --> src/button.ts:4:4
           |
         4 |  * @cssprop
           |    ^
           = hint: @cssprop --bg-color - The background color of this component.

        error: Tag can not contain upper case characters.  invalid-tag-name
          --> src/button.ts:12:1

        ✘ 3 problems (2 errors, 1 warning)
        ");
    }

    #[test]
    fn test_component_summary() {
        colored::control::set_override(false);
        let mut button = ComponentRecord {
            tag_name: "x-button".to_string(),
            class_name: "Button".to_string(),
            ..Default::default()
        };
        button.location.file_path = "src/button.ts".to_string();
        button.properties = vec![PropertyRecord::default(), PropertyRecord::default()];
        let mut icon = ComponentRecord {
            tag_name: "x-icon".to_string(),
            class_name: "Icon".to_string(),
            ..Default::default()
        };
        icon.location.file_path = "src/icon.ts".to_string();

        let mut out = Vec::new();
        print_components_to(&[button, icon], &mut out);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "  x-button  Button  src/button.ts (2 props)\n  x-icon    Icon  src/icon.ts\n"
        );
    }
}
