//! Diagnostics produced during a discovery run.
//!
//! Convention violations (missing doc-tag titles, duplicate tags, invalid tag names,
//! extra exports) are collected as issues instead of being logged, so the CLI can
//! render them at the end of a run and library callers can inspect them.

use std::cell::RefCell;

use enum_dispatch::enum_dispatch;

use crate::core::model::SourceLocation;

// ============================================================
// Severity and Rule
// ============================================================

/// Severity level of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Rule identifier for each issue type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Rule {
    MissingTitle,
    MissingDescription,
    DuplicateDocTag,
    ExtraDefaultSlot,
    DuplicateTagName,
    InvalidTagName,
    MultipleExports,
    PrivateMember,
    HeritageCycle,
    ParseError,
    DiscoveryError,
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rule::MissingTitle => write!(f, "missing-title"),
            Rule::MissingDescription => write!(f, "missing-description"),
            Rule::DuplicateDocTag => write!(f, "duplicate-doc-tag"),
            Rule::ExtraDefaultSlot => write!(f, "extra-default-slot"),
            Rule::DuplicateTagName => write!(f, "duplicate-tag-name"),
            Rule::InvalidTagName => write!(f, "invalid-tag-name"),
            Rule::MultipleExports => write!(f, "multiple-exports"),
            Rule::PrivateMember => write!(f, "private-member"),
            Rule::HeritageCycle => write!(f, "heritage-cycle"),
            Rule::ParseError => write!(f, "parse-error"),
            Rule::DiscoveryError => write!(f, "discovery-error"),
        }
    }
}

// ============================================================
// Issue Types - Doc Tags
// ============================================================

/// A `@cssprop`/`@csspart`/`@slot` tag without a `title - description` title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingTitleIssue {
    pub context: SourceLocation,
    /// Doc tag name without `@`.
    pub tag: String,
    /// Correct usage shown as the hint.
    pub example: &'static str,
}

/// A titled `@cssprop`/`@csspart` tag with an empty description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingDescriptionIssue {
    pub context: SourceLocation,
    pub tag: String,
    pub title: String,
    pub example: &'static str,
}

/// The same doc tag title declared more than once on one component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateDocTagIssue {
    pub context: SourceLocation,
    pub tag: String,
    pub title: String,
}

/// A second title-less `@slot` tag; only the first one is the default slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtraDefaultSlotIssue {
    pub context: SourceLocation,
}

// ============================================================
// Issue Types - Components
// ============================================================

/// More than one component registers the same tag name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateTagNameIssue {
    pub tag_name: String,
    /// Every component location sharing the tag name, in discovery order.
    pub locations: Vec<SourceLocation>,
}

/// A component tag name that violates the custom element naming grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidTagNameIssue {
    pub context: SourceLocation,
    pub tag_name: String,
    pub reason: String,
}

/// A component module that exports more than the component class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipleExportsIssue {
    pub context: SourceLocation,
    pub class_name: String,
    /// Names of the extra value exports.
    pub exports: Vec<String>,
}

/// A `private`/`protected` member carrying a metadata decorator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrivateMemberIssue {
    pub context: SourceLocation,
    pub member: String,
    pub decorator: String,
}

/// A heritage chain that re-enters a declaration already on its path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeritageCycleIssue {
    pub context: SourceLocation,
    /// Names from the outermost declaration down to the repeated one.
    pub path: Vec<String>,
}

// ============================================================
// Issue Types - Run Failures
// ============================================================

/// File could not be read or parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseErrorIssue {
    pub file_path: String,
    pub error: String,
}

/// A plugin's discover hook failed for one compilation unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryErrorIssue {
    pub file_path: String,
    pub plugin: String,
    pub error: String,
}

// ============================================================
// Issue Enum
// ============================================================

/// A diagnostic found during a discovery run.
#[enum_dispatch(Report)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    MissingTitle(MissingTitleIssue),
    MissingDescription(MissingDescriptionIssue),
    DuplicateDocTag(DuplicateDocTagIssue),
    ExtraDefaultSlot(ExtraDefaultSlotIssue),
    DuplicateTagName(DuplicateTagNameIssue),
    InvalidTagName(InvalidTagNameIssue),
    MultipleExports(MultipleExportsIssue),
    PrivateMember(PrivateMemberIssue),
    HeritageCycle(HeritageCycleIssue),
    ParseError(ParseErrorIssue),
    DiscoveryError(DiscoveryErrorIssue),
}

impl Issue {
    pub fn severity(&self) -> Severity {
        self.report_severity()
    }

    pub fn rule(&self) -> Rule {
        self.report_rule()
    }

    /// `(path, line, col)` used to order issues for display.
    pub fn sort_key(&self) -> (String, usize, usize) {
        match self.location() {
            ReportLocation::Source(loc) => (loc.file_path.clone(), loc.line, loc.col),
            ReportLocation::File { path } => (path.to_string(), 0, 0),
        }
    }
}

// ============================================================
// Report Trait (for CLI output)
// ============================================================

/// Location information for report output.
pub enum ReportLocation<'a> {
    /// Source code location (has source_line for context display).
    Source(&'a SourceLocation),
    /// File-level only (no line context).
    File { path: &'a str },
}

/// Trait for types that can be reported to CLI.
#[enum_dispatch]
pub trait Report {
    fn location(&self) -> ReportLocation<'_>;

    /// Primary message to display.
    fn message(&self) -> String;

    fn report_severity(&self) -> Severity;

    fn report_rule(&self) -> Rule;

    /// Optional hint for fixing the issue.
    fn hint(&self) -> Option<&str> {
        None
    }

    /// Optional details for the "= note:" line.
    fn details(&self) -> Option<String> {
        None
    }
}

// ============================================================
// Report Implementations
// ============================================================

impl Report for MissingTitleIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Source(&self.context)
    }

    fn message(&self) -> String {
        format!("Tag `@{}` is missing a title.", self.tag)
    }

    fn report_severity(&self) -> Severity {
        Severity::Warning
    }

    fn report_rule(&self) -> Rule {
        Rule::MissingTitle
    }

    fn hint(&self) -> Option<&str> {
        Some(self.example)
    }
}

impl Report for MissingDescriptionIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Source(&self.context)
    }

    fn message(&self) -> String {
        format!("Tag `@{}` is missing a description.", self.tag)
    }

    fn report_severity(&self) -> Severity {
        Severity::Warning
    }

    fn report_rule(&self) -> Rule {
        Rule::MissingDescription
    }

    fn hint(&self) -> Option<&str> {
        Some(self.example)
    }

    fn details(&self) -> Option<String> {
        Some(format!("`{}` has no text after ` - `", self.title))
    }
}

impl Report for DuplicateDocTagIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Source(&self.context)
    }

    fn message(&self) -> String {
        format!(
            "Found duplicate `@{}` tags with the name `{}`.",
            self.tag, self.title
        )
    }

    fn report_severity(&self) -> Severity {
        Severity::Warning
    }

    fn report_rule(&self) -> Rule {
        Rule::DuplicateDocTag
    }

    fn details(&self) -> Option<String> {
        Some("only the first occurrence is kept".to_string())
    }
}

impl Report for ExtraDefaultSlotIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Source(&self.context)
    }

    fn message(&self) -> String {
        "Non default `@slot` tag is missing a title.".to_string()
    }

    fn report_severity(&self) -> Severity {
        Severity::Warning
    }

    fn report_rule(&self) -> Rule {
        Rule::ExtraDefaultSlot
    }

    fn hint(&self) -> Option<&str> {
        Some("@slot body - Used to pass in the body of this component.")
    }
}

impl Report for DuplicateTagNameIssue {
    fn location(&self) -> ReportLocation<'_> {
        match self.locations.first() {
            Some(loc) => ReportLocation::Source(loc),
            None => ReportLocation::File { path: "" },
        }
    }

    fn message(&self) -> String {
        format!(
            "Found {} components with tagname {}",
            self.locations.len(),
            self.tag_name
        )
    }

    fn report_severity(&self) -> Severity {
        Severity::Warning
    }

    fn report_rule(&self) -> Rule {
        Rule::DuplicateTagName
    }

    fn details(&self) -> Option<String> {
        let paths: Vec<String> = self
            .locations
            .iter()
            .map(|l| format!("{}:{}", l.file_path, l.line))
            .collect();
        Some(format!("declared in: {}", paths.join(", ")))
    }
}

impl Report for InvalidTagNameIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Source(&self.context)
    }

    fn message(&self) -> String {
        self.reason.clone()
    }

    fn report_severity(&self) -> Severity {
        Severity::Error
    }

    fn report_rule(&self) -> Rule {
        Rule::InvalidTagName
    }
}

const MULTIPLE_EXPORTS_MESSAGE: &str = "To allow efficient bundling, modules using \
    `@customElement()` can only have a single export which is the component class itself.";

impl Report for MultipleExportsIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Source(&self.context)
    }

    fn message(&self) -> String {
        String::from(MULTIPLE_EXPORTS_MESSAGE)
    }

    fn report_severity(&self) -> Severity {
        Severity::Warning
    }

    fn report_rule(&self) -> Rule {
        Rule::MultipleExports
    }

    fn details(&self) -> Option<String> {
        Some(format!(
            "`{}` is exported along with: {}",
            self.class_name,
            self.exports.join(", ")
        ))
    }
}

impl Report for PrivateMemberIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Source(&self.context)
    }

    fn message(&self) -> String {
        format!(
            "Property `{}` cannot be `private` or `protected`. \
             Use the `@internalProperty()` decorator instead.",
            self.member
        )
    }

    fn report_severity(&self) -> Severity {
        Severity::Warning
    }

    fn report_rule(&self) -> Rule {
        Rule::PrivateMember
    }

    fn details(&self) -> Option<String> {
        Some(format!("`@{}` is ignored on non-public members", self.decorator))
    }
}

impl Report for HeritageCycleIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Source(&self.context)
    }

    fn message(&self) -> String {
        format!(
            "heritage cycle detected at `{}`",
            self.path.last().map(String::as_str).unwrap_or_default()
        )
    }

    fn report_severity(&self) -> Severity {
        Severity::Warning
    }

    fn report_rule(&self) -> Rule {
        Rule::HeritageCycle
    }

    fn details(&self) -> Option<String> {
        Some(self.path.join(" -> "))
    }
}

impl Report for ParseErrorIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::File {
            path: &self.file_path,
        }
    }

    fn message(&self) -> String {
        self.error.clone()
    }

    fn report_severity(&self) -> Severity {
        Severity::Error
    }

    fn report_rule(&self) -> Rule {
        Rule::ParseError
    }
}

impl Report for DiscoveryErrorIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::File {
            path: &self.file_path,
        }
    }

    fn message(&self) -> String {
        self.error.clone()
    }

    fn report_severity(&self) -> Severity {
        Severity::Error
    }

    fn report_rule(&self) -> Rule {
        Rule::DiscoveryError
    }

    fn details(&self) -> Option<String> {
        Some(format!("in plugin `{}`", self.plugin))
    }
}

// ============================================================
// Diagnostics sink
// ============================================================

/// Collects issues raised while a run is in progress.
///
/// The pipeline is single-threaded, so interior mutability lets every stage
/// report through a shared reference.
#[derive(Debug, Default)]
pub struct Diagnostics {
    issues: RefCell<Vec<Issue>>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, issue: impl Into<Issue>) {
        self.issues.borrow_mut().push(issue.into());
    }

    pub fn len(&self) -> usize {
        self.issues.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Collected issues in report order, identical issues collapsed.
    ///
    /// A base class shared by several components is built once per component,
    /// so its doc-tag issues would otherwise repeat.
    pub fn into_issues(self) -> Vec<Issue> {
        let mut unique: Vec<Issue> = Vec::new();
        for issue in self.issues.into_inner() {
            if !unique.contains(&issue) {
                unique.push(issue);
            }
        }
        unique
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_issues_are_collapsed() {
        let diagnostics = Diagnostics::new();
        let issue = MissingTitleIssue {
            context: SourceLocation::new("src/a.ts", 3, 1),
            tag: "cssprop".to_string(),
            example: "@cssprop --bg-color - The background color of this component.",
        };
        diagnostics.push(issue.clone());
        diagnostics.push(issue);
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics.into_issues().len(), 1);
    }

    #[test]
    fn test_duplicate_tag_name_message() {
        let issue = Issue::from(DuplicateTagNameIssue {
            tag_name: "x-button".to_string(),
            locations: vec![
                SourceLocation::new("src/a.ts", 3, 1),
                SourceLocation::new("src/b.ts", 8, 1),
            ],
        });
        assert_eq!(issue.message(), "Found 2 components with tagname x-button");
        assert_eq!(
            issue.details().as_deref(),
            Some("declared in: src/a.ts:3, src/b.ts:8")
        );
        assert_eq!(issue.severity(), Severity::Warning);
    }
}
