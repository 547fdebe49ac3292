//! Documentation comment reading.
//!
//! Splits a `/** .. */` block into its description and `@tag text` entries, and
//! derives slot and CSS hook metadata from the tags.
//!
//! ```typescript
//! /**
//!  * A button.
//!  *
//!  * @slot - Button content.
//!  * @cssprop --btn-color - Text color.
//!  */
//! ```

use crate::core::meta::{CssPartRecord, CssPropertyRecord, DocTag, SlotRecord};
use crate::core::model::DocComment;
use crate::issues::{
    Diagnostics, DuplicateDocTagIssue, ExtraDefaultSlotIssue, MissingDescriptionIssue,
    MissingTitleIssue,
};

const CSS_PROP_EXAMPLE: &str = "@cssprop --bg-color - The background color of this component.";
const CSS_PART_EXAMPLE: &str = "@csspart container - The root container of this component.";

/// Description and tags of one doc comment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDoc {
    pub description: String,
    pub tags: Vec<DocTag>,
}

/// A `title - description` tag text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitTag {
    pub title: Option<String>,
    pub description: String,
}

/// Comment lines without their leading ` * ` decoration.
fn clean_lines(text: &str) -> impl Iterator<Item = (usize, &str, &str)> {
    text.split('\n').enumerate().map(|(index, raw)| {
        let raw = raw.strip_suffix('\r').unwrap_or(raw);
        let trimmed = raw.trim_start();
        let body = trimmed.strip_prefix('*').unwrap_or(trimmed);
        let body = body.strip_prefix(' ').unwrap_or(body);
        (index, raw, body.trim_end())
    })
}

fn tag_start(line: &str) -> Option<(&str, &str)> {
    let rest = line.strip_prefix('@')?;
    let end = rest
        .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == '-'))
        .unwrap_or(rest.len());
    if end == 0 {
        return None;
    }
    Some((&rest[..end], rest[end..].trim()))
}

/// Description part of a comment body: everything before the first block tag.
pub fn description(text: &str) -> String {
    let lines: Vec<&str> = clean_lines(text)
        .map(|(_, _, body)| body)
        .take_while(|body| tag_start(body).is_none())
        .collect();
    lines.join("\n").trim().to_string()
}

/// Parse a doc comment into description and tags, with one location per tag.
pub fn parse(doc: &DocComment) -> ParsedDoc {
    let mut parsed = ParsedDoc {
        description: description(&doc.text),
        tags: Vec::new(),
    };
    for (index, raw, body) in clean_lines(&doc.text) {
        if let Some((name, text)) = tag_start(body) {
            let offset = raw.find('@').map_or(0, |i| raw[..i].chars().count());
            let location = if index == 0 {
                // First line shares the `/**` opener with the comment start.
                doc.location.moved_to(
                    doc.location.line,
                    doc.location.col + 3 + offset,
                    doc.location.source_line.clone(),
                )
            } else {
                doc.location.moved_to(doc.location.line + index, offset + 1, raw)
            };
            parsed.tags.push(DocTag {
                name: name.to_string(),
                text: text.to_string(),
                location,
            });
        } else if let Some(last) = parsed.tags.last_mut()
            && !body.is_empty()
        {
            if !last.text.is_empty() {
                last.text.push('\n');
            }
            last.text.push_str(body.trim());
        }
    }
    parsed
}

/// Parse an optional comment; absent comments have no description and no tags.
pub fn parse_optional(doc: Option<&DocComment>) -> ParsedDoc {
    doc.map(parse).unwrap_or_default()
}

pub fn find_tag<'a>(tags: &'a [DocTag], name: &str) -> Option<&'a DocTag> {
    tags.iter().find(|tag| tag.name == name)
}

pub fn has_tag(tags: &[DocTag], name: &str) -> bool {
    find_tag(tags, name).is_some()
}

/// Split `title - description`. Text without the separator is all description.
///
/// # Examples
///
/// ```
/// # use tagscope::core::docs::split_tag;
/// let split = split_tag("--bg - The background.");
/// assert_eq!(split.title.as_deref(), Some("--bg"));
/// assert_eq!(split.description, "The background.");
/// assert_eq!(split_tag("Default content").title, None);
/// ```
pub fn split_tag(text: &str) -> SplitTag {
    let text = text.trim();
    let (title, description) = if let Some((title, description)) = text.split_once(" - ") {
        (title.trim(), description.trim())
    } else if let Some(title) = text.strip_suffix(" -") {
        (title.trim(), "")
    } else if let Some(description) = text.strip_prefix("- ") {
        ("", description.trim())
    } else {
        ("", text)
    };
    SplitTag {
        title: (!title.is_empty()).then(|| title.to_string()),
        description: description.to_string(),
    }
}

/// Split tags named `name`, dropping later tags whose title was already seen.
fn unique_by_title<'a>(
    tags: &'a [DocTag],
    name: &str,
    diagnostics: &Diagnostics,
) -> Vec<(&'a DocTag, SplitTag)> {
    let mut seen: Vec<String> = Vec::new();
    let mut out = Vec::new();
    for tag in tags.iter().filter(|tag| tag.name == name) {
        let split = split_tag(&tag.text);
        if let Some(title) = &split.title {
            if seen.contains(title) {
                diagnostics.push(DuplicateDocTagIssue {
                    context: tag.location.clone(),
                    tag: name.to_string(),
                    title: title.clone(),
                });
                continue;
            }
            seen.push(title.clone());
        }
        out.push((tag, split));
    }
    out
}

/// `(name, description)` pairs of a titled tag kind, reporting missing parts.
fn build_titled(
    tags: &[DocTag],
    name: &str,
    example: &'static str,
    diagnostics: &Diagnostics,
) -> Vec<(String, String)> {
    unique_by_title(tags, name, diagnostics)
        .into_iter()
        .map(|(tag, split)| match split.title {
            None => {
                diagnostics.push(MissingTitleIssue {
                    context: tag.location.clone(),
                    tag: name.to_string(),
                    example,
                });
                (String::new(), split.description)
            }
            Some(title) => {
                if split.description.is_empty() {
                    diagnostics.push(MissingDescriptionIssue {
                        context: tag.location.clone(),
                        tag: name.to_string(),
                        title: title.clone(),
                        example,
                    });
                }
                (title, split.description)
            }
        })
        .collect()
}

pub fn build_css_properties(tags: &[DocTag], diagnostics: &Diagnostics) -> Vec<CssPropertyRecord> {
    build_titled(tags, "cssprop", CSS_PROP_EXAMPLE, diagnostics)
        .into_iter()
        .map(|(name, description)| CssPropertyRecord { name, description })
        .collect()
}

pub fn build_css_parts(tags: &[DocTag], diagnostics: &Diagnostics) -> Vec<CssPartRecord> {
    build_titled(tags, "csspart", CSS_PART_EXAMPLE, diagnostics)
        .into_iter()
        .map(|(name, description)| CssPartRecord { name, description })
        .collect()
}

/// Slots from `@slot` tags. Only the first title-less slot is the default slot.
pub fn build_slots(tags: &[DocTag], diagnostics: &Diagnostics) -> Vec<SlotRecord> {
    let mut seen_default = false;
    unique_by_title(tags, "slot", diagnostics)
        .into_iter()
        .map(|(tag, split)| {
            let is_default = split.title.is_none();
            if is_default && seen_default {
                diagnostics.push(ExtraDefaultSlotIssue {
                    context: tag.location.clone(),
                });
            }
            let default = is_default && !seen_default;
            seen_default |= is_default;
            SlotRecord {
                name: split.title.unwrap_or_default(),
                description: split.description,
                default,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::core::model::SourceLocation;
    use crate::issues::{Issue, Rule};

    fn doc(text: &str) -> DocComment {
        DocComment {
            text: text.to_string(),
            location: SourceLocation::new("src/button.ts", 2, 1),
        }
    }

    fn tags(text: &str) -> Vec<DocTag> {
        parse(&doc(text)).tags
    }

    fn rules(diagnostics: Diagnostics) -> Vec<Rule> {
        diagnostics.into_issues().iter().map(Issue::rule).collect()
    }

    #[test]
    fn test_parse_description_and_tags() {
        let parsed = parse(&doc(concat!(
            "\n * A button.\n * Second line.\n *\n * @slot - Content.\n",
            " * @cssprop --color - Text\n *   color.\n * @internal\n ",
        )));
        assert_eq!(parsed.description, "A button.\nSecond line.");
        let names: Vec<_> = parsed
            .tags
            .iter()
            .map(|t| (t.name.as_str(), t.text.as_str()))
            .collect();
        assert_eq!(
            names,
            vec![
                ("slot", "- Content."),
                ("cssprop", "--color - Text\ncolor."),
                ("internal", ""),
            ]
        );
        assert_eq!(parsed.tags[0].location.line, 6);
        assert_eq!(parsed.tags[0].location.col, 4);
    }

    #[test]
    fn test_single_line_comment() {
        let parsed = parse(&doc(" The label. "));
        assert_eq!(parsed.description, "The label.");
        assert!(parsed.tags.is_empty());
    }

    #[test]
    fn test_split_tag_forms() {
        assert_eq!(
            split_tag("body - The body."),
            SplitTag {
                title: Some("body".into()),
                description: "The body.".into()
            }
        );
        assert_eq!(split_tag("- Default.").title, None);
        assert_eq!(split_tag("- Default.").description, "Default.");
        assert_eq!(split_tag("Default.").description, "Default.");
        assert_eq!(
            split_tag("body -"),
            SplitTag {
                title: Some("body".into()),
                description: String::new()
            }
        );
    }

    #[test]
    fn test_only_first_untitled_slot_is_default() {
        let diagnostics = Diagnostics::new();
        let slots = build_slots(
            &tags(concat!(
                "\n * @slot - Main.\n * @slot icon - Icon.\n",
                " * @slot - Other.\n * @slot Also untitled.\n",
            )),
            &diagnostics,
        );
        let defaults: Vec<_> = slots.iter().map(|s| (s.name.as_str(), s.default)).collect();
        assert_eq!(
            defaults,
            vec![("", true), ("icon", false), ("", false), ("", false)]
        );
        assert_eq!(
            rules(diagnostics),
            vec![Rule::ExtraDefaultSlot, Rule::ExtraDefaultSlot]
        );
    }

    #[test]
    fn test_duplicate_titles_are_reported_and_dropped() {
        let diagnostics = Diagnostics::new();
        let slots = build_slots(
            &tags("\n * @slot icon - Icon.\n * @slot icon - Again.\n"),
            &diagnostics,
        );
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].description, "Icon.");
        let issues = diagnostics.into_issues();
        insta::assert_snapshot!(
            crate::issues::Report::message(&issues[0]),
            @"Found duplicate `@slot` tags with the name `icon`."
        );
    }

    #[test]
    fn test_css_tags_missing_parts() {
        let diagnostics = Diagnostics::new();
        let props = build_css_properties(
            &tags("\n * @cssprop --bg - Background.\n * @cssprop Untitled.\n * @cssprop --fg -\n"),
            &diagnostics,
        );
        let pairs: Vec<_> = props
            .iter()
            .map(|p| (p.name.as_str(), p.description.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![("--bg", "Background."), ("", "Untitled."), ("--fg", "")]
        );
        assert_eq!(
            rules(diagnostics),
            vec![Rule::MissingTitle, Rule::MissingDescription]
        );

        let diagnostics = Diagnostics::new();
        let parts = build_css_parts(&tags("\n * @csspart base - Root.\n"), &diagnostics);
        assert_eq!(parts[0].name, "base");
        assert!(diagnostics.is_empty());
    }
}
