//! Component validation: tag-name grammar, unique tag names and the
//! single-export module convention.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::core::meta::ComponentRecord;
use crate::core::model::SemanticModel;
use crate::issues::{Diagnostics, DuplicateTagNameIssue, InvalidTagNameIssue, MultipleExportsIssue};

static INVALID_TAG_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_-]").unwrap());

/// Check a custom element tag name. Returns the first violated rule's message.
///
/// # Examples
///
/// ```
/// # use tagscope::core::validate::validate_tag_name;
/// assert_eq!(validate_tag_name("my-component"), None);
/// assert_eq!(
///     validate_tag_name("nocomponent").as_deref(),
///     Some("`nocomponent` tag must contain a dash (-) to work as a valid web component.")
/// );
/// ```
pub fn validate_tag_name(tag: &str) -> Option<String> {
    if tag != tag.trim() {
        return Some("Tag can not contain white spaces.".to_string());
    }
    if tag != tag.to_lowercase() {
        return Some("Tag can not contain upper case characters.".to_string());
    }
    if tag.is_empty() {
        return Some("Received empty tag value.".to_string());
    }
    if tag.contains(' ') {
        return Some(format!("`{tag}` tag cannot contain a space."));
    }
    if tag.contains(',') {
        return Some(format!("`{tag}` tag cannot be used for multiple tags."));
    }
    let invalid: String = INVALID_TAG_CHARS
        .find_iter(tag)
        .map(|m| m.as_str())
        .collect();
    if !invalid.is_empty() {
        return Some(format!("`{tag}` tag contains invalid characters: {invalid}."));
    }
    if !tag.contains('-') {
        return Some(format!(
            "`{tag}` tag must contain a dash (-) to work as a valid web component."
        ));
    }
    if tag.contains("--") {
        return Some(format!(
            "`{tag}` tag cannot contain multiple dashes (--) next to each other."
        ));
    }
    if tag.starts_with('-') {
        return Some(format!("`{tag}` tag cannot start with a dash (-)."));
    }
    if tag.ends_with('-') {
        return Some(format!("`{tag}` tag cannot end with a dash (-)."));
    }
    None
}

/// Report every tag name used by more than one component.
pub fn validate_unique_tag_names(components: &[ComponentRecord], diagnostics: &Diagnostics) {
    let mut order: Vec<&str> = Vec::new();
    let mut used_by: HashMap<&str, Vec<&ComponentRecord>> = HashMap::new();
    for component in components.iter().filter(|c| c.has_tag_name()) {
        let entry = used_by.entry(component.tag_name.as_str()).or_default();
        if entry.is_empty() {
            order.push(&component.tag_name);
        }
        entry.push(component);
    }
    for tag in order {
        let group = &used_by[tag];
        if group.len() > 1 {
            diagnostics.push(DuplicateTagNameIssue {
                tag_name: tag.to_string(),
                locations: group.iter().map(|c| c.location.clone()).collect(),
            });
        }
    }
}

/// Report value exports other than the component class in the component's module.
pub fn validate_module_exports(
    model: &dyn SemanticModel,
    component: &ComponentRecord,
    diagnostics: &Diagnostics,
) {
    let extra: Vec<_> = model
        .exports_of_module(component.unit)
        .into_iter()
        .filter(|symbol| !symbol.is_type_only)
        .filter(|symbol| {
            symbol.local_name != component.class_name && symbol.name != component.class_name
        })
        .collect();
    let Some(first) = extra.first() else {
        return;
    };
    diagnostics.push(MultipleExportsIssue {
        context: first.location.clone(),
        class_name: component.class_name.clone(),
        exports: extra.iter().map(|symbol| symbol.name.clone()).collect(),
    });
}

/// Run every check over the final component list.
///
/// Every record here came out of discovery, so an empty tag name is reported too.
pub fn validate_components(
    model: &dyn SemanticModel,
    components: &[ComponentRecord],
    diagnostics: &Diagnostics,
) {
    for component in components {
        if let Some(reason) = validate_tag_name(&component.tag_name) {
            diagnostics.push(InvalidTagNameIssue {
                context: component.location.clone(),
                tag_name: component.tag_name.clone(),
                reason,
            });
        }
        validate_module_exports(model, component, diagnostics);
    }
    validate_unique_tag_names(components, diagnostics);
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::core::model::Program;
    use crate::issues::{Report, Rule};

    #[test]
    fn test_tag_name_rules() {
        assert_eq!(validate_tag_name("my-component"), None);
        assert_eq!(validate_tag_name("x-button_2"), None);

        let rejected = [
            "MyComponent",
            "my--comp",
            "-my-comp",
            "my-comp-",
            "my comp",
            "nocomponent",
            "",
            " my-comp",
            "a,b-c",
            "my.comp",
        ];
        let messages: Vec<String> = rejected
            .iter()
            .filter_map(|t| validate_tag_name(t))
            .collect();
        insta::assert_snapshot!(messages.join("\n"), @r"
        Tag can not contain upper case characters.
        `my--comp` tag cannot contain multiple dashes (--) next to each other.
        `-my-comp` tag cannot start with a dash (-).
        `my-comp-` tag cannot end with a dash (-).
        `my comp` tag cannot contain a space.
        `nocomponent` tag must contain a dash (-) to work as a valid web component.
        Received empty tag value.
        Tag can not contain white spaces.
        `a,b-c` tag cannot be used for multiple tags.
        `my.comp` tag contains invalid characters: ..
        ");
    }

    #[test]
    fn test_unique_tag_names() {
        let diagnostics = Diagnostics::new();
        let mut a = ComponentRecord {
            tag_name: "x-a".to_string(),
            ..Default::default()
        };
        a.location.file_path = "src/a.ts".to_string();
        let mut b = a.clone();
        b.location.file_path = "src/b.ts".to_string();
        let untagged = ComponentRecord::default();
        validate_unique_tag_names(&[a, untagged.clone(), b, untagged], &diagnostics);

        let issues = diagnostics.into_issues();
        assert_eq!(issues.len(), 1);
        assert_eq!(
            issues[0].details().as_deref(),
            Some("declared in: src/a.ts:0, src/b.ts:0")
        );
    }

    #[test]
    fn test_module_exports() {
        let program = Program::from_sources([(
            "src/button.ts",
            r#"
export type Size = 'small' | 'large';
export interface Options { size: Size; }
export const helper = () => 1;
export function other() {}
@customElement('x-button')
export class Button {}
"#,
        )])
        .unwrap();
        let component = ComponentRecord {
            tag_name: "x-button".to_string(),
            class_name: "Button".to_string(),
            ..Default::default()
        };
        let diagnostics = Diagnostics::new();
        validate_components(&program, &[component], &diagnostics);

        let issues = diagnostics.into_issues();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].rule(), Rule::MultipleExports);
        assert_eq!(
            issues[0].details().as_deref(),
            Some("`Button` is exported along with: helper, other")
        );
    }

    #[test]
    fn test_empty_tag_name_is_reported() {
        let program = Program::from_sources([(
            "src/panel.ts",
            "@customElement('')\nexport class Panel {}\n",
        )])
        .unwrap();
        let mut component = ComponentRecord {
            class_name: "Panel".to_string(),
            ..Default::default()
        };
        component.location.file_path = "src/panel.ts".to_string();
        let diagnostics = Diagnostics::new();
        validate_components(&program, &[component], &diagnostics);

        let issues = diagnostics.into_issues();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].rule(), Rule::InvalidTagName);
        insta::assert_snapshot!(issues[0].message(), @"Received empty tag value.");
    }
}
