//! Built-in plugin for components written with `lit`/`LitElement`.
//!
//! Discovers classes decorated with `@customElement('tag')` (or documented with a
//! `@tagname` tag) and reads `@property`, `@event` and public methods.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use tracing::debug;

use super::{Plugin, PluginContext};
use crate::core::builder::{self, BuildContext};
use crate::core::docs;
use crate::core::literal::{self, LiteralValue};
use crate::core::meta::{ComponentRecord, EventRecord, MethodRecord, PropertyRecord};
use crate::core::model::{ClassDeclaration, CompilationUnit, Declaration, MemberKind};
use crate::issues::PrivateMemberIssue;

pub const NAME: &str = "lit-element";

/// Methods every LitElement has; never part of a component's public API.
pub const LIFECYCLE_METHODS: &[&str] = &[
    "createRenderRoot",
    "connectedCallback",
    "disconnectedCallback",
    "performUpdate",
    "shouldUpdate",
    "update",
    "render",
    "firstUpdated",
    "updated",
    "updateComplete",
];

/// Public members of the element base classes.
const RESERVED_PUBLIC_MEMBERS: &[&str] = &[
    "attributeChangedCallback",
    "adoptedCallback",
    "requestUpdate",
    "getUpdateComplete",
];

const PROPERTY_DECORATOR: &str = "property";
const EVENT_DECORATOR: &str = "event";

#[derive(Debug, Default)]
pub struct LitElementPlugin;

/// Tag name from `@customElement(..)`, else the `@tagname` doc tag.
///
/// An identifier argument is kept by name; other argument shapes are errors.
pub fn find_tag_name(class: &ClassDeclaration) -> Result<Option<String>> {
    if let Some(decorator) = class.decorator("customElement")
        && let Some(arg) = decorator.args.first()
    {
        let tag = match literal::evaluate(arg) {
            Ok(LiteralValue::String(tag)) => tag,
            Ok(LiteralValue::Identifier(name)) => name,
            Ok(other) => {
                return Err(anyhow!(
                    "`@customElement` expects a tag name, found {other:?} at {}:{}",
                    decorator.location.file_path,
                    decorator.location.line
                ));
            }
            Err(e) => {
                return Err(anyhow!(
                    "`@customElement` at {}:{}: {e}",
                    decorator.location.file_path,
                    decorator.location.line
                ));
            }
        };
        return Ok(Some(tag));
    }
    let tags = docs::parse_optional(class.doc_comment.as_ref()).tags;
    Ok(docs::find_tag(&tags, "tagname").map(|tag| escape_quotes(&tag.text)))
}

fn escape_quotes(text: &str) -> String {
    text.trim().trim_matches('"').trim_matches('\'').to_string()
}

fn find_properties(cx: &BuildContext<'_>, class: &ClassDeclaration) -> Result<Vec<PropertyRecord>> {
    let mut properties = Vec::new();
    for member in &class.members {
        let decorator = member.decorator(PROPERTY_DECORATOR);
        match member.kind {
            MemberKind::Property => {
                let Some(decorator) = decorator else {
                    continue;
                };
                if member.is_private() {
                    cx.diagnostics.push(PrivateMemberIssue {
                        context: member.location.clone(),
                        member: member.name.clone(),
                        decorator: PROPERTY_DECORATOR.to_string(),
                    });
                    continue;
                }
                let options = builder::decorator_options(decorator)?;
                let property =
                    builder::build_property(cx, &class.members, member, options.as_ref());
                properties.push(property);
            }
            MemberKind::Getter if !member.is_private() => {
                let options = decorator
                    .map(builder::decorator_options)
                    .transpose()?
                    .flatten();
                let property =
                    builder::build_property(cx, &class.members, member, options.as_ref());
                properties.push(property);
            }
            _ => {}
        }
    }
    Ok(properties)
}

fn find_events(cx: &BuildContext<'_>, class: &ClassDeclaration) -> Result<Vec<EventRecord>> {
    let mut events = Vec::new();
    for member in &class.members {
        if member.kind != MemberKind::Property {
            continue;
        }
        let Some(decorator) = member.decorator(EVENT_DECORATOR) else {
            continue;
        };
        if member.is_private() {
            cx.diagnostics.push(PrivateMemberIssue {
                context: member.location.clone(),
                member: member.name.clone(),
                decorator: EVENT_DECORATOR.to_string(),
            });
            continue;
        }
        let options = builder::decorator_options(decorator)?;
        events.push(builder::build_event(cx, &class.members, member, options.as_ref()));
    }
    Ok(events)
}

fn find_methods(cx: &BuildContext<'_>, class: &ClassDeclaration) -> Vec<MethodRecord> {
    class
        .members
        .iter()
        .filter(|m| m.kind == MemberKind::Method && !m.is_private())
        .filter(|m| {
            let name = m.name.as_str();
            !LIFECYCLE_METHODS.contains(&name) && !RESERVED_PUBLIC_MEMBERS.contains(&name)
        })
        .map(|m| builder::build_method(cx, m))
        .collect()
}

impl LitElementPlugin {
    fn build_class(
        &self,
        cx: PluginContext<'_>,
        class: &ClassDeclaration,
    ) -> Result<Option<ComponentRecord>> {
        let Some(bx) = BuildContext::new(cx.model, cx.diagnostics, class.unit) else {
            return Ok(None);
        };
        let tag_name = find_tag_name(class)?.unwrap_or_default();
        let mut component = builder::component_shell(&bx, class, tag_name);
        component.properties = find_properties(&bx, class)?;
        component.events = find_events(&bx, class)?;
        component.methods = find_methods(&bx, class);
        Ok(Some(component))
    }
}

#[async_trait(?Send)]
impl Plugin for LitElementPlugin {
    fn name(&self) -> &str {
        NAME
    }

    async fn discover(
        &self,
        _cx: PluginContext<'_>,
        unit: &CompilationUnit,
    ) -> Result<Vec<Declaration>> {
        let mut discovered = Vec::new();
        for declaration in &unit.declarations {
            let Declaration::Class(class) = declaration else {
                continue;
            };
            if find_tag_name(class)?.is_some_and(|tag| !tag.is_empty()) {
                debug!(class = %class.name, path = %unit.path, "discovered component");
                discovered.push(declaration.clone());
            }
        }
        Ok(discovered)
    }

    async fn build(
        &self,
        cx: PluginContext<'_>,
        declaration: &Declaration,
    ) -> Result<Option<ComponentRecord>> {
        match declaration {
            Declaration::Class(class) => self.build_class(cx, class),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::core::model::{Program, SemanticModel};
    use crate::issues::{Diagnostics, Rule};

    const SOURCE: &str = r#"
import { LitElement } from 'lit';

/**
 * A toggle switch.
 * @csspart track - The track.
 */
@customElement('x-switch')
export class Switch extends LitElement {
    @property({ type: Boolean, reflect: true }) checked = false;
    @property() private secret = '';
    @internalProperty() hover = false;
    @event({ name: 'x-change', bubbles: true, composed: true }) change!: CustomEvent<boolean>;
    get isOn(): boolean { return this.checked; }
    private get hidden(): boolean { return true; }
    toggle(): void {}
    render() {}
    protected updated() {}
    private helper() {}
}

/** @tagname 'x-doc' */
export class Documented {}

export class Plain {}
"#;

    fn program() -> Program {
        Program::from_sources([("src/switch.ts", SOURCE)]).unwrap()
    }

    #[tokio::test]
    async fn test_discovers_decorated_and_documented_classes() {
        let program = program();
        let diagnostics = Diagnostics::new();
        let cx = PluginContext {
            model: &program,
            diagnostics: &diagnostics,
        };
        let found = LitElementPlugin
            .discover(cx, program.unit(0).unwrap())
            .await
            .unwrap();
        let names: Vec<_> = found.iter().map(|d| d.name()).collect();
        assert_eq!(names, vec!["Switch", "Documented"]);
    }

    #[tokio::test]
    async fn test_builds_members() {
        let program = program();
        let diagnostics = Diagnostics::new();
        let cx = PluginContext {
            model: &program,
            diagnostics: &diagnostics,
        };
        let declaration = program
            .unit(0)
            .unwrap()
            .declaration("Switch")
            .unwrap()
            .clone();
        let switch = LitElementPlugin
            .build(cx, &declaration)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(switch.tag_name, "x-switch");
        assert_eq!(switch.documentation, "A toggle switch.");
        assert_eq!(switch.css_parts[0].name, "track");
        let props: Vec<_> = switch.properties.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(props, vec!["checked", "isOn"]);
        assert!(switch.properties[0].reflect);
        assert_eq!(switch.properties[0].attribute.as_deref(), Some("checked"));
        assert!(switch.properties[1].readonly);

        assert_eq!(switch.events.len(), 1);
        assert_eq!(switch.events[0].name, "x-change");
        assert!(switch.events[0].composed);

        let methods: Vec<_> = switch.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(methods, vec!["toggle"]);

        let issues = diagnostics.into_issues();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].rule(), Rule::PrivateMember);
    }

    #[tokio::test]
    async fn test_unsupported_decorator_argument_is_fatal() {
        let program = Program::from_sources([(
            "src/bad.ts",
            "@customElement('x-bad')\nexport class Bad { @property(makeOptions()) value = ''; }\n",
        )])
        .unwrap();
        let diagnostics = Diagnostics::new();
        let cx = PluginContext {
            model: &program,
            diagnostics: &diagnostics,
        };
        let declaration = program.unit(0).unwrap().declaration("Bad").unwrap().clone();
        let error = LitElementPlugin.build(cx, &declaration).await.unwrap_err();
        assert_eq!(
            error.to_string(),
            "Invalid argument to `@property` at src/bad.ts:2:20"
        );
        assert_eq!(
            error.root_cause().to_string(),
            "unsupported call expression in decorator argument"
        );
    }
}
