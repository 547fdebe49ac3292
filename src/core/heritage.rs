//! Heritage resolver.
//!
//! Walks `extends`/`implements` clauses, classifies each reference, resolves it
//! through the semantic model and builds the target's own metadata recursively.
//! Sibling branches resolve concurrently; a node is returned only after all of its
//! children resolved.

use anyhow::Result;
use futures::future::{FutureExt, LocalBoxFuture, try_join_all};
use tracing::debug;

use crate::core::builder::{self, BuildContext};
use crate::core::docs;
use crate::core::meta::{
    ComponentRecord, HeritageKind, HeritageNode, HeritageTarget, InterfaceRecord, MixinRecord,
};
use crate::core::model::{
    CallRole, ClassMember, Declaration, DocComment, HeritageClause, HeritageReference, MemberKind,
    SourceLocation, UnitId,
};
use crate::issues::HeritageCycleIssue;
use crate::plugins::{Plugin, PluginContext};

/// Base classes that never carry component metadata.
pub const IGNORED_HERITAGE: &[&str] = &[
    "LitElement",
    "HTMLElement",
    "ReactiveElement",
    "UpdatingElement",
];

/// `(unit, name, line)` of each declaration on the current branch.
type Ancestry = Vec<(UnitId, String, usize)>;

/// Classify one heritage reference.
pub fn heritage_kind(reference: &HeritageReference) -> HeritageKind {
    match (reference.clause, reference.role) {
        (HeritageClause::Implements, _) => HeritageKind::Interface,
        (HeritageClause::Extends, CallRole::Callee) => HeritageKind::Mixin,
        (HeritageClause::Extends, CallRole::Plain | CallRole::Argument) => HeritageKind::Superclass,
    }
}

/// Build a component with `plugin` and attach its full heritage tree.
pub async fn build_with_heritage(
    plugin: &dyn Plugin,
    cx: PluginContext<'_>,
    declaration: &Declaration,
) -> Result<Option<ComponentRecord>> {
    build_on_branch(plugin, cx, declaration, Vec::new()).await
}

fn build_on_branch<'a>(
    plugin: &'a dyn Plugin,
    cx: PluginContext<'a>,
    declaration: &'a Declaration,
    mut ancestry: Ancestry,
) -> LocalBoxFuture<'a, Result<Option<ComponentRecord>>> {
    async move {
        let Some(mut component) = plugin.build(cx, declaration).await? else {
            return Ok(None);
        };
        let Some(class) = declaration.as_class() else {
            return Ok(Some(component));
        };
        ancestry.push(declaration.key());
        let nodes = resolve_heritage(
            plugin,
            cx,
            class.unit,
            &class.name,
            &class.heritage,
            ancestry,
            false,
        )
        .await?;
        component.heritage.extend(nodes);
        Ok(Some(component))
    }
    .boxed_local()
}

/// Resolve a declaration's heritage references into nodes. Unresolvable and
/// ignored references contribute nothing.
pub fn resolve_heritage<'a>(
    plugin: &'a dyn Plugin,
    cx: PluginContext<'a>,
    unit: UnitId,
    parent: &'a str,
    references: &'a [HeritageReference],
    ancestry: Ancestry,
    interfaces_only: bool,
) -> LocalBoxFuture<'a, Result<Vec<HeritageNode>>> {
    async move {
        let branches = references
            .iter()
            .filter(|reference| !IGNORED_HERITAGE.contains(&reference.name.as_str()))
            .map(|reference| {
                resolve_reference(
                    plugin,
                    cx,
                    unit,
                    parent,
                    reference,
                    ancestry.clone(),
                    interfaces_only,
                )
            });
        let nodes = try_join_all(branches).await?;
        Ok(nodes.into_iter().flatten().collect())
    }
    .boxed_local()
}

fn resolve_reference<'a>(
    plugin: &'a dyn Plugin,
    cx: PluginContext<'a>,
    unit: UnitId,
    parent: &'a str,
    reference: &'a HeritageReference,
    mut ancestry: Ancestry,
    interfaces_only: bool,
) -> LocalBoxFuture<'a, Result<Option<HeritageNode>>> {
    async move {
        let Some(declaration) = cx.model.resolve_declaration(unit, &reference.name) else {
            debug!(name = %reference.name, parent, "unresolved heritage reference");
            return Ok(None);
        };
        if interfaces_only && !declaration.is_type_only() {
            return Ok(None);
        }

        let key = declaration.key();
        if ancestry.contains(&key) {
            let mut path: Vec<String> = ancestry.iter().map(|(_, name, _)| name.clone()).collect();
            path.push(key.1.clone());
            cx.diagnostics.push(HeritageCycleIssue {
                context: reference.location.clone(),
                path,
            });
            return Ok(None);
        }

        let kind = if interfaces_only {
            HeritageKind::Interface
        } else {
            heritage_kind(reference)
        };

        let target = match &declaration {
            Declaration::Class(_) => build_on_branch(plugin, cx, &declaration, ancestry)
                .await?
                .map(|component| HeritageTarget::Component(Box::new(component))),
            Declaration::Mixin(mixin) => {
                let class = Declaration::Class(mixin.class.clone());
                build_on_branch(plugin, cx, &class, ancestry)
                    .await?
                    .map(|component| {
                        HeritageTarget::Mixin(MixinRecord::from_component(&mixin.name, component))
                    })
            }
            Declaration::Interface(interface) => {
                ancestry.push(key);
                let heritage = resolve_heritage(
                    plugin,
                    cx,
                    interface.unit,
                    &interface.name,
                    &interface.heritage,
                    ancestry,
                    true,
                )
                .await?;
                interface_record(
                    cx,
                    interface.unit,
                    &interface.name,
                    &interface.location,
                    interface.doc_comment.as_ref(),
                    &interface.members,
                    heritage,
                )
            }
            Declaration::TypeAlias(alias) => interface_record(
                cx,
                alias.unit,
                &alias.name,
                &alias.location,
                alias.doc_comment.as_ref(),
                &alias.members,
                Vec::new(),
            ),
            Declaration::Value(_) => None,
        };

        Ok(target.map(|target| HeritageNode {
            name: reference.name.clone(),
            kind,
            location: reference.location.clone(),
            parent: parent.to_string(),
            target,
        }))
    }
    .boxed_local()
}

/// Signature-only record for an interface or object type alias.
fn interface_record(
    cx: PluginContext<'_>,
    unit: UnitId,
    name: &str,
    location: &SourceLocation,
    doc_comment: Option<&DocComment>,
    members: &[ClassMember],
    heritage: Vec<HeritageNode>,
) -> Option<HeritageTarget> {
    let bx = BuildContext::new(cx.model, cx.diagnostics, unit)?;
    let (methods, properties): (Vec<&ClassMember>, Vec<&ClassMember>) =
        members.iter().partition(|m| m.kind == MemberKind::Method);
    Some(HeritageTarget::Interface(InterfaceRecord {
        name: name.to_string(),
        location: location.clone(),
        documentation: doc_comment
            .map(|doc| cx.model.documentation(doc))
            .unwrap_or_default(),
        doc_tags: docs::parse_optional(doc_comment).tags,
        properties: properties
            .into_iter()
            .filter(|m| m.kind != MemberKind::Setter)
            .map(|m| builder::build_signature_property(&bx, m))
            .collect(),
        methods: methods
            .into_iter()
            .map(|m| builder::build_method(&bx, m))
            .collect(),
        heritage,
    }))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::core::meta::{TypeText, flatten_heritage};
    use crate::core::model::{Program, SemanticModel};
    use crate::issues::{Diagnostics, Issue, Report, Rule};
    use crate::plugins::LitElementPlugin;

    async fn build(program: &Program, unit: UnitId, name: &str) -> (ComponentRecord, Vec<Issue>) {
        let diagnostics = Diagnostics::new();
        let cx = PluginContext {
            model: program,
            diagnostics: &diagnostics,
        };
        let declaration = program
            .unit(unit)
            .unwrap()
            .declaration(name)
            .unwrap()
            .clone();
        let plugin = LitElementPlugin::default();
        let component = build_with_heritage(&plugin, cx, &declaration)
            .await
            .unwrap()
            .unwrap();
        (component, diagnostics.into_issues())
    }

    fn names(component: &ComponentRecord) -> Vec<(String, HeritageKind)> {
        flatten_heritage(&component.heritage)
            .iter()
            .map(|node| (node.name.clone(), node.kind))
            .collect()
    }

    #[tokio::test]
    async fn test_resolves_superclass_mixin_and_interface() {
        let program = Program::from_sources([
            (
                "src/base.ts",
                r#"
import { LitElement } from 'lit';
export interface Sized extends Labeled { size: 'small' | 'large'; }
export interface Labeled { label: string; }
export class Base extends LitElement {
    @property() disabled = false;
}
export const Focusable = (superClass) => {
    class FocusableElement extends superClass {
        @property({ type: Boolean }) focused = false;
        focus(): void {}
    }
    return FocusableElement;
};
"#,
            ),
            (
                "src/button.ts",
                r#"
import { Base, Focusable, Sized } from './base';
@customElement('x-button')
export class Button extends Focusable(Base) implements Sized, Missing {}
"#,
            ),
        ])
        .unwrap();
        let (button, issues) = build(&program, 1, "Button").await;
        assert_eq!(
            names(&button),
            vec![
                ("Focusable".to_string(), HeritageKind::Mixin),
                ("Base".to_string(), HeritageKind::Superclass),
                ("Sized".to_string(), HeritageKind::Interface),
                ("Labeled".to_string(), HeritageKind::Interface),
            ]
        );
        assert!(issues.is_empty());

        let HeritageTarget::Mixin(mixin) = &button.heritage[0].target else {
            panic!("expected mixin target");
        };
        assert_eq!(mixin.name, "Focusable");
        assert_eq!(mixin.properties[0].name, "focused");
        assert_eq!(mixin.methods[0].name, "focus");
        assert_eq!(button.heritage[0].parent, "Button");

        let HeritageTarget::Interface(sized) = &button.heritage[2].target else {
            panic!("expected interface target");
        };
        assert_eq!(sized.properties[0].attribute, None);
        assert_eq!(sized.heritage[0].parent, "Sized");
    }

    #[tokio::test]
    async fn test_cycles_are_reported_not_followed() {
        let program = Program::from_sources([(
            "src/loop.ts",
            "export class A extends B {}\nexport class B extends A {}\n",
        )])
        .unwrap();
        let (a, issues) = build(&program, 0, "A").await;
        assert_eq!(names(&a), vec![("B".to_string(), HeritageKind::Superclass)]);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].rule(), Rule::HeritageCycle);
        let path = issues[0].details().unwrap();
        insta::assert_snapshot!(path, @"A -> B -> A");
    }

    #[tokio::test]
    async fn test_object_type_alias_is_an_interface() {
        let program = Program::from_sources([(
            "src/chip.ts",
            r#"
export type Sized = { size: string; grow(): void };
@customElement('x-chip')
export class Chip implements Sized {}
"#,
        )])
        .unwrap();
        let (chip, issues) = build(&program, 0, "Chip").await;
        assert_eq!(
            names(&chip),
            vec![("Sized".to_string(), HeritageKind::Interface)]
        );
        assert!(issues.is_empty());

        let HeritageTarget::Interface(sized) = &chip.heritage[0].target else {
            panic!("expected interface target");
        };
        let props: Vec<_> = sized
            .properties
            .iter()
            .map(|p| (p.name.as_str(), p.type_text.clone(), p.attribute.clone()))
            .collect();
        assert_eq!(props, vec![("size", TypeText::String, None)]);
        let methods: Vec<_> = sized.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(methods, vec!["grow"]);
    }
}
