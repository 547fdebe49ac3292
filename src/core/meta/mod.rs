//! Component metadata records.
//!
//! A [`ComponentRecord`] is created by the builder for each discovered declaration,
//! extended with its heritage tree, folded by the merger and finally handed to
//! transform plugins read-only. All records serialize as camelCase JSON.

use std::fmt;

use serde::Serialize;

use crate::core::model::{SourceLocation, UnitId};

/// Primitive classification of a member's type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeText {
    Any,
    String,
    Number,
    Boolean,
    #[default]
    Unknown,
}

impl TypeText {
    pub fn is_unknown(self) -> bool {
        self == TypeText::Unknown
    }
}

impl fmt::Display for TypeText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeText::Any => write!(f, "any"),
            TypeText::String => write!(f, "string"),
            TypeText::Number => write!(f, "number"),
            TypeText::Boolean => write!(f, "boolean"),
            TypeText::Unknown => write!(f, "unknown"),
        }
    }
}

/// Where a referenced type name comes from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(tag = "location", rename_all = "lowercase")]
pub enum TypeRefLocation {
    /// Imported from another module; `path` is the import specifier.
    Import { path: String },
    /// Declared and exported in the member's own module.
    Local,
    /// Neither imported nor exported locally (lib or ambient types).
    Global,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeReference {
    pub name: String,
    #[serde(flatten)]
    pub location: TypeRefLocation,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeInfo {
    /// Annotation text as written.
    pub original_text: String,
    /// Sorted, deduplicated union display text.
    pub resolved_union_text: String,
    pub type_references: Vec<TypeReference>,
}

/// A raw `@name text` documentation tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocTag {
    pub name: String,
    pub text: String,
    #[serde(skip)]
    pub location: SourceLocation,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyRecord {
    pub name: String,
    pub type_text: TypeText,
    pub type_info: TypeInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
    pub reflect: bool,
    pub required: bool,
    pub optional: bool,
    pub readonly: bool,
    pub internal: bool,
    pub deprecated: bool,
    #[serde(rename = "static")]
    pub is_static: bool,
    pub default_value: String,
    pub documentation: String,
    pub doc_tags: Vec<DocTag>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterRecord {
    pub name: String,
    pub type_text: String,
    pub optional: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    pub rest: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodRecord {
    pub name: String,
    /// Arrow-style signature, e.g. `(value: string) => void`.
    pub signature_text: String,
    pub return_type_text: String,
    pub parameters: Vec<ParameterRecord>,
    pub type_references: Vec<TypeReference>,
    pub doc_tags: Vec<DocTag>,
    pub internal: bool,
    pub deprecated: bool,
    #[serde(rename = "static")]
    pub is_static: bool,
    pub documentation: String,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    pub name: String,
    pub bubbles: bool,
    pub composed: bool,
    pub type_info: TypeInfo,
    pub doc_tags: Vec<DocTag>,
    pub internal: bool,
    pub deprecated: bool,
    pub documentation: String,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CssPropertyRecord {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CssPartRecord {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SlotRecord {
    /// Empty for the default slot.
    pub name: String,
    pub description: String,
    pub default: bool,
}

/// Non-owning reference to another component of the same run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentRef {
    pub tag_name: String,
    pub class_name: String,
    pub file_path: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HeritageKind {
    Superclass,
    Interface,
    Mixin,
}

/// One edge of a component's inheritance graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeritageNode {
    pub name: String,
    pub kind: HeritageKind,
    pub location: SourceLocation,
    /// Name of the declaration whose clause produced this node.
    pub parent: String,
    pub target: HeritageTarget,
}

/// What a heritage reference resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum HeritageTarget {
    Component(Box<ComponentRecord>),
    Interface(InterfaceRecord),
    Mixin(MixinRecord),
}

impl HeritageTarget {
    /// Heritage of the resolved target itself.
    pub fn heritage(&self) -> &[HeritageNode] {
        match self {
            HeritageTarget::Component(component) => &component.heritage,
            HeritageTarget::Interface(interface) => &interface.heritage,
            HeritageTarget::Mixin(mixin) => &mixin.heritage,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceRecord {
    pub name: String,
    pub location: SourceLocation,
    pub documentation: String,
    pub doc_tags: Vec<DocTag>,
    pub properties: Vec<PropertyRecord>,
    pub methods: Vec<MethodRecord>,
    pub heritage: Vec<HeritageNode>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MixinRecord {
    /// Factory name, e.g. `FocusMixin`.
    pub name: String,
    pub location: SourceLocation,
    pub documentation: String,
    pub doc_tags: Vec<DocTag>,
    pub properties: Vec<PropertyRecord>,
    pub methods: Vec<MethodRecord>,
    pub events: Vec<EventRecord>,
    pub css_properties: Vec<CssPropertyRecord>,
    pub css_parts: Vec<CssPartRecord>,
    pub heritage: Vec<HeritageNode>,
}

impl MixinRecord {
    /// Wrap the class a mixin factory produces.
    pub fn from_component(name: &str, component: ComponentRecord) -> Self {
        Self {
            name: name.to_string(),
            location: component.location,
            documentation: component.documentation,
            doc_tags: component.doc_tags,
            properties: component.properties,
            methods: component.methods,
            events: component.events,
            css_properties: component.css_properties,
            css_parts: component.css_parts,
            heritage: component.heritage,
        }
    }
}

/// The canonical metadata of one component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentRecord {
    /// Custom element tag; empty for classes built only as heritage targets.
    pub tag_name: String,
    pub class_name: String,
    pub documentation: String,
    pub location: SourceLocation,
    #[serde(skip)]
    pub unit: UnitId,
    pub properties: Vec<PropertyRecord>,
    pub methods: Vec<MethodRecord>,
    pub events: Vec<EventRecord>,
    pub css_properties: Vec<CssPropertyRecord>,
    pub css_parts: Vec<CssPartRecord>,
    pub slots: Vec<SlotRecord>,
    pub doc_tags: Vec<DocTag>,
    pub heritage: Vec<HeritageNode>,
    pub dependencies: Vec<ComponentRef>,
    pub dependents: Vec<ComponentRef>,
}

impl ComponentRecord {
    pub fn to_ref(&self) -> ComponentRef {
        ComponentRef {
            tag_name: self.tag_name.clone(),
            class_name: self.class_name.clone(),
            file_path: self.location.file_path.clone(),
        }
    }

    pub fn has_tag_name(&self) -> bool {
        !self.tag_name.is_empty()
    }
}

/// Flatten a heritage forest in pre-order: each node, then its target's own heritage.
pub fn flatten_heritage(nodes: &[HeritageNode]) -> Vec<&HeritageNode> {
    let mut out = Vec::new();
    for node in nodes {
        push_pre_order(node, &mut out);
    }
    out
}

fn push_pre_order<'a>(node: &'a HeritageNode, out: &mut Vec<&'a HeritageNode>) {
    out.push(node);
    for child in node.target.heritage() {
        push_pre_order(child, out);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn node(name: &str, children: Vec<HeritageNode>) -> HeritageNode {
        HeritageNode {
            name: name.to_string(),
            kind: HeritageKind::Superclass,
            location: SourceLocation::default(),
            parent: String::new(),
            target: HeritageTarget::Interface(InterfaceRecord {
                name: name.to_string(),
                heritage: children,
                ..Default::default()
            }),
        }
    }

    #[test]
    fn test_flatten_is_pre_order() {
        let tree = vec![
            node(
                "A",
                vec![node("B", vec![node("C", vec![])]), node("D", vec![])],
            ),
            node("E", vec![]),
        ];
        let names: Vec<_> = flatten_heritage(&tree)
            .iter()
            .map(|n| n.name.as_str())
            .collect();
        assert_eq!(names, vec!["A", "B", "C", "D", "E"]);
    }

    #[test]
    fn test_type_reference_serializes_flat() {
        let reference = TypeReference {
            name: "Size".to_string(),
            location: TypeRefLocation::Import {
                path: "./types".to_string(),
            },
        };
        assert_eq!(
            serde_json::to_string(&reference).unwrap(),
            r#"{"name":"Size","location":"import","path":"./types"}"#
        );
    }
}
