//! Metadata builder: immediate (non-inherited) records for one declaration.
//!
//! Framework plugins decide which members are properties, events and methods; the
//! functions here turn a chosen member into its record the same way for all of them.

use anyhow::{Context, Result};
use swc_ecma_ast::TsType;

use crate::core::docs::{self, ParsedDoc};
use crate::core::literal::{self, LiteralValue};
use crate::core::meta::{
    ComponentRecord, EventRecord, MethodRecord, ParameterRecord, PropertyRecord, TypeInfo,
};
use crate::core::model::{
    ClassDeclaration, ClassMember, CompilationUnit, Decorator, InitializerKind, MemberKind,
    ResolvedType, SemanticModel, UnitId,
};
use crate::core::typing;
use crate::core::utils::dash_case;
use crate::issues::Diagnostics;

/// Everything a builder needs while working inside one compilation unit.
pub struct BuildContext<'a> {
    pub model: &'a dyn SemanticModel,
    pub unit: &'a CompilationUnit,
    pub diagnostics: &'a Diagnostics,
}

impl<'a> BuildContext<'a> {
    pub fn new(
        model: &'a dyn SemanticModel,
        diagnostics: &'a Diagnostics,
        unit: UnitId,
    ) -> Option<Self> {
        Some(Self {
            model,
            unit: model.unit(unit)?,
            diagnostics,
        })
    }

    fn documentation(&self, member: &ClassMember) -> String {
        member
            .doc_comment
            .as_ref()
            .map(|doc| self.model.documentation(doc))
            .unwrap_or_default()
    }
}

/// A member's declared or inferred type.
struct MemberType<'m> {
    original_text: String,
    resolved: ResolvedType,
    annotation: Option<&'m TsType>,
}

fn member_type<'m>(
    cx: &BuildContext<'_>,
    siblings: &'m [ClassMember],
    member: &'m ClassMember,
) -> MemberType<'m> {
    let annotation = member.type_annotation.as_ref().or_else(|| {
        // Getters without a return type take the paired setter's parameter type.
        (member.kind == MemberKind::Getter)
            .then(|| setter_of(siblings, member))
            .flatten()
            .and_then(|setter| setter.type_annotation.as_ref())
    });
    if let Some(annotation) = annotation {
        return MemberType {
            original_text: annotation.text.clone(),
            resolved: cx.model.resolve_type(cx.unit.id, &annotation.ty),
            annotation: Some(&annotation.ty),
        };
    }
    let resolved = match member.initializer_kind {
        Some(InitializerKind::String) => ResolvedType::String,
        Some(InitializerKind::Number) => ResolvedType::Number,
        Some(InitializerKind::Boolean) => ResolvedType::Boolean,
        _ => ResolvedType::Unknown,
    };
    MemberType {
        original_text: cx.model.type_to_string(&resolved),
        resolved,
        annotation: None,
    }
}

fn setter_of<'m>(siblings: &'m [ClassMember], getter: &ClassMember) -> Option<&'m ClassMember> {
    siblings.iter().find(|m| {
        m.kind == MemberKind::Setter && m.name == getter.name && m.is_static == getter.is_static
    })
}

fn type_info(cx: &BuildContext<'_>, ty: &MemberType<'_>) -> TypeInfo {
    TypeInfo {
        original_text: ty.original_text.clone(),
        resolved_union_text: typing::resolved_union_text(cx.model, &ty.resolved),
        type_references: ty
            .annotation
            .map(|ann| typing::type_references(cx.unit, &[ann]))
            .unwrap_or_default(),
    }
}

/// Evaluate the first argument of a decorator call (`@property({ .. })`).
///
/// Unsupported argument shapes are fatal for the build.
pub fn decorator_options(decorator: &Decorator) -> Result<Option<LiteralValue>> {
    let Some(arg) = decorator.args.first() else {
        return Ok(None);
    };
    let location = &decorator.location;
    let value = literal::evaluate(arg).with_context(|| {
        format!(
            "Invalid argument to `@{}` at {}:{}:{}",
            decorator.name, location.file_path, location.line, location.col
        )
    })?;
    Ok(Some(value))
}

/// A component record with documentation, doc tags and doc-derived slot and CSS
/// metadata filled in. Members and heritage are left empty.
pub fn component_shell(
    cx: &BuildContext<'_>,
    class: &ClassDeclaration,
    tag_name: String,
) -> ComponentRecord {
    let ParsedDoc { tags, .. } = docs::parse_optional(class.doc_comment.as_ref());
    ComponentRecord {
        tag_name,
        class_name: class.name.clone(),
        documentation: class
            .doc_comment
            .as_ref()
            .map(|doc| cx.model.documentation(doc))
            .unwrap_or_default(),
        location: class.location.clone(),
        unit: class.unit,
        css_properties: docs::build_css_properties(&tags, cx.diagnostics),
        css_parts: docs::build_css_parts(&tags, cx.diagnostics),
        slots: docs::build_slots(&tags, cx.diagnostics),
        doc_tags: tags,
        ..Default::default()
    }
}

/// Property record for a class field or accessor. `options` is the evaluated
/// argument of the property decorator, if any.
pub fn build_property(
    cx: &BuildContext<'_>,
    siblings: &[ClassMember],
    member: &ClassMember,
    options: Option<&LiteralValue>,
) -> PropertyRecord {
    let doc = docs::parse_optional(member.doc_comment.as_ref());
    let ty = member_type(cx, siblings, member);
    let type_text = typing::classify(&ty.resolved);
    let is_accessor = member.kind == MemberKind::Getter;
    let has_setter = is_accessor && setter_of(siblings, member).is_some();

    let readonly = member.readonly
        || (is_accessor && !has_setter)
        || (!has_setter && docs::has_tag(&doc.tags, "readonly"));

    let can_bind = !type_text.is_unknown() || has_setter;
    let attribute_option = options.and_then(|o| o.get("attribute"));
    let attribute = if readonly {
        docs::find_tag(&doc.tags, "attribute")
            .map(|tag| tag.text.trim().to_string())
            .filter(|text| !text.is_empty())
    } else if !can_bind || matches!(attribute_option, Some(LiteralValue::Boolean(false))) {
        None
    } else {
        Some(
            attribute_option
                .and_then(LiteralValue::as_str)
                .map(|attr| attr.trim().to_lowercase())
                .unwrap_or_else(|| dash_case(&member.name)),
        )
    };
    let reflect = attribute.is_some()
        && options
            .and_then(|o| o.get("reflect"))
            .and_then(LiteralValue::as_bool)
            .unwrap_or(false);

    let required = member.definite || docs::has_tag(&doc.tags, "required");
    let optional = member.optional || docs::has_tag(&doc.tags, "optional");
    let default_value = member
        .initializer
        .clone()
        .or_else(|| docs::find_tag(&doc.tags, "default").map(|tag| tag.text.clone()))
        .unwrap_or_else(|| implicit_default(optional));

    PropertyRecord {
        name: member.name.clone(),
        type_text,
        type_info: type_info(cx, &ty),
        attribute,
        reflect,
        required,
        optional,
        readonly,
        internal: docs::has_tag(&doc.tags, "internal"),
        deprecated: docs::has_tag(&doc.tags, "deprecated"),
        is_static: member.is_static,
        default_value,
        documentation: cx.documentation(member),
        doc_tags: doc.tags,
        location: member.location.clone(),
    }
}

/// Optional members without an initializer default to `undefined`.
fn implicit_default(optional: bool) -> String {
    if optional {
        "undefined".to_string()
    } else {
        String::new()
    }
}

/// Property record for an interface or type-literal signature. Signatures never
/// bind to attributes.
pub fn build_signature_property(cx: &BuildContext<'_>, member: &ClassMember) -> PropertyRecord {
    let doc = docs::parse_optional(member.doc_comment.as_ref());
    let ty = member_type(cx, &[], member);
    let optional = member.optional || docs::has_tag(&doc.tags, "optional");
    PropertyRecord {
        name: member.name.clone(),
        type_text: typing::classify(&ty.resolved),
        type_info: type_info(cx, &ty),
        attribute: None,
        reflect: false,
        required: docs::has_tag(&doc.tags, "required"),
        optional,
        readonly: member.readonly || docs::has_tag(&doc.tags, "readonly"),
        internal: docs::has_tag(&doc.tags, "internal"),
        deprecated: docs::has_tag(&doc.tags, "deprecated"),
        is_static: false,
        default_value: docs::find_tag(&doc.tags, "default")
            .map(|tag| tag.text.clone())
            .unwrap_or_else(|| implicit_default(optional)),
        documentation: cx.documentation(member),
        doc_tags: doc.tags,
        location: member.location.clone(),
    }
}

/// Event record for an event field. The `name`, `bubbles` and `composed` options
/// override the defaults.
pub fn build_event(
    cx: &BuildContext<'_>,
    siblings: &[ClassMember],
    member: &ClassMember,
    options: Option<&LiteralValue>,
) -> EventRecord {
    let doc = docs::parse_optional(member.doc_comment.as_ref());
    let ty = member_type(cx, siblings, member);
    let flag = |key: &str| {
        options
            .and_then(|o| o.get(key))
            .and_then(LiteralValue::as_bool)
            .unwrap_or(false)
    };
    EventRecord {
        name: options
            .and_then(|o| o.get("name"))
            .and_then(LiteralValue::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| member.name.clone()),
        bubbles: flag("bubbles"),
        composed: flag("composed"),
        type_info: type_info(cx, &ty),
        internal: docs::has_tag(&doc.tags, "internal"),
        deprecated: docs::has_tag(&doc.tags, "deprecated"),
        documentation: cx.documentation(member),
        doc_tags: doc.tags,
        location: member.location.clone(),
    }
}

/// Method record for a class method or method signature.
pub fn build_method(cx: &BuildContext<'_>, member: &ClassMember) -> MethodRecord {
    let doc = docs::parse_optional(member.doc_comment.as_ref());
    let parameters: Vec<ParameterRecord> = member
        .params
        .iter()
        .map(|param| ParameterRecord {
            name: param.name.clone(),
            type_text: param
                .type_annotation
                .as_ref()
                .map(|ann| ann.text.clone())
                .unwrap_or_else(|| "any".to_string()),
            optional: param.optional || param.default_value.is_some(),
            default_value: param.default_value.clone(),
            rest: param.is_rest,
        })
        .collect();

    let return_type_text = match &member.type_annotation {
        Some(annotation) => annotation.text.clone(),
        None if member.returns_value => "unknown".to_string(),
        None if member.is_async => "Promise<void>".to_string(),
        None => "void".to_string(),
    };

    let params_text: Vec<String> = parameters
        .iter()
        .map(|p| {
            format!(
                "{}{}{}: {}",
                if p.rest { "..." } else { "" },
                p.name,
                if p.optional && !p.rest { "?" } else { "" },
                p.type_text
            )
        })
        .collect();
    let signature_text = format!("({}) => {}", params_text.join(", "), return_type_text);

    let mut referenced: Vec<&TsType> = member
        .params
        .iter()
        .filter_map(|p| p.type_annotation.as_ref().map(|ann| &*ann.ty))
        .collect();
    if let Some(annotation) = &member.type_annotation {
        referenced.push(&annotation.ty);
    }

    MethodRecord {
        name: member.name.clone(),
        signature_text,
        return_type_text,
        parameters,
        type_references: typing::type_references(cx.unit, &referenced),
        internal: docs::has_tag(&doc.tags, "internal"),
        deprecated: docs::has_tag(&doc.tags, "deprecated"),
        is_static: member.is_static,
        documentation: cx.documentation(member),
        doc_tags: doc.tags,
        location: member.location.clone(),
    }
}
