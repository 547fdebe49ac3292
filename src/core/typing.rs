//! Type classification and display text for member types.

use std::collections::BTreeSet;

use swc_ecma_ast::{TsEntityName, TsType, TsTypeQueryExpr, TsTypeRef};
use swc_ecma_visit::{Visit, VisitWith};

use crate::core::meta::{TypeRefLocation, TypeReference, TypeText};
use crate::core::model::{CompilationUnit, ResolvedType, SemanticModel};

/// Unions with more members than this display as the plain resolved type.
const MAX_UNION_PARTS: usize = 20;

/// Classify a resolved type into one primitive kind.
///
/// Every union member is inspected: a single primitive family wins, mixing
/// families (`string | number`) is `any`, no primitive at all is `unknown`.
pub fn classify(ty: &ResolvedType) -> TypeText {
    if matches!(ty, ResolvedType::Any) {
        return TypeText::Any;
    }
    let members = ty.members();
    if members.iter().any(|m| matches!(m, ResolvedType::Any)) {
        return TypeText::Any;
    }
    let is_string = members.iter().any(ResolvedType::is_string_like);
    let is_number = members.iter().any(ResolvedType::is_number_like);
    let is_boolean = members.iter().any(ResolvedType::is_boolean_like);
    match (is_string, is_number, is_boolean) {
        (true, false, false) => TypeText::String,
        (false, true, false) => TypeText::Number,
        (false, false, true) => TypeText::Boolean,
        (false, false, false) => TypeText::Unknown,
        _ => TypeText::Any,
    }
}

/// Sorted, deduplicated `a | b` display text with `true | false` collapsed.
pub fn resolved_union_text(model: &dyn SemanticModel, ty: &ResolvedType) -> String {
    let parts: BTreeSet<String> = ty
        .members()
        .iter()
        .map(|member| match member {
            ResolvedType::BooleanLiteral(_) => "boolean".to_string(),
            other => model.type_to_string(other),
        })
        .collect();
    if parts.len() > MAX_UNION_PARTS {
        return model.type_to_string(ty);
    }
    let wrap = parts.len() > 1;
    parts
        .into_iter()
        .map(|part| {
            if wrap && part.contains("=>") {
                format!("({part})")
            } else {
                part
            }
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Named types referenced by `types`, in first-seen order, each with its origin.
pub fn type_references(unit: &CompilationUnit, types: &[&TsType]) -> Vec<TypeReference> {
    let mut collector = ReferenceCollector::default();
    for ty in types {
        ty.visit_with(&mut collector);
    }
    collector
        .names
        .into_iter()
        .map(|name| TypeReference {
            location: reference_location(unit, &name),
            name,
        })
        .collect()
}

fn reference_location(unit: &CompilationUnit, name: &str) -> TypeRefLocation {
    if let Some(import) = unit.import(name) {
        return TypeRefLocation::Import {
            path: import.module_path.clone(),
        };
    }
    if unit.exports.iter().any(|export| export.name == name) {
        return TypeRefLocation::Local;
    }
    TypeRefLocation::Global
}

#[derive(Default)]
struct ReferenceCollector {
    names: Vec<String>,
}

impl ReferenceCollector {
    fn push(&mut self, name: String) {
        if !self.names.contains(&name) {
            self.names.push(name);
        }
    }
}

fn leftmost(entity: &TsEntityName) -> String {
    match entity {
        TsEntityName::Ident(ident) => ident.sym.to_string(),
        TsEntityName::TsQualifiedName(qualified) => leftmost(&qualified.left),
    }
}

impl Visit for ReferenceCollector {
    fn visit_ts_type_ref(&mut self, node: &TsTypeRef) {
        self.push(leftmost(&node.type_name));
        node.visit_children_with(self);
    }

    fn visit_ts_type_query_expr(&mut self, node: &TsTypeQueryExpr) {
        if let TsTypeQueryExpr::TsEntityName(entity) = node {
            self.push(leftmost(entity));
        }
        node.visit_children_with(self);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::core::model::{Declaration, Program};

    fn program(member_types: &[&str]) -> Program {
        let members: String = member_types
            .iter()
            .enumerate()
            .map(|(i, ty)| format!("  m{i}: {ty};\n"))
            .collect();
        Program::from_sources([
            (
                "src/types.ts",
                concat!(
                    "export type Variant = 'primary' | 'secondary';\n",
                    "export interface Item { id: string }\n",
                )
                .to_string(),
            ),
            (
                "src/el.ts",
                format!(
                    "import {{ Variant, Item }} from './types';\n\
                     export interface Local {{ a: string }}\n\
                     export class El {{\n{members}}}\n"
                ),
            ),
        ])
        .unwrap()
    }

    fn resolved(program: &Program, index: usize) -> ResolvedType {
        let class = program
            .unit(1)
            .unwrap()
            .declaration("El")
            .and_then(Declaration::as_class)
            .unwrap();
        let ann = class.members[index].type_annotation.as_ref().unwrap();
        program.resolve_type(1, &ann.ty)
    }

    #[test]
    fn test_classification_totals() {
        let types = [
            "string | string",
            "string | number",
            "'a' | 'b'",
            "true | false",
            "Item",
            "Variant | undefined",
            "number",
            "any",
            "`x-${string}`",
        ];
        let program = program(&types);
        let classified: Vec<TypeText> = (0..types.len())
            .map(|i| classify(&resolved(&program, i)))
            .collect();
        assert_eq!(
            classified,
            vec![
                TypeText::String,
                TypeText::Any,
                TypeText::String,
                TypeText::Boolean,
                TypeText::Unknown,
                TypeText::String,
                TypeText::Number,
                TypeText::Any,
                TypeText::String,
            ]
        );
    }

    #[test]
    fn test_union_text_sorted_and_collapsed() {
        let program = program(&[
            "'b' | 'a' | undefined",
            "true | false | null",
            "string | ((v: string) => void)",
        ]);
        assert_eq!(
            resolved_union_text(&program, &resolved(&program, 0)),
            r#""a" | "b" | undefined"#
        );
        assert_eq!(
            resolved_union_text(&program, &resolved(&program, 1)),
            "boolean | null"
        );
        assert_eq!(
            resolved_union_text(&program, &resolved(&program, 2)),
            "((v: string) => void) | string"
        );
    }

    #[test]
    fn test_large_unions_fall_back_to_plain_text() {
        let literals: Vec<String> = (0..21).map(|i| format!("'v{i}'")).collect();
        let union = literals.join(" | ");
        let program = program(&[union.as_str()]);
        let ty = resolved(&program, 0);
        assert_eq!(resolved_union_text(&program, &ty), ty.to_string());
    }

    #[test]
    fn test_type_reference_locations() {
        let program = program(&["Map<Item, Local> | Variant | HTMLElement"]);
        let class = program
            .unit(1)
            .unwrap()
            .declaration("El")
            .and_then(Declaration::as_class)
            .unwrap();
        let ann = class.members[0].type_annotation.as_ref().unwrap();
        let refs = type_references(program.unit(1).unwrap(), &[&ann.ty]);
        let pairs: Vec<_> = refs.iter()
            .map(|r| (r.name.as_str(), r.location.clone()))
            .collect();
        let import = TypeRefLocation::Import {
            path: "./types".to_string(),
        };
        assert_eq!(
            pairs,
            vec![
                ("Map", TypeRefLocation::Global),
                ("Item", import.clone()),
                ("Local", TypeRefLocation::Local),
                ("Variant", import),
                ("HTMLElement", TypeRefLocation::Global),
            ]
        );
    }
}
