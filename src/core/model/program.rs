//! swc-backed [`SemanticModel`] over a set of lowered compilation units.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use anyhow::Result;
use swc_common::{SourceMap, Spanned};
use swc_ecma_ast::{TsEntityName, TsKeywordTypeKind, TsLit, TsType, TsUnionOrIntersectionType};

use super::{
    SemanticModel,
    lower::lower_module,
    types::ResolvedType,
    unit::{CompilationUnit, Declaration, ExportedSymbol, UnitId},
};
use crate::core::{parsers::typescript::parse_ts_source, utils};

/// Bound on import/re-export/alias chains.
const MAX_RESOLVE_DEPTH: usize = 16;

/// All compilation units of one discovery run.
pub struct Program {
    units: Vec<CompilationUnit>,
    /// Module key (extension-stripped path) to unit.
    keys: HashMap<String, UnitId>,
}

impl Program {
    /// Build a program from lowered units. Unit ids must equal their index.
    pub fn from_units(units: Vec<CompilationUnit>) -> Self {
        let keys = units
            .iter()
            .map(|unit| (utils::module_key(&unit.path), unit.id))
            .collect();
        Self { units, keys }
    }

    /// Parse and lower in-memory sources, in order. Any parse failure is an error.
    pub fn from_sources<I, P, C>(sources: I) -> Result<Self>
    where
        I: IntoIterator<Item = (P, C)>,
        P: Into<String>,
        C: Into<String>,
    {
        let mut units = Vec::new();
        for (id, (path, code)) in sources.into_iter().enumerate() {
            let path: String = path.into();
            let parsed = parse_ts_source(code.into(), &path, Arc::new(SourceMap::default()))?;
            units.push(lower_module(id, &path, &parsed));
        }
        Ok(Self::from_units(units))
    }

    pub fn unit_by_path(&self, path: &str) -> Option<&CompilationUnit> {
        self.keys
            .get(&utils::module_key(path))
            .and_then(|id| self.units.get(*id))
    }

    fn resolve_in(&self, unit_id: UnitId, name: &str, depth: usize) -> Option<Declaration> {
        let unit = self.units.get(unit_id)?;
        if let Some(declaration) = unit.declaration(name) {
            return Some(declaration.clone());
        }
        if depth >= MAX_RESOLVE_DEPTH {
            return None;
        }
        let import = unit.import(name)?;
        if import.imported_name == "*" {
            return None;
        }
        let target = self.resolve_module(unit_id, &import.module_path)?;
        self.resolve_export(target, &import.imported_name, depth + 1)
    }

    fn resolve_export(
        &self,
        unit_id: UnitId,
        export_name: &str,
        depth: usize,
    ) -> Option<Declaration> {
        if depth >= MAX_RESOLVE_DEPTH {
            return None;
        }
        let unit = self.units.get(unit_id)?;
        if let Some(export) = unit.exports.iter().find(|e| e.name == export_name) {
            return self.resolve_in(unit_id, &export.local_name, depth + 1);
        }
        for re_export in &unit.re_exports {
            let Some(target) = self.resolve_module(unit_id, &re_export.module_path) else {
                continue;
            };
            match &re_export.names {
                Some(names) => {
                    let renamed = names.iter().find(|(_, exported)| exported == export_name);
                    if let Some((original, _)) = renamed {
                        return self.resolve_export(target, original, depth + 1);
                    }
                }
                None if export_name != "default" => {
                    if let Some(found) = self.resolve_export(target, export_name, depth + 1) {
                        return Some(found);
                    }
                }
                None => {}
            }
        }
        None
    }

    fn collect_exports(
        &self,
        unit_id: UnitId,
        depth: usize,
        visited: &mut HashSet<UnitId>,
        out: &mut Vec<ExportedSymbol>,
    ) {
        let Some(unit) = self.units.get(unit_id) else {
            return;
        };
        if !visited.insert(unit_id) {
            return;
        }
        for export in &unit.exports {
            let mut symbol = export.clone();
            if !symbol.is_type_only {
                symbol.is_type_only = self
                    .resolve_in(unit_id, &export.local_name, 0)
                    .is_some_and(|d| d.is_type_only());
            }
            out.push(symbol);
        }
        if depth >= MAX_RESOLVE_DEPTH {
            return;
        }
        for re_export in &unit.re_exports {
            let Some(target) = self.resolve_module(unit_id, &re_export.module_path) else {
                continue;
            };
            match &re_export.names {
                Some(names) => {
                    for (original, exported) in names {
                        let is_type_only = re_export.is_type_only
                            || self
                                .resolve_export(target, original, depth + 1)
                                .is_some_and(|d| d.is_type_only());
                        out.push(ExportedSymbol {
                            name: exported.clone(),
                            local_name: original.clone(),
                            is_type_only,
                            location: re_export.location.clone(),
                        });
                    }
                }
                None => {
                    let mut nested = Vec::new();
                    self.collect_exports(target, depth + 1, visited, &mut nested);
                    for mut symbol in nested.into_iter().filter(|s| s.name != "default") {
                        symbol.is_type_only |= re_export.is_type_only;
                        symbol.location = re_export.location.clone();
                        out.push(symbol);
                    }
                }
            }
        }
    }

    fn resolve_type_in(&self, unit: &CompilationUnit, ty: &TsType, depth: usize) -> ResolvedType {
        match ty {
            TsType::TsKeywordType(keyword) => match keyword.kind {
                TsKeywordTypeKind::TsAnyKeyword => ResolvedType::Any,
                TsKeywordTypeKind::TsUnknownKeyword => ResolvedType::Unknown,
                TsKeywordTypeKind::TsStringKeyword => ResolvedType::String,
                TsKeywordTypeKind::TsNumberKeyword => ResolvedType::Number,
                TsKeywordTypeKind::TsBooleanKeyword => ResolvedType::Boolean,
                TsKeywordTypeKind::TsBigIntKeyword => ResolvedType::BigInt,
                TsKeywordTypeKind::TsSymbolKeyword => ResolvedType::Symbol,
                TsKeywordTypeKind::TsObjectKeyword => ResolvedType::Object,
                TsKeywordTypeKind::TsNullKeyword => ResolvedType::Null,
                TsKeywordTypeKind::TsUndefinedKeyword => ResolvedType::Undefined,
                TsKeywordTypeKind::TsVoidKeyword => ResolvedType::Void,
                TsKeywordTypeKind::TsNeverKeyword => ResolvedType::Never,
                TsKeywordTypeKind::TsIntrinsicKeyword => {
                    ResolvedType::Other(unit.snippet(keyword.span))
                }
            },
            TsType::TsLitType(lit) => match &lit.lit {
                TsLit::Str(s) => {
                    ResolvedType::StringLiteral(s.value.as_str().unwrap_or_default().to_string())
                }
                TsLit::Number(_) => ResolvedType::NumberLiteral(unit.snippet(lit.span)),
                TsLit::Bool(b) => ResolvedType::BooleanLiteral(b.value),
                TsLit::Tpl(_) => ResolvedType::Template(unit.snippet(lit.span)),
                TsLit::BigInt(_) => ResolvedType::Other(unit.snippet(lit.span)),
            },
            TsType::TsUnionOrIntersectionType(TsUnionOrIntersectionType::TsUnionType(union)) => {
                let members = union
                    .types
                    .iter()
                    .map(|t| self.resolve_type_in(unit, t, depth));
                ResolvedType::union(members)
            }
            TsType::TsParenthesizedType(paren) => {
                self.resolve_type_in(unit, &paren.type_ann, depth)
            }
            TsType::TsTypeRef(type_ref) => {
                let text = unit.snippet(type_ref.span);
                let TsEntityName::Ident(ident) = &type_ref.type_name else {
                    return ResolvedType::Other(text);
                };
                let name = ident.sym.to_string();
                if type_ref.type_params.is_none()
                    && depth < MAX_RESOLVE_DEPTH
                    && let Some(Declaration::TypeAlias(alias)) =
                        self.resolve_declaration(unit.id, &name)
                    && let Some(alias_unit) = self.units.get(alias.unit)
                {
                    return self.resolve_type_in(alias_unit, &alias.ty.ty, depth + 1);
                }
                ResolvedType::Reference { name, text }
            }
            other => ResolvedType::Other(unit.snippet(other.span())),
        }
    }
}

impl SemanticModel for Program {
    fn compilation_units(&self) -> &[CompilationUnit] {
        &self.units
    }

    fn unit(&self, id: UnitId) -> Option<&CompilationUnit> {
        self.units.get(id)
    }

    fn resolve_declaration(&self, from_unit: UnitId, identifier: &str) -> Option<Declaration> {
        self.resolve_in(from_unit, identifier, 0)
    }

    fn resolve_module(&self, from_unit: UnitId, specifier: &str) -> Option<UnitId> {
        let unit = self.units.get(from_unit)?;
        let key = utils::resolve_import_key(&unit.path, specifier)?;
        self.keys
            .get(&key)
            .or_else(|| self.keys.get(&format!("{key}/index")))
            .copied()
    }

    fn exports_of_module(&self, unit: UnitId) -> Vec<ExportedSymbol> {
        let mut out = Vec::new();
        self.collect_exports(unit, 0, &mut HashSet::new(), &mut out);
        out
    }

    fn resolve_type(&self, from_unit: UnitId, ty: &TsType) -> ResolvedType {
        match self.units.get(from_unit) {
            Some(unit) => self.resolve_type_in(unit, ty, 0),
            None => ResolvedType::Other(String::new()),
        }
    }
}
