//! Semantic model: the query service the metadata engine runs against.
//!
//! The engine only talks to [`SemanticModel`]; [`Program`] is the swc-backed
//! implementation used by the CLI and the tests.

pub mod lower;
pub mod program;
pub mod types;
pub mod unit;

pub use program::Program;
pub use types::ResolvedType;
pub use unit::*;

use swc_ecma_ast::TsType;

use crate::core::docs;

/// Symbol and type queries over the parsed compilation units of one run.
pub trait SemanticModel {
    fn compilation_units(&self) -> &[CompilationUnit];

    fn unit(&self, id: UnitId) -> Option<&CompilationUnit>;

    /// Resolve an identifier visible in `from_unit` to its declaration, following
    /// imports and re-exports. `None` when it cannot be resolved.
    fn resolve_declaration(&self, from_unit: UnitId, identifier: &str) -> Option<Declaration>;

    /// Resolve a relative module specifier written in `from_unit`.
    fn resolve_module(&self, from_unit: UnitId, specifier: &str) -> Option<UnitId>;

    /// Every symbol the module exports, re-exports included.
    fn exports_of_module(&self, unit: UnitId) -> Vec<ExportedSymbol>;

    fn resolve_type(&self, from_unit: UnitId, ty: &TsType) -> ResolvedType;

    fn type_to_string(&self, ty: &ResolvedType) -> String {
        ty.to_string()
    }

    /// Description part of a doc comment (text before the first block tag).
    fn documentation(&self, doc: &DocComment) -> String {
        docs::description(&doc.text)
    }
}
