//! Lowered declaration nodes of one compilation unit.
//!
//! Each parsed module is lowered once into owned, `Arc`-shared nodes so that the
//! build and heritage stages can hold on to declarations across await points without
//! borrowing the swc module. Type annotations and decorator arguments keep their swc
//! nodes; everything else is reduced to the facts the metadata engine consumes.

use std::sync::Arc;

use serde::Serialize;
use swc_common::{BytePos, Span};
use swc_ecma_ast::{Expr, TsType};

/// Index of a compilation unit inside its `Program`.
pub type UnitId = usize;

/// Position of a node in a source file, with the source line for report context.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceLocation {
    pub file_path: String,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub col: usize,
    #[serde(skip)]
    pub source_line: String,
}

impl SourceLocation {
    pub fn new(file_path: impl Into<String>, line: usize, col: usize) -> Self {
        Self {
            file_path: file_path.into(),
            line,
            col,
            source_line: String::new(),
        }
    }

    /// Same file, another position (used for doc tags inside a comment block).
    pub fn moved_to(&self, line: usize, col: usize, source_line: impl Into<String>) -> Self {
        Self {
            file_path: self.file_path.clone(),
            line,
            col,
            source_line: source_line.into(),
        }
    }
}

/// A parsed and lowered source module.
#[derive(Debug)]
pub struct CompilationUnit {
    pub id: UnitId,
    pub path: String,
    pub declarations: Vec<Declaration>,
    pub imports: Vec<ImportInfo>,
    /// Specifier of every import declaration, side-effect imports included.
    pub import_sources: Vec<String>,
    pub exports: Vec<ExportedSymbol>,
    pub re_exports: Vec<ReExport>,
    code: Arc<str>,
    start_pos: BytePos,
}

impl CompilationUnit {
    pub(crate) fn new(id: UnitId, path: String, code: Arc<str>, start_pos: BytePos) -> Self {
        Self {
            id,
            path,
            declarations: Vec::new(),
            imports: Vec::new(),
            import_sources: Vec::new(),
            exports: Vec::new(),
            re_exports: Vec::new(),
            code,
            start_pos,
        }
    }

    /// Source text covered by `span`, or an empty string for spans outside this file.
    pub fn snippet(&self, span: Span) -> String {
        let (Some(lo), Some(hi)) = (
            span.lo.0.checked_sub(self.start_pos.0),
            span.hi.0.checked_sub(self.start_pos.0),
        ) else {
            return String::new();
        };
        self.code
            .get(lo as usize..hi as usize)
            .map(str::to_string)
            .unwrap_or_default()
    }

    /// Top-level declaration with the given local name.
    pub fn declaration(&self, name: &str) -> Option<&Declaration> {
        self.declarations.iter().find(|d| d.name() == name)
    }

    pub fn import(&self, local_name: &str) -> Option<&ImportInfo> {
        self.imports.iter().find(|i| i.local_name == local_name)
    }
}

/// Import statement information for cross-file resolution.
///
/// ```typescript
/// import { Base as B } from "./base";
/// ```
/// yields `local_name = "B"`, `imported_name = "Base"`, `module_path = "./base"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportInfo {
    pub local_name: String,
    /// Original name in the imported module (`"default"` for default imports,
    /// `"*"` for namespace imports).
    pub imported_name: String,
    pub module_path: String,
    pub is_type_only: bool,
}

/// A symbol a module exports from its own scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedSymbol {
    /// Name visible to importers (`"default"` for default exports).
    pub name: String,
    /// Name of the local binding.
    pub local_name: String,
    /// Interfaces, type aliases and `export type { .. }` entries.
    pub is_type_only: bool,
    pub location: SourceLocation,
}

/// `export { a as b } from "./x"` or `export * from "./x"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReExport {
    pub module_path: String,
    /// `(original, exported)` pairs; `None` for `export *`.
    pub names: Option<Vec<(String, String)>>,
    pub is_type_only: bool,
    pub location: SourceLocation,
}

/// A top-level declaration a heritage or identifier lookup can land on.
#[derive(Debug, Clone)]
pub enum Declaration {
    Class(Arc<ClassDeclaration>),
    Interface(Arc<InterfaceDeclaration>),
    TypeAlias(Arc<TypeAliasDeclaration>),
    /// A function or arrow factory whose body declares or returns a class.
    Mixin(Arc<MixinDeclaration>),
    /// Any other value binding (variables, plain functions, enums).
    Value(Arc<ValueDeclaration>),
}

impl Declaration {
    pub fn name(&self) -> &str {
        match self {
            Declaration::Class(c) => &c.name,
            Declaration::Interface(i) => &i.name,
            Declaration::TypeAlias(t) => &t.name,
            Declaration::Mixin(m) => &m.name,
            Declaration::Value(v) => &v.name,
        }
    }

    pub fn unit(&self) -> UnitId {
        match self {
            Declaration::Class(c) => c.unit,
            Declaration::Interface(i) => i.unit,
            Declaration::TypeAlias(t) => t.unit,
            Declaration::Mixin(m) => m.unit,
            Declaration::Value(v) => v.unit,
        }
    }

    pub fn location(&self) -> &SourceLocation {
        match self {
            Declaration::Class(c) => &c.location,
            Declaration::Interface(i) => &i.location,
            Declaration::TypeAlias(t) => &t.location,
            Declaration::Mixin(m) => &m.location,
            Declaration::Value(v) => &v.location,
        }
    }

    pub fn is_type_only(&self) -> bool {
        matches!(self, Declaration::Interface(_) | Declaration::TypeAlias(_))
    }

    pub fn as_class(&self) -> Option<&Arc<ClassDeclaration>> {
        match self {
            Declaration::Class(c) => Some(c),
            _ => None,
        }
    }

    /// Stable identity used for ancestry tracking: `(unit, name, line)`.
    pub fn key(&self) -> (UnitId, String, usize) {
        (self.unit(), self.name().to_string(), self.location().line)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeritageClause {
    Extends,
    Implements,
}

/// How a heritage identifier sits in its clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallRole {
    /// `extends Base`
    Plain,
    /// `extends Mixin(..)`: the identifier is the called factory.
    Callee,
    /// `extends Mixin(Base)`: the identifier is passed to a factory.
    Argument,
}

/// One identifier found in an `extends`/`implements` clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeritageReference {
    pub name: String,
    pub clause: HeritageClause,
    pub role: CallRole,
    pub location: SourceLocation,
}

/// A type annotation with its source text.
#[derive(Debug, Clone)]
pub struct TypeAnnotation {
    pub text: String,
    pub ty: Box<TsType>,
}

#[derive(Debug, Clone)]
pub struct Decorator {
    /// Callee name for `@name(..)`, or the bare identifier for `@name`.
    pub name: String,
    pub args: Vec<Expr>,
    pub is_call: bool,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Property,
    Getter,
    Setter,
    Method,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Protected,
    /// `private` modifier or an ECMAScript `#private` name.
    Private,
}

#[derive(Debug, Clone)]
pub struct Parameter {
    pub name: String,
    pub type_annotation: Option<TypeAnnotation>,
    pub optional: bool,
    pub default_value: Option<String>,
    pub is_rest: bool,
}

/// Literal shape of a property initializer, used when no annotation exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitializerKind {
    String,
    Number,
    Boolean,
    Other,
}

/// A class member or an interface/type-literal signature.
#[derive(Debug, Clone)]
pub struct ClassMember {
    pub name: String,
    pub kind: MemberKind,
    pub visibility: Visibility,
    pub is_static: bool,
    pub decorators: Vec<Decorator>,
    pub doc_comment: Option<DocComment>,
    /// Declared type: property annotation, getter return type, setter parameter type,
    /// or method return type.
    pub type_annotation: Option<TypeAnnotation>,
    pub initializer: Option<String>,
    pub initializer_kind: Option<InitializerKind>,
    pub optional: bool,
    /// Definite assignment (`name!: T`).
    pub definite: bool,
    pub readonly: bool,
    pub params: Vec<Parameter>,
    pub is_async: bool,
    /// Whether a method body contains `return <expr>`.
    pub returns_value: bool,
    pub location: SourceLocation,
}

impl ClassMember {
    pub fn decorator(&self, name: &str) -> Option<&Decorator> {
        self.decorators.iter().find(|d| d.name == name)
    }

    pub fn is_private(&self) -> bool {
        self.visibility != Visibility::Public
    }
}

/// Raw `/** .. */` comment text attached to a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocComment {
    /// Comment body without the `/*` `*/` delimiters.
    pub text: String,
    /// Location of the first line of the comment.
    pub location: SourceLocation,
}

#[derive(Debug)]
pub struct ClassDeclaration {
    pub name: String,
    pub unit: UnitId,
    pub location: SourceLocation,
    pub doc_comment: Option<DocComment>,
    pub decorators: Vec<Decorator>,
    pub members: Vec<ClassMember>,
    pub heritage: Vec<HeritageReference>,
    pub is_exported: bool,
}

impl ClassDeclaration {
    pub fn decorator(&self, name: &str) -> Option<&Decorator> {
        self.decorators.iter().find(|d| d.name == name)
    }
}

#[derive(Debug)]
pub struct InterfaceDeclaration {
    pub name: String,
    pub unit: UnitId,
    pub location: SourceLocation,
    pub doc_comment: Option<DocComment>,
    pub members: Vec<ClassMember>,
    pub heritage: Vec<HeritageReference>,
    pub is_exported: bool,
}

#[derive(Debug)]
pub struct TypeAliasDeclaration {
    pub name: String,
    pub unit: UnitId,
    pub location: SourceLocation,
    pub doc_comment: Option<DocComment>,
    pub ty: TypeAnnotation,
    /// Members when the alias is a type literal (`type X = { a: string }`).
    pub members: Vec<ClassMember>,
    pub is_exported: bool,
}

#[derive(Debug)]
pub struct MixinDeclaration {
    pub name: String,
    pub unit: UnitId,
    pub location: SourceLocation,
    pub doc_comment: Option<DocComment>,
    pub class: Arc<ClassDeclaration>,
    pub is_exported: bool,
}

#[derive(Debug)]
pub struct ValueDeclaration {
    pub name: String,
    pub unit: UnitId,
    pub location: SourceLocation,
    pub is_exported: bool,
}
