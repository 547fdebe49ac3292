//! Lowering of swc modules into [`CompilationUnit`]s.
//!
//! Collects top-level declarations (classes, interfaces, type aliases, mixin factories
//! and other values), the module's import and export tables, and attaches leading
//! `/** .. */` comments to declarations and members.

use std::collections::HashSet;

use swc_common::{BytePos, Span, Spanned, comments::CommentKind};
use swc_ecma_ast::{
    self as ast, Accessibility, BlockStmt, BlockStmtOrExpr, Callee, DefaultDecl, Expr,
    ExportSpecifier, ImportSpecifier, Lit, MethodKind, ModuleDecl, ModuleExportName, ModuleItem,
    Pat, PropName, Stmt, TsFnParam, TsType, TsTypeAnn, TsTypeElement, UnaryOp,
};
use swc_ecma_visit::{Visit, VisitWith};

use super::unit::{
    CallRole, ClassDeclaration, ClassMember, CompilationUnit, Declaration, Decorator, DocComment,
    ExportedSymbol, HeritageClause, HeritageReference, ImportInfo, InitializerKind,
    InterfaceDeclaration, MemberKind, MixinDeclaration, Parameter, ReExport, SourceLocation,
    TypeAliasDeclaration, TypeAnnotation, UnitId, ValueDeclaration, Visibility,
};
use crate::core::parsers::typescript::ParsedSource;
use std::sync::Arc;

/// Lower one parsed module into a compilation unit.
pub fn lower_module(id: UnitId, path: &str, parsed: &ParsedSource) -> CompilationUnit {
    let mut lowerer = Lowerer {
        parsed,
        lines: LineIndex::new(&parsed.code),
        unit: CompilationUnit::new(id, path.to_string(), parsed.code.clone(), parsed.start_pos),
    };
    for item in &parsed.module.body {
        lowerer.lower_item(item);
    }
    lowerer.finish()
}

struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    fn new(code: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(code.match_indices('\n').map(|(i, _)| i + 1));
        Self { line_starts }
    }

    /// 1-indexed line number and the byte offset where that line starts.
    fn line_of(&self, offset: usize) -> (usize, usize) {
        let line = self.line_starts.partition_point(|&start| start <= offset);
        (line, self.line_starts[line.saturating_sub(1)])
    }
}

struct Lowerer<'a> {
    parsed: &'a ParsedSource,
    lines: LineIndex,
    unit: CompilationUnit,
}

impl Lowerer<'_> {
    fn finish(mut self) -> CompilationUnit {
        // `export { Foo }` entries learn their type-only flag from the local declaration.
        let type_only: HashSet<String> = self
            .unit
            .declarations
            .iter()
            .filter(|d| d.is_type_only())
            .map(|d| d.name().to_string())
            .collect();
        for export in &mut self.unit.exports {
            if type_only.contains(&export.local_name) {
                export.is_type_only = true;
            }
        }
        self.unit
    }

    fn location(&self, pos: BytePos) -> SourceLocation {
        let code: &str = &self.parsed.code;
        let offset = (pos.0.saturating_sub(self.parsed.start_pos.0) as usize).min(code.len());
        let (line, start) = self.lines.line_of(offset);
        let col = code.get(start..offset).map_or(0, |s| s.chars().count()) + 1;
        let source_line = code
            .get(start..)
            .and_then(|rest| rest.lines().next())
            .unwrap_or_default()
            .to_string();
        SourceLocation {
            file_path: self.unit.path.clone(),
            line,
            col,
            source_line,
        }
    }

    fn snippet(&self, span: Span) -> String {
        self.unit.snippet(span)
    }

    /// First `/** .. */` comment leading any of the candidate positions.
    fn doc_comment(&self, positions: &[BytePos]) -> Option<DocComment> {
        let mut positions = positions.to_vec();
        positions.sort();
        positions.dedup();
        positions.into_iter().find_map(|pos| {
            self.parsed
                .comments
                .leading_at(pos)
                .iter()
                .rev()
                .find(|c| c.kind == CommentKind::Block && c.text.starts_with('*'))
                .map(|c| DocComment {
                    text: c.text.strip_prefix('*').unwrap_or(&c.text).to_string(),
                    location: self.location(c.span.lo),
                })
        })
    }

    fn type_annotation(&self, ann: &TsTypeAnn) -> TypeAnnotation {
        self.type_of(&ann.type_ann)
    }

    fn type_of(&self, ty: &TsType) -> TypeAnnotation {
        TypeAnnotation {
            text: self.snippet(ty.span()),
            ty: Box::new(ty.clone()),
        }
    }

    fn push_export(&mut self, name: &str, local_name: &str, is_type_only: bool, pos: BytePos) {
        let location = self.location(pos);
        self.unit.exports.push(ExportedSymbol {
            name: name.to_string(),
            local_name: local_name.to_string(),
            is_type_only,
            location,
        });
    }

    // ============================================================
    // Module items
    // ============================================================

    fn lower_item(&mut self, item: &ModuleItem) {
        match item {
            ModuleItem::ModuleDecl(decl) => self.lower_module_decl(decl),
            ModuleItem::Stmt(Stmt::Decl(decl)) => self.lower_decl(decl, None),
            ModuleItem::Stmt(_) => {}
        }
    }

    fn lower_module_decl(&mut self, decl: &ModuleDecl) {
        match decl {
            ModuleDecl::Import(import) => {
                let module_path = str_value(&import.src);
                if !self.unit.import_sources.contains(&module_path) {
                    self.unit.import_sources.push(module_path.clone());
                }
                for specifier in &import.specifiers {
                    let info = match specifier {
                        ImportSpecifier::Named(named) => ImportInfo {
                            local_name: named.local.sym.to_string(),
                            imported_name: named
                                .imported
                                .as_ref()
                                .map(export_name)
                                .unwrap_or_else(|| named.local.sym.to_string()),
                            module_path: module_path.clone(),
                            is_type_only: import.type_only || named.is_type_only,
                        },
                        ImportSpecifier::Default(default) => ImportInfo {
                            local_name: default.local.sym.to_string(),
                            imported_name: "default".to_string(),
                            module_path: module_path.clone(),
                            is_type_only: import.type_only,
                        },
                        ImportSpecifier::Namespace(ns) => ImportInfo {
                            local_name: ns.local.sym.to_string(),
                            imported_name: "*".to_string(),
                            module_path: module_path.clone(),
                            is_type_only: import.type_only,
                        },
                    };
                    self.unit.imports.push(info);
                }
            }
            ModuleDecl::ExportDecl(export) => self.lower_decl(&export.decl, Some(export.span.lo)),
            ModuleDecl::ExportDefaultDecl(export) => self.lower_default_decl(export),
            ModuleDecl::ExportDefaultExpr(export) => {
                let local = match &*export.expr {
                    Expr::Ident(ident) => ident.sym.to_string(),
                    _ => "default".to_string(),
                };
                self.push_export("default", &local, false, export.span.lo);
            }
            ModuleDecl::ExportNamed(named) => {
                if let Some(src) = &named.src {
                    let names = named
                        .specifiers
                        .iter()
                        .filter_map(|spec| match spec {
                            ExportSpecifier::Named(n) => {
                                let orig = export_name(&n.orig);
                                let exported =
                                    n.exported.as_ref().map(export_name).unwrap_or(orig.clone());
                                Some((orig, exported))
                            }
                            ExportSpecifier::Default(d) => {
                                Some(("default".to_string(), d.exported.sym.to_string()))
                            }
                            ExportSpecifier::Namespace(_) => None,
                        })
                        .collect();
                    let location = self.location(named.span.lo);
                    self.unit.re_exports.push(ReExport {
                        module_path: str_value(src),
                        names: Some(names),
                        is_type_only: named.type_only,
                        location,
                    });
                } else {
                    for spec in &named.specifiers {
                        if let ExportSpecifier::Named(n) = spec {
                            let local = export_name(&n.orig);
                            let exported = n
                                .exported
                                .as_ref()
                                .map(export_name)
                                .unwrap_or(local.clone());
                            self.push_export(
                                &exported,
                                &local,
                                named.type_only || n.is_type_only,
                                named.span.lo,
                            );
                        }
                    }
                }
            }
            ModuleDecl::ExportAll(all) => {
                let location = self.location(all.span.lo);
                self.unit.re_exports.push(ReExport {
                    module_path: str_value(&all.src),
                    names: None,
                    is_type_only: all.type_only,
                    location,
                });
            }
            _ => {}
        }
    }

    fn lower_default_decl(&mut self, export: &ast::ExportDefaultDecl) {
        let export_pos = export.span.lo;
        match &export.decl {
            DefaultDecl::Class(class_expr) => {
                let (name, pos) = match &class_expr.ident {
                    Some(ident) => (ident.sym.to_string(), ident.span.lo),
                    None => ("default".to_string(), class_expr.class.span.lo),
                };
                let class = self.lower_class(
                    &name,
                    &class_expr.class,
                    pos,
                    &[export_pos],
                    true,
                    &HashSet::new(),
                );
                self.unit
                    .declarations
                    .push(Declaration::Class(Arc::new(class)));
                self.push_export("default", &name, false, export_pos);
            }
            DefaultDecl::Fn(fn_expr) => {
                let (name, pos) = match &fn_expr.ident {
                    Some(ident) => (ident.sym.to_string(), ident.span.lo),
                    None => ("default".to_string(), fn_expr.function.span.lo),
                };
                let declaration =
                    self.lower_function(&name, &fn_expr.function, pos, &[export_pos], true);
                self.unit.declarations.push(declaration);
                self.push_export("default", &name, false, export_pos);
            }
            DefaultDecl::TsInterfaceDecl(interface) => {
                let name = interface.id.sym.to_string();
                let declaration = self.lower_interface(interface, &[export_pos], true);
                self.unit
                    .declarations
                    .push(Declaration::Interface(Arc::new(declaration)));
                self.push_export("default", &name, true, export_pos);
            }
        }
    }

    /// Lower a declaration; `export_pos` is set for `export <decl>`.
    fn lower_decl(&mut self, decl: &ast::Decl, export_pos: Option<BytePos>) {
        let exported = export_pos.is_some();
        let extra: Vec<BytePos> = export_pos.into_iter().collect();
        let mut declared: Vec<Declaration> = Vec::new();

        match decl {
            ast::Decl::Class(class_decl) => {
                let class = self.lower_class(
                    &class_decl.ident.sym,
                    &class_decl.class,
                    class_decl.ident.span.lo,
                    &extra,
                    exported,
                    &HashSet::new(),
                );
                declared.push(Declaration::Class(Arc::new(class)));
            }
            ast::Decl::Fn(fn_decl) => {
                declared.push(self.lower_function(
                    &fn_decl.ident.sym,
                    &fn_decl.function,
                    fn_decl.ident.span.lo,
                    &extra,
                    exported,
                ));
            }
            ast::Decl::Var(var) => {
                let mut positions = extra.clone();
                positions.push(var.span.lo);
                for declarator in &var.decls {
                    let Pat::Ident(binding) = &declarator.name else {
                        continue;
                    };
                    let name = binding.id.sym.to_string();
                    let pos = binding.id.span.lo;
                    let declaration = match declarator.init.as_deref().map(unwrap_parens) {
                        Some(Expr::Class(class_expr)) => {
                            let class = self.lower_class(
                                &name,
                                &class_expr.class,
                                pos,
                                &positions,
                                exported,
                                &HashSet::new(),
                            );
                            Declaration::Class(Arc::new(class))
                        }
                        Some(Expr::Arrow(arrow)) => {
                            let params = arrow.params.iter().filter_map(pat_name).collect();
                            self.mixin_or_value(
                                &name,
                                arrow_class(arrow),
                                params,
                                pos,
                                &positions,
                                exported,
                            )
                        }
                        Some(Expr::Fn(fn_expr)) => {
                            self.lower_function(&name, &fn_expr.function, pos, &positions, exported)
                        }
                        _ => self.value(&name, pos, exported),
                    };
                    declared.push(declaration);
                }
            }
            ast::Decl::TsInterface(interface) => {
                let declaration = self.lower_interface(interface, &extra, exported);
                declared.push(Declaration::Interface(Arc::new(declaration)));
            }
            ast::Decl::TsTypeAlias(alias) => {
                let mut positions = extra.clone();
                positions.push(alias.span.lo);
                let members = match &*alias.type_ann {
                    TsType::TsTypeLit(lit) => lit
                        .members
                        .iter()
                        .filter_map(|el| self.lower_type_element(el))
                        .collect(),
                    _ => Vec::new(),
                };
                declared.push(Declaration::TypeAlias(Arc::new(TypeAliasDeclaration {
                    name: alias.id.sym.to_string(),
                    unit: self.unit.id,
                    location: self.location(alias.id.span.lo),
                    doc_comment: self.doc_comment(&positions),
                    ty: self.type_of(&alias.type_ann),
                    members,
                    is_exported: exported,
                })));
            }
            ast::Decl::TsEnum(enum_decl) => {
                declared.push(self.value(&enum_decl.id.sym, enum_decl.id.span.lo, exported));
            }
            _ => {}
        }

        if let Some(pos) = export_pos {
            for declaration in &declared {
                let name = declaration.name().to_string();
                self.push_export(&name, &name, declaration.is_type_only(), pos);
            }
        }
        self.unit.declarations.extend(declared);
    }

    fn value(&self, name: &str, pos: BytePos, exported: bool) -> Declaration {
        Declaration::Value(Arc::new(ValueDeclaration {
            name: name.to_string(),
            unit: self.unit.id,
            location: self.location(pos),
            is_exported: exported,
        }))
    }

    fn lower_function(
        &self,
        name: &str,
        function: &ast::Function,
        pos: BytePos,
        extra: &[BytePos],
        exported: bool,
    ) -> Declaration {
        let params = function
            .params
            .iter()
            .filter_map(|p| pat_name(&p.pat))
            .collect();
        let class = function.body.as_ref().and_then(block_class);
        self.mixin_or_value(name, class, params, pos, extra, exported)
    }

    fn mixin_or_value(
        &self,
        name: &str,
        class: Option<(&ast::Class, Option<&ast::Ident>)>,
        params: HashSet<String>,
        pos: BytePos,
        extra: &[BytePos],
        exported: bool,
    ) -> Declaration {
        let Some((class, ident)) = class else {
            return self.value(name, pos, exported);
        };
        let class_name = ident
            .map(|i| i.sym.to_string())
            .unwrap_or_else(|| name.to_string());
        let class_pos = ident.map(|i| i.span.lo).unwrap_or(class.span.lo);
        let class_decl = self.lower_class(&class_name, class, class_pos, &[], false, &params);
        let mut positions = extra.to_vec();
        positions.push(pos);
        Declaration::Mixin(Arc::new(MixinDeclaration {
            name: name.to_string(),
            unit: self.unit.id,
            location: self.location(pos),
            doc_comment: self.doc_comment(&positions),
            class: Arc::new(class_decl),
            is_exported: exported,
        }))
    }

    // ============================================================
    // Classes
    // ============================================================

    fn lower_class(
        &self,
        name: &str,
        class: &ast::Class,
        pos: BytePos,
        extra: &[BytePos],
        exported: bool,
        mixin_params: &HashSet<String>,
    ) -> ClassDeclaration {
        let mut positions = extra.to_vec();
        positions.push(class.span.lo);
        positions.extend(class.decorators.iter().map(|d| d.span.lo));

        let mut heritage = Vec::new();
        if let Some(super_class) = &class.super_class {
            self.collect_heritage(
                super_class,
                CallRole::Plain,
                HeritageClause::Extends,
                &mut heritage,
            );
        }
        for implemented in &class.implements {
            self.collect_heritage(
                &implemented.expr,
                CallRole::Plain,
                HeritageClause::Implements,
                &mut heritage,
            );
        }
        heritage.retain(|r: &HeritageReference| !mixin_params.contains(&r.name));

        ClassDeclaration {
            name: name.to_string(),
            unit: self.unit.id,
            location: self.location(pos),
            doc_comment: self.doc_comment(&positions),
            decorators: class
                .decorators
                .iter()
                .filter_map(|d| self.lower_decorator(d))
                .collect(),
            members: class
                .body
                .iter()
                .filter_map(|m| self.lower_class_member(m))
                .collect(),
            heritage,
            is_exported: exported,
        }
    }

    /// Record every identifier of a heritage clause with its call role.
    fn collect_heritage(
        &self,
        expr: &Expr,
        role: CallRole,
        clause: HeritageClause,
        out: &mut Vec<HeritageReference>,
    ) {
        match expr {
            Expr::Ident(ident) => out.push(HeritageReference {
                name: ident.sym.to_string(),
                clause,
                role,
                location: self.location(ident.span.lo),
            }),
            Expr::Call(call) => {
                if let Callee::Expr(callee) = &call.callee {
                    self.collect_heritage(callee, CallRole::Callee, clause, out);
                }
                for arg in &call.args {
                    self.collect_heritage(&arg.expr, CallRole::Argument, clause, out);
                }
            }
            Expr::Paren(paren) => self.collect_heritage(&paren.expr, role, clause, out),
            Expr::TsAs(as_expr) => self.collect_heritage(&as_expr.expr, role, clause, out),
            Expr::TsNonNull(non_null) => self.collect_heritage(&non_null.expr, role, clause, out),
            _ => {}
        }
    }

    fn lower_decorator(&self, decorator: &ast::Decorator) -> Option<Decorator> {
        let location = self.location(decorator.span.lo);
        match &*decorator.expr {
            Expr::Call(call) => {
                let Callee::Expr(callee) = &call.callee else {
                    return None;
                };
                let Expr::Ident(ident) = &**callee else {
                    return None;
                };
                Some(Decorator {
                    name: ident.sym.to_string(),
                    args: call.args.iter().map(|a| (*a.expr).clone()).collect(),
                    is_call: true,
                    location,
                })
            }
            Expr::Ident(ident) => Some(Decorator {
                name: ident.sym.to_string(),
                args: Vec::new(),
                is_call: false,
                location,
            }),
            _ => None,
        }
    }

    fn lower_class_member(&self, member: &ast::ClassMember) -> Option<ClassMember> {
        match member {
            ast::ClassMember::ClassProp(prop) => {
                let name = prop_name(&prop.key)?;
                let mut out = self.property(
                    name,
                    prop.key.span().lo,
                    prop.span.lo,
                    &prop.decorators,
                    prop.type_ann.as_deref(),
                    prop.value.as_deref(),
                );
                out.visibility = visibility(prop.accessibility);
                out.is_static = prop.is_static;
                out.optional = prop.is_optional;
                out.definite = prop.definite;
                out.readonly = prop.readonly;
                Some(out)
            }
            ast::ClassMember::PrivateProp(prop) => {
                let mut out = self.property(
                    format!("#{}", prop.key.name),
                    prop.key.span.lo,
                    prop.span.lo,
                    &prop.decorators,
                    prop.type_ann.as_deref(),
                    prop.value.as_deref(),
                );
                out.visibility = Visibility::Private;
                out.is_static = prop.is_static;
                out.optional = prop.is_optional;
                out.definite = prop.definite;
                out.readonly = prop.readonly;
                Some(out)
            }
            ast::ClassMember::Method(method) => {
                let name = prop_name(&method.key)?;
                let mut out = self.method(
                    name,
                    method.kind,
                    method.key.span().lo,
                    method.span.lo,
                    &method.function,
                );
                out.visibility = visibility(method.accessibility);
                out.is_static = method.is_static;
                out.optional = method.is_optional;
                Some(out)
            }
            ast::ClassMember::PrivateMethod(method) => {
                let name = format!("#{}", method.key.name);
                let mut out = self.method(
                    name,
                    method.kind,
                    method.key.span.lo,
                    method.span.lo,
                    &method.function,
                );
                out.visibility = Visibility::Private;
                out.is_static = method.is_static;
                out.optional = method.is_optional;
                Some(out)
            }
            _ => None,
        }
    }

    fn property(
        &self,
        name: String,
        key_pos: BytePos,
        member_pos: BytePos,
        decorators: &[ast::Decorator],
        type_ann: Option<&TsTypeAnn>,
        value: Option<&Expr>,
    ) -> ClassMember {
        let mut positions = vec![member_pos, key_pos];
        positions.extend(decorators.iter().map(|d| d.span.lo));
        let mut out = new_member(name, MemberKind::Property, self.location(key_pos));
        out.decorators = decorators
            .iter()
            .filter_map(|d| self.lower_decorator(d))
            .collect();
        out.doc_comment = self.doc_comment(&positions);
        out.type_annotation = type_ann.map(|t| self.type_annotation(t));
        out.initializer = value.map(|v| self.snippet(v.span()));
        out.initializer_kind = value.map(initializer_kind);
        out
    }

    fn method(
        &self,
        name: String,
        kind: MethodKind,
        key_pos: BytePos,
        member_pos: BytePos,
        function: &ast::Function,
    ) -> ClassMember {
        let kind = match kind {
            MethodKind::Method => MemberKind::Method,
            MethodKind::Getter => MemberKind::Getter,
            MethodKind::Setter => MemberKind::Setter,
        };
        let mut positions = vec![member_pos, key_pos];
        positions.extend(function.decorators.iter().map(|d| d.span.lo));

        let params: Vec<Parameter> = function
            .params
            .iter()
            .map(|p| self.lower_param(&p.pat))
            .collect();
        let mut out = new_member(name, kind, self.location(key_pos));
        out.decorators = function
            .decorators
            .iter()
            .filter_map(|d| self.lower_decorator(d))
            .collect();
        out.doc_comment = self.doc_comment(&positions);
        let return_type = function.return_type.as_deref();
        out.type_annotation = match kind {
            MemberKind::Setter => params.first().and_then(|p| p.type_annotation.clone()),
            _ => return_type.map(|t| self.type_annotation(t)),
        };
        out.is_async = function.is_async;
        out.returns_value = function.body.as_ref().is_some_and(returns_value);
        out.params = params;
        out
    }

    fn lower_param(&self, pat: &Pat) -> Parameter {
        match pat {
            Pat::Ident(binding) => Parameter {
                name: binding.id.sym.to_string(),
                type_annotation: binding.type_ann.as_deref().map(|t| self.type_annotation(t)),
                optional: binding.id.optional,
                default_value: None,
                is_rest: false,
            },
            Pat::Assign(assign) => {
                let mut param = self.lower_param(&assign.left);
                param.optional = true;
                param.default_value = Some(self.snippet(assign.right.span()));
                param
            }
            Pat::Rest(rest) => {
                let mut param = self.lower_param(&rest.arg);
                param.is_rest = true;
                if param.type_annotation.is_none() {
                    param.type_annotation =
                        rest.type_ann.as_deref().map(|t| self.type_annotation(t));
                }
                param
            }
            Pat::Object(object) => {
                let text = self.snippet(object.span);
                Parameter {
                    name: destructured_name(&text, '}'),
                    type_annotation: object.type_ann.as_deref().map(|t| self.type_annotation(t)),
                    optional: object.optional,
                    default_value: None,
                    is_rest: false,
                }
            }
            Pat::Array(array) => {
                let text = self.snippet(array.span);
                Parameter {
                    name: destructured_name(&text, ']'),
                    type_annotation: array.type_ann.as_deref().map(|t| self.type_annotation(t)),
                    optional: array.optional,
                    default_value: None,
                    is_rest: false,
                }
            }
            other => Parameter {
                name: self.snippet(other.span()),
                type_annotation: None,
                optional: false,
                default_value: None,
                is_rest: false,
            },
        }
    }

    // ============================================================
    // Interfaces and type literals
    // ============================================================

    fn lower_interface(
        &self,
        interface: &ast::TsInterfaceDecl,
        extra: &[BytePos],
        exported: bool,
    ) -> InterfaceDeclaration {
        let mut positions = extra.to_vec();
        positions.push(interface.span.lo);
        let mut heritage = Vec::new();
        for parent in &interface.extends {
            self.collect_heritage(
                &parent.expr,
                CallRole::Plain,
                HeritageClause::Extends,
                &mut heritage,
            );
        }
        InterfaceDeclaration {
            name: interface.id.sym.to_string(),
            unit: self.unit.id,
            location: self.location(interface.id.span.lo),
            doc_comment: self.doc_comment(&positions),
            members: interface
                .body
                .body
                .iter()
                .filter_map(|el| self.lower_type_element(el))
                .collect(),
            heritage,
            is_exported: exported,
        }
    }

    fn lower_type_element(&self, element: &TsTypeElement) -> Option<ClassMember> {
        match element {
            TsTypeElement::TsPropertySignature(sig) => {
                let name = key_name(&sig.key)?;
                let location = self.location(sig.key.span().lo);
                let mut out = new_member(name, MemberKind::Property, location);
                out.doc_comment = self.doc_comment(&[sig.span.lo]);
                out.type_annotation = sig.type_ann.as_deref().map(|t| self.type_annotation(t));
                out.optional = sig.optional;
                out.readonly = sig.readonly;
                Some(out)
            }
            TsTypeElement::TsMethodSignature(sig) => {
                let name = key_name(&sig.key)?;
                let location = self.location(sig.key.span().lo);
                let mut out = new_member(name, MemberKind::Method, location);
                out.doc_comment = self.doc_comment(&[sig.span.lo]);
                out.type_annotation = sig.type_ann.as_deref().map(|t| self.type_annotation(t));
                out.optional = sig.optional;
                out.params = sig.params.iter().map(|p| self.lower_fn_param(p)).collect();
                Some(out)
            }
            TsTypeElement::TsGetterSignature(sig) => {
                let name = key_name(&sig.key)?;
                let location = self.location(sig.key.span().lo);
                let mut out = new_member(name, MemberKind::Getter, location);
                out.doc_comment = self.doc_comment(&[sig.span.lo]);
                out.type_annotation = sig.type_ann.as_deref().map(|t| self.type_annotation(t));
                Some(out)
            }
            TsTypeElement::TsSetterSignature(sig) => {
                let name = key_name(&sig.key)?;
                let param = self.lower_fn_param(&sig.param);
                let location = self.location(sig.key.span().lo);
                let mut out = new_member(name, MemberKind::Setter, location);
                out.doc_comment = self.doc_comment(&[sig.span.lo]);
                out.type_annotation = param.type_annotation.clone();
                out.params = vec![param];
                Some(out)
            }
            _ => None,
        }
    }

    fn lower_fn_param(&self, param: &TsFnParam) -> Parameter {
        match param {
            TsFnParam::Ident(binding) => self.lower_param(&Pat::Ident(binding.clone())),
            TsFnParam::Rest(rest) => self.lower_param(&Pat::Rest(rest.clone())),
            TsFnParam::Object(object) => self.lower_param(&Pat::Object(object.clone())),
            TsFnParam::Array(array) => self.lower_param(&Pat::Array(array.clone())),
        }
    }
}

fn new_member(name: String, kind: MemberKind, location: SourceLocation) -> ClassMember {
    ClassMember {
        name,
        kind,
        visibility: Visibility::Public,
        is_static: false,
        decorators: Vec::new(),
        doc_comment: None,
        type_annotation: None,
        initializer: None,
        initializer_kind: None,
        optional: false,
        definite: false,
        readonly: false,
        params: Vec::new(),
        is_async: false,
        returns_value: false,
        location,
    }
}

fn visibility(accessibility: Option<Accessibility>) -> Visibility {
    match accessibility {
        Some(Accessibility::Private) => Visibility::Private,
        Some(Accessibility::Protected) => Visibility::Protected,
        _ => Visibility::Public,
    }
}

fn str_value(s: &ast::Str) -> String {
    s.value.as_str().unwrap_or_default().to_string()
}

fn export_name(name: &ModuleExportName) -> String {
    match name {
        ModuleExportName::Ident(ident) => ident.sym.to_string(),
        ModuleExportName::Str(s) => str_value(s),
    }
}

fn prop_name(key: &PropName) -> Option<String> {
    match key {
        PropName::Ident(ident) => Some(ident.sym.to_string()),
        PropName::Str(s) => s.value.as_str().map(str::to_string),
        PropName::Num(n) => Some(n.value.to_string()),
        _ => None,
    }
}

fn key_name(key: &Expr) -> Option<String> {
    match key {
        Expr::Ident(ident) => Some(ident.sym.to_string()),
        Expr::Lit(Lit::Str(s)) => s.value.as_str().map(str::to_string),
        _ => None,
    }
}

fn pat_name(pat: &Pat) -> Option<String> {
    match pat {
        Pat::Ident(binding) => Some(binding.id.sym.to_string()),
        Pat::Assign(assign) => pat_name(&assign.left),
        _ => None,
    }
}

/// Text of a destructuring pattern without its trailing type annotation.
fn destructured_name(text: &str, close: char) -> String {
    text.rfind(close)
        .map(|end| text[..=end].to_string())
        .unwrap_or_else(|| text.to_string())
}

fn unwrap_parens(expr: &Expr) -> &Expr {
    match expr {
        Expr::Paren(paren) => unwrap_parens(&paren.expr),
        other => other,
    }
}

fn initializer_kind(expr: &Expr) -> InitializerKind {
    match unwrap_parens(expr) {
        Expr::Lit(Lit::Str(_)) | Expr::Tpl(_) => InitializerKind::String,
        Expr::Lit(Lit::Num(_)) => InitializerKind::Number,
        Expr::Unary(unary)
            if unary.op == UnaryOp::Minus && matches!(&*unary.arg, Expr::Lit(Lit::Num(_))) =>
        {
            InitializerKind::Number
        }
        Expr::Lit(Lit::Bool(_)) => InitializerKind::Boolean,
        _ => InitializerKind::Other,
    }
}

/// Class declared in, or returned from, a mixin factory body.
fn block_class(block: &BlockStmt) -> Option<(&ast::Class, Option<&ast::Ident>)> {
    block.stmts.iter().find_map(|stmt| match stmt {
        Stmt::Decl(ast::Decl::Class(class_decl)) => {
            Some((&*class_decl.class, Some(&class_decl.ident)))
        }
        Stmt::Return(ret) => match ret.arg.as_deref().map(unwrap_parens) {
            Some(Expr::Class(class_expr)) => Some((&*class_expr.class, class_expr.ident.as_ref())),
            _ => None,
        },
        _ => None,
    })
}

fn arrow_class(arrow: &ast::ArrowExpr) -> Option<(&ast::Class, Option<&ast::Ident>)> {
    match &*arrow.body {
        BlockStmtOrExpr::BlockStmt(block) => block_class(block),
        BlockStmtOrExpr::Expr(expr) => match unwrap_parens(expr) {
            Expr::Class(class_expr) => Some((&*class_expr.class, class_expr.ident.as_ref())),
            _ => None,
        },
    }
}

#[derive(Default)]
struct ReturnFinder {
    found: bool,
}

impl Visit for ReturnFinder {
    fn visit_return_stmt(&mut self, node: &ast::ReturnStmt) {
        if node.arg.is_some() {
            self.found = true;
        }
    }

    // Nested function bodies have their own returns.
    fn visit_function(&mut self, _: &ast::Function) {}
    fn visit_arrow_expr(&mut self, _: &ast::ArrowExpr) {}
    fn visit_class(&mut self, _: &ast::Class) {}
}

fn returns_value(body: &BlockStmt) -> bool {
    let mut finder = ReturnFinder::default();
    body.visit_with(&mut finder);
    finder.found
}
