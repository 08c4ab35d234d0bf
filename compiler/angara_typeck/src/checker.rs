//! Checker state and the pre-pass/Pass 1/Pass 2 orchestration (§4.5).
//!
//! Pass 3 (body-checking) lives in `stmt.rs`/`expr.rs`; both are `impl`
//! blocks on the same `Checker` defined here.

use crate::narrowing::NarrowingStack;
use crate::resolve_type::resolve_type_node;
use crate::resolver::{ModuleResolver, ResolveError};
use crate::side_tables::CheckResult;
use angara_diagnostic::{Diagnostic, DiagnosticConfig, DiagnosticQueue, ErrorCode};
use angara_ir::ast::{AttachKind, Stmt, StmtKind};
use angara_ir::{ExprArena, Name, SharedInterner, Span, StmtRange};
use angara_symtab::{Symbol, SymbolTable};
use angara_types::{Type, TypeRegistry};
use std::rc::Rc;

pub struct Checker<'a> {
    pub(crate) arena: &'a ExprArena,
    pub(crate) interner: &'a SharedInterner,
    pub(crate) registry: TypeRegistry,
    pub(crate) symbols: SymbolTable,
    pub(crate) narrowing: NarrowingStack,
    pub(crate) diagnostics: DiagnosticQueue,
    pub(crate) result: CheckResult,
    pub(crate) module_type: Type,
    pub(crate) resolver: &'a mut dyn ModuleResolver,
    /// Expected return type of the function/method body currently being
    /// checked; a stack because local function declarations nest.
    pub(crate) return_stack: Vec<Type>,
    pub(crate) loop_depth: u32,
    /// The enclosing class while checking a method body, as its plain
    /// `Class` type (not `Instance`) so private-member checks can compare
    /// by `Rc` identity.
    pub(crate) current_class: Option<Type>,
}

pub struct CheckOutcome {
    pub module_type: Type,
    pub result: CheckResult,
    pub diagnostics: DiagnosticQueue,
    pub had_error: bool,
}

#[allow(clippy::too_many_arguments)]
pub fn check_module(
    module_name: Name,
    arena: &ExprArena,
    interner: &SharedInterner,
    top_level: StmtRange,
    is_native: bool,
    resolver: &mut dyn ModuleResolver,
    config: DiagnosticConfig,
) -> CheckOutcome {
    let module_type = TypeRegistry::new().new_module(module_name, is_native);
    let mut checker = Checker {
        arena,
        interner,
        registry: TypeRegistry::new(),
        symbols: SymbolTable::new(),
        narrowing: NarrowingStack::new(),
        diagnostics: DiagnosticQueue::new(config),
        result: CheckResult::new(),
        module_type,
        resolver,
        return_stack: Vec::new(),
        loop_depth: 0,
        current_class: None,
    };
    checker.run(top_level);
    for symbol in checker.symbols.module_scope() {
        checker.result.declared_types.insert(symbol.name, symbol.ty.clone());
    }
    let had_error = checker.diagnostics.had_error();
    CheckOutcome {
        module_type: checker.module_type,
        result: checker.result,
        diagnostics: checker.diagnostics,
        had_error,
    }
}

impl<'a> Checker<'a> {
    fn run(&mut self, top_level: StmtRange) {
        let stmts = self.arena.get_stmt_list(top_level);
        let base = top_level.start;

        self.run_prepass(stmts, base);
        if self.diagnostics.had_error() {
            return;
        }
        self.run_pass1(stmts);
        if self.diagnostics.had_error() {
            return;
        }
        self.run_pass2(stmts);
        if self.diagnostics.had_error() {
            return;
        }
        self.run_pass3(stmts);
    }

    fn stmt_id(base: u32, offset: usize) -> angara_ir::StmtId {
        angara_ir::StmtId::new(base + offset as u32)
    }

    // ---- Pre-pass: attachments ----

    fn run_prepass(&mut self, stmts: &[Stmt], base: u32) {
        for (offset, stmt) in stmts.iter().enumerate() {
            let StmtKind::Attach(kind) = &stmt.kind else { continue };
            let id = Self::stmt_id(base, offset);
            match kind {
                AttachKind::Alias { path, alias } => {
                    let path_text = self.interner.lookup(*path).to_string();
                    match self.resolver.resolve(&path_text, stmt.span) {
                        Ok(module_ty) => {
                            self.result.attach_resolutions.insert(id, module_ty.clone());
                            let bound_name = alias.unwrap_or(*path);
                            let symbol = Symbol::new(bound_name, module_ty, stmt.span, true, 0);
                            if let Some(prior) = self.symbols.declare(symbol) {
                                self.diagnostics.push(angara_diagnostic::redeclaration(
                                    stmt.span,
                                    self.interner.lookup(bound_name),
                                    prior.declaration_span,
                                ));
                            }
                        }
                        Err(ResolveError::NotFound) => {
                            self.diagnostics.push(
                                Diagnostic::error(ErrorCode::E4001ModuleNotFound)
                                    .with_message(format!("no module found for `{path_text}`"))
                                    .with_label(stmt.span, "attached here"),
                            );
                        }
                        Err(ResolveError::Circular) => {
                            self.diagnostics.push(
                                Diagnostic::error(ErrorCode::E4002CircularImport)
                                    .with_message(format!("`{path_text}` is already being resolved"))
                                    .with_label(stmt.span, "circular attach"),
                            );
                        }
                    }
                }
                AttachKind::Selective { names, source } => {
                    let source_text = self.interner.lookup(*source).to_string();
                    match self.resolver.resolve(&source_text, stmt.span) {
                        Ok(module_ty) => {
                            self.result.attach_resolutions.insert(id, module_ty.clone());
                            let Type::Module(module_rc) = &module_ty else {
                                continue;
                            };
                            for name in names {
                                let exported = module_rc.borrow().exports.get(name).cloned();
                                match exported {
                                    Some(export_ty) => {
                                        let symbol = Symbol::new(*name, export_ty, stmt.span, false, 0)
                                            .with_origin_module(*source);
                                        if let Some(prior) = self.symbols.declare(symbol) {
                                            self.diagnostics.push(angara_diagnostic::redeclaration(
                                                stmt.span,
                                                self.interner.lookup(*name),
                                                prior.declaration_span,
                                            ));
                                        }
                                    }
                                    None => {
                                        self.diagnostics.push(
                                            Diagnostic::error(ErrorCode::E4003UnknownSelectiveAttach)
                                                .with_message(format!(
                                                    "module `{source_text}` does not export `{}`",
                                                    self.interner.lookup(*name)
                                                ))
                                                .with_label(stmt.span, "unknown export"),
                                        );
                                    }
                                }
                            }
                        }
                        Err(ResolveError::NotFound) => {
                            self.diagnostics.push(
                                Diagnostic::error(ErrorCode::E4001ModuleNotFound)
                                    .with_message(format!("no module found for `{source_text}`"))
                                    .with_label(stmt.span, "attached here"),
                            );
                        }
                        Err(ResolveError::Circular) => {
                            self.diagnostics.push(
                                Diagnostic::error(ErrorCode::E4002CircularImport)
                                    .with_message(format!("`{source_text}` is already being resolved"))
                                    .with_label(stmt.span, "circular attach"),
                            );
                        }
                    }
                }
            }
        }
    }

    // ---- Pass 1: name declarations ----

    fn run_pass1(&mut self, stmts: &[Stmt]) {
        for stmt in stmts {
            let (name, placeholder) = match &stmt.kind {
                StmtKind::Class(decl) => (decl.name, self.registry.new_class_placeholder(decl.name)),
                StmtKind::Trait(decl) => (decl.name, self.registry.new_trait_placeholder(decl.name)),
                StmtKind::Contract(decl) => (decl.name, self.registry.new_contract_placeholder(decl.name)),
                StmtKind::Data(decl) => (decl.name, self.registry.new_data_placeholder(decl.name)),
                StmtKind::Enum(decl) => (decl.name, self.registry.new_enum_placeholder(decl.name)),
                _ => continue,
            };
            let symbol = Symbol::new(name, placeholder, stmt.span, true, 0);
            if let Some(prior) = self.symbols.declare(symbol) {
                self.diagnostics.push(angara_diagnostic::redeclaration(
                    stmt.span,
                    self.interner.lookup(name),
                    prior.declaration_span,
                ));
            }
        }
    }

    // ---- Pass 2: headers, in sub-order ----

    fn run_pass2(&mut self, stmts: &[Stmt]) {
        for stmt in stmts {
            if let StmtKind::Enum(decl) = &stmt.kind {
                self.pass2_enum(decl, stmt.span);
            }
        }
        for stmt in stmts {
            if let StmtKind::Data(decl) = &stmt.kind {
                self.pass2_data(decl, stmt.span);
            }
        }
        for stmt in stmts {
            if let StmtKind::Contract(decl) = &stmt.kind {
                self.pass2_contract(decl, stmt.span);
            }
        }
        for stmt in stmts {
            if let StmtKind::Trait(decl) = &stmt.kind {
                self.pass2_trait(decl, stmt.span);
            }
        }
        // Classes: link superclasses + fields/methods first, then validate
        // cycles and signed contracts/traits once every class's own header
        // is filled, so order of appearance in the file doesn't matter.
        let class_decls: Vec<_> =
            stmts.iter().filter_map(|s| if let StmtKind::Class(d) = &s.kind { Some((d, s.span)) } else { None }).collect();
        for (decl, span) in &class_decls {
            self.pass2_class_fill(decl, *span);
        }
        for (decl, span) in &class_decls {
            self.pass2_class_check_cycle(decl, *span);
        }
        for (decl, span) in &class_decls {
            self.pass2_class_validate(decl, *span);
        }
        for stmt in stmts {
            if let StmtKind::Function(decl) = &stmt.kind {
                self.pass2_function(decl, stmt.span);
            }
        }
    }

    pub(crate) fn resolve_ty(&mut self, node: &angara_ir::ast::TypeNode, span: Span) -> Type {
        resolve_type_node(node, &self.symbols, self.interner, &mut self.diagnostics, span)
    }

    pub(crate) fn lookup_class_placeholder(&self, name: Name) -> Option<Rc<std::cell::RefCell<angara_types::ClassType>>> {
        match self.symbols.resolve(name).map(|s| s.ty.clone()) {
            Some(Type::Class(rc)) => Some(rc),
            _ => None,
        }
    }

    pub(crate) fn export_if_needed(&mut self, name: Name, exported: bool, ty: Type) {
        let is_main = self.interner.lookup(name) == "main";
        if !exported && !is_main {
            return;
        }
        let Type::Module(module_rc) = &self.module_type else { return };
        module_rc.borrow_mut().exports.insert(name, ty);
    }
}
