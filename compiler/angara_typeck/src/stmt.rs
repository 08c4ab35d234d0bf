//! Pass 3 — statement orchestration (§4.5 "Pass 3 — Bodies").
//!
//! `run_pass3` walks the module's top-level statements; function and class
//! bodies recurse through `check_stmt`, which shares the narrowing/loop/
//! return-stack bookkeeping with every nested block regardless of depth.

use crate::checker::Checker;
use angara_diagnostic::ErrorCode;
use angara_ir::ast::{ClassDecl, ClassMember, ExprKind, FunctionDecl, IfCond, Stmt, StmtKind};
use angara_ir::{StmtId, StmtRange};
use angara_symtab::Symbol;
use angara_types::Type;

impl<'a> Checker<'a> {
    pub(crate) fn run_pass3(&mut self, stmts: &[Stmt]) {
        for stmt in stmts {
            self.check_stmt(stmt);
        }
    }

    fn check_stmt(&mut self, stmt: &Stmt) {
        match &stmt.kind {
            StmtKind::ExprStmt(e) => {
                self.check_expr(*e);
            }
            StmtKind::VarDecl { name, type_node, initializer, is_const, exported } => {
                self.check_var_decl(*name, type_node, *initializer, *is_const, *exported, stmt.span);
            }
            StmtKind::Block(range) => self.check_block(*range),
            StmtKind::If { cond, then_branch, else_branch } => {
                self.check_if(cond, *then_branch, *else_branch);
            }
            StmtKind::While { cond, body } => self.check_while(*cond, *body),
            StmtKind::CFor { init, cond, update, body } => self.check_cfor(*init, *cond, *update, *body),
            StmtKind::ForIn { var, iterable, body } => self.check_for_in(*var, *iterable, *body, stmt.span),
            StmtKind::Function(decl) => self.check_function_body(decl),
            StmtKind::Return(value) => self.check_return(*value, stmt.span),
            StmtKind::Break => {
                if self.loop_depth == 0 {
                    self.err(ErrorCode::E2013BreakOutsideLoop, stmt.span, "`break` outside any loop");
                }
            }
            StmtKind::Continue => {
                if self.loop_depth == 0 {
                    self.err(ErrorCode::E2014ContinueOutsideLoop, stmt.span, "`continue` outside any loop");
                }
            }
            StmtKind::Throw(e) => self.check_throw(*e, stmt.span),
            StmtKind::TryCatch { try_block, catch_name, catch_type, catch_block } => {
                self.check_try_catch(*try_block, *catch_name, catch_type, *catch_block);
            }
            // Resolved in the pre-pass; nothing left to check here.
            StmtKind::Attach(_) => {}
            // Headers were filled in Pass 2; only a class carries bodies
            // (method statements) that still need Pass 3 checking.
            StmtKind::Class(decl) => self.check_class_body(decl),
            StmtKind::Trait(_) | StmtKind::Contract(_) | StmtKind::Data(_) | StmtKind::Enum(_) => {}
            StmtKind::ForeignHeader(name) => self.result.foreign_headers.push(*name),
            StmtKind::Error => {}
        }
    }

    fn check_block(&mut self, range: StmtRange) {
        self.symbols.enter_scope();
        let arena = self.arena;
        for s in arena.get_stmt_list(range) {
            self.check_stmt(s);
        }
        self.symbols.exit_scope();
    }

    fn check_stmt_id(&mut self, id: StmtId) {
        let arena = self.arena;
        let stmt = arena.get_stmt(id);
        self.check_stmt(stmt);
    }

    fn check_var_decl(
        &mut self,
        name: angara_ir::Name,
        type_node: &Option<angara_ir::ast::TypeNode>,
        initializer: Option<angara_ir::ExprId>,
        is_const: bool,
        exported: bool,
        span: angara_ir::Span,
    ) {
        let declared = type_node.as_ref().map(|tn| self.resolve_ty(tn, span));
        let init_ty = initializer.map(|e| self.check_expr(e));
        let final_ty = match (&declared, &init_ty, initializer) {
            (Some(d), Some(it), Some(init_id)) => {
                if !it.is_error() && !self.assignable(d, init_id, it) {
                    self.err(
                        ErrorCode::E2001TypeMismatch,
                        span,
                        format!("cannot initialize `{}` of type `{d}` with `{it}`", self.interner.lookup(name)),
                    );
                }
                d.clone()
            }
            (Some(d), None, _) => d.clone(),
            (None, Some(it), _) => it.clone(),
            (None, None, _) => Type::Any,
        };
        if exported && !self.symbols.is_module_scope() {
            self.err(ErrorCode::E4004ExportAtNonModuleScope, span, "`export` is only valid at module scope");
        }
        let depth = self.symbols.depth();
        let symbol = Symbol::new(name, final_ty.clone(), span, is_const, depth);
        if let Some(prior) = self.symbols.declare(symbol) {
            self.diagnostics.push(angara_diagnostic::redeclaration(span, self.interner.lookup(name), prior.declaration_span));
            return;
        }
        if exported && self.symbols.is_module_scope() {
            self.export_if_needed(name, true, final_ty);
        }
    }

    fn check_if(&mut self, cond: &IfCond, then_branch: StmtId, else_branch: Option<StmtId>) {
        let mark = self.narrowing.mark();
        match cond {
            IfCond::Expr(e) => {
                let span = self.arena.get_expr(*e).span;
                self.apply_is_narrowing(*e);
                self.truthy(*e, span);
            }
            IfCond::LetBinding { name, initializer } => {
                let init_span = self.arena.get_expr(*initializer).span;
                let init_ty = self.check_expr(*initializer);
                let bound_ty = if init_ty.is_error() {
                    Type::Error
                } else if init_ty.is_optional() {
                    init_ty.unwrap_optional()
                } else {
                    self.err(
                        ErrorCode::E2001TypeMismatch,
                        init_span,
                        format!("`if let` requires an Optional initializer, found `{}`", init_ty.with_names(self.interner)),
                    )
                };
                self.narrowing.push(*name, bound_ty);
            }
        }
        self.symbols.enter_scope();
        self.check_stmt_id(then_branch);
        self.symbols.exit_scope();
        self.narrowing.truncate(mark);
        if let Some(else_id) = else_branch {
            self.symbols.enter_scope();
            self.check_stmt_id(else_id);
            self.symbols.exit_scope();
        }
    }

    /// `if (x is T)` narrows `x` to `T` for the duration of the `then`
    /// branch; any other condition shape leaves the narrowing stack alone.
    fn apply_is_narrowing(&mut self, cond: angara_ir::ExprId) {
        let arena = self.arena;
        let ExprKind::Is { object, type_node } = &arena.get_expr(cond).kind else { return };
        let ExprKind::Ident(name) = arena.get_expr(*object).kind else { return };
        let span = arena.get_expr(cond).span;
        let narrowed = self.resolve_ty(type_node, span);
        self.narrowing.push(name, narrowed);
    }

    fn check_while(&mut self, cond: angara_ir::ExprId, body: StmtId) {
        let span = self.arena.get_expr(cond).span;
        self.truthy(cond, span);
        self.loop_depth += 1;
        self.symbols.enter_scope();
        self.check_stmt_id(body);
        self.symbols.exit_scope();
        self.loop_depth -= 1;
    }

    fn check_cfor(
        &mut self,
        init: Option<StmtId>,
        cond: Option<angara_ir::ExprId>,
        update: Option<angara_ir::ExprId>,
        body: StmtId,
    ) {
        self.symbols.enter_scope();
        if let Some(init_id) = init {
            self.check_stmt_id(init_id);
        }
        if let Some(cond_id) = cond {
            let span = self.arena.get_expr(cond_id).span;
            self.truthy(cond_id, span);
        }
        if let Some(update_id) = update {
            self.check_expr(update_id);
        }
        self.loop_depth += 1;
        self.check_stmt_id(body);
        self.loop_depth -= 1;
        self.symbols.exit_scope();
    }

    fn check_for_in(&mut self, var: angara_ir::Name, iterable: angara_ir::ExprId, body: StmtId, span: angara_ir::Span) {
        let iterable_ty = self.check_expr(iterable);
        let elem_ty = match &iterable_ty {
            Type::List(elem) => (**elem).clone(),
            other if other.is_error() => Type::Error,
            other => self.err(ErrorCode::E2001TypeMismatch, span, format!("`for..in` requires a list, found `{other}`")),
        };
        self.symbols.enter_scope();
        let depth = self.symbols.depth();
        self.symbols.declare(Symbol::new(var, elem_ty, span, false, depth));
        self.loop_depth += 1;
        self.check_stmt_id(body);
        self.loop_depth -= 1;
        self.symbols.exit_scope();
    }

    fn check_return(&mut self, value: Option<angara_ir::ExprId>, span: angara_ir::Span) {
        let actual = match value {
            Some(id) => self.check_expr(id),
            None => Type::Nil,
        };
        let Some(expected) = self.return_stack.last().cloned() else {
            self.err(ErrorCode::E9001Internal, span, "`return` checked with no enclosing function");
            return;
        };
        if actual.is_error() {
            return;
        }
        let assignable = match value {
            Some(id) => self.assignable(&expected, id, &actual),
            None => matches!(expected, Type::Nil),
        };
        if !assignable {
            self.err(
                ErrorCode::E2010ReturnShapeMismatch,
                span,
                format!("returned `{}`, expected `{}`", actual.with_names(self.interner), expected.with_names(self.interner)),
            );
        }
    }

    fn check_throw(&mut self, expr: angara_ir::ExprId, span: angara_ir::Span) {
        let ty = self.check_expr(expr);
        if ty.is_error() {
            return;
        }
        if !matches!(ty, Type::Exception) {
            self.err(ErrorCode::E2018NotThrowable, span, format!("`throw` requires an Exception, found `{}`", ty.with_names(self.interner)));
        }
    }

    fn check_try_catch(
        &mut self,
        try_block: StmtId,
        catch_name: angara_ir::Name,
        catch_type: &Option<angara_ir::ast::TypeNode>,
        catch_block: StmtId,
    ) {
        self.symbols.enter_scope();
        self.check_stmt_id(try_block);
        self.symbols.exit_scope();

        let catch_span = self.arena.get_stmt(catch_block).span;
        let bound_ty = match catch_type {
            Some(tn) => self.resolve_ty(tn, catch_span),
            None => Type::Exception,
        };
        self.symbols.enter_scope();
        let depth = self.symbols.depth();
        self.symbols.declare(Symbol::new(catch_name, bound_ty, catch_span, false, depth));
        self.check_stmt_id(catch_block);
        self.symbols.exit_scope();
    }

    // ---- Function and class bodies ----

    fn check_function_body(&mut self, decl: &FunctionDecl) {
        if self.symbols.is_module_scope() {
            if let Some(sym) = self.symbols.resolve(decl.name) {
                let ty = sym.ty.clone();
                self.export_if_needed(decl.name, decl.exported, ty);
            }
        }
        let ret_ty = match &decl.return_type {
            Some(tn) => self.resolve_ty(tn, decl.span),
            None => Type::Nil,
        };
        self.symbols.enter_scope();
        self.declare_params(decl.params, decl.span);
        self.return_stack.push(ret_ty);
        if let Some(body) = decl.body {
            self.check_stmt_id(body);
        }
        self.return_stack.pop();
        self.symbols.exit_scope();
    }

    fn declare_params(&mut self, params: angara_ir::ParamRange, fallback_span: angara_ir::Span) {
        let arena = self.arena;
        let depth = self.symbols.depth();
        for param in arena.get_params(params) {
            let ty = self.resolve_ty(&param.type_node, param.span);
            let symbol = Symbol::new(param.name, ty, param.span, false, depth);
            if let Some(prior) = self.symbols.declare(symbol) {
                self.diagnostics.push(angara_diagnostic::redeclaration(
                    param.span,
                    self.interner.lookup(param.name),
                    prior.declaration_span,
                ));
            }
        }
        let _ = fallback_span;
    }

    fn check_class_body(&mut self, decl: &ClassDecl) {
        let Some(class_rc) = self.lookup_class_placeholder(decl.name) else { return };
        self.current_class = Some(Type::Class(class_rc));
        for member in &decl.members {
            if let ClassMember::Method(method) = member {
                self.symbols.enter_scope();
                self.declare_params(method.params, method.span);
                let ret_ty = match &method.return_type {
                    Some(tn) => self.resolve_ty(tn, method.span),
                    None => Type::Nil,
                };
                self.return_stack.push(ret_ty);
                if let Some(body) = method.body {
                    self.check_stmt_id(body);
                }
                self.return_stack.pop();
                self.symbols.exit_scope();
            }
        }
        self.current_class = None;
    }
}
