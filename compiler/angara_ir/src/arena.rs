//! Arena allocation for the flat AST.
//!
//! All expressions and statements in a module live in contiguous `Vec`s;
//! children are referenced by `ExprId`/`StmtId` rather than by pointer, and
//! lists of them (call arguments, list-literal elements, match arms, record
//! fields, function parameters) are referenced by a compact range into a
//! second flat array. This keeps the AST cache-friendly and gives every
//! checker/backend side table a stable integer key instead of one tied to
//! AST node identity.

use crate::ast::{Expr, FieldInit, MatchArm, Param, Stmt};
use crate::{ArmRange, ExprId, ExprRange, FieldInitRange, ParamRange, StmtId, StmtRange};
use std::fmt;
use std::hash::{Hash, Hasher};

#[derive(Clone, Default)]
pub struct ExprArena {
    exprs: Vec<Expr>,
    expr_lists: Vec<ExprId>,
    stmts: Vec<Stmt>,
    params: Vec<Param>,
    arms: Vec<MatchArm>,
    field_inits: Vec<FieldInit>,
}

impl ExprArena {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(source_len: usize) -> Self {
        let estimated_exprs = source_len / 20;
        ExprArena {
            exprs: Vec::with_capacity(estimated_exprs),
            expr_lists: Vec::with_capacity(estimated_exprs / 2),
            stmts: Vec::with_capacity(estimated_exprs / 4),
            params: Vec::with_capacity(estimated_exprs / 8),
            arms: Vec::with_capacity(estimated_exprs / 16),
            field_inits: Vec::with_capacity(estimated_exprs / 16),
        }
    }

    // ===== Expressions =====

    #[inline]
    pub fn alloc_expr(&mut self, expr: Expr) -> ExprId {
        let id = ExprId::new(self.exprs.len() as u32);
        self.exprs.push(expr);
        id
    }

    #[inline]
    #[track_caller]
    #[must_use]
    pub fn get_expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    #[inline]
    #[must_use]
    pub fn expr_count(&self) -> usize {
        self.exprs.len()
    }

    pub fn alloc_expr_list(&mut self, exprs: impl IntoIterator<Item = ExprId>) -> ExprRange {
        let start = self.expr_lists.len() as u32;
        self.expr_lists.extend(exprs);
        let len = (self.expr_lists.len() as u32 - start) as u16;
        ExprRange::new(start, len)
    }

    #[inline]
    #[must_use]
    pub fn get_expr_list(&self, range: ExprRange) -> &[ExprId] {
        let start = range.start as usize;
        let end = start + range.len as usize;
        &self.expr_lists[start..end]
    }

    // ===== Statements =====

    /// Allocate a single statement, returning its id. Used for the nested
    /// `StmtId` fields on control-flow nodes (`if`'s `then_branch`, loop
    /// bodies, etc.) where the referenced statement is usually itself a
    /// `Block`.
    #[inline]
    pub fn alloc_stmt(&mut self, stmt: Stmt) -> StmtId {
        let id = StmtId::new(self.stmts.len() as u32);
        self.stmts.push(stmt);
        id
    }

    #[inline]
    #[track_caller]
    #[must_use]
    pub fn get_stmt(&self, id: StmtId) -> &Stmt {
        &self.stmts[id.index()]
    }

    /// Allocate a contiguous run of statements (a block body or a module's
    /// top-level statement list), returning a range over them. Relies on the
    /// statements being pushed in one unbroken sequence, exactly like
    /// `alloc_expr_list`/`alloc_params` do for their own backing arrays.
    pub fn alloc_stmt_list(&mut self, stmts: impl IntoIterator<Item = Stmt>) -> StmtRange {
        let start = self.stmts.len() as u32;
        self.stmts.extend(stmts);
        let len = (self.stmts.len() as u32 - start) as u16;
        StmtRange::new(start, len)
    }

    #[inline]
    #[must_use]
    pub fn get_stmt_list(&self, range: StmtRange) -> &[Stmt] {
        let start = range.start as usize;
        let end = start + range.len as usize;
        &self.stmts[start..end]
    }

    // ===== Parameters =====

    pub fn alloc_params(&mut self, params: impl IntoIterator<Item = Param>) -> ParamRange {
        let start = self.params.len() as u32;
        self.params.extend(params);
        let len = (self.params.len() as u32 - start) as u16;
        ParamRange::new(start, len)
    }

    #[inline]
    #[must_use]
    pub fn get_params(&self, range: ParamRange) -> &[Param] {
        let start = range.start as usize;
        let end = start + range.len as usize;
        &self.params[start..end]
    }

    // ===== Match arms =====

    pub fn alloc_arms(&mut self, arms: impl IntoIterator<Item = MatchArm>) -> ArmRange {
        let start = self.arms.len() as u32;
        self.arms.extend(arms);
        let len = (self.arms.len() as u32 - start) as u16;
        ArmRange::new(start, len)
    }

    #[inline]
    #[must_use]
    pub fn get_arms(&self, range: ArmRange) -> &[MatchArm] {
        let start = range.start as usize;
        let end = start + range.len as usize;
        &self.arms[start..end]
    }

    // ===== Record-literal field inits =====

    pub fn alloc_field_inits(&mut self, inits: impl IntoIterator<Item = FieldInit>) -> FieldInitRange {
        let start = self.field_inits.len() as u32;
        self.field_inits.extend(inits);
        let len = (self.field_inits.len() as u32 - start) as u16;
        FieldInitRange::new(start, len)
    }

    #[inline]
    #[must_use]
    pub fn get_field_inits(&self, range: FieldInitRange) -> &[FieldInit] {
        let start = range.start as usize;
        let end = start + range.len as usize;
        &self.field_inits[start..end]
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exprs.is_empty() && self.stmts.is_empty()
    }
}

impl fmt::Debug for ExprArena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ExprArena {{ {} exprs, {} stmts, {} params }}",
            self.exprs.len(),
            self.stmts.len(),
            self.params.len()
        )
    }
}

impl PartialEq for ExprArena {
    fn eq(&self, other: &Self) -> bool {
        self.exprs == other.exprs
            && self.expr_lists == other.expr_lists
            && self.stmts == other.stmts
            && self.params == other.params
            && self.arms == other.arms
            && self.field_inits == other.field_inits
    }
}

impl Eq for ExprArena {}

impl Hash for ExprArena {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.exprs.len().hash(state);
        for expr in &self.exprs {
            expr.kind_discriminant_hash(state);
        }
        self.expr_lists.hash(state);
        self.stmts.len().hash(state);
    }
}

impl Expr {
    /// A cheap, stable hash contribution for `ExprArena`'s `Hash` impl that
    /// avoids requiring `Hash` on every `ExprKind` variant's payload.
    fn kind_discriminant_hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(&self.kind).hash(state);
        self.span.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ExprKind;
    use crate::Span;

    #[test]
    fn test_alloc_expr() {
        let mut arena = ExprArena::new();
        let id1 = arena.alloc_expr(Expr::new(ExprKind::IntLiteral(1), Span::new(0, 1)));
        let id2 = arena.alloc_expr(Expr::new(ExprKind::IntLiteral(2), Span::new(2, 3)));

        assert_eq!(id1.index(), 0);
        assert_eq!(id2.index(), 1);
        assert_eq!(arena.expr_count(), 2);
        assert!(matches!(arena.get_expr(id1).kind, ExprKind::IntLiteral(1)));
    }

    #[test]
    fn test_alloc_expr_list() {
        let mut arena = ExprArena::new();
        let id1 = arena.alloc_expr(Expr::new(ExprKind::IntLiteral(1), Span::new(0, 1)));
        let id2 = arena.alloc_expr(Expr::new(ExprKind::IntLiteral(2), Span::new(2, 3)));

        let range = arena.alloc_expr_list([id1, id2]);
        assert_eq!(range.len(), 2);
        assert_eq!(arena.get_expr_list(range), &[id1, id2]);
    }

    #[test]
    fn test_alloc_stmt_list_roundtrip() {
        use crate::ast::StmtKind;
        let mut arena = ExprArena::new();
        let e = arena.alloc_expr(Expr::new(ExprKind::IntLiteral(1), Span::new(0, 1)));
        let range = arena.alloc_stmt_list([Stmt::new(StmtKind::ExprStmt(e), Span::new(0, 2))]);
        assert_eq!(arena.get_stmt_list(range).len(), 1);
    }
}
