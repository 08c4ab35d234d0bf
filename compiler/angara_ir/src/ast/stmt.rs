//! Statement nodes, including the top-level declaration forms (`class`,
//! `trait`, `contract`, `data`, `enum`, `attach`, `foreign-header`) — the
//! source language treats these as statements valid at module scope.

use super::class::ClassDecl;
use super::item::{ContractDecl, DataDecl, EnumDecl, TraitDecl};
use super::ty::TypeNode;
use crate::{ExprId, Name, ParamRange, Span, StmtId, StmtRange};

#[derive(Clone, Debug, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    #[must_use]
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Stmt { kind, span }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum StmtKind {
    ExprStmt(ExprId),

    VarDecl {
        name: Name,
        type_node: Option<TypeNode>,
        initializer: Option<ExprId>,
        is_const: bool,
        exported: bool,
    },

    Block(StmtRange),

    If {
        cond: IfCond,
        then_branch: StmtId,
        else_branch: Option<StmtId>,
    },

    While {
        cond: ExprId,
        body: StmtId,
    },

    /// C-style `for (init; cond; update) body`.
    CFor {
        init: Option<StmtId>,
        cond: Option<ExprId>,
        update: Option<ExprId>,
        body: StmtId,
    },

    ForIn {
        var: Name,
        iterable: ExprId,
        body: StmtId,
    },

    Function(FunctionDecl),

    Return(Option<ExprId>),
    Break,
    Continue,
    Throw(ExprId),

    TryCatch {
        try_block: StmtId,
        catch_name: Name,
        catch_type: Option<TypeNode>,
        catch_block: StmtId,
    },

    Attach(AttachKind),

    Class(ClassDecl),
    Trait(TraitDecl),
    Contract(ContractDecl),
    Data(DataDecl),
    Enum(EnumDecl),

    /// A verbatim `#include`-style header passthrough, e.g.
    /// `foreign-header "stdio.h";`.
    ForeignHeader(Name),

    /// Recovery sentinel, never produced for well-formed input.
    Error,
}

/// The condition of an `if`: either a plain boolean expression, or an
/// `if let name = initializer` binding whose `then`-branch sees `name` bound
/// to the unwrapped `Optional`.
#[derive(Clone, Debug, PartialEq)]
pub enum IfCond {
    Expr(ExprId),
    LetBinding { name: Name, initializer: ExprId },
}

#[derive(Clone, Debug, PartialEq)]
pub struct FunctionDecl {
    pub name: Name,
    pub has_this: bool,
    pub params: ParamRange,
    pub return_type: Option<TypeNode>,
    pub body: Option<StmtId>,
    pub exported: bool,
    pub foreign: bool,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub enum AttachKind {
    /// `attach path [as alias];` — binds the whole module.
    Alias { path: Name, alias: Option<Name> },
    /// `attach a, b, c from path;` — binds individual exports.
    Selective { names: Vec<Name>, source: Name },
}
