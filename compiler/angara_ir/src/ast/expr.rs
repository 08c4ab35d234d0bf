//! Expression nodes.

use super::operators::{AssignOp, BinaryOp, LogicalOp, UnaryOp, UpdateOp};
use super::ty::TypeNode;
use crate::{ArmRange, ExprId, ExprRange, FieldInitRange, Name, Span};

/// One expression, arena-allocated. `id` is assigned by the arena at
/// allocation time and is the stable key every checker/backend side table
/// uses instead of pointer identity.
#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    #[must_use]
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    // ---- Literals ----
    IntLiteral(i64),
    /// Stored as raw bits since `f64` is not `Eq`.
    FloatLiteral(u64),
    StringLiteral(Name),
    BoolLiteral(bool),
    NilLiteral,

    // ---- Variables ----
    Ident(Name),
    This,
    /// `super` or `super.method`.
    Super(Option<Name>),

    // ---- Operators ----
    Unary { op: UnaryOp, operand: ExprId },
    Binary { op: BinaryOp, left: ExprId, right: ExprId },
    Logical { op: LogicalOp, left: ExprId, right: ExprId },
    Ternary { cond: ExprId, then_branch: ExprId, else_branch: ExprId },
    Assign { target: ExprId, op: AssignOp, value: ExprId },
    Update { target: ExprId, op: UpdateOp, prefix: bool },

    // ---- Access ----
    Call { callee: ExprId, args: ExprRange },
    /// `.` (`optional = false`) or `?.` (`optional = true`) property access.
    PropertyGet { object: ExprId, optional: bool, name: Name },
    Subscript { object: ExprId, index: ExprId },

    // ---- Literals (aggregate) ----
    ListLiteral(ExprRange),
    RecordLiteral(FieldInitRange),

    // ---- Type-level ----
    /// `object is TypeNode`.
    Is { object: ExprId, type_node: TypeNode },
    Match { scrutinee: ExprId, arms: ArmRange },
    Sizeof(TypeNode),
    Retype { type_node: TypeNode, expr: ExprId },

    /// Recovery sentinel for a malformed expression; never reached in a
    /// well-formed AST but kept so the checker can short-circuit instead of
    /// panicking when handed degenerate test fixtures.
    Error,
}

/// One parameter of a function, method, or trait prototype.
#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    pub name: Name,
    pub type_node: TypeNode,
    pub span: Span,
}

/// A single field initializer inside a record literal (`{ name: value }`).
#[derive(Clone, Debug, PartialEq)]
pub struct FieldInit {
    pub name: Name,
    pub value: ExprId,
}

/// One `case` arm of a `match` expression.
///
/// `pattern` is `None` for the wildcard arm (`case _:`); otherwise it is the
/// expression id of the variant-constructor property-get (`E.B`), and
/// `binding` is the name bound to the variant's payload, if any (`E.B(n)`).
#[derive(Clone, Debug, PartialEq)]
pub struct MatchArm {
    pub pattern: Option<ExprId>,
    pub binding: Option<Name>,
    pub body: ExprId,
    pub span: Span,
}
