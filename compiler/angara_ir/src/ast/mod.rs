//! The source language's abstract syntax tree.

mod class;
mod expr;
mod item;
mod module;
mod operators;
mod stmt;
mod ty;

pub use class::{Access, ClassDecl, ClassMember, FieldMember, MethodMember};
pub use expr::{Expr, ExprKind, FieldInit, MatchArm, Param};
pub use item::{
    ContractDecl, ContractMember, DataDecl, DataField, EnumDecl, EnumVariant, TraitDecl,
    TraitMethodProto,
};
pub use module::Module;
pub use operators::{AssignOp, BinaryOp, LogicalOp, UnaryOp, UpdateOp};
pub use stmt::{AttachKind, FunctionDecl, IfCond, Stmt, StmtKind};
pub use ty::TypeNode;
