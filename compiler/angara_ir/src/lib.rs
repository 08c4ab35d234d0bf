//! Shared intermediate representation for the Angara compiler: source spans,
//! interned identifiers, tokens, and the arena-indexed AST produced by the
//! (external) parser and consumed by the type checker and C backend.
//!
//! # Design philosophy
//!
//! - **Intern identifiers.** Every name is a `Name(u32)` handle; equality and
//!   hashing never touch the underlying bytes.
//! - **Flatten the AST.** Expressions and statements live in one arena per
//!   module; children are referenced by `ExprId`/`StmtId`, never by `Box` or
//!   pointer. This gives every side table (expression types, narrowings,
//!   variable resolutions) a stable integer key instead of one tied to AST
//!   node lifetime or identity.

mod arena;
mod ids;
mod interner;
mod name;
mod span;
mod token;

pub mod ast;

pub use arena::ExprArena;
pub use ids::{ArmRange, ExprId, ExprRange, FieldInitRange, ParamRange, StmtId, StmtRange};
pub use interner::{SharedInterner, StringInterner};
pub use name::Name;
pub use span::Span;
pub use token::{Token, TokenKind};
