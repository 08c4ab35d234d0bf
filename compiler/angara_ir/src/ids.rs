//! Stable integer node identifiers.
//!
//! The source language's own AST ties side tables (expression types,
//! narrowing overrides, resolved variable origins) to pointer identity of
//! AST nodes. Here every expression and statement is assigned a stable
//! `ExprId`/`StmtId` at build time instead, so the checker's side tables are
//! plain index-keyed maps with no lifetime coupling to the AST itself.

use std::fmt;

/// Index of an `Expr` in an `ExprArena`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[repr(transparent)]
pub struct ExprId(u32);

impl ExprId {
    #[inline]
    #[must_use]
    pub const fn new(idx: u32) -> Self {
        ExprId(idx)
    }

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExprId({})", self.0)
    }
}

/// Index of a `Stmt` in an `ExprArena`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[repr(transparent)]
pub struct StmtId(u32);

impl StmtId {
    #[inline]
    #[must_use]
    pub const fn new(idx: u32) -> Self {
        StmtId(idx)
    }

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for StmtId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StmtId({})", self.0)
    }
}

macro_rules! arena_range {
    ($name:ident) => {
        #[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
        #[repr(C)]
        pub struct $name {
            pub start: u32,
            pub len: u16,
        }

        impl $name {
            pub const EMPTY: $name = $name { start: 0, len: 0 };

            #[inline]
            #[must_use]
            pub const fn new(start: u32, len: u16) -> Self {
                $name { start, len }
            }

            #[inline]
            #[must_use]
            pub const fn is_empty(&self) -> bool {
                self.len == 0
            }

            #[inline]
            #[must_use]
            pub const fn len(&self) -> usize {
                self.len as usize
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({}..{})"), self.start, self.start + u32::from(self.len))
            }
        }
    };
}

arena_range!(ExprRange);
arena_range!(StmtRange);
arena_range!(ParamRange);
arena_range!(ArmRange);
arena_range!(FieldInitRange);
