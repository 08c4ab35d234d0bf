//! Type annotation nodes, as written by the programmer.
//!
//! These are distinct from `angara_types::Type`: a `TypeNode` is the AST
//! shape the parser produced; a `Type` is the checker's resolved semantic
//! value. The checker's job in Pass 2 is largely "resolve every `TypeNode`
//! reachable from a declaration into a `Type`".

use crate::Name;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeNode {
    /// A bare name: a primitive (`i64`, `string`, `bool`, ...) or a
    /// user-defined class/trait/contract/data/enum name.
    Simple(Name),
    /// `name<args...>` — only `list<T>` is meaningful per the grammar, but
    /// the node is general so the checker can reject anything else.
    Generic { name: Name, args: Vec<TypeNode> },
    /// `base?`.
    Optional(Box<TypeNode>),
    /// An inline record type literal: `{ field: T, ... }`.
    InlineRecord(Vec<(Name, TypeNode)>),
    /// An inline function type: `(params...) -> ret`.
    InlineFunction {
        params: Vec<TypeNode>,
        ret: Box<TypeNode>,
    },
}

impl TypeNode {
    #[must_use]
    pub fn optional(self) -> TypeNode {
        TypeNode::Optional(Box::new(self))
    }
}
