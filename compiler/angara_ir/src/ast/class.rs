//! Class declarations and members.

use super::ty::TypeNode;
use crate::{Name, ParamRange, Span, StmtId};

#[derive(Clone, Debug, PartialEq)]
pub struct ClassDecl {
    pub name: Name,
    pub superclass: Option<Name>,
    pub contracts: Vec<Name>,
    pub traits: Vec<Name>,
    pub members: Vec<ClassMember>,
    pub exported: bool,
    pub span: Span,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Access {
    Public,
    Private,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ClassMember {
    Field(FieldMember),
    Method(MethodMember),
}

#[derive(Clone, Debug, PartialEq)]
pub struct FieldMember {
    pub name: Name,
    pub type_node: TypeNode,
    pub is_const: bool,
    pub access: Access,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MethodMember {
    pub name: Name,
    pub has_this: bool,
    pub params: ParamRange,
    pub return_type: Option<TypeNode>,
    pub body: Option<StmtId>,
    pub access: Access,
    pub span: Span,
}
