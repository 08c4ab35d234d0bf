//! Trait, contract, data, and enum declarations.

use super::ty::TypeNode;
use crate::{Name, ParamRange, Span};

#[derive(Clone, Debug, PartialEq)]
pub struct TraitDecl {
    pub name: Name,
    pub methods: Vec<TraitMethodProto>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TraitMethodProto {
    pub name: Name,
    pub params: ParamRange,
    pub return_type: Option<TypeNode>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ContractDecl {
    pub name: Name,
    pub members: Vec<ContractMember>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ContractMember {
    Field {
        name: Name,
        type_node: TypeNode,
        is_const: bool,
        span: Span,
    },
    Method {
        name: Name,
        params: ParamRange,
        return_type: Option<TypeNode>,
        span: Span,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct DataDecl {
    pub name: Name,
    pub fields: Vec<DataField>,
    pub exported: bool,
    pub is_foreign: bool,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DataField {
    pub name: Name,
    pub type_node: TypeNode,
    pub is_const: bool,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EnumDecl {
    pub name: Name,
    pub variants: Vec<EnumVariant>,
    pub exported: bool,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EnumVariant {
    pub name: Name,
    pub payload_types: Vec<TypeNode>,
    pub span: Span,
}
