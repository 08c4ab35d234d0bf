//! The Angara compiler's type registry: canonical semantic types,
//! structural predicates, and assignability.

mod assign;
mod display;
mod equality;
mod primitive;
mod registry;
mod types;

pub use assign::can_assign;
pub use primitive::PrimitiveKind;
pub use registry::TypeRegistry;
pub use types::{
    Access, ClassType, ContractType, DataType, EnumType, FieldInfo, FunctionType, ModuleType,
    RequiredField, RequiredMethod, TraitType, Type,
};
