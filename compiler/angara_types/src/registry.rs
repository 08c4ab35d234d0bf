//! The type registry: built-in singletons plus factories for the
//! placeholder-then-fill nominal types created by the checker's Pass 1/2.

use crate::types::{ClassType, ContractType, DataType, EnumType, ModuleType, TraitType, Type};
use crate::PrimitiveKind;
use angara_ir::Name;
use std::cell::RefCell;
use std::rc::Rc;

/// Owns no state beyond what's needed to mint fresh placeholder types;
/// built-in primitives are represented directly by `Type::Primitive` and
/// need no registry entry, since they're structural rather than nominal.
#[derive(Default)]
pub struct TypeRegistry;

impl TypeRegistry {
    #[must_use]
    pub fn new() -> Self {
        TypeRegistry
    }

    #[must_use]
    pub fn primitive(kind: PrimitiveKind) -> Type {
        Type::Primitive(kind)
    }

    #[must_use]
    pub fn new_class_placeholder(&self, name: Name) -> Type {
        Type::Class(Rc::new(RefCell::new(ClassType::placeholder(name))))
    }

    #[must_use]
    pub fn new_trait_placeholder(&self, name: Name) -> Type {
        Type::Trait(Rc::new(RefCell::new(TraitType::placeholder(name))))
    }

    #[must_use]
    pub fn new_contract_placeholder(&self, name: Name) -> Type {
        Type::Contract(Rc::new(RefCell::new(ContractType::placeholder(name))))
    }

    #[must_use]
    pub fn new_data_placeholder(&self, name: Name) -> Type {
        Type::Data(Rc::new(RefCell::new(DataType::placeholder(name))))
    }

    #[must_use]
    pub fn new_enum_placeholder(&self, name: Name) -> Type {
        Type::Enum(Rc::new(RefCell::new(EnumType::placeholder(name))))
    }

    #[must_use]
    pub fn new_module(&self, name: Name, is_native: bool) -> Type {
        Type::Module(Rc::new(RefCell::new(ModuleType::new(name, is_native))))
    }

    /// `Instance` of the given class (used for `this`, `new` expressions,
    /// and resolving a class name used as a type annotation).
    #[must_use]
    pub fn instance_of(class: &Type) -> Option<Type> {
        match class {
            Type::Class(c) => Some(Type::Instance(c.clone())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use angara_ir::StringInterner;

    #[test]
    fn test_class_placeholder_then_instance() {
        let registry = TypeRegistry::new();
        let interner = StringInterner::new();
        let name = interner.intern("Point");
        let class = registry.new_class_placeholder(name);
        let instance = TypeRegistry::instance_of(&class).expect("class has instance form");
        assert!(matches!(instance, Type::Instance(_)));
    }

    #[test]
    fn test_placeholder_mutation_visible_to_all_holders() {
        let registry = TypeRegistry::new();
        let interner = StringInterner::new();
        let name = interner.intern("Counter");
        let class = registry.new_class_placeholder(name);
        let held = class.clone();

        if let Type::Class(rc) = &class {
            rc.borrow_mut().is_native = true;
        }
        if let Type::Class(rc) = &held {
            assert!(rc.borrow().is_native);
        } else {
            unreachable!("class placeholder must stay a Class variant");
        }
    }
}
