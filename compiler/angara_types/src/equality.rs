//! Structural equality of `Type`: nominal by identity for the
//! user-declared kinds, structural by contents for the rest.

use crate::types::Type;
use std::rc::Rc;

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Type::Primitive(a), Type::Primitive(b)) => a == b,
            (Type::Nil, Type::Nil)
            | (Type::Any, Type::Any)
            | (Type::Thread, Type::Thread)
            | (Type::Mutex, Type::Mutex)
            | (Type::Exception, Type::Exception)
            | (Type::CPtr, Type::CPtr)
            | (Type::Error, Type::Error) => true,
            (Type::Optional(a), Type::Optional(b)) => a == b,
            (Type::List(a), Type::List(b)) => a == b,
            (Type::Record(a), Type::Record(b)) => a == b,
            (Type::Function(a), Type::Function(b)) => a == b,
            (Type::Class(a), Type::Class(b)) | (Type::Instance(a), Type::Instance(b)) => {
                Rc::ptr_eq(a, b)
            }
            (Type::Trait(a), Type::Trait(b)) => Rc::ptr_eq(a, b),
            (Type::Contract(a), Type::Contract(b)) => Rc::ptr_eq(a, b),
            (Type::Data(a), Type::Data(b)) => Rc::ptr_eq(a, b),
            (Type::Enum(a), Type::Enum(b)) => Rc::ptr_eq(a, b),
            (Type::Module(a), Type::Module(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Eq for Type {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ClassType;
    use crate::PrimitiveKind;
    use angara_ir::StringInterner;
    use std::cell::RefCell;

    #[test]
    fn test_primitive_equality() {
        assert_eq!(Type::Primitive(PrimitiveKind::I64), Type::Primitive(PrimitiveKind::I64));
        assert_ne!(Type::Primitive(PrimitiveKind::I64), Type::Primitive(PrimitiveKind::F64));
    }

    #[test]
    fn test_class_identity_not_structural() {
        let interner = StringInterner::new();
        let name = interner.intern("Point");
        let a = Rc::new(RefCell::new(ClassType::placeholder(name)));
        let b = Rc::new(RefCell::new(ClassType::placeholder(name)));
        assert_ne!(Type::Class(a.clone()), Type::Class(b));
        assert_eq!(Type::Class(a.clone()), Type::Class(a));
    }

    #[test]
    fn test_optional_structural() {
        let a = Type::Primitive(PrimitiveKind::I64).optional();
        let b = Type::Primitive(PrimitiveKind::I64).optional();
        assert_eq!(a, b);
    }
}
