//! Type compatibility: when a value of one type may be used where another
//! is expected.

use crate::types::Type;

/// `can_assign(expected, actual) -> bool`.
///
/// `actual_is_int_literal` captures the one context-sensitive rule in the
/// spec: an integer-literal expression of (nominal) width `i64` may be
/// assigned to any integer target, a relaxation that applies only at the
/// literal expression itself, never to a variable of type `i64`. Callers
/// that are not checking a literal pass `false`.
#[must_use]
pub fn can_assign(expected: &Type, actual: &Type, actual_is_int_literal: bool) -> bool {
    if expected == actual {
        return true;
    }
    if expected.is_any() || actual.is_any() {
        return true;
    }
    if let Type::Optional(inner) = expected {
        if matches!(actual, Type::Nil) || can_assign(inner, actual, actual_is_int_literal) {
            return true;
        }
    }
    if let (Type::Record(expected_fields), Type::Record(actual_fields)) = (expected, actual) {
        if !expected_fields.is_empty() && actual_fields.is_empty() {
            return true;
        }
    }
    if actual_is_int_literal && expected.is_integer() && actual.is_integer() {
        return true;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PrimitiveKind;
    use std::rc::Rc;

    fn i64_ty() -> Type {
        Type::Primitive(PrimitiveKind::I64)
    }

    fn i8_ty() -> Type {
        Type::Primitive(PrimitiveKind::I8)
    }

    #[test]
    fn test_identical_types_assignable() {
        assert!(can_assign(&i64_ty(), &i64_ty(), false));
    }

    #[test]
    fn test_any_assignable_either_side() {
        assert!(can_assign(&Type::Any, &i64_ty(), false));
        assert!(can_assign(&i64_ty(), &Type::Any, false));
    }

    #[test]
    fn test_optional_accepts_inner_or_nil() {
        let opt = i64_ty().optional();
        assert!(can_assign(&opt, &i64_ty(), false));
        assert!(can_assign(&opt, &Type::Nil, false));
        assert!(!can_assign(&opt, &Type::Primitive(PrimitiveKind::String), false));
    }

    #[test]
    fn test_empty_record_assignable_to_any_record() {
        use rustc_hash::FxHashMap;
        let mut fields = FxHashMap::default();
        fields.insert(angara_ir::StringInterner::new().intern("x"), i64_ty());
        let typed_record = Type::Record(Rc::new(fields));
        let empty_record = Type::Record(Rc::new(FxHashMap::default()));
        assert!(can_assign(&typed_record, &empty_record, false));
        assert!(!can_assign(&empty_record, &typed_record, false));
    }

    #[test]
    fn test_integer_literal_relaxation_is_context_gated() {
        assert!(can_assign(&i8_ty(), &i64_ty(), true));
        assert!(!can_assign(&i8_ty(), &i64_ty(), false));
    }

    #[test]
    fn test_unrelated_types_not_assignable() {
        assert!(!can_assign(&i64_ty(), &Type::Primitive(PrimitiveKind::String), false));
    }
}
