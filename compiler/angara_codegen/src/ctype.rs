//! `Type` → C type mapping.
//!
//! Every Angara value (primitive or heap) is represented uniformly at
//! runtime as a tagged `AngaraObject` (§6 Runtime ABI), so there is exactly
//! one C type for an Angara value wherever it crosses a variable,
//! parameter, return, or struct-field position. The two exceptions are
//! `CPtr`, which is the raw `void *` an already-unwrapped foreign value
//! carries, and a foreign data type's own opaque pointer member, which is
//! also rendered as `void *` since the backend never learns the real C
//! type behind a `foreign` declaration.

use angara_types::{PrimitiveKind, Type};

/// The C type every Angara-typed storage location uses.
pub const VALUE_TYPE: &str = "AngaraObject";

/// The C type of a `CPtr` value, or of a foreign data type's wrapped
/// pointer member.
pub const OPAQUE_PTR_TYPE: &str = "void *";

#[must_use]
pub fn c_type(ty: &Type) -> &'static str {
    match ty {
        Type::CPtr => OPAQUE_PTR_TYPE,
        _ => VALUE_TYPE,
    }
}

/// The raw (unboxed) C type backing `sizeof<T>`, used for foreign-interop
/// buffer sizing rather than any storage location in generated code.
/// `nominal_name` renders the mangled struct-tag name for a user nominal
/// type; the caller supplies it (`mangle::struct_name`) to avoid this crate
/// depending on the `Name`/interner lookup itself.
#[must_use]
pub fn native_size_type(ty: &Type, nominal_name: impl FnOnce() -> Option<String>) -> String {
    match ty {
        Type::Primitive(PrimitiveKind::I8) => "int8_t".to_string(),
        Type::Primitive(PrimitiveKind::I16) => "int16_t".to_string(),
        Type::Primitive(PrimitiveKind::I32) => "int32_t".to_string(),
        Type::Primitive(PrimitiveKind::I64) => "int64_t".to_string(),
        Type::Primitive(PrimitiveKind::U8) => "uint8_t".to_string(),
        Type::Primitive(PrimitiveKind::U16) => "uint16_t".to_string(),
        Type::Primitive(PrimitiveKind::U32) => "uint32_t".to_string(),
        Type::Primitive(PrimitiveKind::U64) => "uint64_t".to_string(),
        Type::Primitive(PrimitiveKind::F32) => "float".to_string(),
        Type::Primitive(PrimitiveKind::F64) => "double".to_string(),
        Type::Primitive(PrimitiveKind::Bool) => "bool".to_string(),
        Type::Primitive(PrimitiveKind::String) => "char *".to_string(),
        Type::CPtr => OPAQUE_PTR_TYPE.to_string(),
        Type::Class(_) | Type::Instance(_) | Type::Data(_) | Type::Enum(_) => {
            nominal_name().unwrap_or_else(|| VALUE_TYPE.to_string())
        }
        _ => VALUE_TYPE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use angara_types::PrimitiveKind;

    #[test]
    fn test_primitives_are_angara_object() {
        assert_eq!(c_type(&Type::Primitive(PrimitiveKind::I64)), VALUE_TYPE);
        assert_eq!(c_type(&Type::Primitive(PrimitiveKind::String)), VALUE_TYPE);
    }

    #[test]
    fn test_cptr_is_opaque() {
        assert_eq!(c_type(&Type::CPtr), OPAQUE_PTR_TYPE);
    }
}
