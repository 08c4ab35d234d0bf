//! Decodes a native module's `FuncDef` export table into a `ModuleType`.
//!
//! Two passes: a `FuncDef` whose `constructs` pointer is non-null
//! introduces a class, and every other `FuncDef`/field/method signature is
//! decoded in the context of the classes discovered that way. Pass 1 must
//! run to completion before Pass 2 starts, because a constructor's own
//! parameter types (and any other export's signature) may reference a
//! class introduced by a *later* `FuncDef` in the same table.

use crate::error::AbiError;
use crate::ffi::{ClassDef, FieldDef, FuncDef, MethodDef};
use crate::signature::{parse_signature, DecodedSignature};
use angara_ir::{Name, SharedInterner};
use angara_types::{Access, ClassType, FieldInfo, FunctionType, ModuleType, Type};
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::ffi::CStr;
use std::os::raw::c_char;
use std::rc::Rc;

/// Read a non-null, NUL-terminated C string. Native modules never hand back
/// a null `name`/`type_string` pointer for a live entry (only the
/// sentinel row of a null-terminated array has one), so this panics rather
/// than threading an `Option` through every caller — a native module
/// violating that contract is an ABI bug, not a recoverable condition.
///
/// # Safety
/// `ptr` must point to a valid, NUL-terminated C string for the lifetime of
/// the call, as guaranteed by the native module's ABI contract.
unsafe fn read_cstr(ptr: *const c_char) -> String {
    debug_assert!(!ptr.is_null());
    CStr::from_ptr(ptr).to_string_lossy().into_owned()
}

/// Decode one module's export table (the `FuncDef` array a module's
/// `Angara_<module>_Init` returned) into a `ModuleType`.
///
/// # Safety
/// `funcs` must be a valid slice of `len` initialized `FuncDef`s, each
/// pointing at NUL-terminated strings and (when `constructs` is non-null) a
/// valid null-terminated `ClassDef` whose `fields`/`methods` arrays are
/// themselves null-terminated, per the native module ABI contract (§6).
pub unsafe fn decode_module(
    module_name: Name,
    is_native: bool,
    funcs: &[FuncDef],
    interner: &SharedInterner,
) -> Result<ModuleType, AbiError> {
    let mut module_type = ModuleType::new(module_name, is_native);

    // Pass 1: discover every native class introduced via a constructor's
    // `constructs` pointer, and export the class type under its own name.
    let mut known_classes: FxHashMap<String, Type> = FxHashMap::default();
    let mut class_defs: FxHashMap<String, *const ClassDef> = FxHashMap::default();

    for func in funcs {
        if func.constructs.is_null() {
            continue;
        }
        let class_def = &*func.constructs;
        let class_name = read_cstr(class_def.name);
        if known_classes.contains_key(&class_name) {
            return Err(AbiError::DuplicateClass { name: class_name });
        }
        let interned = interner.intern(&class_name);
        let mut class_type = ClassType::placeholder(interned);
        class_type.is_native = true;
        let ty = Type::Class(Rc::new(RefCell::new(class_type)));
        known_classes.insert(class_name.clone(), ty.clone());
        class_defs.insert(class_name.clone(), func.constructs);
        module_type.exports.insert(interned, ty);
    }

    // Pass 2: decode every export's signature in the context of the classes
    // discovered above, and fill in each native class's fields/methods from
    // its `ClassDef`.
    for func in funcs {
        let func_name_str = read_cstr(func.name);
        let type_string = read_cstr(func.type_string);
        let decoded = parse_signature(&type_string, &known_classes)?;
        let DecodedSignature::Function { params, variadic, ret } = decoded else {
            return Err(AbiError::TrailingCharacters { signature: type_string });
        };
        let func_type = FunctionType::new(params, ret, variadic);
        let interned_name = interner.intern(&func_name_str);
        module_type.exports.insert(interned_name, Type::Function(Rc::new(func_type)));

        if func.constructs.is_null() {
            continue;
        }
        let class_def = &*func.constructs;
        populate_class_members(class_def, &known_classes, interner)?;
    }

    Ok(module_type)
}

/// # Safety
/// `class_def.fields` and `class_def.methods` must each point to a
/// null-terminated array of valid entries.
unsafe fn populate_class_members(
    class_def: &ClassDef,
    known_classes: &FxHashMap<String, Type>,
    interner: &SharedInterner,
) -> Result<(), AbiError> {
    let class_name = read_cstr(class_def.name);
    let Some(Type::Class(class_rc)) = known_classes.get(&class_name) else {
        return Err(AbiError::UnknownClass { name: class_name, signature: String::new() });
    };

    if !class_def.fields.is_null() {
        let mut ptr = class_def.fields;
        loop {
            let field: &FieldDef = &*ptr;
            if field.name.is_null() {
                break;
            }
            let field_name = read_cstr(field.name);
            let type_string = read_cstr(field.type_string);
            let decoded = parse_signature(&type_string, known_classes)?;
            let ty = match decoded {
                DecodedSignature::Value(ty) => ty,
                DecodedSignature::Function { .. } => {
                    return Err(AbiError::TrailingCharacters { signature: type_string })
                }
            };
            let interned = interner.intern(&field_name);
            class_rc.borrow_mut().fields.insert(
                interned,
                FieldInfo { ty, access: Access::Public, is_const: field.is_const },
            );
            ptr = ptr.add(1);
        }
    }

    if !class_def.methods.is_null() {
        let mut ptr = class_def.methods;
        loop {
            let method: &MethodDef = &*ptr;
            if method.name.is_null() {
                break;
            }
            let method_name = read_cstr(method.name);
            let type_string = read_cstr(method.type_string);
            let decoded = parse_signature(&type_string, known_classes)?;
            let DecodedSignature::Function { params, variadic, ret } = decoded else {
                return Err(AbiError::TrailingCharacters { signature: type_string });
            };
            let interned = interner.intern(&method_name);
            class_rc
                .borrow_mut()
                .methods
                .insert(interned, (FunctionType::new(params, ret, variadic), Access::Public));
            ptr = ptr.add(1);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;

    struct CStrings {
        _keep_alive: Vec<CString>,
    }

    fn leak(s: &str, keep: &mut Vec<CString>) -> *const c_char {
        let c = CString::new(s).unwrap();
        let ptr = c.as_ptr();
        keep.push(c);
        ptr
    }

    #[test]
    fn test_decode_plain_function_export() {
        let mut keep = Vec::new();
        let name = leak("add", &mut keep);
        let sig = leak("ii->i", &mut keep);

        let funcs = vec![FuncDef {
            name,
            func: dummy_fn,
            type_string: sig,
            constructs: std::ptr::null(),
        }];

        let interner = SharedInterner::default();
        let module_name = interner.intern("mathnative");
        let module = unsafe { decode_module(module_name, true, &funcs, &interner).unwrap() };
        assert_eq!(module.exports.len(), 1);
        let add_name = interner.intern("add");
        match module.exports.get(&add_name) {
            Some(Type::Function(f)) => {
                assert_eq!(f.params.len(), 2);
                assert!(!f.variadic);
            }
            _ => panic!("expected exported function"),
        }
    }

    #[test]
    fn test_decode_duplicate_class_errors() {
        let mut keep = Vec::new();
        let class_name_1 = leak("Point", &mut keep);
        let class_name_2 = leak("Point", &mut keep);
        let ctor_sig = leak("dd->Point", &mut keep);

        let class_def_1 = Box::new(ClassDef {
            name: class_name_1,
            fields: std::ptr::null(),
            methods: std::ptr::null(),
        });
        let class_def_2 = Box::new(ClassDef {
            name: class_name_2,
            fields: std::ptr::null(),
            methods: std::ptr::null(),
        });

        let funcs = vec![
            FuncDef {
                name: leak("Point_init", &mut keep),
                func: dummy_fn,
                type_string: ctor_sig,
                constructs: &*class_def_1,
            },
            FuncDef {
                name: leak("Point_init2", &mut keep),
                func: dummy_fn,
                type_string: leak("dd->Point", &mut keep),
                constructs: &*class_def_2,
            },
        ];

        let interner = SharedInterner::default();
        let module_name = interner.intern("geonative");
        let err = unsafe { decode_module(module_name, true, &funcs, &interner).unwrap_err() };
        assert!(matches!(err, AbiError::DuplicateClass { .. }));
    }

    unsafe extern "C" fn dummy_fn(
        _argc: std::os::raw::c_int,
        _argv: *mut crate::ffi::AngaraObject,
    ) -> crate::ffi::AngaraObject {
        crate::ffi::AngaraObject::default_for_test()
    }

    impl crate::ffi::AngaraObject {
        fn default_for_test() -> Self {
            // Never actually called; exists only to satisfy the `NativeFn`
            // type in these decoder-only tests.
            unreachable!("test native fn is never invoked")
        }
    }
}
