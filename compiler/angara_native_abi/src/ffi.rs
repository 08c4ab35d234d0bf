//! C-layout structs mirroring the runtime ABI contract (§6 Native module ABI).
//!
//! These are never constructed from Rust; they describe the memory layout a
//! native module's `Angara_<module>_Init` hands back across the FFI
//! boundary. Every pointer is read-only and the arrays backing
//! `ClassDef::methods`/`ClassDef::fields` are null-terminated (sentinel row
//! with a null `name`), matching the original `angc` runtime headers.

use std::os::raw::{c_char, c_int};

/// Opaque stand-in for the runtime's tagged value type. The decoder never
/// dereferences `fn`; it only needs `FuncDef`'s layout to walk the array the
/// native module returns.
#[repr(C)]
pub struct AngaraObject {
    _opaque: [u8; 0],
}

pub type NativeFn = unsafe extern "C" fn(argc: c_int, argv: *mut AngaraObject) -> AngaraObject;

#[derive(Clone, Copy)]
#[repr(C)]
pub struct FieldDef {
    pub name: *const c_char,
    pub type_string: *const c_char,
    pub is_const: bool,
}

#[derive(Clone, Copy)]
#[repr(C)]
pub struct MethodDef {
    pub name: *const c_char,
    pub type_string: *const c_char,
}

#[derive(Clone, Copy)]
#[repr(C)]
pub struct ClassDef {
    pub name: *const c_char,
    /// Null-terminated (sentinel entry with a null `name`).
    pub fields: *const FieldDef,
    /// Null-terminated (sentinel entry with a null `name`).
    pub methods: *const MethodDef,
}

#[derive(Clone, Copy)]
#[repr(C)]
pub struct FuncDef {
    pub name: *const c_char,
    pub func: NativeFn,
    pub type_string: *const c_char,
    /// Null if this export is not a constructor.
    pub constructs: *const ClassDef,
}

/// Signature of a native module's entry point:
/// `Angara_<module>_Init(&count) -> *const FuncDef`.
pub type ModuleInitFn = unsafe extern "C" fn(out_count: *mut c_int) -> *const FuncDef;
