//! Native module ABI: the compact type-signature grammar, the dynamic
//! loader, and the two-pass decoder that turns a loaded module's export
//! table into an `angara_types::ModuleType`.
#![allow(
    unsafe_code,
    reason = "dlopen/dlsym and the raw FuncDef/ClassDef walk are inherent to the native module ABI boundary"
)]

mod decoder;
mod error;
mod ffi;
mod loader;
mod signature;

pub use decoder::decode_module;
pub use error::AbiError;
pub use ffi::{AngaraObject, ClassDef, FieldDef, FuncDef, MethodDef, ModuleInitFn, NativeFn};
pub use loader::NativeLibrary;
pub use signature::{parse_signature, DecodedSignature, SignatureParser};
