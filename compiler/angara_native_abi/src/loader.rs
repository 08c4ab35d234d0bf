//! Dynamic loading of native modules via `libloading`.
//!
//! A native module is a shared library exporting one C entry point,
//! `Angara_<module>_Init`, which hands back a pointer to a `FuncDef` array
//! and writes its length through an out-param. Loading `dlopen`s the
//! library, `dlsym`s that entry point, and walks the returned array.

use crate::error::AbiError;
use crate::ffi::{FuncDef, ModuleInitFn};
use libloading::{Library, Symbol};
use std::os::raw::c_int;
use std::path::{Path, PathBuf};

/// A loaded native module. Keeps the `Library` alive for as long as any
/// `FuncDef`/`NativeFn` pointer decoded from it might still be called by a
/// linked program, or inspected by the decoder.
pub struct NativeLibrary {
    // Order matters: `funcs` (and anything derived from it) must be dropped
    // before `library`, since the pointee memory lives inside the library's
    // mapped image.
    funcs: Vec<FuncDef>,
    #[allow(dead_code)]
    library: Library,
    path: PathBuf,
}

impl NativeLibrary {
    /// Load `path` and invoke `Angara_<module>_Init` to obtain its export
    /// table. `module_name` is the bare module name (no directory, no
    /// `lib`/extension), used to derive the entry point symbol.
    pub fn load(path: &Path, module_name: &str) -> Result<Self, AbiError> {
        let library = unsafe { Library::new(path) }
            .map_err(|source| AbiError::DlOpen { path: path.to_path_buf(), source })?;

        let symbol_name = format!("Angara_{module_name}_Init\0");
        let init_fn: Symbol<ModuleInitFn> = unsafe { library.get(symbol_name.as_bytes()) }
            .map_err(|_| AbiError::MissingEntryPoint {
                path: path.to_path_buf(),
                symbol: symbol_name.trim_end_matches('\0').to_string(),
            })?;

        let mut count: c_int = 0;
        let raw = unsafe { init_fn(&mut count) };
        let funcs = if raw.is_null() || count <= 0 {
            Vec::new()
        } else {
            unsafe { std::slice::from_raw_parts(raw, count as usize).to_vec() }
        };

        // Drop the borrowed symbol before moving `library` into the struct.
        drop(init_fn);

        Ok(NativeLibrary { funcs, library, path: path.to_path_buf() })
    }

    #[must_use]
    pub fn funcs(&self) -> &[FuncDef] {
        &self.funcs
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}
