//! The callback seam between the checker and the module driver.
//!
//! The checker needs to resolve `attach` statements against modules that may
//! not be compiled yet (§4.3/§4.5 pre-pass), but `angarac`'s driver depends
//! on this crate — not the other way around — so the dependency can't run
//! the other direction. Instead the driver implements `ModuleResolver` and
//! hands the checker a `&mut dyn ModuleResolver`, taking the dependency by
//! trait object rather than importing its host crate.

use angara_ir::Span;
use angara_types::Type;

#[derive(Debug)]
pub enum ResolveError {
    /// No source file or native library matched the attached name on any
    /// search path.
    NotFound,
    /// The attached module is already on the in-progress resolution stack.
    Circular,
}

/// Implemented by the module driver. `path_or_name` is the raw text written
/// after `attach`/`from`; `importer_span` is the span of the whole `attach`
/// statement, used only if the resolver itself needs to report a diagnostic
/// upstream (it does not — resolution failures are reported by the checker
/// from the returned `ResolveError`).
pub trait ModuleResolver {
    fn resolve(&mut self, path_or_name: &str, importer_span: Span) -> Result<Type, ResolveError>;
}

/// A resolver that fails every lookup. Useful for unit-testing checker
/// passes that don't exercise `attach`.
#[derive(Default)]
pub struct NullResolver;

impl ModuleResolver for NullResolver {
    fn resolve(&mut self, _path_or_name: &str, _importer_span: Span) -> Result<Type, ResolveError> {
        Err(ResolveError::NotFound)
    }
}
