//! Checker output consumed by the backend: every side table the original
//! design keyed on AST pointer identity, keyed here on the stable
//! `ExprId`/`StmtId` the arena assigns instead (§9 "side-table keyed by AST
//! identity").

use angara_ir::{ExprId, Name, StmtId};
use angara_types::Type;
use rustc_hash::FxHashMap;

/// Everything the C backend needs from a module's checked AST, beyond the
/// AST itself.
#[derive(Default)]
pub struct CheckResult {
    /// The resolved type of every expression that was type-checked. Absent
    /// for expressions under an `Error` subtree the checker short-circuited.
    pub expr_types: FxHashMap<ExprId, Type>,
    /// For a variable-reference expression resolved under an active
    /// narrowing, the narrowed type (distinct from `expr_types`, which the
    /// backend also needs — narrowing only changes the checker's view,
    /// never the emitted C representation).
    pub narrowed_reads: FxHashMap<ExprId, Type>,
    /// For a variable-reference expression whose symbol was imported via a
    /// selective `attach`, the module it came from — so the backend can
    /// mangle the call as `angara_f_<origin>_<name>` instead of treating it
    /// as module-local.
    pub var_origins: FxHashMap<ExprId, Name>,
    /// The resolved type behind a `sizeof<T>` expression.
    pub sizeof_types: FxHashMap<ExprId, Type>,
    /// The `Module` type each `attach` statement resolved to.
    pub attach_resolutions: FxHashMap<StmtId, Type>,
    /// Native-module exports actually referenced by this module's body, so
    /// the backend emits only the prototypes the link step needs and the
    /// driver knows which native libraries stay reachable.
    pub used_native_symbols: Vec<(Name, Name)>,
    /// `foreign-header` statements encountered anywhere in the module, in
    /// source order, so the backend can emit the matching `#include`s
    /// verbatim into the generated header.
    pub foreign_headers: Vec<Name>,
    /// The resolved type of every module-scope declaration (class, trait,
    /// contract, data, enum, function, or top-level var), by name —
    /// including private ones that never reach `module_type`'s `exports`.
    /// The backend's only source for a private top-level declaration's
    /// `Type` when nothing in the body happens to reference it.
    pub declared_types: FxHashMap<Name, Type>,
}

impl CheckResult {
    #[must_use]
    pub fn new() -> Self {
        CheckResult::default()
    }
}
