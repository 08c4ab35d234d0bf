//! The scope stack.
//!
//! Scope depth 0 is module scope; `enter_scope` pushes depth `n+1`. The
//! module scope is never popped for the life of a checking pass — it is the
//! scope the driver's cache entry for this module ultimately owns.

use crate::Symbol;
use angara_ir::Name;
use rustc_hash::FxHashMap;

pub struct SymbolTable {
    scopes: Vec<FxHashMap<Name, Symbol>>,
}

impl SymbolTable {
    /// A fresh table with only the module scope (depth 0) open.
    #[must_use]
    pub fn new() -> Self {
        SymbolTable { scopes: vec![FxHashMap::default()] }
    }

    pub fn enter_scope(&mut self) {
        self.scopes.push(FxHashMap::default());
    }

    /// # Panics
    /// Panics if called with only the module scope open — the module scope
    /// is never popped.
    pub fn exit_scope(&mut self) {
        assert!(self.scopes.len() > 1, "cannot exit the module scope");
        self.scopes.pop();
    }

    /// Current scope depth; 0 is module scope.
    #[must_use]
    pub fn depth(&self) -> u32 {
        (self.scopes.len() - 1) as u32
    }

    #[must_use]
    pub fn is_module_scope(&self) -> bool {
        self.depth() == 0
    }

    /// Declare `symbol` in the innermost scope. Returns the prior symbol of
    /// the same name if one already exists in *this* scope (a
    /// redeclaration the caller should report, pointing at the returned
    /// symbol's `declaration_span` as the "previous declaration here" note).
    /// Shadowing an outer scope's binding is not a conflict.
    #[allow(clippy::expect_used, reason = "the module scope is pushed in new() and exit_scope() refuses to pop it")]
    pub fn declare(&mut self, symbol: Symbol) -> Option<Symbol> {
        let innermost = self.scopes.last_mut().expect("module scope always open");
        innermost.insert(symbol.name, symbol)
    }

    /// Resolve `name`, walking from the innermost scope outward.
    #[must_use]
    pub fn resolve(&self, name: Name) -> Option<&Symbol> {
        self.scopes.iter().rev().find_map(|scope| scope.get(&name))
    }

    /// Resolve only within the current (innermost) scope, without walking
    /// outward — used by the checker to detect same-scope shadowing
    /// distinct from a legal outer-scope shadow.
    #[must_use]
    pub fn resolve_local(&self, name: Name) -> Option<&Symbol> {
        self.scopes.last().and_then(|scope| scope.get(&name))
    }

    /// Every symbol declared at module scope (depth 0), which — since that
    /// scope is never popped — is every top-level class/trait/contract/
    /// data/enum/function/var the module declares, filled in by the time
    /// checking finishes. The backend uses this to resolve private
    /// top-level declarations that never show up in the module's `exports`.
    pub fn module_scope(&self) -> impl Iterator<Item = &Symbol> {
        self.scopes[0].values()
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use angara_ir::{Span, StringInterner};
    use angara_types::{PrimitiveKind, Type};

    fn sym(interner: &StringInterner, name: &str, depth: u32) -> Symbol {
        Symbol::new(
            interner.intern(name),
            Type::Primitive(PrimitiveKind::I64),
            Span::new(0, 1),
            false,
            depth,
        )
    }

    #[test]
    fn test_declare_and_resolve() {
        let interner = StringInterner::new();
        let mut table = SymbolTable::new();
        let x = interner.intern("x");
        assert!(table.declare(sym(&interner, "x", 0)).is_none());
        assert_eq!(table.resolve(x).map(|s| s.name), Some(x));
    }

    #[test]
    fn test_redeclaration_returns_prior() {
        let interner = StringInterner::new();
        let mut table = SymbolTable::new();
        table.declare(sym(&interner, "x", 0));
        let prior = table.declare(sym(&interner, "x", 0));
        assert!(prior.is_some());
    }

    #[test]
    fn test_shadowing_in_nested_scope_is_not_a_conflict() {
        let interner = StringInterner::new();
        let mut table = SymbolTable::new();
        table.declare(sym(&interner, "x", 0));
        table.enter_scope();
        let conflict = table.declare(sym(&interner, "x", 1));
        assert!(conflict.is_none());
        table.exit_scope();
    }

    #[test]
    fn test_resolve_walks_outward() {
        let interner = StringInterner::new();
        let mut table = SymbolTable::new();
        let outer = interner.intern("outer");
        table.declare(sym(&interner, "outer", 0));
        table.enter_scope();
        assert!(table.resolve(outer).is_some());
        table.exit_scope();
    }

    #[test]
    fn test_module_scope_is_depth_zero() {
        let mut table = SymbolTable::new();
        assert_eq!(table.depth(), 0);
        assert!(table.is_module_scope());
        table.enter_scope();
        assert_eq!(table.depth(), 1);
        assert!(!table.is_module_scope());
    }

    #[test]
    #[should_panic(expected = "cannot exit the module scope")]
    fn test_cannot_exit_module_scope() {
        let mut table = SymbolTable::new();
        table.exit_scope();
    }
}
