//! `Symbol`: `{name, type, declaration-token, is_const, scope_depth, origin_module?}`.

use angara_ir::{Name, Span};
use angara_types::Type;

#[derive(Clone)]
pub struct Symbol {
    pub name: Name,
    pub ty: Type,
    pub declaration_span: Span,
    pub is_const: bool,
    pub scope_depth: u32,
    /// Set only when the symbol was imported selectively from a module
    /// (`attach x from m;`), so the backend can mangle calls through it
    /// with the origin module's name instead of the current one.
    pub origin_module: Option<Name>,
}

impl Symbol {
    #[must_use]
    pub fn new(name: Name, ty: Type, declaration_span: Span, is_const: bool, scope_depth: u32) -> Self {
        Symbol { name, ty, declaration_span, is_const, scope_depth, origin_module: None }
    }

    #[must_use]
    pub fn with_origin_module(mut self, origin_module: Name) -> Self {
        self.origin_module = Some(origin_module);
        self
    }
}
