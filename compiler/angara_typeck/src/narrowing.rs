//! Scope-local type narrowing (§4.5 "Narrowing").
//!
//! `if (x is T)` narrows `x` to `T` for the `then`-branch only; `if let x =
//! opt` introduces a fresh binding rather than narrowing an existing one,
//! but both are represented the same way here — a stack of overrides that
//! shadow the symbol table's declared type while a branch is being checked,
//! popped back to a saved mark when the branch ends.

use angara_ir::Name;
use angara_types::Type;

#[derive(Default)]
pub struct NarrowingStack {
    stack: Vec<(Name, Type)>,
}

impl NarrowingStack {
    #[must_use]
    pub fn new() -> Self {
        NarrowingStack::default()
    }

    /// A mark to `truncate` back to once the narrowed branch is done.
    #[must_use]
    pub fn mark(&self) -> usize {
        self.stack.len()
    }

    pub fn push(&mut self, name: Name, ty: Type) {
        self.stack.push((name, ty));
    }

    pub fn truncate(&mut self, mark: usize) {
        self.stack.truncate(mark);
    }

    /// The innermost active narrowing for `name`, if any.
    #[must_use]
    pub fn current(&self, name: Name) -> Option<&Type> {
        self.stack.iter().rev().find(|(n, _)| *n == name).map(|(_, t)| t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use angara_ir::StringInterner;
    use angara_types::PrimitiveKind;

    #[test]
    fn test_push_and_lookup() {
        let interner = StringInterner::new();
        let x = interner.intern("x");
        let mut narrowing = NarrowingStack::new();
        let mark = narrowing.mark();
        narrowing.push(x, Type::Primitive(PrimitiveKind::I64));
        assert_eq!(narrowing.current(x), Some(&Type::Primitive(PrimitiveKind::I64)));
        narrowing.truncate(mark);
        assert_eq!(narrowing.current(x), None);
    }

    #[test]
    fn test_shadowing_uses_innermost() {
        let interner = StringInterner::new();
        let x = interner.intern("x");
        let mut narrowing = NarrowingStack::new();
        narrowing.push(x, Type::Primitive(PrimitiveKind::I64));
        narrowing.push(x, Type::Primitive(PrimitiveKind::String));
        assert_eq!(narrowing.current(x), Some(&Type::Primitive(PrimitiveKind::String)));
    }
}
