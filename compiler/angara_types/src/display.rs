//! Canonical `toString` rendering, used both for diagnostics and as the
//! compare key in `Function` equality.
//!
//! The bare `Display for Type` impl below has no interner to resolve a
//! nominal type's `Name` back to source text, so it renders the raw
//! interned index (`#42`) instead — fine for the `Function` canonical
//! string's equality role, wrong for anything shown to a user.
//! `WithNames` pairs a `&Type` with a `SharedInterner` and is what every
//! diagnostic message should interpolate instead.

use crate::types::Type;
use angara_ir::SharedInterner;
use std::fmt;

/// Wraps a `&Type` with the interner needed to render its nominal names as
/// text rather than raw indices. Build with `Type::with_names` at a
/// diagnostic call site.
pub struct WithNames<'a> {
    ty: &'a Type,
    interner: &'a SharedInterner,
}

impl Type {
    #[must_use]
    pub fn with_names<'a>(&'a self, interner: &'a SharedInterner) -> WithNames<'a> {
        WithNames { ty: self, interner }
    }
}

impl fmt::Display for WithNames<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let interner = self.interner;
        let wrap = |t: &Type| t.with_names(interner);
        match self.ty {
            Type::Optional(inner) => write!(f, "{}?", wrap(inner)),
            Type::List(inner) => write!(f, "list<{}>", wrap(inner)),
            Type::Record(fields) => {
                if fields.is_empty() {
                    write!(f, "{{}}")
                } else {
                    let mut names: Vec<_> = fields.keys().collect();
                    names.sort_by_key(|n| n.index());
                    write!(f, "{{")?;
                    for (i, name) in names.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{}: {}", interner.lookup(**name), wrap(&fields[*name]))?;
                    }
                    write!(f, "}}")
                }
            }
            Type::Function(func) => {
                write!(f, "(")?;
                for (i, p) in func.params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", wrap(p))?;
                }
                if func.variadic {
                    if !func.params.is_empty() {
                        write!(f, ", ")?;
                    }
                    write!(f, "...")?;
                }
                write!(f, ") -> {}", wrap(&func.ret))
            }
            Type::Class(c) => write!(f, "{}", interner.lookup(c.borrow().name)),
            Type::Instance(c) => write!(f, "{}", interner.lookup(c.borrow().name)),
            Type::Trait(t) => write!(f, "{}", interner.lookup(t.borrow().name)),
            Type::Contract(c) => write!(f, "{}", interner.lookup(c.borrow().name)),
            Type::Data(d) => write!(f, "{}", interner.lookup(d.borrow().name)),
            Type::Enum(e) => write!(f, "{}", interner.lookup(e.borrow().name)),
            Type::Module(m) => write!(f, "{}", interner.lookup(m.borrow().name)),
            other => write!(f, "{other}"),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Primitive(p) => write!(f, "{p}"),
            Type::Nil => write!(f, "nil"),
            Type::Any => write!(f, "any"),
            Type::Optional(inner) => write!(f, "{inner}?"),
            Type::List(inner) => write!(f, "list<{inner}>"),
            Type::Record(fields) => {
                if fields.is_empty() {
                    write!(f, "{{}}")
                } else {
                    let mut names: Vec<_> = fields.keys().collect();
                    names.sort_by_key(|n| n.index());
                    write!(f, "{{")?;
                    for (i, name) in names.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        // Field names are rendered by index; a real
                        // implementation resolves through the interner at
                        // the diagnostic boundary where text is needed.
                        write!(f, "#{}: {}", name.index(), fields[name])?;
                    }
                    write!(f, "}}")
                }
            }
            Type::Function(func) => write!(f, "{}", func.canonical_string()),
            Type::Class(c) => write!(f, "#{}", c.borrow().name.index()),
            Type::Instance(c) => write!(f, "#{}", c.borrow().name.index()),
            Type::Trait(t) => write!(f, "#{}", t.borrow().name.index()),
            Type::Contract(c) => write!(f, "#{}", c.borrow().name.index()),
            Type::Data(d) => write!(f, "#{}", d.borrow().name.index()),
            Type::Enum(e) => write!(f, "#{}", e.borrow().name.index()),
            Type::Thread => write!(f, "thread"),
            Type::Mutex => write!(f, "mutex"),
            Type::Exception => write!(f, "exception"),
            Type::CPtr => write!(f, "cptr"),
            Type::Module(m) => write!(f, "#{}", m.borrow().name.index()),
            Type::Error => write!(f, "<error>"),
        }
    }
}

impl crate::types::FunctionType {
    /// The memoized canonical rendering, computed on first use.
    #[must_use]
    pub fn canonical_string(&self) -> std::rc::Rc<str> {
        if let Some(cached) = self.canonical.borrow().as_ref() {
            return cached.clone();
        }
        let mut s = String::from("(");
        for (i, p) in self.params.iter().enumerate() {
            if i > 0 {
                s.push_str(", ");
            }
            s.push_str(&p.to_string());
        }
        if self.variadic {
            if !self.params.is_empty() {
                s.push_str(", ");
            }
            s.push_str("...");
        }
        s.push_str(") -> ");
        s.push_str(&self.ret.to_string());
        let rc: std::rc::Rc<str> = std::rc::Rc::from(s.as_str());
        *self.canonical.borrow_mut() = Some(rc.clone());
        rc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FunctionType;
    use crate::PrimitiveKind;

    #[test]
    fn test_display_optional() {
        let t = Type::Primitive(PrimitiveKind::I64).optional();
        assert_eq!(t.to_string(), "i64?");
    }

    #[test]
    fn test_display_list() {
        let t = Type::List(std::rc::Rc::new(Type::Primitive(PrimitiveKind::String)));
        assert_eq!(t.to_string(), "list<string>");
    }

    #[test]
    fn test_function_canonical_memoized() {
        let func = FunctionType::new(
            vec![Type::Primitive(PrimitiveKind::I64)],
            Type::Primitive(PrimitiveKind::Bool),
            false,
        );
        let first = func.canonical_string();
        let second = func.canonical_string();
        assert_eq!(&*first, "(i64) -> bool");
        assert!(std::rc::Rc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_function_variadic_canonical() {
        let func = FunctionType::new(vec![Type::Primitive(PrimitiveKind::String)], Type::Nil, true);
        assert_eq!(&*func.canonical_string(), "(string, ...) -> nil");
    }

    #[test]
    fn test_with_names_resolves_class_name() {
        let interner = angara_ir::SharedInterner::default();
        let name = interner.intern("Point");
        let class = crate::types::ClassType::placeholder(name);
        let ty = Type::Class(std::rc::Rc::new(std::cell::RefCell::new(class)));
        assert_eq!(ty.with_names(&interner).to_string(), "Point");
        assert!(ty.to_string().starts_with('#'));
    }

    #[test]
    fn test_with_names_resolves_nested_function_param() {
        let interner = angara_ir::SharedInterner::default();
        let name = interner.intern("Widget");
        let class = crate::types::ClassType::placeholder(name);
        let class_ty = Type::Class(std::rc::Rc::new(std::cell::RefCell::new(class)));
        let func = Type::Function(std::rc::Rc::new(FunctionType::new(vec![class_ty], Type::Nil, false)));
        assert_eq!(func.with_names(&interner).to_string(), "(Widget) -> nil");
    }
}
