//! Resolves a parser-produced `TypeNode` into a checker `Type`.
//!
//! Shared by Pass 2 (every declaration's annotations) and Pass 3 (`is`,
//! `sizeof<T>`, `retype<T>`, `catch (e as T)`).

use angara_diagnostic::{Diagnostic, DiagnosticQueue, ErrorCode};
use angara_ir::ast::TypeNode;
use angara_ir::{SharedInterner, Span};
use angara_symtab::SymbolTable;
use angara_types::{FunctionType, PrimitiveKind, Type, TypeRegistry};
use rustc_hash::FxHashMap;
use std::rc::Rc;

/// Builtin nominal type names that aren't primitives but also aren't
/// user-declared — the runtime's opaque handle types.
fn builtin_nominal(text: &str) -> Option<Type> {
    match text {
        "Thread" => Some(Type::Thread),
        "Mutex" => Some(Type::Mutex),
        "Exception" => Some(Type::Exception),
        "CPtr" => Some(Type::CPtr),
        "Any" => Some(Type::Any),
        _ => None,
    }
}

pub fn resolve_type_node(
    node: &TypeNode,
    symbols: &SymbolTable,
    interner: &SharedInterner,
    diagnostics: &mut DiagnosticQueue,
    span: Span,
) -> Type {
    match node {
        TypeNode::Simple(name) => {
            let text = interner.lookup(*name);
            if let Some(prim) = PrimitiveKind::from_name(text) {
                return TypeRegistry::primitive(prim);
            }
            if let Some(builtin) = builtin_nominal(text) {
                return builtin;
            }
            match symbols.resolve(*name) {
                Some(sym) => match &sym.ty {
                    Type::Class(_) => TypeRegistry::instance_of(&sym.ty).unwrap_or(Type::Error),
                    other => other.clone(),
                },
                None => {
                    diagnostics.push(
                        Diagnostic::error(ErrorCode::E1001UndefinedName)
                            .with_message(format!("unknown type `{text}`"))
                            .with_label(span, "not a primitive or a declared type"),
                    );
                    Type::Error
                }
            }
        }
        TypeNode::Generic { name, args } => {
            let text = interner.lookup(*name);
            if text == "list" && args.len() == 1 {
                let element = resolve_type_node(&args[0], symbols, interner, diagnostics, span);
                return Type::List(Rc::new(element));
            }
            diagnostics.push(
                Diagnostic::error(ErrorCode::E1001UndefinedName)
                    .with_message(format!("unknown generic type `{text}`"))
                    .with_label(span, "only `list<T>` is a valid generic type"),
            );
            Type::Error
        }
        TypeNode::Optional(inner) => {
            resolve_type_node(inner, symbols, interner, diagnostics, span).optional()
        }
        TypeNode::InlineRecord(fields) => {
            let mut map = FxHashMap::default();
            for (name, field_node) in fields {
                map.insert(*name, resolve_type_node(field_node, symbols, interner, diagnostics, span));
            }
            Type::Record(Rc::new(map))
        }
        TypeNode::InlineFunction { params, ret } => {
            let params = params
                .iter()
                .map(|p| resolve_type_node(p, symbols, interner, diagnostics, span))
                .collect();
            let ret = resolve_type_node(ret, symbols, interner, diagnostics, span);
            Type::Function(Rc::new(FunctionType::new(params, ret, false)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use angara_diagnostic::DiagnosticConfig;

    #[test]
    fn test_resolve_primitive() {
        let interner = SharedInterner::default();
        let symbols = SymbolTable::new();
        let mut diagnostics = DiagnosticQueue::new(DiagnosticConfig::default());
        let node = TypeNode::Simple(interner.intern("i64"));
        let ty = resolve_type_node(&node, &symbols, &interner, &mut diagnostics, Span::DUMMY);
        assert_eq!(ty, Type::Primitive(PrimitiveKind::I64));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_resolve_list_of_primitive() {
        let interner = SharedInterner::default();
        let symbols = SymbolTable::new();
        let mut diagnostics = DiagnosticQueue::new(DiagnosticConfig::default());
        let node = TypeNode::Generic {
            name: interner.intern("list"),
            args: vec![TypeNode::Simple(interner.intern("string"))],
        };
        let ty = resolve_type_node(&node, &symbols, &interner, &mut diagnostics, Span::DUMMY);
        assert_eq!(ty, Type::List(Rc::new(Type::Primitive(PrimitiveKind::String))));
    }

    #[test]
    fn test_resolve_optional() {
        let interner = SharedInterner::default();
        let symbols = SymbolTable::new();
        let mut diagnostics = DiagnosticQueue::new(DiagnosticConfig::default());
        let node = TypeNode::Optional(Box::new(TypeNode::Simple(interner.intern("bool"))));
        let ty = resolve_type_node(&node, &symbols, &interner, &mut diagnostics, Span::DUMMY);
        assert_eq!(ty, Type::Primitive(PrimitiveKind::Bool).optional());
    }

    #[test]
    fn test_unknown_type_name_errors() {
        let interner = SharedInterner::default();
        let symbols = SymbolTable::new();
        let mut diagnostics = DiagnosticQueue::new(DiagnosticConfig::default());
        let node = TypeNode::Simple(interner.intern("Frobnicator"));
        let ty = resolve_type_node(&node, &symbols, &interner, &mut diagnostics, Span::DUMMY);
        assert_eq!(ty, Type::Error);
        assert_eq!(diagnostics.error_count(), 1);
    }
}
