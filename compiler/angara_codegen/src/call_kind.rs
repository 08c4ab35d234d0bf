//! §9 "generic-call-dispatch": the transpiler must distinguish
//! Angara-owned calls (direct, strongly-typed C call) from native-module
//! calls (through the `(argc, argv)` wrapper) and from the handful of
//! call-shaped constructs that aren't calls to a `Function` value at all
//! (class/data/enum-variant construction, `spawn`).
//!
//! The redesign note asks for this to be "a variant in the lowered IR
//! rather than re-deciding during emission" — classified once per call
//! site from the checker's already-resolved types, then carried as plain
//! data into `emit_call` instead of re-inspecting the callee there.

use crate::context::CodegenContext;
use angara_ir::ast::ExprKind;
use angara_ir::{ExprId, Name};
use angara_types::Type;

#[derive(Clone, Debug)]
pub enum CallKind {
    /// A direct call to an Angara function/method/closure value.
    AngaraFunction,
    /// A call through a native module's `(argc, argv)` wrapper.
    NativeImport { module: Name, symbol: Name },
    ClassConstructor,
    DataConstructor,
    EnumVariantConstructor { enum_name: Name, variant: Name },
    Spawn,
}

/// Classify a `Call { callee, .. }` expression's callee once, from the
/// types Pass 3 already recorded for it.
#[must_use]
pub fn classify(ctx: &CodegenContext<'_>, callee: ExprId) -> CallKind {
    let callee_expr = ctx.arena.get_expr(callee);

    if let ExprKind::Ident(name) = callee_expr.kind {
        if ctx.interner.lookup(name) == "spawn" && !ctx.result.expr_types.contains_key(&callee) {
            return CallKind::Spawn;
        }
        if let Some(origin) = ctx.var_origin(callee) {
            if ctx.is_native_export(origin, name) {
                return CallKind::NativeImport { module: origin, symbol: name };
            }
        }
    }

    if let ExprKind::PropertyGet { object, name, .. } = callee_expr.kind {
        let object_ty = ctx.expr_type(object).unwrap_optional();
        if let Type::Module(module_rc) = &object_ty {
            let b = module_rc.borrow();
            if b.is_native {
                return CallKind::NativeImport { module: b.name, symbol: name };
            }
        }
        if let Type::Enum(_) = &object_ty {
            return CallKind::EnumVariantConstructor { enum_name: enum_name_of(&object_ty), variant: name };
        }
    }

    match ctx.expr_type(callee) {
        Type::Class(_) => CallKind::ClassConstructor,
        Type::Data(_) => CallKind::DataConstructor,
        _ => CallKind::AngaraFunction,
    }
}

fn enum_name_of(ty: &Type) -> Name {
    match ty {
        Type::Enum(rc) => rc.borrow().name,
        _ => unreachable!("caller already matched Type::Enum"),
    }
}
