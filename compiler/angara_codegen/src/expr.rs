//! Expression lowering (§4.6).
//!
//! `emit_expr` recurses bottom-up and returns the C expression text for an
//! `ExprId`. Every Angara value is boxed as `AngaraObject` (`ctype.rs`), so
//! arithmetic and comparisons round-trip through the runtime's unboxing
//! accessors (`AS_I64`/`AS_F64`/`AS_BOOL`) and reboxing constructors
//! instead of compiling to bare C operators directly.
//!
//! A handful of forms (`ListLiteral`, `RecordLiteral`, `Match`) need more
//! than one C statement to build their value; those write their setup
//! through `ctx.write_s` before returning the name of the temporary that
//! holds the result.

use crate::call_kind::{classify, CallKind};
use crate::context::CodegenContext;
use crate::{ctype, hierarchy, mangle, runtime};
use angara_ir::ast::{AssignOp, BinaryOp, ExprKind, LogicalOp, TypeNode, UnaryOp, UpdateOp};
use angara_ir::ExprId;
use angara_types::{PrimitiveKind, Type};

pub fn emit_expr(ctx: &mut CodegenContext<'_>, id: ExprId) -> String {
    let expr = ctx.arena.get_expr(id).clone();
    match expr.kind {
        ExprKind::IntLiteral(n) => format!("{}(INT64_C({n}))", runtime::CREATE_I64),
        ExprKind::FloatLiteral(bits) => emit_float_literal(bits),
        ExprKind::StringLiteral(name) => {
            let text = ctx.interner.lookup(name).to_string();
            format!("{}({})", runtime::STRING_FROM_C, emit_c_string_literal(&text))
        }
        ExprKind::BoolLiteral(b) => format!("{}({})", runtime::CREATE_BOOL, b),
        ExprKind::NilLiteral => format!("{}()", runtime::CREATE_NIL),
        ExprKind::Ident(name) => emit_ident(ctx, id, name),
        ExprKind::This => "this".to_string(),
        ExprKind::Super(_) => "this".to_string(),
        ExprKind::Unary { op, operand } => emit_unary(ctx, op, operand),
        ExprKind::Binary { op, left, right } => emit_binary(ctx, op, left, right),
        ExprKind::Logical { op, left, right } => emit_logical(ctx, op, left, right),
        ExprKind::Ternary { cond, then_branch, else_branch } => {
            let cond_c = unbox_bool(ctx, cond);
            let then_c = emit_expr(ctx, then_branch);
            let else_c = emit_expr(ctx, else_branch);
            format!("({cond_c} ? {then_c} : {else_c})")
        }
        ExprKind::Assign { target, op, value } => emit_assign(ctx, target, op, value),
        ExprKind::Update { target, op, prefix } => emit_update(ctx, target, op, prefix),
        ExprKind::Call { callee, args } => emit_call(ctx, callee, args),
        ExprKind::PropertyGet { object, optional, name } => emit_property_get(ctx, object, optional, name),
        ExprKind::Subscript { object, index } => emit_subscript(ctx, object, index),
        ExprKind::ListLiteral(range) => emit_list_literal(ctx, range),
        ExprKind::RecordLiteral(range) => emit_record_literal(ctx, range),
        ExprKind::Is { object, type_node } => emit_is(ctx, object, &type_node),
        ExprKind::Match { scrutinee, arms } => emit_match(ctx, scrutinee, arms),
        ExprKind::Sizeof(type_node) => emit_sizeof(ctx, id, &type_node),
        ExprKind::Retype { type_node, expr: inner } => emit_retype(ctx, &type_node, inner),
        ExprKind::Error => format!("{}()", runtime::CREATE_NIL),
    }
}

fn emit_float_literal(bits: u64) -> String {
    let f = f64::from_bits(bits);
    let body = if f.is_nan() {
        "NAN".to_string()
    } else if f.is_infinite() {
        if f.is_sign_positive() { "INFINITY".to_string() } else { "-INFINITY".to_string() }
    } else {
        format!("{f:?}")
    };
    format!("{}({body})", runtime::CREATE_F64)
}

fn emit_c_string_literal(s: &str) -> String {
    let escaped: String = s
        .chars()
        .flat_map(|c| match c {
            '\\' => vec!['\\', '\\'],
            '"' => vec!['\\', '"'],
            '\n' => vec!['\\', 'n'],
            '\r' => vec!['\\', 'r'],
            '\t' => vec!['\\', 't'],
            '\0' => vec!['\\', '0'],
            c => vec![c],
        })
        .collect();
    format!("\"{escaped}\"")
}

fn emit_ident(ctx: &mut CodegenContext<'_>, id: ExprId, name: angara_ir::Name) -> String {
    let text = ctx.interner.lookup(name).to_string();
    if ctx.is_local(name) {
        return mangle::sanitize(&text);
    }
    let is_main = text == "main";
    let owner_module = ctx.var_origin(id).map(|origin| ctx.interner.lookup(origin).to_string());
    let module = owner_module.unwrap_or_else(|| ctx.module_name.clone());
    let ty = ctx.expr_type(id);
    if is_main {
        return mangle::main_closure();
    }
    if matches!(ty, Type::Function(_)) {
        return mangle::function_closure(&module, &text);
    }
    mangle::module_var(&module, &text)
}

fn unbox_bool(ctx: &mut CodegenContext<'_>, id: ExprId) -> String {
    format!("{}({})", runtime::AS_BOOL, emit_expr(ctx, id))
}

fn is_float_ty(ty: &Type) -> bool {
    matches!(ty, Type::Primitive(p) if p.is_float())
}

fn is_string_ty(ty: &Type) -> bool {
    matches!(ty, Type::Primitive(PrimitiveKind::String))
}

fn emit_unary(ctx: &mut CodegenContext<'_>, op: UnaryOp, operand: ExprId) -> String {
    let operand_ty = ctx.expr_type(operand);
    let operand_c = emit_expr(ctx, operand);
    match op {
        UnaryOp::Not => format!("{}(!{}({}))", runtime::CREATE_BOOL, runtime::AS_BOOL, operand_c),
        UnaryOp::Neg if is_float_ty(&operand_ty) => {
            format!("{}(-{}({}))", runtime::CREATE_F64, runtime::AS_F64, operand_c)
        }
        UnaryOp::Neg => format!("{}(-{}({}))", runtime::CREATE_I64, runtime::AS_I64, operand_c),
    }
}

fn emit_binary(ctx: &mut CodegenContext<'_>, op: BinaryOp, left: ExprId, right: ExprId) -> String {
    let left_ty = ctx.expr_type(left);
    let left_c = emit_expr(ctx, left);
    let right_c = emit_expr(ctx, right);
    let floaty = is_float_ty(&left_ty);
    let unbox = if floaty { runtime::AS_F64 } else { runtime::AS_I64 };
    let rebox = if floaty { runtime::CREATE_F64 } else { runtime::CREATE_I64 };
    match op {
        BinaryOp::Add if is_string_ty(&left_ty) => {
            format!("{}({left_c}, {right_c})", runtime::STRING_CONCAT)
        }
        BinaryOp::Add => format!("{rebox}({unbox}({left_c}) + {unbox}({right_c}))"),
        BinaryOp::Sub => format!("{rebox}({unbox}({left_c}) - {unbox}({right_c}))"),
        BinaryOp::Mul => format!("{rebox}({unbox}({left_c}) * {unbox}({right_c}))"),
        BinaryOp::Div => format!("{rebox}({unbox}({left_c}) / {unbox}({right_c}))"),
        BinaryOp::Mod => format!("{}({}({left_c}) % {}({right_c}))", runtime::CREATE_I64, runtime::AS_I64, runtime::AS_I64),
        BinaryOp::Eq => format!("{}({}({left_c}, {right_c}))", runtime::CREATE_BOOL, runtime::VALUES_EQUAL),
        BinaryOp::NotEq => format!("{}(!{}({left_c}, {right_c}))", runtime::CREATE_BOOL, runtime::VALUES_EQUAL),
        BinaryOp::Lt => format!("{}({unbox}({left_c}) < {unbox}({right_c}))", runtime::CREATE_BOOL),
        BinaryOp::LtEq => format!("{}({unbox}({left_c}) <= {unbox}({right_c}))", runtime::CREATE_BOOL),
        BinaryOp::Gt => format!("{}({unbox}({left_c}) > {unbox}({right_c}))", runtime::CREATE_BOOL),
        BinaryOp::GtEq => format!("{}({unbox}({left_c}) >= {unbox}({right_c}))", runtime::CREATE_BOOL),
        BinaryOp::BitAnd => format!(
            "{}({}({left_c}) & {}({right_c}))",
            runtime::CREATE_I64,
            runtime::AS_I64,
            runtime::AS_I64
        ),
        BinaryOp::BitOr => format!(
            "{}({}({left_c}) | {}({right_c}))",
            runtime::CREATE_I64,
            runtime::AS_I64,
            runtime::AS_I64
        ),
        BinaryOp::BitXor => format!(
            "{}({}({left_c}) ^ {}({right_c}))",
            runtime::CREATE_I64,
            runtime::AS_I64,
            runtime::AS_I64
        ),
        BinaryOp::Shl => format!(
            "{}({}({left_c}) << {}({right_c}))",
            runtime::CREATE_I64,
            runtime::AS_I64,
            runtime::AS_I64
        ),
        BinaryOp::Shr => format!(
            "{}({}({left_c}) >> {}({right_c}))",
            runtime::CREATE_I64,
            runtime::AS_I64,
            runtime::AS_I64
        ),
    }
}

/// Short-circuiting is preserved at the C level: each operand's own text
/// (including any prior `write_s` side effects baked into its temp) is
/// embedded directly under `&&`/`||`, so C's short-circuit applies to the
/// unboxing call itself. A sub-expression whose lowering required *earlier*
/// statements of its own (a nested `match` or list literal) still runs
/// those eagerly regardless of which side of the branch is taken — the one
/// corner this simplification doesn't cover.
fn emit_logical(ctx: &mut CodegenContext<'_>, op: LogicalOp, left: ExprId, right: ExprId) -> String {
    match op {
        LogicalOp::And => {
            let l = unbox_bool(ctx, left);
            let r = unbox_bool(ctx, right);
            format!("{}({l} && {r})", runtime::CREATE_BOOL)
        }
        LogicalOp::Or => {
            let l = unbox_bool(ctx, left);
            let r = unbox_bool(ctx, right);
            format!("{}({l} || {r})", runtime::CREATE_BOOL)
        }
        LogicalOp::Coalesce => {
            let l = emit_expr(ctx, left);
            let tmp = ctx.fresh_temp();
            ctx.write_s(&format!("{} {tmp} = {l};", ctype::VALUE_TYPE));
            let r = emit_expr(ctx, right);
            format!("(!{}({tmp}) ? {tmp} : {r})", runtime::IS_NIL)
        }
    }
}

/// The C lvalue text for an assignment/update target. `Subscript` targets
/// never reach here — `emit_store` handles them directly since a list/
/// record element has no C lvalue form, only setter calls.
fn lvalue(ctx: &mut CodegenContext<'_>, target: ExprId) -> String {
    let expr = ctx.arena.get_expr(target).clone();
    match expr.kind {
        ExprKind::Ident(name) => emit_ident(ctx, target, name),
        ExprKind::PropertyGet { object, name, .. } => {
            let object_ty = ctx.expr_type(object).unwrap_optional();
            let object_c = emit_expr(ctx, object);
            let field = ctx.name(name);
            match object_ty {
                Type::Instance(class_rc) => {
                    let class_name = ctx.name(class_rc.borrow().name);
                    format!("(({}*){}({object_c}))->{field}", mangle::struct_name(&class_name), runtime::AS_OBJ)
                }
                Type::Data(data_rc) => {
                    let data_name = ctx.name(data_rc.borrow().name);
                    format!("(({}*){}({object_c}))->{field}", mangle::struct_name(&data_name), runtime::AS_OBJ)
                }
                Type::Module(module_rc) => {
                    let module_name = ctx.name(module_rc.borrow().name);
                    mangle::module_var(&module_name, &field)
                }
                _ => format!("/* unsupported lvalue */ {object_c}"),
            }
        }
        _ => "/* unsupported lvalue */".to_string(),
    }
}

fn emit_assign(ctx: &mut CodegenContext<'_>, target: ExprId, op: AssignOp, value: ExprId) -> String {
    let value_c = if let Some(binop) = op.as_binary_op() {
        emit_binary(ctx, binop, target, value)
    } else {
        emit_expr(ctx, value)
    };
    emit_store(ctx, target, &value_c)
}

/// Stores `value_c` into `target`, returning a C expression yielding the
/// stored value (so assignment composes as an expression, e.g. `x = y = 1`).
fn emit_store(ctx: &mut CodegenContext<'_>, target: ExprId, value_c: &str) -> String {
    let expr = ctx.arena.get_expr(target).clone();
    match expr.kind {
        ExprKind::Subscript { object, index } => {
            let object_c = emit_expr(ctx, object);
            let index_c = emit_expr(ctx, index);
            let object_ty = ctx.expr_type(object).unwrap_optional();
            let (setter, idx_expr) = if matches!(object_ty, Type::List(_)) {
                (runtime::LIST_SET, format!("{}({index_c})", runtime::AS_I64))
            } else {
                (runtime::RECORD_SET, index_c)
            };
            let tmp = ctx.fresh_temp();
            ctx.write_s(&format!("{} {tmp} = {value_c};", ctype::VALUE_TYPE));
            ctx.write_s(&format!("{setter}({object_c}, {idx_expr}, {tmp});"));
            tmp
        }
        _ => {
            let lv = lvalue(ctx, target);
            format!("({lv} = {value_c})")
        }
    }
}

fn emit_update(ctx: &mut CodegenContext<'_>, target: ExprId, op: UpdateOp, prefix: bool) -> String {
    let delta = match op {
        UpdateOp::Increment => "+",
        UpdateOp::Decrement => "-",
    };
    let target_ty = ctx.expr_type(target);
    let unbox = if is_float_ty(&target_ty) { runtime::AS_F64 } else { runtime::AS_I64 };
    let rebox = if is_float_ty(&target_ty) { runtime::CREATE_F64 } else { runtime::CREATE_I64 };
    let lv = lvalue(ctx, target);
    if prefix {
        format!("({lv} = {rebox}({unbox}({lv}) {delta} 1))")
    } else {
        let tmp = ctx.fresh_temp();
        ctx.write_s(&format!("{} {tmp} = {lv};", ctype::VALUE_TYPE));
        ctx.write_s(&format!("{lv} = {rebox}({unbox}({lv}) {delta} 1);"));
        tmp
    }
}

fn emit_args(ctx: &mut CodegenContext<'_>, args: angara_ir::ExprRange) -> Vec<String> {
    ctx.arena.get_expr_list(args).to_vec().iter().map(|&a| emit_expr(ctx, a)).collect()
}

fn emit_call(ctx: &mut CodegenContext<'_>, callee: ExprId, args: angara_ir::ExprRange) -> String {
    let kind = classify(ctx, callee);
    let arg_strs = emit_args(ctx, args);
    let joined = arg_strs.join(", ");
    match kind {
        CallKind::AngaraFunction => {
            let callee_expr = ctx.arena.get_expr(callee).clone();
            if let ExprKind::Ident(name) = callee_expr.kind {
                let text = ctx.interner.lookup(name).to_string();
                if !ctx.is_local(name) {
                    let module = ctx.var_origin(callee).map_or_else(|| ctx.module_name.clone(), |m| ctx.interner.lookup(m).to_string());
                    let c_name = if text == "main" { mangle::main_function() } else { mangle::function(&module, &text) };
                    return format!("{c_name}({joined})");
                }
            }
            if let ExprKind::PropertyGet { object, name, .. } = callee_expr.kind {
                let object_ty = ctx.expr_type(object).unwrap_optional();
                if let Type::Instance(class_rc) = &object_ty {
                    let chain = hierarchy::ancestor_chain(class_rc);
                    let owner_idx = hierarchy::effective_method_owner(&chain, name, chain.len() - 1);
                    let owner_name = ctx.name(chain[owner_idx].borrow().name);
                    let method_name = ctx.name(name);
                    let recv_c = emit_expr(ctx, object);
                    let all = if joined.is_empty() { recv_c } else { format!("{recv_c}, {joined}") };
                    return format!("{}({all})", mangle::method(&owner_name, &method_name));
                }
            }
            let closure_c = emit_expr(ctx, callee);
            let argv = if arg_strs.is_empty() {
                "NULL".to_string()
            } else {
                format!("({}[]){{{joined}}}", ctype::VALUE_TYPE)
            };
            format!("{}({closure_c}, {}, {argv})", runtime::CALL_CLOSURE, arg_strs.len())
        }
        CallKind::NativeImport { module, symbol } => {
            let proto = ctx.ensure_native_prototype(module, symbol);
            let argv = if arg_strs.is_empty() {
                "NULL".to_string()
            } else {
                format!("({}[]){{ {joined} }}", ctype::VALUE_TYPE)
            };
            format!("{proto}({}, {argv})", arg_strs.len())
        }
        CallKind::ClassConstructor => {
            let ty = ctx.expr_type(callee);
            let Type::Class(class_rc) = ty else { return format!("/* bad class ctor */({joined})") };
            let class_name = ctx.name(class_rc.borrow().name);
            format!("{}({joined})", mangle::class_new(&class_name))
        }
        CallKind::DataConstructor => {
            let ty = ctx.expr_type(callee);
            let Type::Data(data_rc) = ty else { return format!("/* bad data ctor */({joined})") };
            let data_name = ctx.name(data_rc.borrow().name);
            format!("{}({joined})", mangle::data_new(&data_name))
        }
        CallKind::EnumVariantConstructor { enum_name, variant } => {
            let enum_n = ctx.name(enum_name);
            let variant_n = ctx.name(variant);
            format!("{}({joined})", mangle::enum_variant_ctor(&enum_n, &variant_n))
        }
        CallKind::Spawn => format!("{}({joined})", runtime::THREAD_SPAWN),
    }
}

fn emit_property_get(ctx: &mut CodegenContext<'_>, object: ExprId, optional: bool, name: angara_ir::Name) -> String {
    let object_ty = ctx.expr_type(object).unwrap_optional();
    let object_c = emit_expr(ctx, object);
    let field = ctx.name(name);
    let base = match &object_ty {
        Type::Instance(class_rc) => {
            let chain = hierarchy::ancestor_chain(class_rc);
            let class_name = ctx.name(class_rc.borrow().name);
            if chain.iter().any(|c| c.borrow().fields.contains_key(&name)) {
                format!("(({}*){}({object_c}))->{field}", mangle::struct_name(&class_name), runtime::AS_OBJ)
            } else {
                let owner_idx = hierarchy::effective_method_owner(&chain, name, chain.len() - 1);
                let owner_name = ctx.name(chain[owner_idx].borrow().name);
                format!("{}({object_c})", mangle::method(&owner_name, &field))
            }
        }
        Type::Data(data_rc) => {
            let data_name = ctx.name(data_rc.borrow().name);
            format!("(({}*){}({object_c}))->{field}", mangle::struct_name(&data_name), runtime::AS_OBJ)
        }
        Type::Enum(enum_rc) => {
            let enum_name = ctx.name(enum_rc.borrow().name);
            format!("{}()", mangle::enum_variant_ctor(&enum_name, &field))
        }
        Type::Module(module_rc) => {
            let b = module_rc.borrow();
            let module_name = ctx.name(b.name);
            if b.exports.get(&name).is_some_and(|t| matches!(t, Type::Function(_))) {
                mangle::function_closure(&module_name, &field)
            } else {
                mangle::module_var(&module_name, &field)
            }
        }
        Type::List(_) if field == "len" => format!("{}({object_c})", runtime::LIST_LEN),
        Type::Record(_) => format!("{}({object_c}, {})", runtime::RECORD_GET, emit_c_string_literal(&field)),
        _ => format!("/* unsupported property get */ {object_c}"),
    };
    if optional {
        format!("({}({object_c}) ? {base} : {}())", runtime::IS_NIL, runtime::CREATE_NIL)
    } else {
        base
    }
}

fn emit_subscript(ctx: &mut CodegenContext<'_>, object: ExprId, index: ExprId) -> String {
    let object_ty = ctx.expr_type(object).unwrap_optional();
    let object_c = emit_expr(ctx, object);
    let index_c = emit_expr(ctx, index);
    match object_ty {
        Type::List(_) => format!("{}({object_c}, {}({index_c}))", runtime::LIST_GET, runtime::AS_I64),
        _ => format!("{}({object_c}, {index_c})", runtime::RECORD_GET),
    }
}

fn emit_list_literal(ctx: &mut CodegenContext<'_>, range: angara_ir::ExprRange) -> String {
    let elems: Vec<ExprId> = ctx.arena.get_expr_list(range).to_vec();
    let tmp = ctx.fresh_temp();
    ctx.write_s(&format!("{} {tmp} = {}();", ctype::VALUE_TYPE, runtime::LIST_NEW));
    for elem in elems {
        let e = emit_expr(ctx, elem);
        ctx.write_s(&format!("{}({tmp}, {e});", runtime::LIST_PUSH));
    }
    tmp
}

fn emit_record_literal(ctx: &mut CodegenContext<'_>, range: angara_ir::FieldInitRange) -> String {
    let inits = ctx.arena.get_field_inits(range).to_vec();
    let tmp = ctx.fresh_temp();
    ctx.write_s(&format!("{} {tmp} = {}();", ctype::VALUE_TYPE, runtime::RECORD_NEW));
    for init in inits {
        let v = emit_expr(ctx, init.value);
        let key = ctx.name(init.name);
        ctx.write_s(&format!("{}({tmp}, {}, {v});", runtime::RECORD_SET, emit_c_string_literal(&key)));
    }
    tmp
}

fn type_node_tag(ctx: &mut CodegenContext<'_>, node: &TypeNode) -> String {
    match node {
        TypeNode::Simple(name) => ctx.name(*name),
        TypeNode::Generic { name, .. } => ctx.name(*name),
        TypeNode::Optional(inner) => type_node_tag(ctx, inner),
        TypeNode::InlineRecord(_) => "record".to_string(),
        TypeNode::InlineFunction { .. } => "function".to_string(),
    }
}

fn emit_is(ctx: &mut CodegenContext<'_>, object: ExprId, node: &TypeNode) -> String {
    let object_c = emit_expr(ctx, object);
    let tag = type_node_tag(ctx, node);
    format!("{}({}({object_c}, {}))", runtime::CREATE_BOOL, runtime::IS_TYPE, emit_c_string_literal(&tag))
}

fn emit_match(ctx: &mut CodegenContext<'_>, scrutinee: ExprId, arms: angara_ir::ArmRange) -> String {
    let s_expr = emit_expr(ctx, scrutinee);
    let s_ty = ctx.expr_type(scrutinee);
    let s_tmp = ctx.fresh_temp();
    ctx.write_s(&format!("{} {s_tmp} = {s_expr};", ctype::VALUE_TYPE));
    let result_tmp = ctx.fresh_temp();
    ctx.write_s(&format!("{} {result_tmp};", ctype::VALUE_TYPE));

    let enum_name = match &s_ty {
        Type::Enum(rc) => Some(ctx.name(rc.borrow().name)),
        _ => None,
    };

    let arm_list = ctx.arena.get_arms(arms).to_vec();
    for (i, arm) in arm_list.iter().enumerate() {
        let branch_word = if i == 0 { "if" } else { "} else if" };
        let (header_line, cast_info) = match (arm.pattern, &enum_name) {
            (Some(pattern_id), Some(enum_n)) => {
                let variant = match ctx.arena.get_expr(pattern_id).kind.clone() {
                    ExprKind::PropertyGet { name, .. } => ctx.name(name),
                    _ => String::new(),
                };
                let tag_value = mangle::enum_tag_value(enum_n, &variant);
                let struct_cast = format!("(({}*){}({s_tmp}))", mangle::struct_name(enum_n), runtime::AS_OBJ);
                let cond = format!("{struct_cast}->tag == {tag_value}");
                (format!("{branch_word} ({cond}) {{"), Some((struct_cast, variant)))
            }
            // The wildcard arm, or a non-enum scrutinee matched structurally elsewhere —
            // either way the last arm always matches.
            _ => (if i == 0 { "if (1) {".to_string() } else { "} else {".to_string() }, None),
        };
        ctx.write_s(&header_line);
        ctx.indent();
        ctx.enter_local_scope();
        if let (Some(binding), Some((struct_cast, variant))) = (arm.binding, cast_info) {
            let bind_name = ctx.name(binding);
            ctx.write_s(&format!("{} {bind_name} = {struct_cast}->payload.{variant};", ctype::VALUE_TYPE));
            ctx.declare_local(binding);
        }
        let body_c = emit_expr(ctx, arm.body);
        ctx.write_s(&format!("{result_tmp} = {body_c};"));
        ctx.exit_local_scope();
        ctx.dedent();
    }
    ctx.write_s("}");
    result_tmp
}

fn emit_sizeof(ctx: &mut CodegenContext<'_>, id: ExprId, node: &TypeNode) -> String {
    let ty = ctx.sizeof_type(id).unwrap_or(Type::Any);
    let tag = type_node_tag(ctx, node);
    let c_type_name = ctype::native_size_type(&ty, || Some(mangle::struct_name(&tag)));
    format!("{}((int64_t)sizeof({c_type_name}))", runtime::CREATE_I64)
}

fn emit_retype(ctx: &mut CodegenContext<'_>, node: &TypeNode, inner: ExprId) -> String {
    let inner_c = emit_expr(ctx, inner);
    let tag = type_node_tag(ctx, node);
    format!("{}({inner_c})", mangle::foreign_retype(&tag))
}
