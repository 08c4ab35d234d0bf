//! Statement lowering: a recursive `emit_stmt`/`emit_block` walk.
//! `if`/`while`/`for` all compile to their direct C counterparts since
//! Angara's control flow is statement-shaped.

use crate::context::CodegenContext;
use crate::{ctype, expr, runtime};
use angara_ir::ast::{IfCond, Param, Stmt, StmtKind};
use angara_ir::StmtId;

/// Emits a function/method body as a brace-delimited block, opening a fresh
/// local scope seeded with `params` (and `this`, if `has_this`).
pub fn emit_function_body(
    ctx: &mut CodegenContext<'_>,
    c_name: &str,
    has_this: Option<&str>,
    params: &[Param],
    body: StmtId,
) {
    let mut sig_params = Vec::new();
    if has_this.is_some() {
        sig_params.push(format!("{} this", ctype::VALUE_TYPE));
    }
    for p in params {
        sig_params.push(format!("{} {}", ctype::VALUE_TYPE, ctx.name(p.name)));
    }
    let sig = format!("{} {c_name}({})", ctype::VALUE_TYPE, sig_params.join(", "));
    ctx.write_h(&format!("{sig};"));
    ctx.write_s(&format!("{sig} {{"));
    ctx.indent();
    ctx.enter_local_scope();
    for p in params {
        ctx.declare_local(p.name);
    }
    emit_stmt_children(ctx, body);
    ctx.write_s(&format!("return {}();", runtime::CREATE_NIL));
    ctx.exit_local_scope();
    ctx.dedent();
    ctx.write_s("}");
    ctx.blank_s();
}

/// The statements making up `id`'s body: its own inner list if it's a
/// `Block`, or the single statement otherwise (control-flow bodies that
/// weren't parsed as an explicit block still need to be iterable the same
/// way).
fn body_stmts(ctx: &CodegenContext<'_>, id: StmtId) -> Vec<Stmt> {
    let stmt = ctx.arena.get_stmt(id);
    match &stmt.kind {
        StmtKind::Block(range) => ctx.arena.get_stmt_list(*range).to_vec(),
        _ => vec![stmt.clone()],
    }
}

fn emit_stmt_children(ctx: &mut CodegenContext<'_>, id: StmtId) {
    for stmt in body_stmts(ctx, id) {
        emit_stmt(ctx, &stmt);
    }
}

pub fn emit_stmt(ctx: &mut CodegenContext<'_>, stmt: &Stmt) {
    match &stmt.kind {
        StmtKind::ExprStmt(id) => {
            let e = expr::emit_expr(ctx, *id);
            ctx.write_s(&format!("{e};"));
        }
        StmtKind::VarDecl { name, initializer, .. } => {
            let init = initializer.map_or_else(|| format!("{}()", runtime::CREATE_NIL), |id| expr::emit_expr(ctx, id));
            let local_name = ctx.name(*name);
            ctx.write_s(&format!("{} {local_name} = {init};", ctype::VALUE_TYPE));
            ctx.declare_local(*name);
        }
        StmtKind::Block(range) => {
            ctx.write_s("{");
            ctx.indent();
            ctx.enter_local_scope();
            for inner in ctx.arena.get_stmt_list(*range).to_vec() {
                emit_stmt(ctx, &inner);
            }
            ctx.exit_local_scope();
            ctx.dedent();
            ctx.write_s("}");
        }
        StmtKind::If { cond, then_branch, else_branch } => emit_if(ctx, cond, *then_branch, *else_branch),
        StmtKind::While { cond, body } => {
            let c = expr::emit_expr(ctx, *cond);
            ctx.write_s(&format!("while ({}({c})) {{", runtime::AS_BOOL));
            ctx.indent();
            ctx.enter_local_scope();
            emit_stmt_children(ctx, *body);
            ctx.exit_local_scope();
            ctx.dedent();
            ctx.write_s("}");
        }
        StmtKind::CFor { init, cond, update, body } => {
            ctx.write_s("{");
            ctx.indent();
            ctx.enter_local_scope();
            if let Some(init_id) = init {
                emit_stmt_children(ctx, *init_id);
            }
            let cond_c = cond.map_or_else(|| "true".to_string(), |c| format!("{}({})", runtime::AS_BOOL, expr::emit_expr(ctx, c)));
            ctx.write_s(&format!("while ({cond_c}) {{"));
            ctx.indent();
            ctx.enter_local_scope();
            emit_stmt_children(ctx, *body);
            if let Some(update_id) = update {
                let u = expr::emit_expr(ctx, *update_id);
                ctx.write_s(&format!("{u};"));
            }
            ctx.exit_local_scope();
            ctx.dedent();
            ctx.write_s("}");
            ctx.exit_local_scope();
            ctx.dedent();
            ctx.write_s("}");
        }
        StmtKind::ForIn { var, iterable, body } => {
            let iter_c = expr::emit_expr(ctx, *iterable);
            let iter_tmp = ctx.fresh_temp();
            ctx.write_s(&format!("{} {iter_tmp} = {iter_c};", ctype::VALUE_TYPE));
            let idx_tmp = ctx.fresh_temp();
            ctx.write_s(&format!("int64_t {idx_tmp} = 0;"));
            ctx.write_s(&format!(
                "for (; {idx_tmp} < {}({}({iter_tmp})); {idx_tmp}++) {{",
                runtime::AS_I64,
                runtime::LIST_LEN
            ));
            ctx.indent();
            ctx.enter_local_scope();
            let var_name = ctx.name(*var);
            ctx.write_s(&format!(
                "{} {var_name} = {}({iter_tmp}, {}(INT64_C({idx_tmp})));",
                ctype::VALUE_TYPE,
                runtime::LIST_GET,
                runtime::CREATE_I64
            ));
            ctx.declare_local(*var);
            emit_stmt_children(ctx, *body);
            ctx.exit_local_scope();
            ctx.dedent();
            ctx.write_s("}");
        }
        StmtKind::Function(_) => {
            // Local function declarations nest as closures bound to a
            // module-scope name at check time; codegen for them is the same
            // `emit_function_body` path the module driver uses for
            // top-level functions, invoked from `module.rs` instead of here
            // so the generated C function isn't nested inside another.
        }
        StmtKind::Return(value) => {
            let v = value.map_or_else(|| format!("{}()", runtime::CREATE_NIL), |id| expr::emit_expr(ctx, id));
            ctx.write_s(&format!("return {v};"));
        }
        StmtKind::Break => ctx.write_s("break;"),
        StmtKind::Continue => ctx.write_s("continue;"),
        StmtKind::Throw(id) => {
            let v = expr::emit_expr(ctx, *id);
            ctx.write_s(&format!("{}({v});", runtime::THROW));
        }
        StmtKind::TryCatch { try_block, catch_name, catch_block, .. } => {
            ctx.write_s("{");
            ctx.indent();
            ctx.write_s(&format!("{}();", runtime::PUSH_EXCEPTION_FRAME));
            ctx.write_s(&format!("if (setjmp(*{}()) == 0) {{", runtime::EXCEPTION_JMPBUF));
            ctx.indent();
            ctx.enter_local_scope();
            emit_stmt_children(ctx, *try_block);
            ctx.exit_local_scope();
            ctx.dedent();
            ctx.write_s("} else {");
            ctx.indent();
            ctx.enter_local_scope();
            let catch_var = ctx.name(*catch_name);
            ctx.write_s(&format!("{} {catch_var} = {}();", ctype::VALUE_TYPE, runtime::TAKE_PENDING_EXCEPTION));
            ctx.declare_local(*catch_name);
            emit_stmt_children(ctx, *catch_block);
            ctx.exit_local_scope();
            ctx.dedent();
            ctx.write_s("}");
            ctx.write_s(&format!("{}();", runtime::POP_EXCEPTION_FRAME));
            ctx.dedent();
            ctx.write_s("}");
        }
        // Declarations and attachments are handled once at module top level
        // (`module.rs`); neither appears nested inside a well-formed body.
        StmtKind::Attach(_)
        | StmtKind::Class(_)
        | StmtKind::Trait(_)
        | StmtKind::Contract(_)
        | StmtKind::Data(_)
        | StmtKind::Enum(_)
        | StmtKind::ForeignHeader(_)
        | StmtKind::Error => {}
    }
}

fn emit_if(ctx: &mut CodegenContext<'_>, cond: &IfCond, then_branch: StmtId, else_branch: Option<StmtId>) {
    let (cond_c, let_binding) = match cond {
        IfCond::Expr(id) => (format!("{}({})", runtime::AS_BOOL, expr::emit_expr(ctx, *id)), None),
        IfCond::LetBinding { name, initializer } => {
            let v = expr::emit_expr(ctx, *initializer);
            let tmp = ctx.fresh_temp();
            ctx.write_s(&format!("{} {tmp} = {v};", ctype::VALUE_TYPE));
            (format!("!{}({tmp})", runtime::IS_NIL), Some((*name, tmp)))
        }
    };
    ctx.write_s(&format!("if ({cond_c}) {{"));
    ctx.indent();
    ctx.enter_local_scope();
    if let Some((name, tmp)) = &let_binding {
        let bound = ctx.name(*name);
        ctx.write_s(&format!("{} {bound} = {tmp};", ctype::VALUE_TYPE));
        ctx.declare_local(*name);
    }
    emit_stmt_children(ctx, then_branch);
    ctx.exit_local_scope();
    ctx.dedent();
    if let Some(else_id) = else_branch {
        ctx.write_s("} else {");
        ctx.indent();
        ctx.enter_local_scope();
        emit_stmt_children(ctx, else_id);
        ctx.exit_local_scope();
        ctx.dedent();
        ctx.write_s("}");
    } else {
        ctx.write_s("}");
    }
}
