//! Pass 3 — expression rules (§4.5 "Pass 3 — Bodies").
//!
//! One function per expression shape, each returning the expression's
//! `Type` and recording it into `self.result.expr_types`. A failed rule
//! pushes a diagnostic and returns `Type::Error`, which every caller treats
//! as a cascade sentinel rather than re-diagnosing.

use crate::checker::Checker;
use angara_diagnostic::suggest::closest_name;
use angara_diagnostic::{missing_property, Diagnostic, ErrorCode};
use angara_ir::ast::{AssignOp, BinaryOp, ExprKind, LogicalOp, TypeNode, UnaryOp, UpdateOp};
use angara_ir::{ExprId, Name, Span};
use angara_types::{
    can_assign, Access, ClassType, DataType, EnumType, FunctionType, ModuleType, PrimitiveKind, Type,
};
use std::cell::RefCell;
use std::rc::Rc;

impl<'a> Checker<'a> {
    /// Check `id`, memoize its type into the side table, and return it.
    pub(crate) fn check_expr(&mut self, id: ExprId) -> Type {
        let arena = self.arena;
        let expr = arena.get_expr(id);
        let span = expr.span;
        let ty = match expr.kind.clone() {
            ExprKind::IntLiteral(_) => Type::Primitive(PrimitiveKind::I64),
            ExprKind::FloatLiteral(_) => Type::Primitive(PrimitiveKind::F64),
            ExprKind::StringLiteral(_) => Type::Primitive(PrimitiveKind::String),
            ExprKind::BoolLiteral(_) => Type::Primitive(PrimitiveKind::Bool),
            ExprKind::NilLiteral => Type::Nil,
            ExprKind::Ident(name) => self.check_ident(id, name, span),
            ExprKind::This => self.check_this(span),
            ExprKind::Super(method) => self.check_super(method, span),
            ExprKind::Unary { op, operand } => self.check_unary(op, operand, span),
            ExprKind::Binary { op, left, right } => self.check_binary(op, left, right, span),
            ExprKind::Logical { op, left, right } => self.check_logical(op, left, right, span),
            ExprKind::Ternary { cond, then_branch, else_branch } => {
                self.check_ternary(cond, then_branch, else_branch, span)
            }
            ExprKind::Assign { target, op, value } => self.check_assign(target, op, value, span),
            ExprKind::Update { target, op, prefix } => self.check_update(target, op, prefix, span),
            ExprKind::Call { callee, args } => self.check_call(callee, args, span),
            ExprKind::PropertyGet { object, optional, name } => {
                self.check_property_get(object, optional, name, span)
            }
            ExprKind::Subscript { object, index } => self.check_subscript(object, index, span),
            ExprKind::ListLiteral(elems) => self.check_list_literal(elems, span),
            ExprKind::RecordLiteral(fields) => self.check_record_literal(fields, span),
            ExprKind::Is { object, type_node } => self.check_is(object, &type_node, span),
            ExprKind::Match { scrutinee, arms } => self.check_match(scrutinee, arms, span),
            ExprKind::Sizeof(type_node) => self.check_sizeof(id, &type_node, span),
            ExprKind::Retype { type_node, expr: inner } => self.check_retype(&type_node, inner, span),
            ExprKind::Error => Type::Error,
        };
        self.result.expr_types.insert(id, ty.clone());
        ty
    }

    pub(crate) fn err(&mut self, code: ErrorCode, span: Span, message: impl Into<String>) -> Type {
        self.diagnostics.push(Diagnostic::error(code).with_message(message).with_label(span, "here"));
        Type::Error
    }

    fn is_int_literal(&self, id: ExprId) -> bool {
        matches!(self.arena.get_expr(id).kind, ExprKind::IntLiteral(_))
    }

    fn is_empty_list_literal(&self, id: ExprId) -> bool {
        matches!(&self.arena.get_expr(id).kind, ExprKind::ListLiteral(range) if range.is_empty())
    }

    /// `can_assign`, widened by the two context-sensitive relaxations Pass 3
    /// applies at the call site of the *source* expression: an `i64`
    /// integer literal assignable to any integer target, and an empty list
    /// literal assignable to any list-typed target.
    pub(crate) fn assignable(&self, expected: &Type, actual_id: ExprId, actual: &Type) -> bool {
        if can_assign(expected, actual, self.is_int_literal(actual_id)) {
            return true;
        }
        matches!(expected, Type::List(_)) && self.is_empty_list_literal(actual_id)
    }

    pub(crate) fn truthy(&mut self, id: ExprId, span: Span) -> Type {
        let ty = self.check_expr(id);
        if ty.is_error() {
            self.err(ErrorCode::E2009NonTruthyCondition, span, "condition has no valid type")
        } else {
            Type::Primitive(PrimitiveKind::Bool)
        }
    }

    // ---- Variables, this, super ----

    fn check_ident(&mut self, id: ExprId, name: Name, span: Span) -> Type {
        if let Some(narrowed) = self.narrowing.current(name) {
            let narrowed = narrowed.clone();
            self.result.narrowed_reads.insert(id, narrowed.clone());
            self.record_origin(id, name);
            return narrowed;
        }
        match self.symbols.resolve(name) {
            Some(sym) => {
                let ty = sym.ty.clone();
                self.record_origin(id, name);
                ty
            }
            None => {
                self.diagnostics.push(angara_diagnostic::undefined_name(span, self.interner.lookup(name)));
                Type::Error
            }
        }
    }

    fn record_origin(&mut self, id: ExprId, name: Name) {
        if let Some(sym) = self.symbols.resolve(name) {
            if let Some(origin) = sym.origin_module {
                self.result.var_origins.insert(id, origin);
            }
        }
    }

    fn check_this(&mut self, span: Span) -> Type {
        match &self.current_class {
            Some(Type::Class(rc)) => Type::Instance(rc.clone()),
            _ => self.err(ErrorCode::E2019MisplacedThis, span, "`this` used outside a class method"),
        }
    }

    fn check_super(&mut self, method: Option<Name>, span: Span) -> Type {
        let Some(Type::Class(class_rc)) = self.current_class.clone() else {
            return self.err(ErrorCode::E2020MisplacedSuper, span, "`super` used outside a class method");
        };
        let superclass = class_rc.borrow().superclass.clone();
        let Some(Type::Class(super_rc)) = superclass else {
            return self.err(ErrorCode::E2020MisplacedSuper, span, "the enclosing class has no superclass");
        };
        match method {
            Some(name) => match self.resolve_instance_member(&super_rc, name) {
                Some((ty, _, _, _)) if matches!(ty, Type::Function(_)) => ty,
                Some(_) => self.err(
                    ErrorCode::E2005MissingProperty,
                    span,
                    format!("`{}` on the superclass is not a method", self.interner.lookup(name)),
                ),
                None => {
                    self.diagnostics.push(missing_property(
                        span,
                        self.interner.lookup(name),
                        &Type::Class(super_rc).with_names(self.interner).to_string(),
                        None,
                    ));
                    Type::Error
                }
            },
            None => {
                let init_name = self.interner.intern("init");
                match super_rc.borrow().methods.get(&init_name) {
                    Some((func, _)) => Type::Function(Rc::new(func.clone())),
                    None => Type::Function(Rc::new(FunctionType::new(Vec::new(), Type::Nil, false))),
                }
            }
        }
    }

    // ---- Operators ----

    fn check_unary(&mut self, op: UnaryOp, operand: ExprId, span: Span) -> Type {
        let ty = self.check_expr(operand);
        if ty.is_error() {
            return Type::Error;
        }
        match op {
            UnaryOp::Not => {
                if matches!(ty, Type::Primitive(PrimitiveKind::Bool)) {
                    Type::Primitive(PrimitiveKind::Bool)
                } else {
                    self.err(ErrorCode::E2016InvalidOperand, span, format!("`!` requires bool, found `{}`", ty.with_names(self.interner)))
                }
            }
            UnaryOp::Neg => {
                if ty.is_numeric() {
                    ty
                } else {
                    self.err(ErrorCode::E2016InvalidOperand, span, format!("`-` requires a numeric type, found `{}`", ty.with_names(self.interner)))
                }
            }
        }
    }

    fn check_binary(&mut self, op: BinaryOp, left: ExprId, right: ExprId, span: Span) -> Type {
        let left_ty = self.check_expr(left);
        let right_ty = self.check_expr(right);
        if left_ty.is_error() || right_ty.is_error() {
            return Type::Error;
        }
        match op {
            BinaryOp::Add => {
                if matches!(left_ty, Type::Primitive(PrimitiveKind::String))
                    && matches!(right_ty, Type::Primitive(PrimitiveKind::String))
                {
                    return Type::Primitive(PrimitiveKind::String);
                }
                self.numeric_binary_result(&left_ty, &right_ty, left, right, span)
            }
            BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => {
                self.numeric_binary_result(&left_ty, &right_ty, left, right, span)
            }
            BinaryOp::BitAnd | BinaryOp::BitOr | BinaryOp::BitXor | BinaryOp::Shl | BinaryOp::Shr => {
                if left_ty.is_integer() && right_ty.is_integer() {
                    self.numeric_binary_result(&left_ty, &right_ty, left, right, span)
                } else {
                    self.err(ErrorCode::E2016InvalidOperand, span, "bitwise operators require integer operands")
                }
            }
            BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq => {
                if left_ty.is_numeric() && right_ty.is_numeric() {
                    Type::Primitive(PrimitiveKind::Bool)
                } else {
                    self.err(ErrorCode::E2016InvalidOperand, span, "comparison operators require numeric operands")
                }
            }
            BinaryOp::Eq | BinaryOp::NotEq => {
                let ok = left_ty == right_ty
                    || (left_ty.is_numeric() && right_ty.is_numeric())
                    || left_ty.is_any()
                    || right_ty.is_any()
                    || matches!(left_ty, Type::Nil)
                    || matches!(right_ty, Type::Nil)
                    || matches!((&left_ty, &right_ty), (Type::Data(a), Type::Data(b)) if Rc::ptr_eq(a, b));
                if ok {
                    Type::Primitive(PrimitiveKind::Bool)
                } else {
                    self.err(
                        ErrorCode::E2016InvalidOperand,
                        span,
                        format!(
                            "`{}` and `{}` cannot be compared for equality",
                            left_ty.with_names(self.interner),
                            right_ty.with_names(self.interner)
                        ),
                    )
                }
            }
        }
    }

    /// Shared by arithmetic and bitwise binary operators: both operands
    /// numeric and either identical, or one side an integer literal
    /// assignable to the other's width.
    fn numeric_binary_result(&mut self, left_ty: &Type, right_ty: &Type, left: ExprId, right: ExprId, span: Span) -> Type {
        if !left_ty.is_numeric() || !right_ty.is_numeric() {
            return self.err(
                ErrorCode::E2016InvalidOperand,
                span,
                format!(
                    "arithmetic requires numeric operands, found `{}` and `{}`",
                    left_ty.with_names(self.interner),
                    right_ty.with_names(self.interner)
                ),
            );
        }
        if left_ty == right_ty {
            return left_ty.clone();
        }
        if self.is_int_literal(left) && can_assign(right_ty, left_ty, true) {
            return right_ty.clone();
        }
        if self.is_int_literal(right) && can_assign(left_ty, right_ty, true) {
            return left_ty.clone();
        }
        self.err(
            ErrorCode::E2001TypeMismatch,
            span,
            format!(
                "mismatched numeric types `{}` and `{}`",
                left_ty.with_names(self.interner),
                right_ty.with_names(self.interner)
            ),
        )
    }

    fn check_logical(&mut self, op: LogicalOp, left: ExprId, right: ExprId, span: Span) -> Type {
        match op {
            LogicalOp::And | LogicalOp::Or => {
                self.truthy(left, span);
                self.truthy(right, span);
                Type::Primitive(PrimitiveKind::Bool)
            }
            LogicalOp::Coalesce => {
                let left_ty = self.check_expr(left);
                let right_ty = self.check_expr(right);
                let Type::Optional(inner) = &left_ty else {
                    return self.err(
                        ErrorCode::E2001TypeMismatch,
                        span,
                        format!("`??`'s left side must be Optional, found `{}`", left_ty.with_names(self.interner)),
                    );
                };
                let inner = (**inner).clone();
                if right_ty.is_error() || self.assignable(&inner, right, &right_ty) {
                    inner
                } else {
                    self.err(
                        ErrorCode::E2001TypeMismatch,
                        span,
                        format!(
                            "`??`'s right side (`{}`) is not assignable to `{}`",
                            right_ty.with_names(self.interner),
                            inner.with_names(self.interner)
                        ),
                    )
                }
            }
        }
    }

    fn check_ternary(&mut self, cond: ExprId, then_branch: ExprId, else_branch: ExprId, span: Span) -> Type {
        self.truthy(cond, span);
        let then_ty = self.check_expr(then_branch);
        let else_ty = self.check_expr(else_branch);
        if then_ty.is_error() || else_ty.is_error() {
            return Type::Error;
        }
        if then_ty == else_ty {
            then_ty
        } else {
            self.err(
                ErrorCode::E2011IncompatibleArms,
                span,
                format!(
                    "ternary branches have different types: `{}` and `{}`",
                    then_ty.with_names(self.interner),
                    else_ty.with_names(self.interner)
                ),
            )
        }
    }

    fn check_update(&mut self, target: ExprId, _op: UpdateOp, _prefix: bool, span: Span) -> Type {
        let ty = self.check_expr(target);
        if ty.is_error() {
            return Type::Error;
        }
        if !ty.is_numeric() {
            return self.err(ErrorCode::E2016InvalidOperand, span, format!("`++`/`--` require a numeric L-value, found `{}`", ty.with_names(self.interner)));
        }
        if !self.check_lvalue_not_const(target, span) {
            return Type::Error;
        }
        ty
    }

    fn check_assign(&mut self, target: ExprId, op: AssignOp, value: ExprId, span: Span) -> Type {
        let target_ty = self.check_expr(target);
        let value_ty = self.check_expr(value);
        if target_ty.is_error() || value_ty.is_error() {
            return Type::Error;
        }
        if !self.check_lvalue_not_const(target, span) {
            return Type::Error;
        }
        match op.as_binary_op() {
            None => {
                if self.assignable(&target_ty, value, &value_ty) {
                    value_ty
                } else {
                    self.err(
                        ErrorCode::E2001TypeMismatch,
                        span,
                        format!(
                            "cannot assign `{}` to `{}`",
                            value_ty.with_names(self.interner),
                            target_ty.with_names(self.interner)
                        ),
                    )
                }
            }
            Some(bin_op) => {
                if matches!(bin_op, BinaryOp::Add)
                    && matches!(target_ty, Type::Primitive(PrimitiveKind::String))
                    && matches!(value_ty, Type::Primitive(PrimitiveKind::String))
                {
                    return target_ty;
                }
                self.numeric_binary_result(&target_ty, &value_ty, target, value, span)
            }
        }
    }

    /// `false` (with a diagnostic already pushed) if `target` names a
    /// `const` simple variable or instance field. Subscript targets defer
    /// their index/key checking to runtime per the Subscript rule and are
    /// always mutable at the checker level.
    fn check_lvalue_not_const(&mut self, target: ExprId, span: Span) -> bool {
        let arena = self.arena;
        match &arena.get_expr(target).kind {
            ExprKind::Ident(name) => match self.symbols.resolve(*name) {
                Some(sym) if sym.is_const => {
                    self.err(
                        ErrorCode::E2007ConstAssignment,
                        span,
                        format!("cannot assign to const `{}`", self.interner.lookup(*name)),
                    );
                    false
                }
                _ => true,
            },
            ExprKind::PropertyGet { object, name, .. } => {
                let object_ty = self.result.expr_types.get(object).cloned().unwrap_or(Type::Error);
                if let Type::Instance(class_rc) = object_ty.unwrap_optional() {
                    if let Some((_, _, is_const, _)) = self.resolve_instance_member(&class_rc, *name) {
                        if is_const {
                            self.err(
                                ErrorCode::E2007ConstAssignment,
                                span,
                                format!("cannot assign to const member `{}`", self.interner.lookup(*name)),
                            );
                            return false;
                        }
                    }
                }
                true
            }
            _ => true,
        }
    }

    // ---- Calls ----

    fn check_call(&mut self, callee: ExprId, args: angara_ir::ExprRange, span: Span) -> Type {
        let arg_ids: Vec<ExprId> = self.arena.get_expr_list(args).to_vec();

        if let ExprKind::Ident(name) = self.arena.get_expr(callee).kind {
            if self.interner.lookup(name) == "spawn" && self.symbols.resolve(name).is_none() {
                return self.check_spawn_call(&arg_ids, span);
            }
        }

        let callee_ty = self.check_expr(callee);
        match callee_ty {
            Type::Function(func) => {
                self.check_call_args(&func.params, func.variadic, &arg_ids, span);
                func.ret.clone()
            }
            Type::Class(class_rc) => self.construct_class(&class_rc, &arg_ids, span),
            Type::Data(data_rc) => self.construct_data(&data_rc, &arg_ids, span),
            Type::Error => {
                for id in &arg_ids {
                    self.check_expr(*id);
                }
                Type::Error
            }
            other => {
                for id in &arg_ids {
                    self.check_expr(*id);
                }
                self.err(ErrorCode::E2002NonCallable, span, format!("`{}` is not callable", other.with_names(self.interner)))
            }
        }
    }

    fn check_spawn_call(&mut self, arg_ids: &[ExprId], span: Span) -> Type {
        let Some(&func_id) = arg_ids.first() else {
            return self.err(ErrorCode::E2003ArityMismatch, span, "`spawn` requires a function argument");
        };
        let func_ty = self.check_expr(func_id);
        let Type::Function(func) = func_ty else {
            if !func_ty.is_error() {
                self.err(ErrorCode::E2001TypeMismatch, span, "`spawn`'s first argument must be a Function");
            }
            for id in &arg_ids[1..] {
                self.check_expr(*id);
            }
            return Type::Thread;
        };
        self.check_call_args(&func.params, func.variadic, &arg_ids[1..], span);
        Type::Thread
    }

    fn check_call_args(&mut self, params: &[Type], variadic: bool, arg_ids: &[ExprId], span: Span) {
        let arity_ok = if variadic { arg_ids.len() >= params.len() } else { arg_ids.len() == params.len() };
        if !arity_ok {
            self.err(
                ErrorCode::E2003ArityMismatch,
                span,
                format!("expected {} argument(s), found {}", params.len(), arg_ids.len()),
            );
        }
        for (i, arg_id) in arg_ids.iter().enumerate() {
            let arg_ty = self.check_expr(*arg_id);
            let Some(param_ty) = params.get(i) else { continue };
            if arg_ty.is_error() {
                continue;
            }
            if !self.assignable(param_ty, *arg_id, &arg_ty) {
                self.err(
                    ErrorCode::E2004ArgumentMismatch,
                    span,
                    format!(
                        "argument {} has type `{}`, expected `{}`",
                        i + 1,
                        arg_ty.with_names(self.interner),
                        param_ty.with_names(self.interner)
                    ),
                );
            }
        }
    }

    fn construct_class(&mut self, class_rc: &Rc<RefCell<ClassType>>, arg_ids: &[ExprId], span: Span) -> Type {
        let init_name = self.interner.intern("init");
        let init = class_rc.borrow().methods.get(&init_name).map(|(f, _)| f.clone());
        match init {
            Some(func) => self.check_call_args(&func.params, func.variadic, arg_ids, span),
            None => self.check_call_args(&[], false, arg_ids, span),
        }
        Type::Instance(class_rc.clone())
    }

    fn construct_data(&mut self, data_rc: &Rc<RefCell<DataType>>, arg_ids: &[ExprId], span: Span) -> Type {
        let func = data_rc.borrow().constructor_type(Type::Data(data_rc.clone()));
        self.check_call_args(&func.params, func.variadic, arg_ids, span);
        Type::Data(data_rc.clone())
    }

    // ---- Property access ----

    fn check_property_get(&mut self, object: ExprId, optional: bool, name: Name, span: Span) -> Type {
        let object_ty = self.check_expr(object);
        if object_ty.is_error() {
            return Type::Error;
        }
        if object_ty.is_optional() && !optional {
            return self.err(ErrorCode::E2015OptionalDotAccess, span, "used `.` on an Optional value; use `?.` instead");
        }
        let was_optional = object_ty.is_optional();
        let base = object_ty.unwrap_optional();
        let result = match &base {
            Type::Instance(class_rc) => self.property_on_instance(class_rc, name, span),
            Type::Data(data_rc) => self.property_on_data(data_rc, name, span),
            Type::Enum(enum_rc) => self.property_on_enum(enum_rc, name, span),
            Type::Module(module_rc) => self.property_on_module(module_rc, name, span),
            Type::List(elem) => self.property_on_list(elem, name, span),
            Type::Record(fields) => self.property_on_record(fields, name, span),
            Type::Thread => self.property_on_thread(name, span),
            Type::Mutex => self.property_on_mutex(name, span),
            other => self.missing_member(name, span, other),
        };
        if result.is_error() {
            return Type::Error;
        }
        if was_optional || optional {
            result.optional()
        } else {
            result
        }
    }

    fn missing_member(&mut self, name: Name, span: Span, on_type: &Type) -> Type {
        self.diagnostics.push(missing_property(span, self.interner.lookup(name), &on_type.with_names(self.interner).to_string(), None));
        Type::Error
    }

    /// Walk `class_rc`'s inheritance chain; returns `(type, access, is_const,
    /// owning_class)` for the first field or method match.
    fn resolve_instance_member(
        &self,
        class_rc: &Rc<RefCell<ClassType>>,
        name: Name,
    ) -> Option<(Type, Access, bool, Rc<RefCell<ClassType>>)> {
        let mut current = Some(class_rc.clone());
        while let Some(c) = current {
            let b = c.borrow();
            if let Some(field) = b.fields.get(&name) {
                return Some((field.ty.clone(), field.access, field.is_const, c.clone()));
            }
            if let Some((func, access)) = b.methods.get(&name) {
                return Some((Type::Function(Rc::new(func.clone())), *access, false, c.clone()));
            }
            current = match &b.superclass {
                Some(Type::Class(rc)) => Some(rc.clone()),
                _ => None,
            };
        }
        None
    }

    fn instance_member_names(&self, class_rc: &Rc<RefCell<ClassType>>) -> Vec<String> {
        let mut names = Vec::new();
        let mut current = Some(class_rc.clone());
        while let Some(c) = current {
            let b = c.borrow();
            names.extend(b.fields.keys().map(|n| self.interner.lookup(*n).to_string()));
            names.extend(b.methods.keys().map(|n| self.interner.lookup(*n).to_string()));
            current = match &b.superclass {
                Some(Type::Class(rc)) => Some(rc.clone()),
                _ => None,
            };
        }
        names
    }

    fn current_class_ptr(&self) -> Option<*const RefCell<ClassType>> {
        match &self.current_class {
            Some(Type::Class(rc)) => Some(Rc::as_ptr(rc)),
            _ => None,
        }
    }

    fn property_on_instance(&mut self, class_rc: &Rc<RefCell<ClassType>>, name: Name, span: Span) -> Type {
        match self.resolve_instance_member(class_rc, name) {
            Some((ty, access, _is_const, owner)) => {
                if access == Access::Private && self.current_class_ptr() != Some(Rc::as_ptr(&owner)) {
                    return self.err(
                        ErrorCode::E2006VisibilityViolation,
                        span,
                        format!("`{}` is private", self.interner.lookup(name)),
                    );
                }
                ty
            }
            None => {
                let candidates = self.instance_member_names(class_rc);
                let suggestion = closest_name(self.interner.lookup(name), candidates.iter().map(String::as_str));
                self.diagnostics.push(missing_property(
                    span,
                    self.interner.lookup(name),
                    &Type::Instance(class_rc.clone()).with_names(self.interner).to_string(),
                    suggestion,
                ));
                Type::Error
            }
        }
    }

    fn property_on_data(&mut self, data_rc: &Rc<RefCell<angara_types::DataType>>, name: Name, span: Span) -> Type {
        let found = data_rc.borrow().fields.iter().find(|(n, _, _)| *n == name).map(|(_, ty, _)| ty.clone());
        match found {
            Some(ty) => ty,
            None => {
                let candidates: Vec<String> =
                    data_rc.borrow().fields.iter().map(|(n, _, _)| self.interner.lookup(*n).to_string()).collect();
                let suggestion = closest_name(self.interner.lookup(name), candidates.iter().map(String::as_str));
                self.diagnostics.push(missing_property(
                    span,
                    self.interner.lookup(name),
                    &Type::Data(data_rc.clone()).with_names(self.interner).to_string(),
                    suggestion,
                ));
                Type::Error
            }
        }
    }

    fn property_on_enum(&mut self, enum_rc: &Rc<RefCell<EnumType>>, name: Name, span: Span) -> Type {
        let variant = enum_rc.borrow().variants.get(&name).cloned();
        match variant {
            Some(func) if func.params.is_empty() => Type::Enum(enum_rc.clone()),
            Some(func) => Type::Function(Rc::new(func)),
            None => {
                let candidates: Vec<String> =
                    enum_rc.borrow().variant_order.iter().map(|n| self.interner.lookup(*n).to_string()).collect();
                let suggestion = closest_name(self.interner.lookup(name), candidates.iter().map(String::as_str));
                self.diagnostics.push(missing_property(
                    span,
                    self.interner.lookup(name),
                    &Type::Enum(enum_rc.clone()).with_names(self.interner).to_string(),
                    suggestion,
                ));
                Type::Error
            }
        }
    }

    fn property_on_module(&mut self, module_rc: &Rc<RefCell<ModuleType>>, name: Name, span: Span) -> Type {
        let (export, is_native, module_name) = {
            let b = module_rc.borrow();
            (b.exports.get(&name).cloned(), b.is_native, b.name)
        };
        match export {
            Some(ty) => {
                if is_native {
                    self.result.used_native_symbols.push((module_name, name));
                }
                ty
            }
            None => {
                let candidates: Vec<String> =
                    module_rc.borrow().exports.keys().map(|n| self.interner.lookup(*n).to_string()).collect();
                let suggestion = closest_name(self.interner.lookup(name), candidates.iter().map(String::as_str));
                self.diagnostics.push(missing_property(
                    span,
                    self.interner.lookup(name),
                    &Type::Module(module_rc.clone()).with_names(self.interner).to_string(),
                    suggestion,
                ));
                Type::Error
            }
        }
    }

    fn property_on_list(&mut self, elem: &Rc<Type>, name: Name, span: Span) -> Type {
        match self.interner.lookup(name) {
            "push" => Type::Function(Rc::new(FunctionType::new(vec![(**elem).clone()], Type::Nil, false))),
            "remove" => Type::Function(Rc::new(FunctionType::new(vec![(**elem).clone()], Type::Nil, false))),
            "remove_at" => Type::Function(Rc::new(FunctionType::new(
                vec![Type::Primitive(PrimitiveKind::I64)],
                (**elem).clone(),
                false,
            ))),
            _ => self.missing_member(name, span, &Type::List(elem.clone())),
        }
    }

    fn property_on_record(&mut self, fields: &Rc<rustc_hash::FxHashMap<Name, Type>>, name: Name, span: Span) -> Type {
        if let Some(ty) = fields.get(&name) {
            return ty.clone();
        }
        match self.interner.lookup(name) {
            "remove" => Type::Function(Rc::new(FunctionType::new(
                vec![Type::Primitive(PrimitiveKind::String)],
                Type::Nil,
                false,
            ))),
            "keys" => Type::Function(Rc::new(FunctionType::new(
                Vec::new(),
                Type::List(Rc::new(Type::Primitive(PrimitiveKind::String))),
                false,
            ))),
            _ => self.missing_member(name, span, &Type::Record(fields.clone())),
        }
    }

    fn property_on_thread(&mut self, name: Name, span: Span) -> Type {
        match self.interner.lookup(name) {
            "join" => Type::Function(Rc::new(FunctionType::new(Vec::new(), Type::Nil, false))),
            _ => self.missing_member(name, span, &Type::Thread),
        }
    }

    fn property_on_mutex(&mut self, name: Name, span: Span) -> Type {
        match self.interner.lookup(name) {
            "lock" | "unlock" => Type::Function(Rc::new(FunctionType::new(Vec::new(), Type::Nil, false))),
            _ => self.missing_member(name, span, &Type::Mutex),
        }
    }

    // ---- Subscript, literals ----

    fn check_subscript(&mut self, object: ExprId, index: ExprId, span: Span) -> Type {
        let object_ty = self.check_expr(object);
        let index_ty = self.check_expr(index);
        if object_ty.is_error() {
            return Type::Error;
        }
        match &object_ty {
            Type::List(elem) => {
                if index_ty.is_integer() {
                    (**elem).clone()
                } else {
                    self.err(ErrorCode::E2001TypeMismatch, span, "list subscript requires an integer index")
                }
            }
            Type::Record(fields) => {
                if !matches!(index_ty, Type::Primitive(PrimitiveKind::String)) && !index_ty.is_error() {
                    return self.err(ErrorCode::E2001TypeMismatch, span, "record subscript requires a string key");
                }
                if fields.is_empty() {
                    Type::Any
                } else if let ExprKind::StringLiteral(key) = self.arena.get_expr(index).kind {
                    match fields.get(&key) {
                        Some(ty) => ty.clone(),
                        None => self.missing_member(key, span, &object_ty),
                    }
                } else {
                    Type::Any
                }
            }
            Type::Primitive(PrimitiveKind::String) => {
                if index_ty.is_integer() {
                    Type::Primitive(PrimitiveKind::String)
                } else {
                    self.err(ErrorCode::E2001TypeMismatch, span, "string subscript requires an integer index")
                }
            }
            other => self.err(ErrorCode::E2017NotSubscriptable, span, format!("`{}` is not subscriptable", other.with_names(self.interner))),
        }
    }

    fn check_list_literal(&mut self, elems: angara_ir::ExprRange, span: Span) -> Type {
        let ids: Vec<ExprId> = self.arena.get_expr_list(elems).to_vec();
        let mut common: Option<Type> = None;
        for id in ids {
            let ty = self.check_expr(id);
            common = match common {
                None => Some(ty),
                Some(c) if c == ty => Some(c),
                Some(_) => Some(Type::Any),
            };
        }
        let _ = span;
        Type::List(Rc::new(common.unwrap_or(Type::Any)))
    }

    fn check_record_literal(&mut self, fields: angara_ir::FieldInitRange, span: Span) -> Type {
        let inits: Vec<_> = self.arena.get_field_inits(fields).to_vec();
        let mut map = rustc_hash::FxHashMap::default();
        let mut seen: rustc_hash::FxHashMap<Name, ()> = rustc_hash::FxHashMap::default();
        for init in inits {
            let ty = self.check_expr(init.value);
            if seen.insert(init.name, ()).is_some() {
                self.err(
                    ErrorCode::E2012DuplicateRecordKey,
                    span,
                    format!("duplicate record field `{}`", self.interner.lookup(init.name)),
                );
                continue;
            }
            map.insert(init.name, ty);
        }
        Type::Record(Rc::new(map))
    }

    // ---- Type-level expressions ----

    fn check_is(&mut self, object: ExprId, type_node: &TypeNode, span: Span) -> Type {
        self.check_expr(object);
        self.resolve_ty(type_node, span);
        Type::Primitive(PrimitiveKind::Bool)
    }

    fn check_match(&mut self, scrutinee: ExprId, arms: angara_ir::ArmRange, span: Span) -> Type {
        let scrutinee_ty = self.check_expr(scrutinee);
        let Type::Enum(enum_rc) = &scrutinee_ty else {
            if !scrutinee_ty.is_error() {
                self.err(ErrorCode::E2001TypeMismatch, span, format!("`match` requires an Enum, found `{}`", scrutinee_ty.with_names(self.interner)));
            }
            for arm in self.arena.get_arms(arms).to_vec() {
                self.check_expr(arm.body);
            }
            return Type::Error;
        };
        let enum_rc = enum_rc.clone();
        let arm_list = self.arena.get_arms(arms).to_vec();
        let mut covered: rustc_hash::FxHashSet<Name> = rustc_hash::FxHashSet::default();
        let mut has_wildcard = false;
        let mut result: Option<Type> = None;
        let arm_depth = self.symbols.depth() + 1;
        for arm in &arm_list {
            self.symbols.enter_scope();
            match arm.pattern {
                None => {
                    has_wildcard = true;
                    if let Some(binding) = arm.binding {
                        let sym = angara_symtab::Symbol::new(binding, Type::Any, arm.span, false, arm_depth);
                        self.symbols.declare(sym);
                    }
                }
                Some(pattern_id) => {
                    if let ExprKind::PropertyGet { object: pat_object, name: variant_name, .. } =
                        self.arena.get_expr(pattern_id).kind
                    {
                        let matches_enum = matches!(
                            &self.arena.get_expr(pat_object).kind,
                            ExprKind::Ident(n) if self.symbols.resolve(*n).map(|s| &s.ty) == Some(&Type::Enum(enum_rc.clone()))
                        );
                        if matches_enum {
                            covered.insert(variant_name);
                        } else {
                            self.err(
                                ErrorCode::E2001TypeMismatch,
                                arm.span,
                                "match arm pattern does not name a variant of the scrutinee's enum",
                            );
                        }
                        if let Some(binding) = arm.binding {
                            let payload = enum_rc.borrow().variants.get(&variant_name).cloned();
                            let bound_ty = match payload {
                                Some(func) if func.params.len() == 1 => func.params[0].clone(),
                                Some(func) if !func.params.is_empty() => func.params[0].clone(),
                                _ => Type::Nil,
                            };
                            let sym = angara_symtab::Symbol::new(binding, bound_ty, arm.span, false, arm_depth);
                            self.symbols.declare(sym);
                        }
                    } else {
                        self.err(ErrorCode::E2001TypeMismatch, arm.span, "malformed match arm pattern");
                    }
                }
            }
            let body_ty = self.check_expr(arm.body);
            self.symbols.exit_scope();
            result = match (result, body_ty) {
                (None, ty) => Some(ty),
                (Some(r), ty) if r == ty || ty.is_error() => Some(r),
                (Some(_), ty) => {
                    self.err(ErrorCode::E2011IncompatibleArms, arm.span, format!("match arm has type `{}`, incompatible with earlier arms", ty.with_names(self.interner)));
                    None
                }
            };
        }
        if !has_wildcard {
            let all_variants: rustc_hash::FxHashSet<Name> = enum_rc.borrow().variant_order.iter().copied().collect();
            if covered != all_variants {
                self.err(ErrorCode::E2008NonExhaustiveMatch, span, "match is not exhaustive over the enum's variants");
            }
        }
        result.unwrap_or(Type::Error)
    }

    fn check_sizeof(&mut self, id: ExprId, type_node: &TypeNode, span: Span) -> Type {
        let ty = self.resolve_ty(type_node, span);
        self.result.sizeof_types.insert(id, ty);
        Type::Primitive(PrimitiveKind::U64)
    }

    fn check_retype(&mut self, type_node: &TypeNode, expr: ExprId, span: Span) -> Type {
        let source_ty = self.check_expr(expr);
        let target_ty = self.resolve_ty(type_node, span);
        if source_ty.is_error() || target_ty.is_error() {
            return Type::Error;
        }
        if !matches!(source_ty, Type::CPtr) {
            return self.err(ErrorCode::E2021InvalidRetype, span, "`retype`'s source expression must be a CPtr");
        }
        match &target_ty {
            Type::Data(data_rc) if data_rc.borrow().is_foreign => target_ty.clone(),
            _ => self.err(ErrorCode::E2021InvalidRetype, span, "`retype`'s target type must be a foreign data type"),
        }
    }
}
