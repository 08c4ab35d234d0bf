//! Pass 2 — filling placeholder types with headers (§4.5 "Pass 2 — Headers").

use crate::checker::Checker;
use angara_diagnostic::{Diagnostic, ErrorCode};
use angara_ir::ast::{
    Access as AstAccess, ClassDecl, ClassMember, ContractDecl, ContractMember, DataDecl, EnumDecl,
    FunctionDecl, TraitDecl,
};
use angara_ir::{Name, Span};
use angara_types::{Access as SemAccess, FieldInfo, FunctionType, RequiredField, RequiredMethod, Type};
use rustc_hash::FxHashMap;
use std::rc::Rc;

fn to_sem_access(access: AstAccess) -> SemAccess {
    match access {
        AstAccess::Public => SemAccess::Public,
        AstAccess::Private => SemAccess::Private,
    }
}

impl<'a> Checker<'a> {
    pub(crate) fn pass2_enum(&mut self, decl: &EnumDecl, _span: Span) {
        let Some(Type::Enum(rc)) = self.symbols.resolve(decl.name).map(|s| s.ty.clone()) else {
            return;
        };
        let parent = Type::Enum(rc.clone());
        let mut seen: FxHashMap<Name, Span> = FxHashMap::default();
        for variant in &decl.variants {
            if let Some(prior_span) = seen.get(&variant.name) {
                self.diagnostics.push(angara_diagnostic::redeclaration(
                    variant.span,
                    self.interner.lookup(variant.name),
                    *prior_span,
                ));
                continue;
            }
            seen.insert(variant.name, variant.span);
            let params = variant
                .payload_types
                .iter()
                .map(|tn| self.resolve_ty(tn, variant.span))
                .collect::<Vec<_>>();
            let func = FunctionType::new(params, parent.clone(), false);
            let mut enum_ty = rc.borrow_mut();
            enum_ty.variants.insert(variant.name, func);
            enum_ty.variant_order.push(variant.name);
        }
        self.export_if_needed(decl.name, decl.exported, Type::Enum(rc));
    }

    pub(crate) fn pass2_data(&mut self, decl: &DataDecl, _span: Span) {
        let Some(Type::Data(rc)) = self.symbols.resolve(decl.name).map(|s| s.ty.clone()) else {
            return;
        };
        let mut fields = Vec::with_capacity(decl.fields.len());
        let mut seen: FxHashMap<Name, Span> = FxHashMap::default();
        for field in &decl.fields {
            if let Some(prior_span) = seen.get(&field.name) {
                self.diagnostics.push(angara_diagnostic::redeclaration(
                    field.span,
                    self.interner.lookup(field.name),
                    *prior_span,
                ));
                continue;
            }
            seen.insert(field.name, field.span);
            let ty = self.resolve_ty(&field.type_node, field.span);
            fields.push((field.name, ty, field.is_const));
        }
        {
            let mut data_ty = rc.borrow_mut();
            data_ty.fields = fields;
            data_ty.is_foreign = decl.is_foreign;
        }
        self.export_if_needed(decl.name, decl.exported, Type::Data(rc));
    }

    pub(crate) fn pass2_contract(&mut self, decl: &ContractDecl, _span: Span) {
        let Some(Type::Contract(rc)) = self.symbols.resolve(decl.name).map(|s| s.ty.clone()) else {
            return;
        };
        let mut required_fields = FxHashMap::default();
        let mut required_methods = FxHashMap::default();
        for member in &decl.members {
            match member {
                ContractMember::Field { name, type_node, is_const, span: fspan } => {
                    let ty = self.resolve_ty(type_node, *fspan);
                    required_fields.insert(*name, RequiredField { ty, is_const: *is_const, span: *fspan });
                }
                ContractMember::Method { name, params, return_type, span: mspan } => {
                    if self.interner.lookup(*name) == "init" {
                        self.diagnostics.push(
                            Diagnostic::error(ErrorCode::E3002ContractMemberWrongKind)
                                .with_message("a contract may not declare a constructor")
                                .with_label(*mspan, "remove this `init` member"),
                        );
                        continue;
                    }
                    let func = self.build_function_type(*params, return_type, *mspan);
                    required_methods.insert(*name, RequiredMethod { ty: func, span: *mspan });
                }
            }
        }
        {
            let mut contract_ty = rc.borrow_mut();
            contract_ty.required_fields = required_fields;
            contract_ty.required_methods = required_methods;
        }
    }

    pub(crate) fn pass2_trait(&mut self, decl: &TraitDecl, _span: Span) {
        let Some(Type::Trait(rc)) = self.symbols.resolve(decl.name).map(|s| s.ty.clone()) else {
            return;
        };
        let mut methods = FxHashMap::default();
        let mut seen: FxHashMap<Name, Span> = FxHashMap::default();
        for proto in &decl.methods {
            if let Some(prior_span) = seen.get(&proto.name) {
                self.diagnostics.push(angara_diagnostic::redeclaration(
                    proto.span,
                    self.interner.lookup(proto.name),
                    *prior_span,
                ));
                continue;
            }
            seen.insert(proto.name, proto.span);
            let func = self.build_function_type(proto.params, &proto.return_type, proto.span);
            methods.insert(proto.name, func);
        }
        rc.borrow_mut().methods = methods;
    }

    pub(crate) fn pass2_class_fill(&mut self, decl: &ClassDecl, span: Span) {
        let Some(Type::Class(rc)) = self.symbols.resolve(decl.name).map(|s| s.ty.clone()) else {
            return;
        };

        let superclass = decl.superclass.and_then(|super_name| {
            match self.symbols.resolve(super_name).map(|s| s.ty.clone()) {
                Some(Type::Class(super_rc)) => Some(Type::Class(super_rc)),
                Some(_) => {
                    self.diagnostics.push(
                        Diagnostic::error(ErrorCode::E2001TypeMismatch)
                            .with_message(format!(
                                "`{}` is not a class and cannot be a superclass",
                                self.interner.lookup(super_name)
                            ))
                            .with_label(span, "invalid superclass"),
                    );
                    None
                }
                None => {
                    self.diagnostics.push(angara_diagnostic::undefined_name(span, self.interner.lookup(super_name)));
                    None
                }
            }
        });

        let mut fields: FxHashMap<Name, FieldInfo> = FxHashMap::default();
        let mut methods: FxHashMap<Name, (FunctionType, SemAccess)> = FxHashMap::default();
        let mut seen: FxHashMap<Name, Span> = FxHashMap::default();
        for member in &decl.members {
            match member {
                ClassMember::Field(f) => {
                    if let Some(prior_span) = seen.get(&f.name) {
                        self.diagnostics.push(angara_diagnostic::redeclaration(f.span, self.interner.lookup(f.name), *prior_span));
                        continue;
                    }
                    seen.insert(f.name, f.span);
                    let ty = self.resolve_ty(&f.type_node, f.span);
                    fields.insert(f.name, FieldInfo { ty, access: to_sem_access(f.access), is_const: f.is_const });
                }
                ClassMember::Method(m) => {
                    if let Some(prior_span) = seen.get(&m.name) {
                        self.diagnostics.push(angara_diagnostic::redeclaration(m.span, self.interner.lookup(m.name), *prior_span));
                        continue;
                    }
                    seen.insert(m.name, m.span);
                    let func = self.build_function_type(m.params, &m.return_type, m.span);
                    methods.insert(m.name, (func, to_sem_access(m.access)));
                }
            }
        }

        {
            let mut class_ty = rc.borrow_mut();
            class_ty.superclass = superclass;
            class_ty.fields = fields;
            class_ty.methods = methods;
        }
        self.export_if_needed(decl.name, decl.exported, Type::Class(rc));
    }

    pub(crate) fn pass2_class_check_cycle(&mut self, decl: &ClassDecl, span: Span) {
        let Some(Type::Class(start_rc)) = self.symbols.resolve(decl.name).map(|s| s.ty.clone()) else {
            return;
        };
        let mut visited: Vec<*const std::cell::RefCell<angara_types::ClassType>> = vec![Rc::as_ptr(&start_rc)];
        let mut current = start_rc.borrow().superclass.clone();
        loop {
            match current {
                Some(Type::Class(c)) => {
                    let ptr = Rc::as_ptr(&c);
                    if visited.contains(&ptr) {
                        self.diagnostics.push(
                            Diagnostic::error(ErrorCode::E3007SuperclassCycle)
                                .with_message(format!(
                                    "superclass chain of `{}` cycles back to itself",
                                    self.interner.lookup(decl.name)
                                ))
                                .with_label(span, "introduces the cycle"),
                        );
                        return;
                    }
                    visited.push(ptr);
                    current = c.borrow().superclass.clone();
                }
                _ => return,
            }
        }
    }

    pub(crate) fn pass2_class_validate(&mut self, decl: &ClassDecl, span: Span) {
        let Some(Type::Class(class_rc)) = self.symbols.resolve(decl.name).map(|s| s.ty.clone()) else {
            return;
        };
        let (class_fields, class_methods) = {
            let class_ty = class_rc.borrow();
            (
                class_ty.fields.iter().map(|(n, f)| (*n, (f.ty.clone(), f.access, f.is_const))).collect::<FxHashMap<_, _>>(),
                class_ty.methods.iter().map(|(n, m)| (*n, m.clone())).collect::<FxHashMap<Name, (FunctionType, SemAccess)>>(),
            )
        };

        for contract_name in &decl.contracts {
            let Some(Type::Contract(contract_rc)) = self.symbols.resolve(*contract_name).map(|s| s.ty.clone()) else {
                self.diagnostics.push(angara_diagnostic::undefined_name(span, self.interner.lookup(*contract_name)));
                continue;
            };
            let contract = contract_rc.borrow();
            for (req_name, req) in &contract.required_fields {
                match class_fields.get(req_name) {
                    Some((ty, access, is_const)) => {
                        if *access != SemAccess::Public {
                            self.diagnostics.push(
                                Diagnostic::error(ErrorCode::E2006VisibilityViolation)
                                    .with_message(format!(
                                        "`{}` must be public to satisfy contract `{}`",
                                        self.interner.lookup(*req_name),
                                        self.interner.lookup(contract.name)
                                    ))
                                    .with_label(span, "signed here")
                                    .with_secondary_label(req.span, "required here"),
                            );
                        } else if *is_const != req.is_const {
                            self.diagnostics.push(
                                Diagnostic::error(ErrorCode::E3003ContractMemberWrongConstness)
                                    .with_message(format!(
                                        "`{}`'s const-ness does not match contract `{}`",
                                        self.interner.lookup(*req_name),
                                        self.interner.lookup(contract.name)
                                    ))
                                    .with_label(span, "mismatched const-ness")
                                    .with_secondary_label(req.span, "required here"),
                            );
                        } else if *ty != req.ty {
                            self.diagnostics.push(
                                Diagnostic::error(ErrorCode::E3004ContractMemberWrongSignature)
                                    .with_message(format!(
                                        "`{}` has type `{}`, but contract `{}` requires `{}`",
                                        self.interner.lookup(*req_name),
                                        ty.with_names(self.interner),
                                        self.interner.lookup(contract.name),
                                        req.ty.with_names(self.interner)
                                    ))
                                    .with_label(span, "mismatched type")
                                    .with_secondary_label(req.span, "required here"),
                            );
                        }
                    }
                    None => {
                        let code = if class_methods.contains_key(req_name) {
                            ErrorCode::E3002ContractMemberWrongKind
                        } else {
                            ErrorCode::E3001ContractMemberMissing
                        };
                        self.diagnostics.push(
                            Diagnostic::error(code)
                                .with_message(format!(
                                    "`{}` does not satisfy field `{}` required by contract `{}`",
                                    self.interner.lookup(decl.name),
                                    self.interner.lookup(*req_name),
                                    self.interner.lookup(contract.name)
                                ))
                                .with_label(span, "signed here")
                                .with_secondary_label(req.span, "required here"),
                        );
                    }
                }
            }
            for (req_name, req) in &contract.required_methods {
                match class_methods.get(req_name) {
                    Some((func, access)) => {
                        if *access != SemAccess::Public {
                            self.diagnostics.push(
                                Diagnostic::error(ErrorCode::E2006VisibilityViolation)
                                    .with_message(format!(
                                        "`{}` must be public to satisfy contract `{}`",
                                        self.interner.lookup(*req_name),
                                        self.interner.lookup(contract.name)
                                    ))
                                    .with_label(span, "signed here")
                                    .with_secondary_label(req.span, "required here"),
                            );
                        } else if *func != req.ty {
                            self.diagnostics.push(
                                Diagnostic::error(ErrorCode::E3004ContractMemberWrongSignature)
                                    .with_message(format!(
                                        "`{}`'s signature does not match contract `{}`",
                                        self.interner.lookup(*req_name),
                                        self.interner.lookup(contract.name)
                                    ))
                                    .with_label(span, "mismatched signature")
                                    .with_secondary_label(req.span, "required here"),
                            );
                        }
                    }
                    None => {
                        let code = if class_fields.contains_key(req_name) {
                            ErrorCode::E3002ContractMemberWrongKind
                        } else {
                            ErrorCode::E3001ContractMemberMissing
                        };
                        self.diagnostics.push(
                            Diagnostic::error(code)
                                .with_message(format!(
                                    "`{}` does not satisfy method `{}` required by contract `{}`",
                                    self.interner.lookup(decl.name),
                                    self.interner.lookup(*req_name),
                                    self.interner.lookup(contract.name)
                                ))
                                .with_label(span, "signed here")
                                .with_secondary_label(req.span, "required here"),
                        );
                    }
                }
            }
        }

        for trait_name in &decl.traits {
            let Some(Type::Trait(trait_rc)) = self.symbols.resolve(*trait_name).map(|s| s.ty.clone()) else {
                self.diagnostics.push(angara_diagnostic::undefined_name(span, self.interner.lookup(*trait_name)));
                continue;
            };
            let trait_ty = trait_rc.borrow();
            for (req_name, req_func) in &trait_ty.methods {
                match class_methods.get(req_name) {
                    Some((func, _access)) if func == req_func => {}
                    Some(_) => {
                        self.diagnostics.push(
                            Diagnostic::error(ErrorCode::E3006TraitMethodWrongSignature)
                                .with_message(format!(
                                    "`{}`'s signature does not match trait `{}`",
                                    self.interner.lookup(*req_name),
                                    self.interner.lookup(trait_ty.name)
                                ))
                                .with_label(span, "mismatched signature"),
                        );
                    }
                    None => {
                        self.diagnostics.push(
                            Diagnostic::error(ErrorCode::E3005TraitMethodMissing)
                                .with_message(format!(
                                    "`{}` does not implement method `{}` required by trait `{}`",
                                    self.interner.lookup(decl.name),
                                    self.interner.lookup(*req_name),
                                    self.interner.lookup(trait_ty.name)
                                ))
                                .with_label(span, "used here"),
                        );
                    }
                }
            }
        }
    }

    pub(crate) fn pass2_function(&mut self, decl: &FunctionDecl, span: Span) {
        let func = self.build_function_type(decl.params, &decl.return_type, span);
        let func_ty = Type::Function(Rc::new(func));
        let symbol = angara_symtab::Symbol::new(decl.name, func_ty.clone(), decl.span, true, 0);
        if let Some(prior) = self.symbols.declare(symbol) {
            self.diagnostics.push(angara_diagnostic::redeclaration(
                decl.span,
                self.interner.lookup(decl.name),
                prior.declaration_span,
            ));
            return;
        }
        self.export_if_needed(decl.name, decl.exported, func_ty);
    }

    /// Resolve a `ParamRange` plus optional return-type annotation into a
    /// `FunctionType`. Shared by global functions, methods, and trait/contract
    /// method prototypes; Angara-level functions are never variadic (only
    /// native-module imports are, via the ABI decoder).
    pub(crate) fn build_function_type(
        &mut self,
        params: angara_ir::ParamRange,
        return_type: &Option<angara_ir::ast::TypeNode>,
        span: Span,
    ) -> FunctionType {
        let params_slice = self.arena.get_params(params);
        let mut param_types = Vec::with_capacity(params_slice.len());
        for p in params_slice {
            let ty = self.resolve_ty(&p.type_node, p.span);
            param_types.push(ty);
        }
        let ret = match return_type {
            Some(tn) => self.resolve_ty(tn, span),
            None => Type::Nil,
        };
        FunctionType::new(param_types, ret, false)
    }
}
