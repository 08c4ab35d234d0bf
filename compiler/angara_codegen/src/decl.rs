//! Struct/vtable layout and constructor emission for classes, data types,
//! and enums (§4.6 "Lowered value model", §8 E1 data equality).
//!
//! The instance struct and the vtable struct both use the "inline the
//! parent struct as first member" idiom `hierarchy.rs` documents: a
//! subclass's struct embeds its superclass's struct as field `__base`, so a
//! pointer to the derived struct is also a valid pointer to every ancestor.
//! Vtable slots for a genuinely new method are added only at the level that
//! first declares it (`hierarchy::new_methods_per_level`); an override
//! reuses the inherited slot instead of adding one, which is why filling a
//! vtable instance (`vtable_init_statements`) has to walk back down through
//! however many `.__base` hops separate the declaring level from the most
//! derived one.

use crate::context::CodegenContext;
use crate::{ctype, hierarchy, mangle, runtime};
use angara_ir::ast::{DataDecl, EnumDecl};
use angara_types::types::ClassType;
use angara_types::Type;
use rustc_hash::FxHashSet;
use std::cell::RefCell;
use std::rc::Rc;

/// Emits every not-yet-seen struct/vtable-struct level in `chain`, root
/// first. Safe to call once per class declaration encountered at module
/// top level — `emitted` dedups ancestors shared by more than one subclass.
pub fn emit_class_structs(ctx: &mut CodegenContext<'_>, chain: &[Rc<RefCell<ClassType>>], emitted: &mut FxHashSet<angara_ir::Name>) {
    let field_levels = hierarchy::new_fields_per_level(chain);
    let method_levels = hierarchy::new_methods_per_level(chain);
    for (level, class_rc) in chain.iter().enumerate() {
        let name = class_rc.borrow().name;
        if !emitted.insert(name) {
            continue;
        }
        let class_name = ctx.name(name);
        let struct_tag = mangle::struct_name(&class_name);
        let vtable_tag = mangle::class_vtable_struct(&class_name);

        ctx.write_h(&format!("typedef struct {struct_tag} {{"));
        if level > 0 {
            let parent_name = ctx.name(chain[level - 1].borrow().name);
            ctx.write_h(&format!("    struct {} __base;", mangle::struct_name(&parent_name)));
        }
        for field_name in &field_levels[level] {
            let fname = ctx.name(*field_name);
            ctx.write_h(&format!("    {} {fname};", ctype::VALUE_TYPE));
        }
        ctx.write_h(&format!("}} {struct_tag};"));
        ctx.blank_h();

        ctx.write_h(&format!("typedef struct {vtable_tag} {{"));
        if level > 0 {
            let parent_name = ctx.name(chain[level - 1].borrow().name);
            ctx.write_h(&format!("    struct {} __base;", mangle::class_vtable_struct(&parent_name)));
        }
        for method_name in &method_levels[level] {
            let mname = ctx.name(*method_name);
            ctx.write_h(&format!(
                "    {} (*{mname})({} this, ...);",
                ctype::VALUE_TYPE,
                ctype::VALUE_TYPE
            ));
        }
        ctx.write_h(&format!("}} {vtable_tag};"));
        ctx.blank_h();

        ctx.write_h(&format!("extern {vtable_tag} {};", mangle::class_sentinel(&class_name)));
    }
}

/// The assignment statements, emitted into `Angara_<module>_init_globals`,
/// that fill class `class_rc`'s vtable sentinel — every slot the full
/// ancestor chain declares, each set to the most-derived override.
pub fn vtable_init_statements(ctx: &mut CodegenContext<'_>, class_rc: &Rc<RefCell<ClassType>>) {
    let chain = hierarchy::ancestor_chain(class_rc);
    let self_index = chain.len() - 1;
    let class_name = ctx.name(chain[self_index].borrow().name);
    let sentinel = mangle::class_sentinel(&class_name);
    let method_levels = hierarchy::new_methods_per_level(&chain);

    for (level, methods) in method_levels.iter().enumerate() {
        let hops = self_index - level;
        let prefix = "__base.".repeat(hops);
        for method_name in methods {
            let owner_idx = hierarchy::effective_method_owner(&chain, *method_name, self_index);
            let owner_name = ctx.name(chain[owner_idx].borrow().name);
            let mname = ctx.name(*method_name);
            ctx.write_s(&format!(
                "{sentinel}.{prefix}{mname} = (void *) {};",
                mangle::method(&owner_name, &mname)
            ));
        }
    }
}

/// The constructor function for class `class_rc`: allocates the instance,
/// assigns every field across the ancestor chain in declaration order, and
/// points it at the class's vtable sentinel.
pub fn emit_class_constructor(ctx: &mut CodegenContext<'_>, class_rc: &Rc<RefCell<ClassType>>) {
    let chain = hierarchy::ancestor_chain(class_rc);
    let field_levels = hierarchy::new_fields_per_level(&chain);
    let class_name = ctx.name(class_rc.borrow().name);
    let c_name = mangle::class_new(&class_name);
    let struct_tag = mangle::struct_name(&class_name);

    let all_fields: Vec<angara_ir::Name> = field_levels.into_iter().flatten().collect();
    let params: Vec<String> = all_fields.iter().map(|n| format!("{} {}", ctype::VALUE_TYPE, ctx.name(*n))).collect();
    let sig = format!("{} {c_name}({})", ctype::VALUE_TYPE, params.join(", "));
    ctx.write_h(&format!("{sig};"));
    ctx.write_s(&format!("{sig} {{"));
    ctx.indent();
    let obj_tmp = ctx.fresh_temp();
    ctx.write_s(&format!(
        "{} {obj_tmp} = {}(sizeof({struct_tag}), (void *) &{});",
        ctype::VALUE_TYPE,
        runtime::ALLOC_OBJECT,
        mangle::class_sentinel(&class_name)
    ));
    for field_name in &all_fields {
        let fname = ctx.name(*field_name);
        ctx.write_s(&format!(
            "(({struct_tag} *) {}({obj_tmp}))->{fname} = {fname};",
            runtime::AS_OBJ
        ));
    }
    ctx.write_s(&format!("return {obj_tmp};"));
    ctx.dedent();
    ctx.write_s("}");
    ctx.blank_s();
}

/// The data struct, constructor, and structural-equality function for a
/// `data` declaration (§8 E1).
pub fn emit_data(ctx: &mut CodegenContext<'_>, decl: &DataDecl) {
    let data_name = ctx.name(decl.name);
    let struct_tag = mangle::struct_name(&data_name);

    ctx.write_h(&format!("typedef struct {struct_tag} {{"));
    for field in &decl.fields {
        let fname = ctx.name(field.name);
        let ty = if decl.is_foreign { ctype::OPAQUE_PTR_TYPE.to_string() } else { ctype::VALUE_TYPE.to_string() };
        ctx.write_h(&format!("    {ty} {fname};"));
    }
    ctx.write_h(&format!("}} {struct_tag};"));
    ctx.blank_h();

    if decl.is_foreign {
        // A foreign data type's wrapper constructor (`retype<D>`) is
        // emitted alongside `retype` call sites in `expr.rs`; the struct
        // itself holds only the opaque pointer, never constructed directly
        // from Angara source.
        return;
    }

    let c_name = mangle::data_new(&data_name);
    let params: Vec<String> = decl.fields.iter().map(|f| format!("{} {}", ctype::VALUE_TYPE, ctx.name(f.name))).collect();
    let sig = format!("{} {c_name}({})", ctype::VALUE_TYPE, params.join(", "));
    ctx.write_h(&format!("{sig};"));
    ctx.write_s(&format!("{sig} {{"));
    ctx.indent();
    let obj_tmp = ctx.fresh_temp();
    ctx.write_s(&format!(
        "{} {obj_tmp} = {}(sizeof({struct_tag}), NULL);",
        ctype::VALUE_TYPE,
        runtime::ALLOC_OBJECT
    ));
    for field in &decl.fields {
        let fname = ctx.name(field.name);
        ctx.write_s(&format!("(({struct_tag} *) {}({obj_tmp}))->{fname} = {fname};", runtime::AS_OBJ));
    }
    ctx.write_s(&format!("return {obj_tmp};"));
    ctx.dedent();
    ctx.write_s("}");
    ctx.blank_s();

    let eq_name = mangle::data_equals(&data_name);
    let eq_sig = format!("bool {eq_name}({} a, {} b)", ctype::VALUE_TYPE, ctype::VALUE_TYPE);
    ctx.write_h(&format!("{eq_sig};"));
    ctx.write_s(&format!("{eq_sig} {{"));
    ctx.indent();
    let a_ptr = format!("(({struct_tag} *) {}(a))", runtime::AS_OBJ);
    let b_ptr = format!("(({struct_tag} *) {}(b))", runtime::AS_OBJ);
    let conj: Vec<String> = decl
        .fields
        .iter()
        .map(|f| {
            let fname = ctx.name(f.name);
            format!("{}({a_ptr}->{fname}, {b_ptr}->{fname})", runtime::VALUES_EQUAL)
        })
        .collect();
    let body = if conj.is_empty() { "true".to_string() } else { conj.join(" && ") };
    ctx.write_s(&format!("return {body};"));
    ctx.dedent();
    ctx.write_s("}");
    ctx.blank_s();
}

/// The tag enum, payload union, wrapper struct, and per-variant constructor
/// functions for an `enum` declaration.
pub fn emit_enum(ctx: &mut CodegenContext<'_>, decl: &EnumDecl) {
    let enum_name = ctx.name(decl.name);
    let tag_tag = mangle::enum_tag_type(&enum_name);
    let payload_tag = mangle::enum_payload_type(&enum_name);
    let struct_tag = mangle::struct_name(&enum_name);

    ctx.write_h(&format!("typedef enum {tag_tag} {{"));
    for variant in &decl.variants {
        let vname = ctx.name(variant.name);
        ctx.write_h(&format!("    {},", mangle::enum_tag_value(&enum_name, &vname)));
    }
    ctx.write_h(&format!("}} {tag_tag};"));
    ctx.blank_h();

    ctx.write_h(&format!("typedef union {payload_tag} {{"));
    for variant in &decl.variants {
        if variant.payload_types.len() == 1 {
            let vname = ctx.name(variant.name);
            ctx.write_h(&format!("    {} {vname};", ctype::VALUE_TYPE));
        }
    }
    ctx.write_h(&format!("}} {payload_tag};"));
    ctx.blank_h();

    ctx.write_h(&format!("typedef struct {struct_tag} {{"));
    ctx.write_h(&format!("    {tag_tag} tag;"));
    ctx.write_h(&format!("    {payload_tag} payload;"));
    ctx.write_h(&format!("}} {struct_tag};"));
    ctx.blank_h();

    for variant in &decl.variants {
        let vname = ctx.name(variant.name);
        let c_name = mangle::enum_variant_ctor(&enum_name, &vname);
        let has_payload = variant.payload_types.len() == 1;
        let sig = if has_payload {
            format!("{} {c_name}({} value)", ctype::VALUE_TYPE, ctype::VALUE_TYPE)
        } else {
            format!("{} {c_name}(void)", ctype::VALUE_TYPE)
        };
        ctx.write_h(&format!("{sig};"));
        ctx.write_s(&format!("{sig} {{"));
        ctx.indent();
        let obj_tmp = ctx.fresh_temp();
        ctx.write_s(&format!("{} {obj_tmp} = {}(sizeof({struct_tag}), NULL);", ctype::VALUE_TYPE, runtime::ALLOC_OBJECT));
        ctx.write_s(&format!(
            "(({struct_tag} *) {}({obj_tmp}))->tag = {};",
            runtime::AS_OBJ,
            mangle::enum_tag_value(&enum_name, &vname)
        ));
        if has_payload {
            ctx.write_s(&format!("(({struct_tag} *) {}({obj_tmp}))->payload.{vname} = value;", runtime::AS_OBJ));
        }
        ctx.write_s(&format!("return {obj_tmp};"));
        ctx.dedent();
        ctx.write_s("}");
        ctx.blank_s();
    }
}

/// `Type::Class` as a `Rc<RefCell<ClassType>>`, for call sites that only
/// have the semantic `Type`.
#[must_use]
pub fn class_rc_of(ty: &Type) -> Option<Rc<RefCell<ClassType>>> {
    match ty {
        Type::Class(rc) | Type::Instance(rc) => Some(rc.clone()),
        _ => None,
    }
}
