//! Class inheritance layout.
//!
//! `ClassType.methods`/`fields` are unordered maps (one per class, not
//! cumulative), so both struct-field layout and virtual dispatch need their
//! own walk of the `superclass` chain. This module is that walk, shared by
//! `decl` (which emits the struct/vtable definitions) and `expr` (which
//! emits call sites through them).
//!
//! The instance struct and the vtable struct both use the same trick:
//! a subclass's struct embeds its superclass's struct as its first member,
//! so a pointer to the derived struct is also a valid pointer to the base
//! struct (the common-initial-sequence idiom every C struct-based "class"
//! system from GObject on down relies on).

use angara_ir::Name;
use angara_types::types::ClassType;
use angara_types::Type;
use rustc_hash::FxHashSet;
use std::cell::RefCell;
use std::rc::Rc;

/// Root-to-self order: `chain[0]` has no superclass, `chain.last()` is `class_rc` itself.
#[must_use]
pub fn ancestor_chain(class_rc: &Rc<RefCell<ClassType>>) -> Vec<Rc<RefCell<ClassType>>> {
    let mut rev = vec![class_rc.clone()];
    let mut current = class_rc.borrow().superclass.clone();
    while let Some(Type::Class(super_rc)) = current {
        current = super_rc.borrow().superclass.clone();
        rev.push(super_rc);
    }
    rev.reverse();
    rev
}

/// For each level of `chain` (root-first), the method names first declared
/// at that level — i.e. not declared by any shallower ancestor. This is the
/// set of *new* vtable fields the level's own struct/vtable-struct adds.
#[must_use]
pub fn new_methods_per_level(chain: &[Rc<RefCell<ClassType>>]) -> Vec<Vec<Name>> {
    let mut seen: FxHashSet<Name> = FxHashSet::default();
    let mut levels = Vec::with_capacity(chain.len());
    for class_rc in chain {
        let b = class_rc.borrow();
        let mut new_here: Vec<Name> = b.methods.keys().copied().filter(|n| !seen.contains(n)).collect();
        new_here.sort_by_key(Name::index);
        seen.extend(new_here.iter().copied());
        levels.push(new_here);
    }
    levels
}

/// Same as `new_methods_per_level` but for fields — used for the plain
/// instance-data struct layout (which has no virtual dispatch, but does
/// share the "each level owns a disjoint struct suffix" shape).
#[must_use]
pub fn new_fields_per_level(chain: &[Rc<RefCell<ClassType>>]) -> Vec<Vec<Name>> {
    let mut seen: FxHashSet<Name> = FxHashSet::default();
    let mut levels = Vec::with_capacity(chain.len());
    for class_rc in chain {
        let b = class_rc.borrow();
        let mut new_here: Vec<Name> = b.fields.keys().copied().filter(|n| !seen.contains(n)).collect();
        new_here.sort_by_key(Name::index);
        seen.extend(new_here.iter().copied());
        levels.push(new_here);
    }
    levels
}

/// The index into `chain` of the level whose own struct/vtable holds the
/// field for `name` (the shallowest ancestor that declares it).
#[must_use]
pub fn declaring_level(chain: &[Rc<RefCell<ClassType>>], name: Name) -> Option<usize> {
    chain.iter().position(|c| c.borrow().methods.contains_key(&name) || c.borrow().fields.contains_key(&name))
}

/// The most-derived override of method `name` visible starting from
/// `chain[self_index]` and walking up — i.e. which class's own
/// implementation a `chain[self_index]`-typed instance actually runs.
#[must_use]
pub fn effective_method_owner(chain: &[Rc<RefCell<ClassType>>], name: Name, self_index: usize) -> usize {
    for idx in (0..=self_index).rev() {
        if chain[idx].borrow().methods.contains_key(&name) {
            return idx;
        }
    }
    unreachable!("declaring_level already confirmed `name` exists somewhere in chain")
}
