//! The semantic type sum and the nominal types it wraps.
//!
//! Classes, traits, contracts, data types, enums, and modules are created as
//! *placeholders* in Pass 1 of the checker and filled in during Pass 2;
//! every holder of the `Type` sees the same object because they all hold
//! the same `Rc`. After Pass 2 completes nothing mutates them again, so no
//! locking is needed even though the handles are shared widely.

use crate::PrimitiveKind;
use angara_ir::{Name, Span};
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Clone)]
pub enum Type {
    Primitive(PrimitiveKind),
    Nil,
    Any,
    /// Never holds another `Optional` — wrapping is normalized at
    /// construction (`Type::optional`).
    Optional(Rc<Type>),
    List(Rc<Type>),
    /// An empty field map is the structural "any record".
    Record(Rc<FxHashMap<Name, Type>>),
    Function(Rc<FunctionType>),
    Class(Rc<RefCell<ClassType>>),
    /// A value of the given `Class`.
    Instance(Rc<RefCell<ClassType>>),
    Trait(Rc<RefCell<TraitType>>),
    Contract(Rc<RefCell<ContractType>>),
    Data(Rc<RefCell<DataType>>),
    Enum(Rc<RefCell<EnumType>>),
    Thread,
    Mutex,
    Exception,
    /// An opaque foreign pointer.
    CPtr,
    Module(Rc<RefCell<ModuleType>>),
    /// Sentinel used to suppress cascading diagnostics after an error.
    Error,
}

impl Type {
    /// Wrap `self` in `Optional`, collapsing `Optional(Optional(T))` and
    /// `Optional(Any)` to their simpler forms.
    #[must_use]
    pub fn optional(self) -> Type {
        match self {
            Type::Optional(_) | Type::Any => self,
            other => Type::Optional(Rc::new(other)),
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Type::Error)
    }

    #[must_use]
    pub fn is_any(&self) -> bool {
        matches!(self, Type::Any)
    }

    #[must_use]
    pub fn is_optional(&self) -> bool {
        matches!(self, Type::Optional(_))
    }

    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Primitive(p) if p.is_numeric())
    }

    #[must_use]
    pub fn is_integer(&self) -> bool {
        matches!(self, Type::Primitive(p) if p.is_integer())
    }

    /// Strip one layer of `Optional`, if present.
    #[must_use]
    pub fn unwrap_optional(&self) -> Type {
        match self {
            Type::Optional(inner) => (**inner).clone(),
            other => other.clone(),
        }
    }
}

#[derive(Clone)]
pub struct FunctionType {
    pub params: Vec<Type>,
    pub ret: Type,
    pub variadic: bool,
    /// Memoized canonical string, computed lazily. `FunctionType` equality
    /// (and contract/trait signature matching) compares this string, so
    /// every distinct signature is rendered at most once.
    pub(crate) canonical: RefCell<Option<Rc<str>>>,
}

impl FunctionType {
    #[must_use]
    pub fn new(params: Vec<Type>, ret: Type, variadic: bool) -> Self {
        FunctionType { params, ret, variadic, canonical: RefCell::new(None) }
    }
}

impl std::fmt::Debug for FunctionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FunctionType({} params, variadic={})", self.params.len(), self.variadic)
    }
}

/// Per §9 "string-keyed type identity", `Function` equality is specified as
/// a comparison of the canonical `toString` rendering. Compare the
/// structural fields directly instead of forcing the memoized string here,
/// so equality checks never pay the rendering cost; `Display` guarantees an
/// equal rendering for equal fields (see `display.rs`).
impl PartialEq for FunctionType {
    fn eq(&self, other: &Self) -> bool {
        self.variadic == other.variadic && self.ret == other.ret && self.params == other.params
    }
}
impl Eq for FunctionType {}

#[derive(Debug)]
pub struct FieldInfo {
    pub ty: Type,
    pub access: Access,
    pub is_const: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Access {
    Public,
    Private,
}

#[derive(Debug)]
pub struct ClassType {
    pub name: Name,
    pub superclass: Option<Type>,
    pub fields: FxHashMap<Name, FieldInfo>,
    pub methods: FxHashMap<Name, (FunctionType, Access)>,
    pub is_native: bool,
}

impl ClassType {
    #[must_use]
    pub fn placeholder(name: Name) -> Self {
        ClassType {
            name,
            superclass: None,
            fields: FxHashMap::default(),
            methods: FxHashMap::default(),
            is_native: false,
        }
    }
}

#[derive(Debug)]
pub struct TraitType {
    pub name: Name,
    pub methods: FxHashMap<Name, FunctionType>,
}

impl TraitType {
    #[must_use]
    pub fn placeholder(name: Name) -> Self {
        TraitType { name, methods: FxHashMap::default() }
    }
}

/// A contract's requirement, with the span of the `field`/`method` line in
/// the contract's own declaration — carried so a signing-failure diagnostic
/// can attach a secondary note pointing back at the requirement instead of
/// just naming the member (§8 E3).
#[derive(Debug, Clone)]
pub struct RequiredField {
    pub ty: Type,
    pub is_const: bool,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct RequiredMethod {
    pub ty: FunctionType,
    pub span: Span,
}

#[derive(Debug)]
pub struct ContractType {
    pub name: Name,
    pub required_fields: FxHashMap<Name, RequiredField>,
    pub required_methods: FxHashMap<Name, RequiredMethod>,
}

impl ContractType {
    #[must_use]
    pub fn placeholder(name: Name) -> Self {
        ContractType {
            name,
            required_fields: FxHashMap::default(),
            required_methods: FxHashMap::default(),
        }
    }
}

#[derive(Debug)]
pub struct DataType {
    pub name: Name,
    /// Ordered: declaration order is the synthesized constructor's
    /// parameter order.
    pub fields: Vec<(Name, Type, bool)>,
    pub is_foreign: bool,
}

impl DataType {
    #[must_use]
    pub fn placeholder(name: Name) -> Self {
        DataType { name, fields: Vec::new(), is_foreign: false }
    }

    #[must_use]
    pub fn constructor_type(&self, self_type: Type) -> FunctionType {
        FunctionType::new(self.fields.iter().map(|(_, t, _)| t.clone()).collect(), self_type, false)
    }
}

#[derive(Debug)]
pub struct EnumType {
    pub name: Name,
    /// variant name -> constructor Function (whose return type is this Enum)
    pub variants: FxHashMap<Name, FunctionType>,
    /// Preserves declaration order for exhaustiveness diagnostics and codegen.
    pub variant_order: Vec<Name>,
}

impl EnumType {
    #[must_use]
    pub fn placeholder(name: Name) -> Self {
        EnumType { name, variants: FxHashMap::default(), variant_order: Vec::new() }
    }
}

#[derive(Debug)]
pub struct ModuleType {
    pub name: Name,
    pub exports: FxHashMap<Name, Type>,
    pub is_native: bool,
}

impl ModuleType {
    #[must_use]
    pub fn new(name: Name, is_native: bool) -> Self {
        ModuleType { name, exports: FxHashMap::default(), is_native }
    }
}
