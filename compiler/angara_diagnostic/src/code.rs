//! Error codes, phase-prefixed: E1xxx name resolution, E2xxx type,
//! E3xxx contract/trait, E4xxx module, E5xxx backend/link, E9xxx internal.

use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorCode {
    // ---- E1xxx: name resolution ----
    E1001UndefinedName,
    E1002Redeclaration,

    // ---- E2xxx: type ----
    E2001TypeMismatch,
    E2002NonCallable,
    E2003ArityMismatch,
    E2004ArgumentMismatch,
    E2005MissingProperty,
    E2006VisibilityViolation,
    E2007ConstAssignment,
    E2008NonExhaustiveMatch,
    E2009NonTruthyCondition,
    E2010ReturnShapeMismatch,
    E2011IncompatibleArms,
    E2012DuplicateRecordKey,
    E2013BreakOutsideLoop,
    E2014ContinueOutsideLoop,
    E2015OptionalDotAccess,
    E2016InvalidOperand,
    E2017NotSubscriptable,
    E2018NotThrowable,
    E2019MisplacedThis,
    E2020MisplacedSuper,
    E2021InvalidRetype,

    // ---- E3xxx: contract/trait ----
    E3001ContractMemberMissing,
    E3002ContractMemberWrongKind,
    E3003ContractMemberWrongConstness,
    E3004ContractMemberWrongSignature,
    E3005TraitMethodMissing,
    E3006TraitMethodWrongSignature,
    E3007SuperclassCycle,

    // ---- E4xxx: module ----
    E4001ModuleNotFound,
    E4002CircularImport,
    E4003UnknownSelectiveAttach,
    E4004ExportAtNonModuleScope,
    E4005MissingOrIllTypedMain,

    // ---- E5xxx: backend/link ----
    E5001FilesystemFailure,
    E5002ChildCompilerNonZeroExit,

    // ---- E9xxx: internal ----
    E9001Internal,
}

impl ErrorCode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::E1001UndefinedName => "E1001",
            ErrorCode::E1002Redeclaration => "E1002",
            ErrorCode::E2001TypeMismatch => "E2001",
            ErrorCode::E2002NonCallable => "E2002",
            ErrorCode::E2003ArityMismatch => "E2003",
            ErrorCode::E2004ArgumentMismatch => "E2004",
            ErrorCode::E2005MissingProperty => "E2005",
            ErrorCode::E2006VisibilityViolation => "E2006",
            ErrorCode::E2007ConstAssignment => "E2007",
            ErrorCode::E2008NonExhaustiveMatch => "E2008",
            ErrorCode::E2009NonTruthyCondition => "E2009",
            ErrorCode::E2010ReturnShapeMismatch => "E2010",
            ErrorCode::E2011IncompatibleArms => "E2011",
            ErrorCode::E2012DuplicateRecordKey => "E2012",
            ErrorCode::E2013BreakOutsideLoop => "E2013",
            ErrorCode::E2014ContinueOutsideLoop => "E2014",
            ErrorCode::E2015OptionalDotAccess => "E2015",
            ErrorCode::E2016InvalidOperand => "E2016",
            ErrorCode::E2017NotSubscriptable => "E2017",
            ErrorCode::E2018NotThrowable => "E2018",
            ErrorCode::E2019MisplacedThis => "E2019",
            ErrorCode::E2020MisplacedSuper => "E2020",
            ErrorCode::E2021InvalidRetype => "E2021",
            ErrorCode::E3001ContractMemberMissing => "E3001",
            ErrorCode::E3002ContractMemberWrongKind => "E3002",
            ErrorCode::E3003ContractMemberWrongConstness => "E3003",
            ErrorCode::E3004ContractMemberWrongSignature => "E3004",
            ErrorCode::E3005TraitMethodMissing => "E3005",
            ErrorCode::E3006TraitMethodWrongSignature => "E3006",
            ErrorCode::E3007SuperclassCycle => "E3007",
            ErrorCode::E4001ModuleNotFound => "E4001",
            ErrorCode::E4002CircularImport => "E4002",
            ErrorCode::E4003UnknownSelectiveAttach => "E4003",
            ErrorCode::E4004ExportAtNonModuleScope => "E4004",
            ErrorCode::E4005MissingOrIllTypedMain => "E4005",
            ErrorCode::E5001FilesystemFailure => "E5001",
            ErrorCode::E5002ChildCompilerNonZeroExit => "E5002",
            ErrorCode::E9001Internal => "E9001",
        }
    }

    /// Parse a code as printed (`"E2001"`), used by `angarac explain`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::all().into_iter().find(|code| code.as_str().eq_ignore_ascii_case(s))
    }

    #[must_use]
    pub fn all() -> Vec<Self> {
        vec![
            ErrorCode::E1001UndefinedName,
            ErrorCode::E1002Redeclaration,
            ErrorCode::E2001TypeMismatch,
            ErrorCode::E2002NonCallable,
            ErrorCode::E2003ArityMismatch,
            ErrorCode::E2004ArgumentMismatch,
            ErrorCode::E2005MissingProperty,
            ErrorCode::E2006VisibilityViolation,
            ErrorCode::E2007ConstAssignment,
            ErrorCode::E2008NonExhaustiveMatch,
            ErrorCode::E2009NonTruthyCondition,
            ErrorCode::E2010ReturnShapeMismatch,
            ErrorCode::E2011IncompatibleArms,
            ErrorCode::E2012DuplicateRecordKey,
            ErrorCode::E2013BreakOutsideLoop,
            ErrorCode::E2014ContinueOutsideLoop,
            ErrorCode::E2015OptionalDotAccess,
            ErrorCode::E2016InvalidOperand,
            ErrorCode::E2017NotSubscriptable,
            ErrorCode::E2018NotThrowable,
            ErrorCode::E2019MisplacedThis,
            ErrorCode::E2020MisplacedSuper,
            ErrorCode::E2021InvalidRetype,
            ErrorCode::E3001ContractMemberMissing,
            ErrorCode::E3002ContractMemberWrongKind,
            ErrorCode::E3003ContractMemberWrongConstness,
            ErrorCode::E3004ContractMemberWrongSignature,
            ErrorCode::E3005TraitMethodMissing,
            ErrorCode::E3006TraitMethodWrongSignature,
            ErrorCode::E3007SuperclassCycle,
            ErrorCode::E4001ModuleNotFound,
            ErrorCode::E4002CircularImport,
            ErrorCode::E4003UnknownSelectiveAttach,
            ErrorCode::E4004ExportAtNonModuleScope,
            ErrorCode::E4005MissingOrIllTypedMain,
            ErrorCode::E5001FilesystemFailure,
            ErrorCode::E5002ChildCompilerNonZeroExit,
            ErrorCode::E9001Internal,
        ]
    }

    /// Longer prose explanation, surfaced by `angarac explain <CODE>`.
    #[must_use]
    pub fn explain(self) -> &'static str {
        match self {
            ErrorCode::E1001UndefinedName => {
                "A name was referenced that has no declaration visible in any enclosing scope. \
                 Check for a missing `attach`, a typo, or a declaration that comes later in the file."
            }
            ErrorCode::E1002Redeclaration => {
                "A name was declared twice in the same scope. The second declaration is rejected; \
                 the diagnostic's note points at the first one."
            }
            ErrorCode::E2001TypeMismatch => {
                "An expression's type is not assignable to the position that requires it \
                 (a variable's annotation, a function's declared return type, and so on)."
            }
            ErrorCode::E2002NonCallable => "The callee of a call expression is not a Function, Class, or Data type.",
            ErrorCode::E2003ArityMismatch => "A call passed a different number of arguments than the callee accepts.",
            ErrorCode::E2004ArgumentMismatch => "An argument's type is not assignable to the corresponding parameter's type.",
            ErrorCode::E2005MissingProperty => {
                "A property-get named a member that does not exist on the object's type. \
                 A near-name suggestion is included when a close match exists."
            }
            ErrorCode::E2006VisibilityViolation => "A private member was accessed from outside its declaring class.",
            ErrorCode::E2007ConstAssignment => "An assignment target was declared `const`.",
            ErrorCode::E2008NonExhaustiveMatch => "A `match` with no wildcard arm did not cover every variant of the scrutinee's enum.",
            ErrorCode::E2009NonTruthyCondition => "A condition expression had the error sentinel type and could not be checked for truthiness.",
            ErrorCode::E2010ReturnShapeMismatch => "A `return` statement's value type does not match the enclosing function's declared return type.",
            ErrorCode::E2011IncompatibleArms => "The arms of a ternary or match expression did not share a single canonical type.",
            ErrorCode::E2012DuplicateRecordKey => "A record literal declared the same field name more than once.",
            ErrorCode::E2013BreakOutsideLoop => "A `break` statement appeared outside any enclosing loop.",
            ErrorCode::E2014ContinueOutsideLoop => "A `continue` statement appeared outside any enclosing loop.",
            ErrorCode::E2015OptionalDotAccess => "`.` was used on an Optional value; use `?.` instead.",
            ErrorCode::E2016InvalidOperand => "An operator's operand was not of a type that operator accepts.",
            ErrorCode::E2017NotSubscriptable => "The `[]` operator was applied to a type that has no subscript form.",
            ErrorCode::E2018NotThrowable => "A `throw` statement's expression is not of type `Exception`.",
            ErrorCode::E2019MisplacedThis => "`this` was used outside a class method body.",
            ErrorCode::E2020MisplacedSuper => "`super` was used outside a class method body, or the enclosing class has no superclass.",
            ErrorCode::E2021InvalidRetype => "`retype<T>(expr)` requires `expr` of type `CPtr` and `T` a foreign data type.",
            ErrorCode::E3001ContractMemberMissing => "A class signs a contract but does not provide one of its required members.",
            ErrorCode::E3002ContractMemberWrongKind => "A contract member was provided as a field where a method (or vice versa) was required.",
            ErrorCode::E3003ContractMemberWrongConstness => "A contract-required field's `const`-ness does not match the class's member.",
            ErrorCode::E3004ContractMemberWrongSignature => "A contract-required member's type or method signature does not match the class's member.",
            ErrorCode::E3005TraitMethodMissing => "A class uses a trait but does not implement one of its prototype methods.",
            ErrorCode::E3006TraitMethodWrongSignature => "A trait method is implemented with a signature that is not structurally equal to the trait's prototype.",
            ErrorCode::E3007SuperclassCycle => "A class's superclass chain refers back to itself.",
            ErrorCode::E4001ModuleNotFound => "No source file or native library matching the attached name was found on any search path.",
            ErrorCode::E4002CircularImport => "Two or more modules attach each other, forming a cycle.",
            ErrorCode::E4003UnknownSelectiveAttach => "A selective `attach` named an export that the source module does not provide.",
            ErrorCode::E4004ExportAtNonModuleScope => "`export` was used on a declaration that is not at module scope.",
            ErrorCode::E4005MissingOrIllTypedMain => "The root module does not export a `main` with signature `() -> i64` or `(list<string>) -> i64`.",
            ErrorCode::E5001FilesystemFailure => "Writing a generated `.h`/`.c` file, or reading a source file, failed at the OS level.",
            ErrorCode::E5002ChildCompilerNonZeroExit => "The system C compiler exited with a non-zero status; its output is preserved in the build log.",
            ErrorCode::E9001Internal => "An invariant the checker or backend relies on did not hold; this indicates a compiler bug.",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
