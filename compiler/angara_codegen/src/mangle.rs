//! Name mangling (§4.6): every scheme the backend needs to turn an Angara
//! identifier into a unique, valid C identifier.

/// C89/C99 keywords plus the handful of C11/C18 additions that could
/// plausibly collide with a mangled identifier fragment. Angara identifiers
/// never collide with the `angara_`/`Angara_`/`g_` prefixes the schemes
/// below add, but a *user* field or parameter name might legally be `int`
/// or `for`.
const C_KEYWORDS: &[&str] = &[
    "auto", "break", "case", "char", "const", "continue", "default", "do", "double", "else",
    "enum", "extern", "float", "for", "goto", "if", "inline", "int", "long", "register",
    "restrict", "return", "short", "signed", "sizeof", "static", "struct", "switch", "typedef",
    "union", "unsigned", "void", "volatile", "while", "_Bool", "_Complex", "_Imaginary",
];

/// Append `_` if `raw` collides with a C keyword; otherwise pass it through.
/// Called on every raw Angara identifier before it's spliced into a
/// generated C name.
#[must_use]
pub fn sanitize(raw: &str) -> String {
    if C_KEYWORDS.contains(&raw) {
        format!("{raw}_")
    } else {
        raw.to_string()
    }
}

/// Module-private Angara global function `f` in module `m`.
#[must_use]
pub fn function(module: &str, name: &str) -> String {
    format!("angara_f_{module}_{}", sanitize(name))
}

/// The `(argc, argv)` generic wrapper generated alongside every exported
/// function's strongly-typed definition.
#[must_use]
pub fn wrapper(mangled_function: &str) -> String {
    format!("angara_w_{mangled_function}")
}

/// The module-scope closure variable a wrapper is bound to, for an exported
/// function `f` of module `m`.
#[must_use]
pub fn function_closure(module: &str, name: &str) -> String {
    format!("g_{module}_{}", sanitize(name))
}

/// Special-cased per §4.6: the program's `main` is always reachable under
/// this fixed name, regardless of which module declares it.
#[must_use]
pub fn main_function() -> String {
    "angara_f_main".to_string()
}

#[must_use]
pub fn main_wrapper() -> String {
    format!("angara_w_{}", main_function())
}

#[must_use]
pub fn main_closure() -> String {
    "g_angara_main_closure".to_string()
}

/// Method `m` of class `C`.
#[must_use]
pub fn method(class: &str, name: &str) -> String {
    format!("Angara_{class}_{}", sanitize(name))
}

/// The synthesized constructor for class `C`.
#[must_use]
pub fn class_new(class: &str) -> String {
    format!("Angara_{class}_new")
}

/// The synthesized constructor for data type `D`.
#[must_use]
pub fn data_new(data: &str) -> String {
    format!("Angara_data_new_{data}")
}

/// The equality function synthesized for data type `D` (§8 E1).
#[must_use]
pub fn data_equals(data: &str) -> String {
    format!("Angara_{data}_equals")
}

/// The constructor function for enum `E`'s variant `V`.
#[must_use]
pub fn enum_variant_ctor(enum_name: &str, variant: &str) -> String {
    format!("Angara_{enum_name}_{}", sanitize(variant))
}

/// The class vtable/sentinel object for class `C`.
#[must_use]
pub fn class_sentinel(class: &str) -> String {
    format!("g_{class}_class")
}

/// A module-scope variable `v` declared in module `m`.
#[must_use]
pub fn module_var(module: &str, name: &str) -> String {
    format!("{module}_{}", sanitize(name))
}

/// The C struct tag for a user nominal type (class, data, or enum) named `n`.
#[must_use]
pub fn struct_name(name: &str) -> String {
    format!("Angara_{name}")
}

#[must_use]
pub fn enum_tag_type(name: &str) -> String {
    format!("Angara_{name}_Tag")
}

#[must_use]
pub fn enum_tag_value(enum_name: &str, variant: &str) -> String {
    format!("Angara_{enum_name}_Tag_{}", sanitize(variant))
}

#[must_use]
pub fn enum_payload_type(name: &str) -> String {
    format!("Angara_{name}_Payload")
}

/// The globals-initializer function emitted once per module (§4.6 emission
/// order, "module's init-globals prototype").
#[must_use]
pub fn init_globals(module: &str) -> String {
    format!("Angara_{module}_init_globals")
}

/// The vtable struct type for class `C` (holds one function-pointer field
/// per method slot, with the superclass's vtable struct embedded as the
/// first member — the same "inline the parent" trick §4.6 specifies for
/// instance structs, applied to virtual dispatch).
#[must_use]
pub fn class_vtable_struct(class: &str) -> String {
    format!("Angara_{class}_Class")
}

/// The non-owning wrapper constructor for a `foreign` data type `D`,
/// produced by `retype<D>(ptr)`.
#[must_use]
pub fn foreign_retype(data: &str) -> String {
    format!("Angara_retype_{data}")
}

/// The native entry point a module `m` exports its function `f` under,
/// callable only through the uniform `(argc, argv)` ABI (§6).
#[must_use]
pub fn native_function(module: &str, name: &str) -> String {
    format!("Angara_{module}_{}", sanitize(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_mangling() {
        assert_eq!(function("shapes", "area"), "angara_f_shapes_area");
    }

    #[test]
    fn test_keyword_collision_sanitized() {
        assert_eq!(function("m", "for"), "angara_f_m_for_");
    }

    #[test]
    fn test_wrapper_wraps_mangled_name() {
        assert_eq!(wrapper("angara_f_m_f"), "angara_w_angara_f_m_f");
    }

    #[test]
    fn test_main_scheme_is_fixed() {
        assert_eq!(main_function(), "angara_f_main");
        assert_eq!(main_wrapper(), "angara_w_angara_f_main");
        assert_eq!(main_closure(), "g_angara_main_closure");
    }

    #[test]
    fn test_native_function_mangling() {
        assert_eq!(native_function("fs", "read_to_string"), "Angara_fs_read_to_string");
    }
}
