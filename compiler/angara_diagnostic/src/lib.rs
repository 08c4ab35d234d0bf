//! Diagnostic representation and accumulation for the Angara compiler.
//!
//! Every checker pass and driver stage reports problems by building a
//! `Diagnostic` and pushing it onto a `DiagnosticQueue`; nothing in this
//! crate or its callers uses `Result`/exceptions for source-level errors —
//! that's reserved for infrastructure failures (I/O, dlopen, the child C
//! compiler process).

mod code;
mod diagnostic;
pub mod emitter;
mod queue;
pub mod suggest;

pub use code::ErrorCode;
pub use diagnostic::{
    missing_property, redeclaration, type_mismatch, undefined_name, Applicability, Diagnostic, Label,
    Severity, Substitution, Suggestion,
};
pub use emitter::{ColorMode, TerminalEmitter};
pub use queue::{DiagnosticConfig, DiagnosticQueue};
