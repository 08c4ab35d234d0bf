//! Infrastructure failures for native-module loading and ABI decoding.
//!
//! Per SPEC_FULL §1.3, `thiserror` is reserved for the driver-adjacent
//! infrastructure failures here (dynamic loading, malformed signature
//! strings) — these are not source-level diagnostics and never touch
//! `angara_diagnostic::DiagnosticQueue`.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AbiError {
    #[error("could not load native module `{path}`: {source}")]
    DlOpen { path: PathBuf, #[source] source: libloading::Error },

    #[error("native module `{path}` is missing entry point `{symbol}`")]
    MissingEntryPoint { path: PathBuf, symbol: String },

    #[error("unexpected end of type signature")]
    UnexpectedEof,

    #[error("expected `{expected}` but found `{found}` in type signature `{signature}`")]
    UnexpectedChar { expected: char, found: char, signature: String },

    #[error("unknown class name `{name}` in type signature `{signature}`")]
    UnknownClass { name: String, signature: String },

    #[error("invalid type character `{found}` in type signature `{signature}`")]
    InvalidTypeChar { found: char, signature: String },

    #[error("variadic `...` must be the last parameter in signature `{signature}`")]
    VariadicNotLast { signature: String },

    #[error("unexpected trailing characters after signature `{signature}`")]
    TrailingCharacters { signature: String },

    #[error("duplicate native class declaration `{name}`")]
    DuplicateClass { name: String },
}
