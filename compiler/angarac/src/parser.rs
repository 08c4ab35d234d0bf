//! The seam between the driver and an external parser. `angarac` only
//! knows how to drive whatever implements this trait; it ships no real
//! parser of its own, mirroring `angara_typeck::resolver::ModuleResolver`'s
//! own callback-seam shape (trait object handed in by the caller, a
//! `Null*` test double for unit tests that don't exercise it).

use angara_diagnostic::Diagnostic;
use angara_ir::{ExprArena, SharedInterner, StmtRange};
use std::path::Path;

/// Turns source text into a top-level statement range inside `arena`,
/// interning identifiers through `interner`. A real implementation lexes
/// and parses `source`; `angarac` itself never inspects the grammar.
pub trait SourceParser {
    fn parse_module(
        &mut self,
        path: &Path,
        source: &str,
        interner: &SharedInterner,
        arena: &mut ExprArena,
    ) -> Result<StmtRange, Diagnostic>;
}

/// A parser that always fails. The driver's default until a real parser
/// crate is wired in; also what checker-focused unit tests use since they
/// build `ExprArena`s by hand and never call `parse_module`.
#[derive(Default)]
pub struct NullParser;

impl SourceParser for NullParser {
    fn parse_module(
        &mut self,
        _path: &Path,
        _source: &str,
        _interner: &SharedInterner,
        _arena: &mut ExprArena,
    ) -> Result<StmtRange, Diagnostic> {
        Err(Diagnostic::error(angara_diagnostic::ErrorCode::E9001Internal)
            .with_message("no parser implementation is linked into this build"))
    }
}
