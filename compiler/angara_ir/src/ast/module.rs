//! The top-level container produced by the parser for one source file.

use crate::StmtRange;

/// A parsed module: its top-level statements (which include declarations —
/// `class`, `function`, `attach`, etc. — since the grammar treats them as
/// statements valid at module scope).
#[derive(Clone, Debug, PartialEq)]
pub struct Module {
    pub top_level: StmtRange,
}

impl Module {
    #[must_use]
    pub fn new(top_level: StmtRange) -> Self {
        Module { top_level }
    }
}
