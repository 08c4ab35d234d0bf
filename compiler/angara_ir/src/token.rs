//! Tokens produced by the (external) lexer/parser and consumed by the
//! checker only for diagnostics (line/column/lexeme).

use crate::{Name, Span};

/// A lexical token. The checker never re-lexes; it reads `lexeme`/`line`/
/// `column` purely to build diagnostics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: Name,
    pub line: u32,
    pub column: u32,
    pub span: Span,
}

impl Token {
    #[must_use]
    pub fn new(kind: TokenKind, lexeme: Name, line: u32, column: u32, span: Span) -> Self {
        Token { kind, lexeme, line, column, span }
    }
}

/// Coarse token classification; the parser is an external collaborator so
/// this only needs to be detailed enough for diagnostics and for the AST
/// builders used in tests to construct plausible tokens.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Identifier,
    IntLiteral,
    FloatLiteral,
    StringLiteral,
    BoolLiteral,
    Keyword,
    Punctuation,
    Eof,
}
