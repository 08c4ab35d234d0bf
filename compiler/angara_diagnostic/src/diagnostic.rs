//! `Diagnostic`, `Severity`, `Label`, `Suggestion` — the builder API every
//! compiler stage uses to report a problem.

use crate::ErrorCode;
use angara_ir::Span;
use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Note,
    Help,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Note => "note",
            Severity::Help => "help",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Label {
    pub span: Span,
    pub message: String,
    pub is_primary: bool,
}

impl Label {
    #[must_use]
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Label { span, message: message.into(), is_primary: true }
    }

    #[must_use]
    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Label { span, message: message.into(), is_primary: false }
    }
}

/// Whether applying a `Suggestion`'s fix automatically would be safe.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Applicability {
    MachineApplicable,
    MaybeIncorrect,
    HasPlaceholders,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Substitution {
    pub span: Span,
    pub replacement: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Suggestion {
    pub message: String,
    pub applicability: Applicability,
    pub substitution: Option<Substitution>,
}

impl Suggestion {
    #[must_use]
    pub fn new(message: impl Into<String>, applicability: Applicability) -> Self {
        Suggestion { message: message.into(), applicability, substitution: None }
    }

    #[must_use]
    pub fn machine_applicable(message: impl Into<String>) -> Self {
        Self::new(message, Applicability::MachineApplicable)
    }

    #[must_use]
    pub fn maybe_incorrect(message: impl Into<String>) -> Self {
        Self::new(message, Applicability::MaybeIncorrect)
    }

    #[must_use]
    pub fn has_placeholders(message: impl Into<String>) -> Self {
        Self::new(message, Applicability::HasPlaceholders)
    }

    #[must_use]
    pub fn with_substitution(mut self, span: Span, replacement: impl Into<String>) -> Self {
        self.substitution = Some(Substitution { span, replacement: replacement.into() });
        self
    }
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub severity: Severity,
    pub message: String,
    pub labels: Vec<Label>,
    pub notes: Vec<String>,
    pub suggestions: Vec<Suggestion>,
}

impl Diagnostic {
    #[must_use]
    pub fn error(code: ErrorCode) -> Self {
        Diagnostic {
            code,
            severity: Severity::Error,
            message: String::new(),
            labels: Vec::new(),
            notes: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    #[must_use]
    pub fn warning(code: ErrorCode) -> Self {
        Diagnostic { severity: Severity::Warning, ..Self::error(code) }
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    #[must_use]
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(span, message));
        self
    }

    #[must_use]
    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(span, message));
        self
    }

    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(Suggestion::maybe_incorrect(suggestion));
        self
    }

    #[must_use]
    pub fn with_structured_suggestion(mut self, suggestion: Suggestion) -> Self {
        self.suggestions.push(suggestion);
        self
    }

    #[must_use]
    pub fn primary_span(&self) -> Option<Span> {
        self.labels.iter().find(|l| l.is_primary).map(|l| l.span)
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    #[must_use]
    pub fn has_machine_applicable_fix(&self) -> bool {
        self.suggestions.iter().any(|s| s.applicability == Applicability::MachineApplicable)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.code, self.message)
    }
}

// ---- Common constructors for the most frequent diagnostic shapes ----

#[must_use]
pub fn undefined_name(span: Span, name: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E1001UndefinedName)
        .with_message(format!("undefined name `{name}`"))
        .with_label(span, "not found in any enclosing scope")
}

#[must_use]
pub fn redeclaration(span: Span, name: &str, prior_span: Span) -> Diagnostic {
    Diagnostic::error(ErrorCode::E1002Redeclaration)
        .with_message(format!("`{name}` is already declared in this scope"))
        .with_label(span, "redeclared here")
        .with_secondary_label(prior_span, "previous declaration here")
}

#[must_use]
pub fn type_mismatch(span: Span, expected: &str, actual: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E2001TypeMismatch)
        .with_message(format!("type mismatch: expected `{expected}`, found `{actual}`"))
        .with_label(span, format!("expected `{expected}`"))
}

#[must_use]
pub fn missing_property(span: Span, name: &str, on_type: &str, suggestion: Option<&str>) -> Diagnostic {
    let mut diag = Diagnostic::error(ErrorCode::E2005MissingProperty)
        .with_message(format!("no member `{name}` on type `{on_type}`"))
        .with_label(span, "not found");
    if let Some(near) = suggestion {
        diag = diag.with_suggestion(format!("a similarly named member exists: `{near}`"));
    }
    diag
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_builder() {
        let diag = Diagnostic::error(ErrorCode::E2001TypeMismatch)
            .with_message("type mismatch")
            .with_label(Span::new(0, 3), "here")
            .with_note("a note")
            .with_suggestion("try this");
        assert_eq!(diag.labels.len(), 1);
        assert_eq!(diag.notes.len(), 1);
        assert_eq!(diag.suggestions.len(), 1);
        assert!(diag.is_error());
    }

    #[test]
    fn test_primary_span() {
        let diag = Diagnostic::error(ErrorCode::E1001UndefinedName)
            .with_secondary_label(Span::new(5, 6), "secondary")
            .with_label(Span::new(0, 1), "primary");
        assert_eq!(diag.primary_span(), Some(Span::new(0, 1)));
    }

    #[test]
    fn test_display_format() {
        let diag = Diagnostic::error(ErrorCode::E1001UndefinedName).with_message("undefined name `x`");
        assert_eq!(diag.to_string(), "error[E1001]: undefined name `x`");
    }
}
