//! `DiagnosticQueue`: accumulates diagnostics across a module's checker
//! passes and the driver's stages, with error-limit, follow-on filtering,
//! and deduplication.

use crate::Diagnostic;

#[derive(Copy, Clone, Debug)]
pub struct DiagnosticConfig {
    /// Stop accepting new errors once this many have been recorded; 0 means
    /// unlimited.
    pub error_limit: usize,
    /// Suppress a diagnostic that is a probable follow-on of the
    /// immediately preceding one at the same span.
    pub filter_follow_on: bool,
    /// Drop an exact duplicate of an already-queued diagnostic.
    pub deduplicate: bool,
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        DiagnosticConfig { error_limit: 100, filter_follow_on: true, deduplicate: true }
    }
}

impl DiagnosticConfig {
    #[must_use]
    pub fn unlimited() -> Self {
        DiagnosticConfig { error_limit: 0, filter_follow_on: false, deduplicate: false }
    }
}

#[derive(Clone, Debug)]
struct QueuedDiagnostic {
    diagnostic: Diagnostic,
}

pub struct DiagnosticQueue {
    config: DiagnosticConfig,
    queued: Vec<QueuedDiagnostic>,
    error_count: usize,
    warning_count: usize,
    /// Set once any error (or the pseudo "lexical/syntactic phase already
    /// failed" signal the driver feeds in) has been recorded; consulted
    /// between checker passes and driver stages so later work can bail out
    /// early once the module is already doomed.
    had_error: bool,
}

impl DiagnosticQueue {
    #[must_use]
    pub fn new(config: DiagnosticConfig) -> Self {
        DiagnosticQueue { config, queued: Vec::new(), error_count: 0, warning_count: 0, had_error: false }
    }

    #[must_use]
    pub fn had_error(&self) -> bool {
        self.had_error
    }

    #[must_use]
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    /// Push `diagnostic`, applying the configured limit/dedup/follow-on
    /// filters. Returns `false` if the diagnostic was suppressed.
    pub fn push(&mut self, diagnostic: Diagnostic) -> bool {
        if self.config.error_limit > 0 && diagnostic.is_error() && self.error_count >= self.config.error_limit {
            return false;
        }
        if self.config.deduplicate && self.queued.iter().any(|q| q.diagnostic == diagnostic) {
            return false;
        }
        if self.config.filter_follow_on {
            if let Some(last) = self.queued.last() {
                if diagnostic.is_error()
                    && last.diagnostic.is_error()
                    && last.diagnostic.primary_span() == diagnostic.primary_span()
                    && last.diagnostic.primary_span().is_some()
                {
                    return false;
                }
            }
        }
        if diagnostic.is_error() {
            self.error_count += 1;
            self.had_error = true;
        } else if diagnostic.severity == crate::Severity::Warning {
            self.warning_count += 1;
        }
        self.queued.push(QueuedDiagnostic { diagnostic });
        true
    }

    /// Mark the queue as having failed without a specific diagnostic — used
    /// when a prior phase (the external lexer/parser) already reported
    /// failure and later passes should be skipped rather than cascading.
    pub fn mark_had_error(&mut self) {
        self.had_error = true;
    }

    #[must_use]
    pub fn diagnostics(&self) -> Vec<&Diagnostic> {
        self.queued.iter().map(|q| &q.diagnostic).collect()
    }

    pub fn drain(&mut self) -> Vec<Diagnostic> {
        self.queued.drain(..).map(|q| q.diagnostic).collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queued.is_empty()
    }
}

impl Default for DiagnosticQueue {
    fn default() -> Self {
        Self::new(DiagnosticConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorCode;
    use angara_ir::Span;

    fn sample(span_start: u32) -> Diagnostic {
        Diagnostic::error(ErrorCode::E2001TypeMismatch)
            .with_message("type mismatch")
            .with_label(Span::new(span_start, span_start + 1), "here")
    }

    #[test]
    fn test_push_sets_had_error() {
        let mut queue = DiagnosticQueue::default();
        assert!(!queue.had_error());
        queue.push(sample(0));
        assert!(queue.had_error());
        assert_eq!(queue.error_count(), 1);
    }

    #[test]
    fn test_deduplicate() {
        let mut queue = DiagnosticQueue::default();
        assert!(queue.push(sample(0)));
        assert!(!queue.push(sample(0)));
        assert_eq!(queue.error_count(), 1);
    }

    #[test]
    fn test_follow_on_filter_same_span() {
        let mut queue = DiagnosticQueue::default();
        assert!(queue.push(sample(0)));
        let mut other = sample(0);
        other.message = "a different message at the same span".to_string();
        assert!(!queue.push(other));
    }

    #[test]
    fn test_error_limit() {
        let mut queue = DiagnosticQueue::new(DiagnosticConfig { error_limit: 2, filter_follow_on: false, deduplicate: false });
        assert!(queue.push(sample(0)));
        assert!(queue.push(sample(10)));
        assert!(!queue.push(sample(20)));
        assert_eq!(queue.error_count(), 2);
    }

    #[test]
    fn test_unlimited_config_disables_filters() {
        let mut queue = DiagnosticQueue::new(DiagnosticConfig::unlimited());
        assert!(queue.push(sample(0)));
        assert!(queue.push(sample(0)));
        assert_eq!(queue.error_count(), 2);
    }
}
