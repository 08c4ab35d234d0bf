//! Terminal rendering of `Diagnostic`s with optional ANSI color and source
//! snippets.
//!
//! Combines a color-coded severity/code/label writer with a line/column
//! source-snippet renderer, simplified here to a direct byte scan rather
//! than a precomputed offset table.

use crate::{Diagnostic, Label, Severity};
use std::io::{self, Write};

/// Whether a `TerminalEmitter` should colorize its output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
    /// Colorize only when `is_tty` reports a real terminal.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    #[must_use]
    pub fn resolve(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

mod colors {
    pub const ERROR: &str = "\x1b[1;31m";
    pub const WARNING: &str = "\x1b[1;33m";
    pub const NOTE: &str = "\x1b[1;36m";
    pub const HELP: &str = "\x1b[1;32m";
    pub const BOLD: &str = "\x1b[1m";
    pub const SECONDARY: &str = "\x1b[1;34m";
    pub const RESET: &str = "\x1b[0m";
}

/// 1-based line and column (in characters, not bytes) of a byte offset
/// within `source`. Column counts characters since the last newline.
#[must_use]
fn line_col(source: &str, byte_offset: u32) -> (u32, u32) {
    let offset = (byte_offset as usize).min(source.len());
    let mut line = 1u32;
    let mut col = 1u32;
    for ch in source[..offset].chars() {
        if ch == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }
    (line, col)
}

/// The text of the source line containing `byte_offset`.
#[must_use]
fn line_text(source: &str, byte_offset: u32) -> &str {
    let offset = (byte_offset as usize).min(source.len());
    let start = source[..offset].rfind('\n').map_or(0, |i| i + 1);
    let end = source[offset..].find('\n').map_or(source.len(), |i| offset + i);
    &source[start..end]
}

/// Renders `Diagnostic`s to a writer, with an optional source-text snippet
/// (file line, caret column, and the offending lexeme) per §7's
/// user-visible behavior.
pub struct TerminalEmitter<'src, W: Write> {
    writer: W,
    colors: bool,
    source: Option<&'src str>,
    file_path: Option<String>,
}

impl<'src, W: Write> TerminalEmitter<'src, W> {
    pub fn with_color_mode(writer: W, mode: ColorMode, is_tty: bool) -> Self {
        TerminalEmitter { writer, colors: mode.resolve(is_tty), source: None, file_path: None }
    }

    #[must_use]
    pub fn with_source(mut self, source: &'src str) -> Self {
        self.source = Some(source);
        self
    }

    #[must_use]
    pub fn with_file_path(mut self, path: impl Into<String>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    fn paint(&mut self, color: &str, text: &str) {
        if self.colors {
            let _ = write!(self.writer, "{color}{text}{}", colors::RESET);
        } else {
            let _ = write!(self.writer, "{text}");
        }
    }

    fn severity_color(severity: Severity) -> &'static str {
        match severity {
            Severity::Error => colors::ERROR,
            Severity::Warning => colors::WARNING,
            Severity::Note => colors::NOTE,
            Severity::Help => colors::HELP,
        }
    }

    fn write_location(&mut self, label: &Label) {
        let path = self.file_path.clone().unwrap_or_else(|| "<input>".to_string());
        match self.source {
            Some(src) => {
                let (line, col) = line_col(src, label.span.start);
                let _ = write!(self.writer, "  --> {path}:{line}:{col}");
            }
            None => {
                let _ = write!(self.writer, "  --> {path}@{}", label.span);
            }
        }
        let _ = writeln!(self.writer);
        if let Some(src) = self.source {
            let (line, col) = line_col(src, label.span.start);
            let text = line_text(src, label.span.start);
            let gutter = format!("{line}");
            let _ = writeln!(self.writer, "{:>width$} | {text}", line, width = gutter.len());
            let marker_len = (label.span.end.saturating_sub(label.span.start)).max(1) as usize;
            let underline = "^".repeat(marker_len);
            let pad = " ".repeat((col as usize).saturating_sub(1));
            let _ = write!(self.writer, "{} | {pad}", " ".repeat(gutter.len()));
            let color = if label.is_primary { colors::ERROR } else { colors::SECONDARY };
            self.paint(color, &underline);
            let _ = writeln!(self.writer, " {}", label.message);
        }
    }

    /// Emit one diagnostic: `severity[CODE]: message`, every label (with a
    /// source snippet when available), notes, and suggestions.
    pub fn emit(&mut self, diagnostic: &Diagnostic) {
        self.paint(Self::severity_color(diagnostic.severity), &diagnostic.severity.to_string());
        self.paint(colors::BOLD, &format!("[{}]", diagnostic.code.as_str()));
        let _ = writeln!(self.writer, ": {}", diagnostic.message);

        for label in &diagnostic.labels {
            self.write_location(label);
        }
        for note in &diagnostic.notes {
            let _ = write!(self.writer, "  = ");
            self.paint(colors::BOLD, "note");
            let _ = writeln!(self.writer, ": {note}");
        }
        for suggestion in &diagnostic.suggestions {
            let _ = write!(self.writer, "  = ");
            self.paint(colors::HELP, "help");
            let _ = writeln!(self.writer, ": {suggestion}");
        }
        let _ = writeln!(self.writer);
    }

    pub fn flush(&mut self) {
        let _ = self.writer.flush();
    }

    /// The `rustc`-style trailer: `error: aborting due to N previous errors`.
    pub fn emit_summary(&mut self, error_count: usize, warning_count: usize) {
        if error_count == 0 && warning_count == 0 {
            return;
        }
        if error_count > 0 {
            self.paint(colors::ERROR, "error");
            let _ = write!(self.writer, ": aborting due to ");
            if error_count == 1 {
                let _ = write!(self.writer, "previous error");
            } else {
                let _ = write!(self.writer, "{error_count} previous errors");
            }
            if warning_count > 0 {
                let _ = write!(self.writer, "; {warning_count} warning{} emitted", plural_s(warning_count));
            }
            let _ = writeln!(self.writer);
        } else {
            self.paint(colors::WARNING, "warning");
            let _ = writeln!(self.writer, ": {warning_count} warning{} emitted", plural_s(warning_count));
        }
    }
}

/// Auto-detects whether `stream` is an interactive terminal, for
/// `ColorMode::Auto`.
#[must_use]
pub fn is_tty(stream: &impl io::IsTerminal) -> bool {
    stream.is_terminal()
}

fn plural_s(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorCode;
    use angara_ir::Span;
    use pretty_assertions::assert_eq;

    fn sample() -> Diagnostic {
        Diagnostic::error(ErrorCode::E2001TypeMismatch)
            .with_message("type mismatch: expected `i64`, found `string`")
            .with_label(Span::new(10, 15), "expected `i64`")
            .with_note("i64 and string are incompatible")
            .with_suggestion("convert with `i64(x)`")
    }

    #[test]
    fn emits_code_and_message_without_color() {
        let mut out = Vec::new();
        let mut emitter = TerminalEmitter::with_color_mode(&mut out, ColorMode::Never, false);
        emitter.emit(&sample());
        let text = String::from_utf8(out).expect("utf8 output");
        assert!(text.contains("[E2001]"));
        assert!(text.contains("type mismatch"));
        assert!(text.contains("note:"));
        assert!(text.contains("help:"));
    }

    #[test]
    fn renders_source_snippet_line_and_caret() {
        let source = "let x as i64 = \"nope\";\n";
        let mut out = Vec::new();
        let mut emitter = TerminalEmitter::with_color_mode(&mut out, ColorMode::Never, false)
            .with_source(source)
            .with_file_path("demo.an");
        emitter.emit(&sample());
        let text = String::from_utf8(out).expect("utf8 output");
        assert!(text.contains("demo.an:1:11"));
        assert!(text.contains(source.trim_end()));
    }

    #[test]
    fn line_col_counts_characters_after_newline() {
        let source = "a\nbc";
        assert_eq!(line_col(source, 3), (2, 2));
    }
}
