//! Per-module emission state: the header/source text buffers, indentation,
//! fresh-temporary counter, and lookups into the checker's side tables.
//!
//! Consumes `angara_typeck`'s `CheckResult` directly rather than a separate
//! `TypeId` interner, since the checker hands codegen fully-resolved
//! `Type`s already.

use angara_ir::{ExprArena, ExprId, Name, SharedInterner};
use angara_typeck::CheckResult;
use angara_types::Type;
use rustc_hash::FxHashSet;

use crate::ctype;

pub struct CodegenContext<'a> {
    pub interner: &'a SharedInterner,
    pub arena: &'a ExprArena,
    pub result: &'a CheckResult,
    pub module_name: String,
    header: String,
    source: String,
    indent: u32,
    temp_counter: u32,
    /// Lightweight shadow of the checker's `SymbolTable`, scoped the same
    /// way: one frame per block/function, used only to decide whether an
    /// `Ident` read is a C local or a module-scope global needing the
    /// `module_var` mangling. Does not track types, only presence.
    locals: Vec<FxHashSet<Name>>,
    /// Closure globals awaiting their `angara_closure_new` initializer,
    /// queued by `module::emit_wrapper_and_closure` and drained by
    /// `module::emit_init_globals` once the function's wrapper has been
    /// emitted in full.
    pub pending_closure_inits: Vec<(String, String, usize)>,
    /// Native symbol prototypes already written to this module's header,
    /// keyed by mangled name, so a symbol called more than once in the same
    /// module gets exactly one `extern` declaration.
    emitted_native_protos: FxHashSet<String>,
}

impl<'a> CodegenContext<'a> {
    #[must_use]
    pub fn new(
        module_name: String,
        interner: &'a SharedInterner,
        arena: &'a ExprArena,
        result: &'a CheckResult,
    ) -> Self {
        CodegenContext {
            interner,
            arena,
            result,
            module_name,
            header: String::new(),
            source: String::new(),
            indent: 0,
            temp_counter: 0,
            locals: Vec::new(),
            pending_closure_inits: Vec::new(),
            emitted_native_protos: FxHashSet::default(),
        }
    }

    pub fn enter_local_scope(&mut self) {
        self.locals.push(FxHashSet::default());
    }

    pub fn exit_local_scope(&mut self) {
        self.locals.pop();
    }

    pub fn declare_local(&mut self, name: Name) {
        if let Some(frame) = self.locals.last_mut() {
            frame.insert(name);
        }
    }

    #[must_use]
    pub fn is_local(&self, name: Name) -> bool {
        self.locals.iter().any(|frame| frame.contains(&name))
    }

    #[must_use]
    pub fn name(&self, n: Name) -> String {
        crate::mangle::sanitize(self.interner.lookup(n))
    }

    pub fn indent(&mut self) {
        self.indent += 1;
    }

    pub fn dedent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
    }

    fn pad(&self) -> String {
        "    ".repeat(self.indent as usize)
    }

    pub fn write_h(&mut self, line: &str) {
        self.header.push_str(line);
        self.header.push('\n');
    }

    pub fn write_s(&mut self, line: &str) {
        let pad = self.pad();
        self.source.push_str(&pad);
        self.source.push_str(line);
        self.source.push('\n');
    }

    /// A raw append to the source buffer with no trailing newline or
    /// indentation, for building up one statement from several pieces.
    pub fn write_s_raw(&mut self, text: &str) {
        self.source.push_str(text);
    }

    pub fn blank_h(&mut self) {
        self.header.push('\n');
    }

    pub fn blank_s(&mut self) {
        self.source.push('\n');
    }

    #[must_use]
    pub fn fresh_temp(&mut self) -> String {
        let id = self.temp_counter;
        self.temp_counter += 1;
        format!("_angara_t{id}")
    }

    /// The type an expression checked to, preferring a narrowed read over
    /// the statically declared type, per the distinction `CheckResult`
    /// draws (§9/§4.5 narrowing).
    #[must_use]
    pub fn expr_type(&self, id: ExprId) -> Type {
        self.result
            .narrowed_reads
            .get(&id)
            .or_else(|| self.result.expr_types.get(&id))
            .cloned()
            .unwrap_or(Type::Any)
    }

    #[must_use]
    pub fn sizeof_type(&self, id: ExprId) -> Option<Type> {
        self.result.sizeof_types.get(&id).cloned()
    }

    #[must_use]
    pub fn var_origin(&self, id: ExprId) -> Option<Name> {
        self.result.var_origins.get(&id).copied()
    }

    #[must_use]
    pub fn is_native_export(&self, module: Name, symbol: Name) -> bool {
        self.result.used_native_symbols.iter().any(|(m, s)| *m == module && *s == symbol)
    }

    /// Mangled C name of a native symbol, emitting its `extern` prototype
    /// into this module's header the first time it's referenced.
    pub fn ensure_native_prototype(&mut self, module: Name, symbol: Name) -> String {
        let module_text = self.interner.lookup(module).to_string();
        let symbol_text = self.interner.lookup(symbol).to_string();
        let mangled = crate::mangle::native_function(&module_text, &symbol_text);
        if self.emitted_native_protos.insert(mangled.clone()) {
            self.write_h(&format!("extern {} {mangled}(int argc, {} *argv);", ctype::VALUE_TYPE, ctype::VALUE_TYPE));
        }
        mangled
    }

    pub fn finish(self) -> (String, String) {
        (self.header, self.source)
    }
}
