//! The Module Driver (§4.3): resolves module references, orchestrates
//! checker + backend per module, and performs the final link.

use crate::config::Config;
use crate::error::DriverError;
use crate::parser::SourceParser;
use crate::resolve::{self, ModuleKind, SearchPaths};
use angara_diagnostic::{ColorMode, DiagnosticConfig, DiagnosticQueue, ErrorCode, TerminalEmitter};
use angara_ir::{ExprArena, SharedInterner, Span};
use angara_native_abi::NativeLibrary;
use angara_types::{PrimitiveKind, Type};
use angara_typeck::{check_module, ModuleResolver, ResolveError};
use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// What a fully resolved module contributes to the final link.
struct CompiledModule {
    module_type: Type,
    /// `(header_path, source_path)` for a source module; `None` for native.
    generated: Option<(PathBuf, PathBuf)>,
    /// `(lib_dir, bare_lib_name)` for a native module, used for `-L`/`-l`.
    native_link: Option<(PathBuf, String)>,
    module_name: String,
}

pub struct Driver<'p> {
    config: Config,
    interner: SharedInterner,
    parser: &'p mut dyn SourceParser,
    cache: FxHashMap<PathBuf, CompiledModule>,
    in_progress: Vec<PathBuf>,
    /// Module names in resolution order, used to sequence `init_globals`
    /// calls in the synthesized program `main` (§4.6).
    init_order: Vec<String>,
    had_error: bool,
    /// Whether the root module's checked `main` is the `(list<string>) ->
    /// i64` variant, set by `verify_main` and consumed by `link` to decide
    /// whether the synthesized program `main` forwards `argv` (§4.3/§6).
    main_takes_args: bool,
}

impl<'p> Driver<'p> {
    #[must_use]
    pub fn new(config: Config, parser: &'p mut dyn SourceParser) -> Self {
        Driver {
            config,
            interner: SharedInterner::default(),
            parser,
            cache: FxHashMap::default(),
            in_progress: Vec::new(),
            init_order: Vec::new(),
            had_error: false,
            main_takes_args: false,
        }
    }

    #[must_use]
    pub fn had_error(&self) -> bool {
        self.had_error
    }

    fn search_paths(&self) -> (PathBuf, PathBuf, PathBuf) {
        (std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")), self.config.user_module_dir.clone(), self.config.native_module_dir.clone())
    }

    /// Resolve and compile (or native-load) one module reference, reusing
    /// the cache on repeat references to the same canonical path.
    #[instrument(skip(self), fields(reference = %path_or_name))]
    fn compile_or_load(&mut self, path_or_name: &str) -> Result<Type, ResolveError> {
        let (cwd, user_dir, native_dir) = self.search_paths();
        let search = SearchPaths { cwd: &cwd, user_module_dir: &user_dir, native_module_dir: &native_dir };
        let Some(resolved) = resolve::resolve(path_or_name, &search) else {
            return Err(ResolveError::NotFound);
        };

        if let Some(compiled) = self.cache.get(&resolved.canonical_path) {
            return Ok(compiled.module_type.clone());
        }
        if self.in_progress.contains(&resolved.canonical_path) {
            return Err(ResolveError::Circular);
        }

        let Some(module_name) = resolve::module_name_from_path(&resolved.canonical_path, resolved.kind) else {
            self.report_internal(format!("could not derive a module name from `{}`", resolved.canonical_path.display()));
            return Err(ResolveError::NotFound);
        };

        self.in_progress.push(resolved.canonical_path.clone());
        if self.config.verbose {
            println!("  resolving {module_name} ({})", resolved.canonical_path.display());
        }

        let compiled = match resolved.kind {
            ModuleKind::Native => self.load_native(&resolved.canonical_path, &module_name),
            ModuleKind::Source => self.compile_source(&resolved.canonical_path, &module_name),
        };

        self.in_progress.pop();

        match compiled {
            Ok(compiled) => {
                let module_type = compiled.module_type.clone();
                self.init_order.push(compiled.module_name.clone());
                self.cache.insert(resolved.canonical_path, compiled);
                Ok(module_type)
            }
            Err(err) => {
                self.report_internal(err.to_string());
                self.had_error = true;
                Err(ResolveError::NotFound)
            }
        }
    }

    fn report_internal(&self, message: String) {
        eprintln!("{}[{}]: {message}", angara_diagnostic::Severity::Error, ErrorCode::E9001Internal.as_str());
    }

    #[instrument(skip(self, module_name))]
    fn load_native(&mut self, path: &Path, module_name: &str) -> Result<CompiledModule, DriverError> {
        info!(module = module_name, "loading native module");
        let library = NativeLibrary::load(path, module_name)?;
        // SAFETY: `library` was just loaded from a path resolved against
        // the configured native-module directory, and the decoder only
        // reads the `FuncDef`/`ClassDef` arrays it hands back — the same
        // invariant `angara_native_abi` itself documents at its crate root.
        #[allow(unsafe_code, reason = "native ABI decode is inherently unsafe; confined to this one call site")]
        let module_type = unsafe {
            angara_native_abi::decode_module(self.interner.intern(module_name), true, library.funcs(), &self.interner)?
        };

        let lib_dir = library.path().parent().map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        Ok(CompiledModule {
            module_type: Type::Module(std::rc::Rc::new(std::cell::RefCell::new(module_type))),
            generated: None,
            native_link: Some((lib_dir, module_name.to_string())),
            module_name: module_name.to_string(),
        })
    }

    #[instrument(skip(self, module_name))]
    fn compile_source(&mut self, path: &Path, module_name: &str) -> Result<CompiledModule, DriverError> {
        let source = std::fs::read_to_string(path).map_err(|source| DriverError::ReadSource { path: path.to_path_buf(), source })?;

        let interner = self.interner.clone();
        let mut arena = ExprArena::with_capacity(source.len());
        let name = interner.intern(module_name);
        let top_level = match self.parser.parse_module(path, &source, &interner, &mut arena) {
            Ok(range) => range,
            Err(diagnostic) => {
                eprintln!("{diagnostic}");
                return Err(DriverError::ParserUnavailable);
            }
        };

        debug!(module = module_name, "parsed; entering type checker");
        let outcome = check_module(name, &arena, &interner, top_level, false, self, DiagnosticConfig::default());

        if !outcome.diagnostics.is_empty() {
            self.emit_diagnostics(path, &source, &outcome.diagnostics);
        }
        if outcome.had_error {
            self.had_error = true;
            return Err(DriverError::CompilationFailed { path: path.to_path_buf() });
        }

        let module = angara_ir::ast::Module::new(top_level);
        let output = angara_codegen::emit_module(module_name, &interner, &arena, &module, &outcome.result);

        let header_path = path.with_extension("h");
        let source_path = path.with_extension("c");
        std::fs::write(&header_path, &output.header).map_err(|source| DriverError::WriteGenerated { path: header_path.clone(), source })?;
        std::fs::write(&source_path, &output.source).map_err(|source| DriverError::WriteGenerated { path: source_path.clone(), source })?;

        Ok(CompiledModule {
            module_type: outcome.module_type,
            generated: Some((header_path, source_path)),
            native_link: None,
            module_name: module_name.to_string(),
        })
    }

    fn emit_diagnostics(&self, path: &Path, source: &str, diagnostics: &DiagnosticQueue) {
        let is_tty = std::io::IsTerminal::is_terminal(&std::io::stderr());
        let mut emitter = TerminalEmitter::with_color_mode(std::io::stderr(), ColorMode::Auto, is_tty)
            .with_source(source)
            .with_file_path(path.display().to_string());
        for diagnostic in diagnostics.diagnostics() {
            emitter.emit(diagnostic);
        }
        emitter.emit_summary(diagnostics.error_count(), diagnostics.warning_count());
        emitter.flush();
    }

    /// Compile `root_path` and every module it transitively attaches, then
    /// link into a native executable named after the root module's stem.
    /// Mirrors §4.3's "Final link (root compile path)".
    pub fn build(&mut self, root_path: &Path) -> Result<PathBuf, DriverError> {
        let root_path = std::fs::canonicalize(root_path).map_err(|source| DriverError::ReadSource { path: root_path.to_path_buf(), source })?;
        let module_name = resolve::module_name_from_path(&root_path, ModuleKind::Source)
            .ok_or_else(|| DriverError::UnresolvableModuleName { path: root_path.clone() })?;

        if self.config.verbose {
            println!("compiling {module_name}");
        }
        let compiled = self.compile_source(&root_path, &module_name)?;
        self.init_order.push(compiled.module_name.clone());
        let root_canonical = root_path.clone();
        self.cache.insert(root_path.clone(), compiled);

        if self.had_error {
            return Err(DriverError::CompilationFailed { path: root_canonical });
        }

        self.verify_main(&root_canonical)?;
        self.link(&root_canonical)
    }

    fn verify_main(&mut self, root_path: &Path) -> Result<(), DriverError> {
        let Some(root) = self.cache.get(root_path) else {
            return Err(DriverError::InvalidMain { path: root_path.to_path_buf() });
        };
        let Type::Module(module_rc) = &root.module_type else {
            return Err(DriverError::InvalidMain { path: root_path.to_path_buf() });
        };
        let main_name = self.interner.intern("main");
        let exports = &module_rc.borrow().exports;
        let main_ty = exports.get(&main_name);
        let is_valid_main = main_ty.is_some_and(is_conformant_main);
        if !is_valid_main {
            eprintln!(
                "{}[{}]: the root module does not export a conformant `main`",
                angara_diagnostic::Severity::Error,
                ErrorCode::E4005MissingOrIllTypedMain.as_str()
            );
            return Err(DriverError::InvalidMain { path: root_path.to_path_buf() });
        }
        self.main_takes_args = matches!(main_ty, Some(Type::Function(f)) if !f.params.is_empty());
        Ok(())
    }

    fn link(&mut self, root_path: &Path) -> Result<PathBuf, DriverError> {
        let mut c_files: Vec<PathBuf> = Vec::new();
        let mut headers: Vec<PathBuf> = Vec::new();
        let mut lib_dirs: Vec<PathBuf> = Vec::new();
        let mut lib_names: Vec<String> = Vec::new();

        for compiled in self.cache.values() {
            if let Some((header, source)) = &compiled.generated {
                headers.push(header.clone());
                c_files.push(source.clone());
            }
            if let Some((dir, name)) = &compiled.native_link {
                if !lib_dirs.contains(dir) {
                    lib_dirs.push(dir.clone());
                }
                lib_names.push(name.clone());
            }
        }

        let program_main = angara_codegen::emit_program_main(&self.init_order, self.main_takes_args);
        let main_c_path = root_path.with_file_name("angara_program_main.c");
        std::fs::write(&main_c_path, program_main).map_err(|source| DriverError::WriteGenerated { path: main_c_path.clone(), source })?;
        c_files.push(main_c_path.clone());

        let root_base = root_path.file_stem().map_or_else(|| PathBuf::from("a.out"), PathBuf::from);
        let runtime_c = self.config.runtime_dir.join("angara_runtime.c");
        let log_path = PathBuf::from("angara_build.log");

        let mut command = std::process::Command::new(&self.config.cc);
        command.arg("-o").arg(&root_base);
        command.args(&c_files);
        command.arg(&runtime_c);
        command.arg("-I.").arg(format!("-I{}", self.config.runtime_dir.display()));
        for dir in &lib_dirs {
            command.arg(format!("-L{}", dir.display()));
        }
        for name in &lib_names {
            command.arg(format!("-l{name}"));
        }
        command.arg("-pthread").arg("-lm");
        command.arg(format!("-Wl,-rpath,{}", self.config.native_module_dir.display()));

        let output = command.output().map_err(|source| DriverError::SpawnCompiler { cc: self.config.cc.clone(), source })?;

        let _ = std::fs::remove_file(&main_c_path);

        if output.status.success() {
            for header in &headers {
                let _ = std::fs::remove_file(header);
            }
            for source in &c_files {
                let _ = std::fs::remove_file(source);
            }
            let _ = std::fs::remove_file(&log_path);
            Ok(root_base)
        } else {
            let mut log = Vec::new();
            log.extend_from_slice(&output.stdout);
            log.extend_from_slice(&output.stderr);
            std::fs::write(&log_path, &log).map_err(|source| DriverError::WriteGenerated { path: log_path.clone(), source })?;
            eprintln!("{}", String::from_utf8_lossy(&log));
            Err(DriverError::CompilerFailed {
                cc: self.config.cc.clone(),
                status: output.status.code().unwrap_or(-1),
                log_path,
            })
        }
    }
}

/// `main` must be `() -> i64` or `(list<string>) -> i64` (§4.3/§6/E4005).
fn is_conformant_main(ty: &Type) -> bool {
    let Type::Function(function) = ty else { return false };
    if !matches!(function.ret, Type::Primitive(PrimitiveKind::I64)) {
        return false;
    }
    match function.params.as_slice() {
        [] => true,
        [Type::List(elem)] => matches!(elem.as_ref(), Type::Primitive(PrimitiveKind::String)),
        _ => false,
    }
}

impl<'p> ModuleResolver for Driver<'p> {
    fn resolve(&mut self, path_or_name: &str, _importer_span: Span) -> Result<Type, ResolveError> {
        self.compile_or_load(path_or_name)
    }
}
