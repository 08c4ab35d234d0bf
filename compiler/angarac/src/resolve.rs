//! Canonical-path resolution of a module reference (§4.3 point 1).

use std::path::{Path, PathBuf};

/// The source-file extension Angara modules use.
pub const SOURCE_EXT: &str = "an";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleKind {
    Source,
    Native,
}

pub struct ResolvedModule {
    pub canonical_path: PathBuf,
    pub kind: ModuleKind,
}

/// Search directories, tried in order, per §4.3/§6 "Search paths".
pub struct SearchPaths<'a> {
    pub cwd: &'a Path,
    pub user_module_dir: &'a Path,
    pub native_module_dir: &'a Path,
}

fn has_separator_or_known_ext(text: &str) -> bool {
    if text.contains(std::path::MAIN_SEPARATOR) || text.contains('/') {
        return true;
    }
    let known = [SOURCE_EXT, "so", "dylib"];
    Path::new(text).extension().and_then(|ext| ext.to_str()).is_some_and(|ext| known.contains(&ext))
}

/// Resolve `path_or_name` (the raw text after `attach`/`from`) to a
/// canonical, existing path plus whether it's a source file or a native
/// library, per §4.3 point 1's exact trial order.
#[must_use]
pub fn resolve(path_or_name: &str, search: &SearchPaths<'_>) -> Option<ResolvedModule> {
    if has_separator_or_known_ext(path_or_name) {
        let candidate = Path::new(path_or_name);
        return canonicalize_if_exists(candidate).map(|canonical_path| {
            let kind = classify(&canonical_path);
            ResolvedModule { canonical_path, kind }
        });
    }

    for dir in [search.cwd, search.user_module_dir, search.native_module_dir] {
        let source_candidate = dir.join(format!("{path_or_name}.{SOURCE_EXT}"));
        if let Some(canonical_path) = canonicalize_if_exists(&source_candidate) {
            return Some(ResolvedModule { canonical_path, kind: ModuleKind::Source });
        }
        let so_candidate = dir.join(format!("lib{path_or_name}.so"));
        if let Some(canonical_path) = canonicalize_if_exists(&so_candidate) {
            return Some(ResolvedModule { canonical_path, kind: ModuleKind::Native });
        }
        let dylib_candidate = dir.join(format!("lib{path_or_name}.dylib"));
        if let Some(canonical_path) = canonicalize_if_exists(&dylib_candidate) {
            return Some(ResolvedModule { canonical_path, kind: ModuleKind::Native });
        }
    }
    None
}

fn classify(path: &Path) -> ModuleKind {
    match path.extension().and_then(|e| e.to_str()) {
        Some("so" | "dylib") => ModuleKind::Native,
        _ => ModuleKind::Source,
    }
}

fn canonicalize_if_exists(path: &Path) -> Option<PathBuf> {
    if path.exists() {
        std::fs::canonicalize(path).ok()
    } else {
        None
    }
}

/// The bare module name derived from a resolved path's file stem, used for
/// C mangling and the native-entry-point symbol name. `lib<name>.so`
/// strips the `lib` prefix; a source file's stem is used as-is.
#[must_use]
pub fn module_name_from_path(path: &Path, kind: ModuleKind) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    let name = match kind {
        ModuleKind::Native => stem.strip_prefix("lib").unwrap_or(stem),
        ModuleKind::Source => stem,
    };
    Some(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    #[test]
    fn bare_name_searches_cwd_then_user_then_native() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cwd = dir.path().join("cwd");
        let user = dir.path().join("user");
        let native = dir.path().join("native");
        fs::create_dir_all(&cwd).expect("mkdir");
        fs::create_dir_all(&user).expect("mkdir");
        fs::create_dir_all(&native).expect("mkdir");
        fs::write(user.join("fmt.an"), "").expect("write");

        let search = SearchPaths { cwd: &cwd, user_module_dir: &user, native_module_dir: &native };
        let resolved = resolve("fmt", &search).expect("resolved");
        assert_eq!(resolved.kind, ModuleKind::Source);
        assert_eq!(module_name_from_path(&resolved.canonical_path, resolved.kind), Some("fmt".to_string()));
    }

    #[test]
    fn native_library_name_strips_lib_prefix() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("libfs.so"), "").expect("write");
        let search = SearchPaths { cwd: dir.path(), user_module_dir: dir.path(), native_module_dir: dir.path() };
        let resolved = resolve("fs", &search).expect("resolved");
        assert_eq!(resolved.kind, ModuleKind::Native);
        assert_eq!(module_name_from_path(&resolved.canonical_path, resolved.kind), Some("fs".to_string()));
    }

    #[test]
    fn missing_module_resolves_to_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let search = SearchPaths { cwd: dir.path(), user_module_dir: dir.path(), native_module_dir: dir.path() };
        assert!(resolve("nope", &search).is_none());
    }
}
