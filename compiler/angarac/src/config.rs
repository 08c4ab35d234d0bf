//! Layered build configuration.
//!
//! Three tiers, highest priority first: CLI flags, environment variables,
//! built-in defaults. Each tier is an all-`Option`-fields struct merged
//! highest-priority-last: start from defaults, merge environment over it,
//! then merge CLI flags over that.

use std::path::PathBuf;

/// A single tier of configuration: every field absent means "not set at
/// this tier", so merging is just "take the new value if present".
#[derive(Debug, Clone, Default)]
pub struct ConfigLayer {
    pub runtime_dir: Option<PathBuf>,
    pub native_module_dir: Option<PathBuf>,
    pub user_module_dir: Option<PathBuf>,
    pub cc: Option<String>,
    pub verbose: Option<bool>,
}

impl ConfigLayer {
    /// Read `ANGARAC_RUNTIME_DIR`, `ANGARAC_NATIVE_MODULE_DIR`,
    /// `ANGARAC_USER_MODULE_DIR`, `ANGARAC_CC` from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        ConfigLayer {
            runtime_dir: std::env::var_os("ANGARAC_RUNTIME_DIR").map(PathBuf::from),
            native_module_dir: std::env::var_os("ANGARAC_NATIVE_MODULE_DIR").map(PathBuf::from),
            user_module_dir: std::env::var_os("ANGARAC_USER_MODULE_DIR").map(PathBuf::from),
            cc: std::env::var("ANGARAC_CC").ok(),
            verbose: None,
        }
    }

    /// Merge `other` over `self`: any field `other` sets wins.
    pub fn merge(&mut self, other: &Self) {
        if other.runtime_dir.is_some() {
            self.runtime_dir.clone_from(&other.runtime_dir);
        }
        if other.native_module_dir.is_some() {
            self.native_module_dir.clone_from(&other.native_module_dir);
        }
        if other.user_module_dir.is_some() {
            self.user_module_dir.clone_from(&other.user_module_dir);
        }
        if other.cc.is_some() {
            self.cc.clone_from(&other.cc);
        }
        if other.verbose.is_some() {
            self.verbose = other.verbose;
        }
    }
}

/// The fully resolved configuration the driver runs with; every field has a
/// concrete value, defaults already folded in.
#[derive(Debug, Clone)]
pub struct Config {
    pub runtime_dir: PathBuf,
    pub native_module_dir: PathBuf,
    pub user_module_dir: PathBuf,
    pub cc: String,
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            runtime_dir: PathBuf::from("./runtime"),
            native_module_dir: PathBuf::from("./modules"),
            user_module_dir: PathBuf::from("."),
            cc: "cc".to_string(),
            verbose: false,
        }
    }
}

impl Config {
    /// Resolve CLI flags over environment variables over built-in
    /// defaults, in that priority order.
    #[must_use]
    pub fn resolve(cli: &ConfigLayer) -> Self {
        let mut layer = ConfigLayer {
            runtime_dir: Some(Config::default().runtime_dir),
            native_module_dir: Some(Config::default().native_module_dir),
            user_module_dir: Some(Config::default().user_module_dir),
            cc: Some(Config::default().cc),
            verbose: Some(false),
        };
        layer.merge(&ConfigLayer::from_env());
        layer.merge(cli);

        Config {
            runtime_dir: layer.runtime_dir.unwrap_or_else(|| Config::default().runtime_dir),
            native_module_dir: layer.native_module_dir.unwrap_or_else(|| Config::default().native_module_dir),
            user_module_dir: layer.user_module_dir.unwrap_or_else(|| Config::default().user_module_dir),
            cc: layer.cc.unwrap_or_else(|| Config::default().cc),
            verbose: layer.verbose.unwrap_or(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_when_no_layers_set_anything() {
        let config = Config::resolve(&ConfigLayer::default());
        assert_eq!(config.runtime_dir, PathBuf::from("./runtime"));
        assert_eq!(config.cc, "cc");
        assert!(!config.verbose);
    }

    #[test]
    fn cli_layer_wins_over_defaults() {
        let cli = ConfigLayer { cc: Some("clang".to_string()), verbose: Some(true), ..ConfigLayer::default() };
        let config = Config::resolve(&cli);
        assert_eq!(config.cc, "clang");
        assert!(config.verbose);
    }

    #[test]
    fn layer_merge_only_overwrites_set_fields() {
        let mut base = ConfigLayer { cc: Some("cc".to_string()), ..ConfigLayer::default() };
        let override_layer = ConfigLayer { verbose: Some(true), ..ConfigLayer::default() };
        base.merge(&override_layer);
        assert_eq!(base.cc, Some("cc".to_string()));
        assert_eq!(base.verbose, Some(true));
    }
}
