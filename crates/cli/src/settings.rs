use automap_resolver::DEFAULT_MAPPING_PATH;
use std::env;
use std::path::{Path, PathBuf};

pub const DEFAULT_FILTERS_FILE: &str = "path-filters.yml";

pub const ROOT_ENV: &str = "AUTOMAP_ROOT";
pub const CONFIG_ENV: &str = "AUTOMAP_CONFIG";
pub const FILTERS_OUT_ENV: &str = "AUTOMAP_FILTERS_OUT";

/// Where to read the mapping and which directory convention paths are relative to.
///
/// Each value comes from its flag, then its environment variable, then the default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub root: PathBuf,
    pub config_path: PathBuf,
}

impl Settings {
    pub fn resolve(root: Option<PathBuf>, config: Option<PathBuf>) -> Self {
        let root = root
            .or_else(|| env_path(ROOT_ENV))
            .unwrap_or_else(|| PathBuf::from("."));
        let config_path = config
            .or_else(|| env_path(CONFIG_ENV))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MAPPING_PATH));
        let config_path = anchor_at(&root, config_path);
        Self { root, config_path }
    }

    /// Filter artifact location; the default lands in the repository root.
    pub fn filters_path(&self, out: Option<PathBuf>) -> PathBuf {
        out.or_else(|| env_path(FILTERS_OUT_ENV))
            .map(|path| self.anchor(path))
            .unwrap_or_else(|| self.root.join(DEFAULT_FILTERS_FILE))
    }

    /// Relative paths hang off the root; absolute ones are kept.
    pub fn anchor(&self, path: PathBuf) -> PathBuf {
        anchor_at(&self.root, path)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn anchor_at(root: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        root.join(path)
    }
}

fn env_path(var: &str) -> Option<PathBuf> {
    env::var_os(var)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}
