use std::path::{Path, PathBuf};

/// Filesystem existence predicate used by discovery and generation.
pub trait FsProbe {
    fn exists(&self, path: &str) -> bool;
}

impl<F> FsProbe for F
where
    F: Fn(&str) -> bool,
{
    fn exists(&self, path: &str) -> bool {
        self(path)
    }
}

/// Answers relative to an explicit repository root instead of the process
/// working directory.
#[derive(Debug, Clone)]
pub struct RootedFs {
    root: PathBuf,
}

impl RootedFs {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl FsProbe for RootedFs {
    /// Absolute paths would escape the root under `Path::join`, so they never exist.
    fn exists(&self, path: &str) -> bool {
        if Path::new(path).has_root() {
            log::debug!("probe {path} -> false (absolute path outside the root)");
            return false;
        }
        let full = self.root.join(path);
        let exists = full.exists();
        log::debug!("probe {} -> {exists}", full.display());
        exists
    }
}
