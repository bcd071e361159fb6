use crate::error::{ResolverError, Result};
use crate::probe::FsProbe;
use automap_protocol::MappingConfig;
use std::path::Path;
use walkdir::WalkDir;

/// Sub-path whose presence marks a top-level directory as a service.
pub const SERVICE_MARKER: &str = "terragrunt/envs";

/// One entry of the repository root listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
}

impl DirEntry {
    pub fn dir(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: true,
        }
    }

    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: false,
        }
    }

    fn is_hidden(&self) -> bool {
        self.name.starts_with('.')
    }
}

/// Immediate children of `root`, sorted by name so repeated runs agree.
pub fn list_root(root: &Path) -> Result<Vec<DirEntry>> {
    std::fs::metadata(root).map_err(|source| ResolverError::Io {
        path: root.to_path_buf(),
        source,
    })?;

    let mut entries = Vec::new();
    for result in WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        match result {
            Ok(entry) => {
                let Some(name) = entry.file_name().to_str() else {
                    log::warn!("Skipping non UTF-8 entry {}", entry.path().display());
                    continue;
                };
                entries.push(DirEntry {
                    name: name.to_string(),
                    is_dir: entry.file_type().is_dir(),
                });
            }
            Err(e) => log::warn!("Failed to read entry: {e}"),
        }
    }
    Ok(entries)
}

/// Services to generate paths for: marked directories from the listing first,
/// then declared services not already found, without duplicates.
pub fn discover_services(
    root_listing: &[DirEntry],
    config: &MappingConfig,
    probe: &impl FsProbe,
) -> Vec<String> {
    let mut services: Vec<String> = Vec::new();

    for entry in root_listing {
        if !entry.is_dir || entry.is_hidden() {
            continue;
        }
        if !probe.exists(&format!("{}/{SERVICE_MARKER}", entry.name)) {
            continue;
        }
        if !services.contains(&entry.name) {
            services.push(entry.name.clone());
        }
    }
    let discovered = services.len();

    for name in config.declared_service_names() {
        if !services.iter().any(|s| s == name) {
            services.push(name.to_string());
        }
    }

    log::info!(
        "Discovered {discovered} service directories, {} services total",
        services.len()
    );
    services
}
