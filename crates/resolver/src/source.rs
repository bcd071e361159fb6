use crate::error::{ResolverError, Result};
use automap_protocol::MappingConfig;
use std::path::{Path, PathBuf};

/// Default location of the mapping document, relative to the repository root.
pub const DEFAULT_MAPPING_PATH: &str = ".github/auto-label--mappings.yaml";

/// Anything that can hand the resolver a parsed mapping.
pub trait MappingSource {
    fn load(&self) -> Result<MappingConfig>;
}

impl MappingSource for MappingConfig {
    fn load(&self) -> Result<MappingConfig> {
        Ok(self.clone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingFormat {
    Yaml,
    Json,
}

impl MappingFormat {
    pub fn from_path(path: &Path) -> Self {
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::Json
        } else {
            Self::Yaml
        }
    }
}

/// Mapping document stored on disk.
#[derive(Debug, Clone)]
pub struct MappingFile {
    path: PathBuf,
}

impl MappingFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MappingSource for MappingFile {
    fn load(&self) -> Result<MappingConfig> {
        let text = std::fs::read_to_string(&self.path).map_err(|source| ResolverError::Io {
            path: self.path.clone(),
            source,
        })?;
        let config = parse_mapping(&text, MappingFormat::from_path(&self.path), &self.path)?;
        log::debug!(
            "Loaded mapping {} ({} environments, {} stacks)",
            self.path.display(),
            config.environments().len(),
            config.stack_count()
        );
        Ok(config)
    }
}

/// Parse mapping text. `origin` only labels errors.
pub fn parse_mapping(text: &str, format: MappingFormat, origin: &Path) -> Result<MappingConfig> {
    // An empty document has no sections at all; validation reports each one.
    if text.trim().is_empty() {
        return Ok(MappingConfig::default());
    }
    match format {
        MappingFormat::Yaml => serde_yaml::from_str(text).map_err(|source| ResolverError::Yaml {
            path: origin.to_path_buf(),
            source,
        }),
        MappingFormat::Json => serde_json::from_str(text).map_err(|source| ResolverError::Json {
            path: origin.to_path_buf(),
            source,
        }),
    }
}
