//! # automap resolver
//!
//! Turns a declarative mapping (environments × services × directory
//! conventions) into concrete CI inputs.
//!
//! ## Pipeline
//!
//! ```text
//! MappingSource ──> MappingConfig
//!                       │
//!                       ├──> validate()           errors / warnings
//!                       │
//!                       ├──> discover_services()  root listing + declared services
//!                       │        │
//!                       │        └──> generate()  FilterEntry[] + MatrixItem[]
//!                       │                         (FsProbe decides what exists)
//!                       │
//!                       └──> resolve_label()      deploy:<svc>:<env>[:<stack>]
//!                                                 -> DeploymentTarget
//! ```
//!
//! Nothing here depends on the process working directory: existence checks go
//! through an [`FsProbe`], usually a [`RootedFs`] anchored at the repository root.
//!
//! ## Example
//!
//! ```no_run
//! use automap_resolver::{
//!     discover_services, generate, list_root, validate, MappingFile, MappingSource, RootedFs,
//! };
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = MappingFile::new(".github/auto-label--mappings.yaml").load()?;
//!     let report = validate(&config);
//!     if !report.is_valid() {
//!         return Err(report.errors.join("; ").into());
//!     }
//!
//!     let probe = RootedFs::new(".");
//!     let services = discover_services(&list_root(Path::new("."))?, &config, &probe);
//!     let out = generate(&services, &config, &probe);
//!     println!("{} filters", out.filters.len());
//!     Ok(())
//! }
//! ```

mod discover;
mod error;
mod generate;
mod label;
mod probe;
mod source;
mod validate;

#[cfg(test)]
mod test_support;

pub use discover::{discover_services, list_root, DirEntry, SERVICE_MARKER};
pub use error::{LabelError, ResolverError, Result};
pub use generate::{generate, CheckedPath, Generation};
pub use label::{parse_label, resolve_label, resolve_labels, LABEL_PREFIX};
pub use probe::{FsProbe, RootedFs};
pub use source::{parse_mapping, MappingFile, MappingFormat, MappingSource, DEFAULT_MAPPING_PATH};
pub use validate::{validate, ValidationReport, REQUIRED_SECTIONS};
