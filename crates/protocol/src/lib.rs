//! Shared data model for automap: the mapping document, the values derived
//! from it, and the path-filter artifact handed to the CI trigger.

use anyhow::Result;
use serde::Serialize;

pub mod model;
pub mod path_filters;

pub use model::{
    expand_template, filter_key, CredentialSource, DeploymentLabel, DeploymentTarget,
    DirectoryConventions, EnvironmentConfig, MappingConfig, Matrix, MatrixItem, ServiceConfig,
    DEFAULT_STACK, ENVIRONMENT_PLACEHOLDER, NOT_AVAILABLE, SERVICE_PLACEHOLDER,
};
pub use path_filters::{matching_keys, render_filters_yaml, FilterEntry};

pub fn serialize_json_pretty<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(Into::into)
}
