use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Stack used when a deployment label does not name one.
pub const DEFAULT_STACK: &str = "terragrunt";

/// Marker shown in place of an absent credential or region.
pub const NOT_AVAILABLE: &str = "N/A";

pub const SERVICE_PLACEHOLDER: &str = "{service}";
pub const ENVIRONMENT_PLACEHOLDER: &str = "{environment}";

/// Stack name -> path template, in document order.
pub type DirectoryConventions = IndexMap<String, String>;

/// Root of the mapping document.
///
/// Every section is optional at the type level so that an absent section is a
/// validation finding rather than a parse failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MappingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environments: Option<Vec<EnvironmentConfig>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory_conventions: Option<DirectoryConventions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub services: Option<Vec<ServiceConfig>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defaults: Option<EnvironmentConfig>,
    /// Tool versions. Carried through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modules: Option<IndexMap<String, serde_json::Value>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    #[serde(
        rename = "environment",
        alias = "name",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iam_role_plan: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iam_role_apply: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Replaces the root conventions for this service when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory_conventions: Option<DirectoryConventions>,
}

impl MappingConfig {
    pub fn environments(&self) -> &[EnvironmentConfig] {
        self.environments.as_deref().unwrap_or_default()
    }

    pub fn services(&self) -> &[ServiceConfig] {
        self.services.as_deref().unwrap_or_default()
    }

    /// First environment declared under `name`.
    pub fn environment(&self, name: &str) -> Option<&EnvironmentConfig> {
        self.environments()
            .iter()
            .find(|env| env.name.as_deref() == Some(name))
    }

    /// First service entry declared under `name`.
    pub fn service(&self, name: &str) -> Option<&ServiceConfig> {
        self.services()
            .iter()
            .find(|svc| svc.name.as_deref() == Some(name))
    }

    /// Conventions in effect for `service`: its own override map when it
    /// declares one, otherwise the root map. The two are never merged.
    pub fn conventions_for(&self, service: &str) -> Option<&DirectoryConventions> {
        self.service(service)
            .and_then(|svc| svc.directory_conventions.as_ref())
            .or(self.directory_conventions.as_ref())
    }

    /// Names of declared services, in declaration order, skipping unnamed
    /// and blank entries.
    pub fn declared_service_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.services()
            .iter()
            .filter_map(|svc| svc.name.as_deref())
            .filter(|name| !name.trim().is_empty())
    }

    pub fn stack_count(&self) -> usize {
        self.directory_conventions.as_ref().map_or(0, IndexMap::len)
    }

    pub fn module_count(&self) -> usize {
        self.modules.as_ref().map_or(0, IndexMap::len)
    }
}

/// Fill the `{service}` and `{environment}` placeholders of a path template.
pub fn expand_template(template: &str, service: &str, environment: &str) -> String {
    template
        .replace(SERVICE_PLACEHOLDER, service)
        .replace(ENVIRONMENT_PLACEHOLDER, environment)
}

/// `"{service}-{environment}-{stack}"`
pub fn filter_key(service: &str, environment: &str, stack: &str) -> String {
    format!("{service}-{environment}-{stack}")
}

/// One existing convention path, as fed to a CI job matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixItem {
    pub service: String,
    pub environment: String,
    pub stack: String,
    pub path: String,
    pub filter_key: String,
}

/// The `include` shape consumed by CI job matrices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Matrix {
    pub include: Vec<MatrixItem>,
}

/// Parsed form of `deploy:<service>:<environment>[:<stack>]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentLabel {
    pub service: String,
    pub environment: String,
    pub stack: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialSource {
    /// The environment is declared in the mapping.
    Environment,
    /// The environment is not declared; shared defaults apply.
    Defaults,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentTarget {
    pub label: DeploymentLabel,
    pub working_directory: String,
    pub aws_region: Option<String>,
    pub iam_role_plan: Option<String>,
    pub iam_role_apply: Option<String>,
    pub credential_source: CredentialSource,
}

impl DeploymentTarget {
    pub fn aws_region_or_na(&self) -> &str {
        self.aws_region.as_deref().unwrap_or(NOT_AVAILABLE)
    }

    pub fn iam_role_plan_or_na(&self) -> &str {
        self.iam_role_plan.as_deref().unwrap_or(NOT_AVAILABLE)
    }

    pub fn iam_role_apply_or_na(&self) -> &str {
        self.iam_role_apply.as_deref().unwrap_or(NOT_AVAILABLE)
    }
}
