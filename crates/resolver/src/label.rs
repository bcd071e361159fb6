use crate::error::LabelError;
use automap_protocol::{
    expand_template, CredentialSource, DeploymentLabel, DeploymentTarget, EnvironmentConfig,
    MappingConfig, DEFAULT_STACK,
};

pub const LABEL_PREFIX: &str = "deploy";

/// Parse `deploy:<service>:<environment>[:<stack>]`. Parts past the stack are ignored.
pub fn parse_label(label: &str) -> Result<DeploymentLabel, LabelError> {
    let parts: Vec<&str> = label.split(':').collect();
    if parts.len() < 3 || parts[0] != LABEL_PREFIX {
        return Err(LabelError::InvalidFormat {
            label: label.to_string(),
        });
    }

    Ok(DeploymentLabel {
        service: parts[1].to_string(),
        environment: parts[2].to_string(),
        stack: parts.get(3).copied().unwrap_or(DEFAULT_STACK).to_string(),
    })
}

/// Resolve a label into the directory and credentials a deployment would use.
///
/// An environment missing from the mapping takes the shared `defaults`.
/// Whether the working directory exists is not checked here.
pub fn resolve_label(label: &str, config: &MappingConfig) -> Result<DeploymentTarget, LabelError> {
    let label = parse_label(label)?;

    let (env, credential_source) = match config.environment(&label.environment) {
        Some(env) => (env.clone(), CredentialSource::Environment),
        None => {
            log::info!(
                "Environment '{}' is not declared; using defaults (it is absent from the generated matrix)",
                label.environment
            );
            (
                config.defaults.clone().unwrap_or_default(),
                CredentialSource::Defaults,
            )
        }
    };

    let template = config
        .conventions_for(&label.service)
        .and_then(|conventions| conventions.get(&label.stack))
        .ok_or_else(|| LabelError::UnknownStack {
            service: label.service.clone(),
            stack: label.stack.clone(),
        })?;

    let working_directory = expand_template(template, &label.service, &label.environment);
    let EnvironmentConfig {
        aws_region,
        iam_role_plan,
        iam_role_apply,
        ..
    } = env;

    Ok(DeploymentTarget {
        label,
        working_directory,
        aws_region,
        iam_role_plan,
        iam_role_apply,
        credential_source,
    })
}

/// Resolve each label on its own; one failure does not affect the rest.
pub fn resolve_labels<'a, I>(
    labels: I,
    config: &MappingConfig,
) -> Vec<(String, Result<DeploymentTarget, LabelError>)>
where
    I: IntoIterator<Item = &'a str>,
{
    labels
        .into_iter()
        .map(|label| (label.to_string(), resolve_label(label, config)))
        .collect()
}
