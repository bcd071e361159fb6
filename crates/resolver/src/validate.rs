use automap_protocol::{
    DirectoryConventions, MappingConfig, ENVIRONMENT_PLACEHOLDER, SERVICE_PLACEHOLDER,
};
use serde::Serialize;
use std::collections::HashSet;

pub const REQUIRED_SECTIONS: [&str; 4] = [
    "environments",
    "directory_conventions",
    "defaults",
    "modules",
];

const ENVIRONMENT_FIELDS: [&str; 3] = ["aws_region", "iam_role_plan", "iam_role_apply"];

/// Findings of one validation pass. Errors block generation and label
/// resolution; warnings never do.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

/// Check every rule; nothing short-circuits.
pub fn validate(config: &MappingConfig) -> ValidationReport {
    let mut report = ValidationReport::default();

    let present = [
        config.environments.is_some(),
        config.directory_conventions.is_some(),
        config.defaults.is_some(),
        config.modules.is_some(),
    ];
    for (section, present) in REQUIRED_SECTIONS.iter().zip(present) {
        if !present {
            report
                .errors
                .push(format!("missing required section '{section}'"));
        }
    }

    check_environments(config, &mut report);

    if let Some(conventions) = &config.directory_conventions {
        check_templates(conventions, None, &mut report);
    }

    for (idx, service) in config.services().iter().enumerate() {
        match service.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => {
                if let Some(conventions) = &service.directory_conventions {
                    check_templates(conventions, Some(name), &mut report);
                }
            }
            _ => report
                .errors
                .push(format!("service entry #{} is missing name", idx + 1)),
        }
    }

    log::debug!(
        "Validation finished: {} errors, {} warnings",
        report.errors.len(),
        report.warnings.len()
    );
    report
}

fn check_environments(config: &MappingConfig, report: &mut ValidationReport) {
    let mut seen = HashSet::new();
    for (idx, env) in config.environments().iter().enumerate() {
        let name = match env.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => {
                report
                    .errors
                    .push(format!("environment entry #{} has an empty name", idx + 1));
                continue;
            }
        };

        if !seen.insert(name) {
            report
                .errors
                .push(format!("duplicate environment name: {name}"));
        }

        let fields = [&env.aws_region, &env.iam_role_plan, &env.iam_role_apply];
        for (field, value) in ENVIRONMENT_FIELDS.iter().zip(fields) {
            if value.as_deref().map_or(true, |v| v.trim().is_empty()) {
                report
                    .warnings
                    .push(format!("environment {name} is missing {field}"));
            }
        }
    }
}

fn check_templates(
    conventions: &DirectoryConventions,
    service: Option<&str>,
    report: &mut ValidationReport,
) {
    for (stack, template) in conventions {
        let scope = match service {
            Some(service) => format!("service {service} convention {stack}"),
            None => format!("convention {stack}"),
        };
        if template.starts_with('/') {
            report
                .warnings
                .push(format!("{scope} is an absolute path; it never matches under the root"));
        }
        for placeholder in [SERVICE_PLACEHOLDER, ENVIRONMENT_PLACEHOLDER] {
            if !template.contains(placeholder) {
                report
                    .warnings
                    .push(format!("{scope} is missing the {placeholder} placeholder"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_config;
    use automap_protocol::{EnvironmentConfig, ServiceConfig};
    use pretty_assertions::assert_eq;

    #[test]
    fn well_formed_mapping_has_no_findings() {
        let report = validate(&sample_config());
        assert!(report.is_clean(), "{report:?}");
    }

    #[test]
    fn each_missing_section_is_one_error() {
        for section in REQUIRED_SECTIONS {
            let mut config = sample_config();
            match section {
                "environments" => config.environments = None,
                "directory_conventions" => config.directory_conventions = None,
                "defaults" => config.defaults = None,
                "modules" => config.modules = None,
                _ => unreachable!(),
            }
            let report = validate(&config);
            assert_eq!(report.errors.len(), 1, "{section}: {report:?}");
            assert!(report.errors[0].contains(section));
        }
    }

    #[test]
    fn all_sections_missing_reports_four_errors() {
        let report = validate(&MappingConfig::default());
        assert_eq!(report.errors.len(), 4);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn duplicate_environment_is_reported_alongside_other_errors() {
        let mut config = sample_config();
        let first = config.environments()[0].clone();
        let envs = config.environments.as_mut().unwrap();
        envs.push(first);
        envs.push(EnvironmentConfig::default());
        config.modules = None;

        let report = validate(&config);
        assert!(!report.is_valid());
        assert_eq!(
            report.errors,
            vec![
                "missing required section 'modules'".to_string(),
                "duplicate environment name: develop".to_string(),
                "environment entry #5 has an empty name".to_string(),
            ]
        );
    }

    #[test]
    fn missing_environment_fields_only_warn() {
        let mut config = sample_config();
        config.environments.as_mut().unwrap().push(EnvironmentConfig {
            name: Some("sandbox".to_string()),
            aws_region: Some("us-east-1".to_string()),
            ..Default::default()
        });

        let report = validate(&config);
        assert!(report.is_valid());
        assert_eq!(
            report.warnings,
            vec![
                "environment sandbox is missing iam_role_plan".to_string(),
                "environment sandbox is missing iam_role_apply".to_string(),
            ]
        );
    }

    #[test]
    fn templates_without_placeholders_warn() {
        let mut config = sample_config();
        config
            .directory_conventions
            .as_mut()
            .unwrap()
            .insert("helm".to_string(), "charts/{service}".to_string());
        config.services.as_mut().unwrap().push(ServiceConfig {
            name: Some("legacy".to_string()),
            directory_conventions: Some(
                [("terragrunt".to_string(), "legacy/infra".to_string())]
                    .into_iter()
                    .collect(),
            ),
        });

        let report = validate(&config);
        assert!(report.is_valid());
        assert_eq!(
            report.warnings,
            vec![
                "convention helm is missing the {environment} placeholder".to_string(),
                "service legacy convention terragrunt is missing the {service} placeholder"
                    .to_string(),
                "service legacy convention terragrunt is missing the {environment} placeholder"
                    .to_string(),
            ]
        );
    }

    #[test]
    fn unnamed_service_is_fatal() {
        let mut config = sample_config();
        config
            .services
            .as_mut()
            .unwrap()
            .push(ServiceConfig::default());

        let report = validate(&config);
        assert_eq!(report.errors, vec!["service entry #2 is missing name".to_string()]);
    }

    #[test]
    fn blank_service_name_is_fatal() {
        let mut config = sample_config();
        let services = config.services.as_mut().unwrap();
        services.push(ServiceConfig {
            name: Some(String::new()),
            directory_conventions: None,
        });
        services.push(ServiceConfig {
            name: Some("   ".to_string()),
            directory_conventions: None,
        });

        let report = validate(&config);
        assert_eq!(
            report.errors,
            vec![
                "service entry #2 is missing name".to_string(),
                "service entry #3 is missing name".to_string(),
            ]
        );
    }

    #[test]
    fn absolute_template_warns() {
        let mut config = sample_config();
        config
            .directory_conventions
            .as_mut()
            .unwrap()
            .insert("helm".to_string(), "/charts/{service}/{environment}".to_string());

        let report = validate(&config);
        assert!(report.is_valid());
        assert_eq!(
            report.warnings,
            vec!["convention helm is an absolute path; it never matches under the root".to_string()]
        );
    }
}
