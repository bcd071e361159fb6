use automap_protocol::{EnvironmentConfig, MappingConfig, ServiceConfig};
use indexmap::IndexMap;

fn env(name: &str, account: &str) -> EnvironmentConfig {
    EnvironmentConfig {
        name: Some(name.to_string()),
        aws_region: Some("ap-northeast-1".to_string()),
        iam_role_plan: Some(format!("arn:aws:iam::{account}:role/plan-{name}")),
        iam_role_apply: Some(format!("arn:aws:iam::{account}:role/apply-{name}")),
    }
}

fn conventions(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
    pairs
        .iter()
        .map(|(stack, template)| (stack.to_string(), template.to_string()))
        .collect()
}

/// develop / staging / production, two root stacks, one service override.
pub(crate) fn sample_config() -> MappingConfig {
    MappingConfig {
        environments: Some(vec![
            env("develop", "111111111111"),
            env("staging", "222222222222"),
            env("production", "333333333333"),
        ]),
        directory_conventions: Some(conventions(&[
            ("terragrunt", "{service}/terragrunt/envs/{environment}"),
            ("kubernetes", "{service}/kubernetes/overlays/{environment}"),
        ])),
        services: Some(vec![ServiceConfig {
            name: Some("claude-code-action".to_string()),
            directory_conventions: Some(conventions(&[
                (
                    "terragrunt",
                    "github-actions/{service}/terragrunt/envs/{environment}",
                ),
                (
                    "kubernetes",
                    "github-actions/{service}/kubernetes/overlays/{environment}",
                ),
            ])),
        }]),
        defaults: Some(EnvironmentConfig {
            name: None,
            aws_region: Some("us-west-2".to_string()),
            iam_role_plan: Some("arn:aws:iam::999999999999:role/default-plan".to_string()),
            iam_role_apply: Some("arn:aws:iam::999999999999:role/default-apply".to_string()),
        }),
        modules: Some(
            [(
                "terraform_version".to_string(),
                serde_json::Value::String("1.5.7".to_string()),
            )]
            .into_iter()
            .collect(),
        ),
    }
}
