use serde::{Deserialize, Serialize};

/// Suffix turning a directory into a recursive glob.
pub const RECURSIVE_SUFFIX: &str = "/**";

/// One `key -> glob` record of the path-filter artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterEntry {
    pub key: String,
    pub glob: String,
}

impl FilterEntry {
    /// Entry covering everything below `path`: the glob is `path` + `/**`.
    pub fn for_path(key: impl Into<String>, path: &str) -> Self {
        Self {
            key: key.into(),
            glob: format!("{path}{RECURSIVE_SUFFIX}"),
        }
    }

    /// Whether a changed file (repository-relative) triggers this filter.
    pub fn matches(&self, changed_path: &str) -> bool {
        let path = normalize_filter_path(changed_path);
        if path.is_empty() {
            return false;
        }

        let options = glob::MatchOptions {
            case_sensitive: true,
            require_literal_separator: true,
            require_literal_leading_dot: false,
        };
        match glob::Pattern::new(&self.glob) {
            Ok(pattern) => pattern.matches_with(&path, options),
            Err(_) => {
                // Directory names with glob metacharacters: fall back to a prefix test.
                let prefix = normalize_filter_path(
                    self.glob
                        .strip_suffix(RECURSIVE_SUFFIX)
                        .unwrap_or(&self.glob),
                );
                path_prefix_matches_normalized(&prefix, &path)
            }
        }
    }
}

/// Keys of every filter triggered by at least one of `changed_paths`, in filter order.
pub fn matching_keys<'a>(filters: &'a [FilterEntry], changed_paths: &[String]) -> Vec<&'a str> {
    filters
        .iter()
        .filter(|entry| changed_paths.iter().any(|path| entry.matches(path)))
        .map(|entry| entry.key.as_str())
        .collect()
}

/// Render the artifact consumed by the path-based CI trigger.
///
/// ```text
/// api-develop-terragrunt:
///   - "api/terragrunt/envs/develop/**"
/// ```
///
/// Output depends only on the order and content of `filters`.
pub fn render_filters_yaml(filters: &[FilterEntry]) -> String {
    let mut out = String::new();
    for entry in filters {
        out.push_str(&entry.key);
        out.push_str(":\n");
        out.push_str("  - ");
        out.push_str(&quote(&entry.glob));
        out.push('\n');
    }
    out
}

// A JSON string literal is also a valid YAML double-quoted scalar.
fn quote(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| format!("\"{value}\""))
}

fn normalize_filter_path(raw: &str) -> String {
    let mut value = raw.trim().replace('\\', "/");
    while let Some(rest) = value.strip_prefix("./") {
        value = rest.to_string();
    }
    let value = value.trim_matches('/');
    if value == "." {
        return String::new();
    }
    value.to_string()
}

fn path_prefix_matches_normalized(prefix: &str, path: &str) -> bool {
    if prefix.is_empty() || !path.starts_with(prefix) {
        return false;
    }
    path.as_bytes().get(prefix.len()) == Some(&b'/')
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn glob_covers_nested_files_only_below_path() {
        let entry = FilterEntry::for_path("api-develop-terragrunt", "api/terragrunt/envs/develop");
        assert_eq!(entry.glob, "api/terragrunt/envs/develop/**");
        assert!(entry.matches("api/terragrunt/envs/develop/terragrunt.hcl"));
        assert!(entry.matches("./api/terragrunt/envs/develop/modules/vpc/main.tf"));
        assert!(!entry.matches("api/terragrunt/envs/develop2/terragrunt.hcl"));
        assert!(!entry.matches("api/terragrunt/envs/production/terragrunt.hcl"));
        assert!(!entry.matches(""));
    }

    #[test]
    fn metacharacters_in_directory_fall_back_to_prefix() {
        let entry = FilterEntry::for_path("x", "weird[dir/envs/develop");
        assert!(entry.matches("weird[dir/envs/develop/main.tf"));
        assert!(!entry.matches("weird[dir/envs/production/main.tf"));
    }

    #[test]
    fn matching_keys_preserves_filter_order() {
        let filters = vec![
            FilterEntry::for_path("a", "a/envs/develop"),
            FilterEntry::for_path("b", "b/envs/develop"),
            FilterEntry::for_path("c", "c/envs/develop"),
        ];
        let changed = vec![
            "c/envs/develop/x.tf".to_string(),
            "a/envs/develop/y.tf".to_string(),
        ];
        assert_eq!(matching_keys(&filters, &changed), vec!["a", "c"]);
    }

    #[test]
    fn render_is_one_record_per_entry() {
        let filters = vec![
            FilterEntry::for_path("api-develop-terragrunt", "api/terragrunt/envs/develop"),
            FilterEntry::for_path("api-develop-kubernetes", "api/kubernetes/overlays/develop"),
        ];
        assert_eq!(
            render_filters_yaml(&filters),
            "api-develop-terragrunt:\n  - \"api/terragrunt/envs/develop/**\"\n\
             api-develop-kubernetes:\n  - \"api/kubernetes/overlays/develop/**\"\n"
        );
        assert_eq!(render_filters_yaml(&[]), "");
    }
}
