use automap_protocol::{DeploymentTarget, MappingConfig};
use automap_resolver::{CheckedPath, Generation, LabelError, ValidationReport};

const OK: &str = "[ok]";
const MISSING: &str = "[--]";
const WARN: &str = "[!!]";
const FAIL: &str = "[xx]";

/// Errors first, then warnings, then a one-line verdict.
pub fn render_validation(report: &ValidationReport) -> String {
    let mut out = String::new();
    if !report.errors.is_empty() {
        out.push_str("Errors:\n");
        for error in &report.errors {
            out.push_str(&format!("  - {error}\n"));
        }
    }
    if !report.warnings.is_empty() {
        out.push_str("Warnings:\n");
        for warning in &report.warnings {
            out.push_str(&format!("  - {warning}\n"));
        }
    }

    let verdict = if !report.is_valid() {
        format!(
            "Configuration invalid: {} error(s), {} warning(s)",
            report.errors.len(),
            report.warnings.len()
        )
    } else if report.warnings.is_empty() {
        "Configuration OK".to_string()
    } else {
        format!(
            "Configuration OK with {} warning(s)",
            report.warnings.len()
        )
    };
    out.push_str(&verdict);
    out
}

pub fn render_checked(checked: &[CheckedPath]) -> String {
    let mut out = String::new();
    for c in checked {
        let status = if c.exists { OK } else { MISSING };
        out.push_str(&format!("{status} {}: {}\n", c.item.filter_key, c.item.path));
    }
    out
}

pub fn render_generation_summary(services: &[String], generation: &Generation) -> String {
    format!(
        "Services: {}\nFilters: {}, matrix items: {}, missing paths: {}",
        if services.is_empty() {
            "(none)".to_string()
        } else {
            services.join(", ")
        },
        generation.filters.len(),
        generation.matrix.len(),
        generation.missing().count()
    )
}

/// One block per label. `exists` only changes the status marker.
pub fn render_target(target: &DeploymentTarget, exists: bool) -> String {
    let status = if exists { OK } else { WARN };
    let mut out = String::new();
    out.push_str(&format!("  {status} service: {}\n", target.label.service));
    out.push_str(&format!("  {status} environment: {}\n", target.label.environment));
    out.push_str(&format!("  {status} stack: {}\n", target.label.stack));
    out.push_str(&format!(
        "  {status} working directory: {}{}\n",
        target.working_directory,
        if exists { "" } else { " (not found)" }
    ));
    out.push_str(&format!("  iam role (plan): {}\n", target.iam_role_plan_or_na()));
    out.push_str(&format!("  iam role (apply): {}\n", target.iam_role_apply_or_na()));
    out.push_str(&format!("  region: {}", target.aws_region_or_na()));
    out
}

pub fn render_label_error(err: &LabelError) -> String {
    format!("  {FAIL} {err}")
}

pub struct RunStats {
    pub filters: usize,
    pub matrix_items: usize,
}

pub fn render_stats(config: &MappingConfig, stats: &RunStats) -> String {
    let mut out = String::new();
    out.push_str("Statistics:\n");
    out.push_str(&format!("  - environments: {}\n", config.environments().len()));
    out.push_str(&format!("  - stacks: {}\n", config.stack_count()));
    out.push_str(&format!("  - service overrides: {}\n", config.services().len()));
    out.push_str(&format!("  - modules: {}\n", config.module_count()));
    out.push_str(&format!("  - filters: {}\n", stats.filters));
    out.push_str(&format!("  - matrix items: {}", stats.matrix_items));
    out
}
