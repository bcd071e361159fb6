use crate::probe::FsProbe;
use automap_protocol::{expand_template, filter_key, FilterEntry, MappingConfig, Matrix, MatrixItem};
use indexmap::IndexMap;
use serde::Serialize;

/// One candidate convention path and whether it was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckedPath {
    #[serde(flatten)]
    pub item: MatrixItem,
    pub exists: bool,
}

/// Filters and matrix items for every existing convention path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Generation {
    /// Every candidate in iteration order, including missing ones.
    pub checked: Vec<CheckedPath>,
    pub filters: Vec<FilterEntry>,
    pub matrix: Vec<MatrixItem>,
}

impl Generation {
    pub fn matrix(&self) -> Matrix {
        Matrix {
            include: self.matrix.clone(),
        }
    }

    pub fn missing(&self) -> impl Iterator<Item = &CheckedPath> {
        self.checked.iter().filter(|c| !c.exists)
    }
}

/// Walk service × declared environment × effective stack and keep the paths
/// the probe reports as existing.
///
/// Only declared environments are visited; the defaults fallback used by
/// label resolution does not apply here.
pub fn generate(services: &[String], config: &MappingConfig, probe: &impl FsProbe) -> Generation {
    let mut checked = Vec::new();
    let mut filters: IndexMap<String, FilterEntry> = IndexMap::new();
    let mut matrix = Vec::new();

    for service in services {
        let Some(conventions) = config.conventions_for(service) else {
            log::debug!("No directory conventions apply to {service}");
            continue;
        };

        for env in config.environments() {
            let Some(environment) = env.name.as_deref().filter(|n| !n.is_empty()) else {
                continue;
            };

            for (stack, template) in conventions {
                // Trailing separators are dropped so the glob stays `path` + `/**`.
                let path = expand_template(template, service, environment)
                    .trim_end_matches('/')
                    .to_string();
                let key = filter_key(service, environment, stack);
                let exists = probe.exists(&path);
                let item = MatrixItem {
                    service: service.clone(),
                    environment: environment.to_string(),
                    stack: stack.clone(),
                    path: path.clone(),
                    filter_key: key.clone(),
                };

                if exists {
                    filters.insert(key.clone(), FilterEntry::for_path(key, &path));
                    matrix.push(item.clone());
                }
                checked.push(CheckedPath { item, exists });
            }
        }
    }

    log::info!(
        "Checked {} convention paths: {} filters, {} matrix items",
        checked.len(),
        filters.len(),
        matrix.len()
    );

    Generation {
        checked,
        filters: filters.into_values().collect(),
        matrix,
    }
}
