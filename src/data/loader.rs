//! Loads every dataset the pages need
//!
//! Loading never fails as a whole. Missing indicator files fall back to
//! placeholder tables, a missing or malformed ontology leaves the network
//! page without a graph, and each problem is recorded as a notice.

use super::indicators::{read_indicator_csv, Domain, IndicatorTable};
use super::placeholder::placeholder_table;
use crate::config::DataConfig;
use crate::graph::{load_ontology_file, OntologyGraph};
use crate::notice::Notice;
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, info};

/// All loaded data, shared read-only by the pages
#[derive(Debug, Clone)]
pub struct Dataset {
    pub economic: IndicatorTable,
    pub social: IndicatorTable,
    pub environmental: IndicatorTable,
    pub innovation: IndicatorTable,
    pub ontology: Option<OntologyGraph>,
    /// Methodology document (HTML)
    pub methodology: Option<String>,
    /// Problems found while loading
    pub notices: Vec<Notice>,
    placeholders: BTreeSet<Domain>,
    pub loaded_at: DateTime<Utc>,
}

impl Dataset {
    /// Placeholder tables only, no ontology
    pub fn placeholder() -> Self {
        Self {
            economic: placeholder_table(Domain::Economic),
            social: placeholder_table(Domain::Social),
            environmental: placeholder_table(Domain::Environmental),
            innovation: placeholder_table(Domain::Innovation),
            ontology: None,
            methodology: None,
            notices: Vec::new(),
            placeholders: Domain::ALL.into_iter().collect(),
            loaded_at: Utc::now(),
        }
    }

    pub fn with_ontology(mut self, graph: OntologyGraph) -> Self {
        self.ontology = Some(graph);
        self
    }

    /// Load from the configured locations
    pub fn load(config: &DataConfig) -> Self {
        let mut dataset = Self::placeholder();
        dataset.placeholders.clear();

        for domain in Domain::ALL {
            let path = config.datasets_dir.join(domain.file_name());
            let table = match read_indicator_csv(&path) {
                Ok(table) => table,
                Err(e) => {
                    dataset.notices.push(load_notice(&path, e.is_not_found(), &e));
                    dataset.placeholders.insert(domain);
                    placeholder_table(domain)
                }
            };
            *dataset.table_mut(domain) = table;
        }

        let ontology_path = config.ontology_path();
        match load_ontology_file(&ontology_path, config.ontology_root_key.as_deref()) {
            Ok(graph) => {
                for skipped in &graph.report().skipped_edges {
                    debug!(edge = %skipped.id, "Skipped relationship");
                }
                dataset.ontology = Some(graph);
            }
            Err(e) => dataset.notices.push(load_notice(&ontology_path, e.is_not_found(), &e)),
        }

        dataset.methodology = match std::fs::read_to_string(&config.methodology_file) {
            Ok(html) => Some(html),
            Err(e) => {
                debug!(path = %config.methodology_file.display(), error = %e, "Methodology document unavailable");
                None
            }
        };

        info!(
            placeholders = dataset.placeholders.len(),
            ontology = dataset.ontology.is_some(),
            notices = dataset.notices.len(),
            "Datasets loaded"
        );
        dataset
    }

    pub fn table(&self, domain: Domain) -> &IndicatorTable {
        match domain {
            Domain::Economic => &self.economic,
            Domain::Social => &self.social,
            Domain::Environmental => &self.environmental,
            Domain::Innovation => &self.innovation,
        }
    }

    fn table_mut(&mut self, domain: Domain) -> &mut IndicatorTable {
        match domain {
            Domain::Economic => &mut self.economic,
            Domain::Social => &mut self.social,
            Domain::Environmental => &mut self.environmental,
            Domain::Innovation => &mut self.innovation,
        }
    }

    /// True when the domain is showing placeholder values
    pub fn is_placeholder(&self, domain: Domain) -> bool {
        self.placeholders.contains(&domain)
    }

    /// Economic plus derived totals, joined with the other domains
    pub fn combined(&self) -> IndicatorTable {
        IndicatorTable::combined(&self.economic, &self.social, &self.environmental, &self.innovation)
    }

    /// Cities present in the economic table
    pub fn cities(&self) -> Vec<String> {
        self.economic.cities()
    }

    pub fn ontology(&self) -> Option<&OntologyGraph> {
        self.ontology.as_ref()
    }
}

fn load_notice(path: &Path, missing: bool, error: &dyn std::fmt::Display) -> Notice {
    if missing {
        Notice::warning(format!("Arquivo {} não encontrado", path.display()))
    } else {
        Notice::error(format!("Erro ao carregar {}: {}", path.display(), error))
    }
}
