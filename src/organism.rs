use std::fmt;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::cluster::Cluster;
use crate::error::ClusterError;
use crate::scaffold::Scaffold;
use crate::serializer::DictRecord;
use crate::summary::{SummaryOptions, render, summary_header, summary_row};

pub const NO_ORGANISM: &str = "No organism";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Organism {
    pub name: Option<String>,
    pub strain: Option<String>,
    /// Keyed by accession, in insertion order.
    pub scaffolds: IndexMap<String, Scaffold>,
}

#[derive(Deserialize)]
struct OrganismFields {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    strain: Option<String>,
    #[serde(default)]
    scaffolds: Vec<Value>,
}

impl Organism {
    pub fn new(name: Option<String>, strain: Option<String>) -> Self {
        Self {
            name,
            strain,
            scaffolds: IndexMap::new(),
        }
    }

    /// Insert a scaffold under its accession, replacing any earlier one.
    pub fn insert_scaffold(&mut self, scaffold: Scaffold) -> Option<Scaffold> {
        self.scaffolds.insert(scaffold.accession.clone(), scaffold)
    }

    pub fn full_name(&self) -> String {
        match (&self.name, &self.strain) {
            (Some(name), Some(strain)) => format!("{name} {strain}"),
            (Some(name), None) => name.clone(),
            _ => NO_ORGANISM.to_string(),
        }
    }

    /// Every cluster, scaffold by scaffold.
    pub fn clusters(&self) -> Vec<&Cluster> {
        self.scaffolds
            .values()
            .flat_map(|scaffold| scaffold.clusters.iter())
            .collect()
    }

    pub fn total_hit_clusters(&self) -> usize {
        self.scaffolds
            .values()
            .map(|scaffold| scaffold.clusters.len())
            .sum()
    }

    pub fn total_subjects(&self) -> usize {
        self.scaffolds
            .values()
            .map(|scaffold| scaffold.subjects.len())
            .sum()
    }

    pub fn summary(&self, queries: &[String], options: &SummaryOptions) -> String {
        let header =
            (!options.hide_headers).then(|| summary_header(&["Organism", "Scaffold"], queries));
        render(header, self.summary_rows(queries, options), options.delimiter.as_deref())
    }

    pub(crate) fn summary_rows(
        &self,
        queries: &[String],
        options: &SummaryOptions,
    ) -> Vec<Vec<String>> {
        let full_name = self.full_name();
        self.scaffolds
            .values()
            .flat_map(|scaffold| {
                scaffold.clusters.iter().map(|cluster| {
                    summary_row(
                        vec![full_name.clone(), scaffold.accession.clone()],
                        cluster,
                        queries,
                        options,
                    )
                })
            })
            .collect()
    }

    /// Per-cluster hit listing under an underlined organism heading.
    pub fn hit_report(&self, options: &SummaryOptions) -> String {
        let full_name = self.full_name();
        let mut blocks = vec![format!("{full_name}\n{}", "=".repeat(full_name.chars().count()))];
        for scaffold in self.scaffolds.values() {
            for cluster in &scaffold.clusters {
                let title = format!(
                    "{}:{}-{}",
                    scaffold.accession,
                    cluster.start.map(|v| v.to_string()).unwrap_or_default(),
                    cluster.end.map(|v| v.to_string()).unwrap_or_default()
                );
                let header = (!options.hide_headers).then(|| {
                    [
                        "Query", "Subject", "Identity", "Coverage", "E-value", "Bitscore",
                        "Start", "End", "Strand",
                    ]
                    .map(String::from)
                    .to_vec()
                });
                let rows = cluster
                    .iter()
                    .flat_map(|subject| subject.values(options.decimals))
                    .collect();
                let table = render(header, rows, options.delimiter.as_deref());
                blocks.push(format!(
                    "{title}\n{}\n{table}",
                    "-".repeat(title.chars().count())
                ));
            }
        }
        blocks.join("\n\n")
    }
}

impl fmt::Display for Organism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ORGANISM: {} [{} subjects on {} scaffolds]",
            self.full_name(),
            self.total_subjects(),
            self.scaffolds.len()
        )
    }
}

impl DictRecord for Organism {
    type Context = ();

    fn to_dict(&self) -> Value {
        json!({
            "name": self.name,
            "strain": self.strain,
            "scaffolds": self.scaffolds.values().map(Scaffold::to_dict).collect::<Vec<_>>(),
        })
    }

    fn from_dict(dict: &Value, _context: ()) -> Result<Self, ClusterError> {
        let fields = OrganismFields::deserialize(dict)
            .map_err(|err| ClusterError::deserialize("Organism", err))?;
        let mut organism = Organism::new(fields.name, fields.strain);
        for scaffold in &fields.scaffolds {
            organism.insert_scaffold(Scaffold::from_dict(scaffold, ())?);
        }
        Ok(organism)
    }
}
