use std::fmt;
use std::io::{Read, Write};
use std::ops::{Add, AddAssign};

use camino::Utf8Path;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value, json};
use tracing::{debug, info};

use crate::config::RunParams;
use crate::error::ClusterError;
use crate::organism::Organism;
use crate::serializer::DictRecord;
use crate::store;
use crate::summary::{SummaryOptions, render, summary_header};

/// Root of the model and the unit of persistence.
///
/// `queries` fixes the canonical query order used by summaries and by the
/// synteny bonus. `params` is an opaque copy of the run configuration; see
/// [`RunParams`] for a typed view.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Session {
    pub queries: Vec<String>,
    pub sequences: IndexMap<String, String>,
    pub params: Map<String, Value>,
    pub organisms: Vec<Organism>,
}

#[derive(Deserialize)]
struct SessionFields {
    #[serde(default)]
    queries: Vec<String>,
    #[serde(default)]
    sequences: IndexMap<String, String>,
    #[serde(default)]
    params: Map<String, Value>,
    #[serde(default)]
    organisms: Vec<Value>,
}

impl Session {
    pub fn new(queries: Vec<String>) -> Self {
        Self {
            queries,
            ..Self::default()
        }
    }

    pub fn run_params(&self) -> Result<RunParams, ClusterError> {
        RunParams::from_params(&self.params)
    }

    /// Append `other`'s organisms. Queries, sequences and params of `self`
    /// are kept as they are; both sessions are expected to come from the same
    /// search.
    pub fn merge(&mut self, other: Session) {
        debug!(
            left = self.organisms.len(),
            right = other.organisms.len(),
            "merging sessions"
        );
        self.organisms.extend(other.organisms);
    }

    pub fn from_json<R: Read>(reader: R) -> Result<Self, ClusterError> {
        let value: Value = serde_json::from_reader(reader)
            .map_err(|err| ClusterError::deserialize("Session", err))?;
        Session::from_dict(&value, ())
    }

    pub fn to_json<W: Write>(&self, writer: W, indent: Option<usize>) -> Result<(), ClusterError> {
        let value = self.to_dict();
        let result = match indent {
            None => serde_json::to_writer(writer, &value),
            Some(width) => {
                let indent = vec![b' '; width];
                let mut serializer = serde_json::Serializer::with_formatter(
                    writer,
                    PrettyFormatter::with_indent(&indent),
                );
                value.serialize(&mut serializer)
            }
        };
        result.map_err(|err| ClusterError::Serialize(err.to_string()))
    }

    pub fn from_file(path: impl AsRef<Utf8Path>) -> Result<Self, ClusterError> {
        store::read_session(path.as_ref())
    }

    /// Load every file and fold them left to right with `+`.
    pub fn from_files<I, P>(paths: I) -> Result<Self, ClusterError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Utf8Path>,
    {
        let mut paths = paths.into_iter();
        let first = paths.next().ok_or(ClusterError::NoSessionFiles)?;
        info!(path = %first.as_ref(), "loading session");
        let mut session = Session::from_file(first)?;
        for path in paths {
            info!(path = %path.as_ref(), "loading session");
            session += Session::from_file(path)?;
        }
        Ok(session)
    }

    pub fn to_file(
        &self,
        path: impl AsRef<Utf8Path>,
        indent: Option<usize>,
    ) -> Result<(), ClusterError> {
        store::write_session(path.as_ref(), self, indent)
    }

    /// One row per cluster across all organisms, one column per query.
    pub fn summary(&self, options: &SummaryOptions) -> String {
        let header = (!options.hide_headers)
            .then(|| summary_header(&["Organism", "Scaffold"], &self.queries));
        let rows = self
            .organisms
            .iter()
            .flat_map(|organism| organism.summary_rows(&self.queries, options))
            .collect();
        render(header, rows, options.delimiter.as_deref())
    }

    pub fn hit_report(&self, options: &SummaryOptions) -> String {
        self.organisms
            .iter()
            .filter(|organism| organism.total_hit_clusters() > 0)
            .map(|organism| organism.hit_report(options))
            .collect::<Vec<_>>()
            .join("\n\n\n")
    }

    pub fn total_hit_clusters(&self) -> usize {
        self.organisms
            .iter()
            .map(Organism::total_hit_clusters)
            .sum()
    }
}

impl AddAssign for Session {
    fn add_assign(&mut self, other: Session) {
        self.merge(other);
    }
}

impl Add for Session {
    type Output = Session;

    fn add(mut self, other: Session) -> Session {
        self.merge(other);
        self
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SESSION: {} queries [{} clusters in {} organisms]",
            self.queries.len(),
            self.total_hit_clusters(),
            self.organisms.len()
        )
    }
}

impl DictRecord for Session {
    type Context = ();

    fn to_dict(&self) -> Value {
        json!({
            "queries": self.queries,
            "sequences": self.sequences,
            "params": self.params,
            "organisms": self.organisms.iter().map(Organism::to_dict).collect::<Vec<_>>(),
        })
    }

    fn from_dict(dict: &Value, _context: ()) -> Result<Self, ClusterError> {
        let fields = SessionFields::deserialize(dict)
            .map_err(|err| ClusterError::deserialize("Session", err))?;
        let organisms = fields
            .organisms
            .iter()
            .map(|organism| Organism::from_dict(organism, ()))
            .collect::<Result<Vec<_>, ClusterError>>()?;
        Ok(Session {
            queries: fields.queries,
            sequences: fields.sequences,
            params: fields.params,
            organisms,
        })
    }
}
