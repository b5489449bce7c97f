use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ClusterError;

pub const DEFAULT_GAP: u64 = 20_000;
pub const DEFAULT_UNIQUE: usize = 3;
pub const DEFAULT_MIN_HITS: usize = 3;
pub const DEFAULT_MIN_IDENTITY: f64 = 30.0;
pub const DEFAULT_MIN_COVERAGE: f64 = 50.0;
pub const DEFAULT_MAX_EVALUE: f64 = 0.01;

/// Typed view over the free-form `params` of a session.
///
/// Keys this struct does not know about are kept in `extra` so that a
/// `from_params` / `into_params` round trip is lossless.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunParams {
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub database: Option<Vec<String>>,
    #[serde(default = "default_min_identity")]
    pub min_identity: f64,
    #[serde(default = "default_min_coverage")]
    pub min_coverage: f64,
    #[serde(default = "default_max_evalue")]
    pub max_evalue: f64,
    #[serde(default = "default_gap")]
    pub gap: u64,
    #[serde(default = "default_unique")]
    pub unique: usize,
    #[serde(default = "default_min_hits")]
    pub min_hits: usize,
    #[serde(default)]
    pub require: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_file: Option<String>,
    #[serde(default)]
    pub rid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entrez_query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sqlite_db: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The grouping policy handed to the clustering driver.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterPolicy {
    /// Maximum distance in bp between neighbouring subjects of one cluster.
    pub gap: u64,
    /// Minimum number of distinct queries in a cluster.
    pub unique: usize,
    pub min_hits: usize,
    /// Queries every cluster must contain.
    pub require: Vec<String>,
}

impl Default for RunParams {
    fn default() -> Self {
        Self {
            mode: None,
            database: None,
            min_identity: DEFAULT_MIN_IDENTITY,
            min_coverage: DEFAULT_MIN_COVERAGE,
            max_evalue: DEFAULT_MAX_EVALUE,
            gap: DEFAULT_GAP,
            unique: DEFAULT_UNIQUE,
            min_hits: DEFAULT_MIN_HITS,
            require: None,
            query_file: None,
            rid: None,
            entrez_query: None,
            sqlite_db: None,
            extra: Map::new(),
        }
    }
}

impl RunParams {
    pub fn from_params(params: &Map<String, Value>) -> Result<Self, ClusterError> {
        serde_json::from_value(Value::Object(params.clone()))
            .map_err(|err| ClusterError::InvalidParams(err.to_string()))
    }

    pub fn into_params(self) -> Result<Map<String, Value>, ClusterError> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(ClusterError::InvalidParams(format!(
                "expected an object, got {other}"
            ))),
            Err(err) => Err(ClusterError::InvalidParams(err.to_string())),
        }
    }

    pub fn cluster_policy(&self) -> ClusterPolicy {
        ClusterPolicy {
            gap: self.gap,
            unique: self.unique,
            min_hits: self.min_hits,
            require: self.require.clone().unwrap_or_default(),
        }
    }
}

fn default_min_identity() -> f64 {
    DEFAULT_MIN_IDENTITY
}

fn default_min_coverage() -> f64 {
    DEFAULT_MIN_COVERAGE
}

fn default_max_evalue() -> f64 {
    DEFAULT_MAX_EVALUE
}

fn default_gap() -> u64 {
    DEFAULT_GAP
}

fn default_unique() -> usize {
    DEFAULT_UNIQUE
}

fn default_min_hits() -> usize {
    DEFAULT_MIN_HITS
}
