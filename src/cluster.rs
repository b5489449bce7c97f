use std::collections::BTreeSet;
use std::fmt;

use serde::Deserialize;
use serde_json::{Value, json};

use crate::coerce;
use crate::error::ClusterError;
use crate::hit::Hit;
use crate::serializer::DictRecord;
use crate::subject::Subject;

/// Bit-score weight of the quality component.
pub const QUALITY_WEIGHT: f64 = 0.0001;

/// Upper bound of the quality component, so it never spills into the
/// integer part of the score.
pub const QUALITY_CEILING: f64 = 0.9999;

/// Subjects judged to co-occur in one genomic neighbourhood.
///
/// `indices` are the positions of the member subjects in the owning
/// scaffold's subject list; they are what the persisted form uses to find the
/// members again. `subjects` are kept in ascending genomic position. `score` is a cache of
/// [`Cluster::calculate_score`] and goes stale if the members change.
#[derive(Debug, Clone, Default)]
pub struct Cluster {
    pub indices: Vec<usize>,
    pub subjects: Vec<Subject>,
    pub score: f64,
    pub start: Option<u64>,
    pub end: Option<u64>,
}

#[derive(Deserialize)]
struct ClusterFields {
    #[serde(default)]
    indices: Vec<usize>,
    #[serde(default, deserialize_with = "coerce::optional_float")]
    score: Option<f64>,
    #[serde(default, deserialize_with = "coerce::optional_coord")]
    start: Option<u64>,
    #[serde(default, deserialize_with = "coerce::optional_coord")]
    end: Option<u64>,
}

impl Cluster {
    /// Wrap `subjects`, deriving the span from their coordinates and the score
    /// without synteny.
    pub fn new(indices: Vec<usize>, subjects: Vec<Subject>) -> Self {
        let mut cluster = Self {
            indices,
            subjects,
            score: 0.0,
            start: None,
            end: None,
        };
        cluster.start = cluster.subjects.iter().filter_map(|s| s.start).min();
        cluster.end = cluster.subjects.iter().filter_map(|s| s.end).max();
        cluster.score = cluster.calculate_score(None);
        cluster
    }

    /// Build a cluster with an explicit score and span. Missing span ends are
    /// derived from the subjects.
    pub fn with_parts(
        indices: Vec<usize>,
        subjects: Vec<Subject>,
        score: f64,
        start: Option<u64>,
        end: Option<u64>,
    ) -> Self {
        let start = start.or_else(|| subjects.iter().filter_map(|s| s.start).min());
        let end = end.or_else(|| subjects.iter().filter_map(|s| s.end).max());
        Self {
            indices,
            subjects,
            score,
            start,
            end,
        }
    }

    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Subject> {
        self.subjects.iter()
    }

    pub fn hits(&self) -> impl Iterator<Item = &Hit> {
        self.subjects.iter().flat_map(|subject| subject.hits.iter())
    }

    /// Distinct query ids hit by this cluster, in discovery order.
    pub fn queries(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for hit in self.hits() {
            if !seen.contains(&hit.query.as_str()) {
                seen.push(hit.query.as_str());
            }
        }
        seen
    }

    pub fn hits_for<'a>(&'a self, query: &'a str) -> impl Iterator<Item = &'a Hit> {
        self.hits().filter(move |hit| hit.query == query)
    }

    /// Score = indices + synteny bonus + bit-score quality.
    ///
    /// The synteny bonus is only counted when `query_order` is given. The
    /// result is returned, not stored in `self.score`.
    pub fn calculate_score(&self, query_order: Option<&[String]>) -> f64 {
        let coverage = self.indices.len() as f64;
        let synteny = query_order
            .map(|order| self.synteny_bonus(order) as f64)
            .unwrap_or(0.0);
        coverage + synteny + self.quality()
    }

    /// Recompute and cache the score.
    pub fn rescore(&mut self, query_order: Option<&[String]>) -> f64 {
        self.score = self.calculate_score(query_order);
        self.score
    }

    fn quality(&self) -> f64 {
        let total: f64 = self
            .subjects
            .iter()
            .filter_map(Subject::best_hit)
            .map(|hit| hit.bitscore)
            .sum();
        (QUALITY_WEIGHT * total).clamp(0.0, QUALITY_CEILING)
    }

    /// Number of adjacent gene pairs in the cluster that are also adjacent in
    /// `query_order`, ignoring direction.
    pub fn synteny_bonus(&self, query_order: &[String]) -> usize {
        let natural: Vec<&str> = self
            .subjects
            .iter()
            .filter_map(Subject::best_hit)
            .map(|hit| hit.query.as_str())
            .collect();
        let expected: Vec<&str> = query_order.iter().map(String::as_str).collect();
        let found = adjacent_pairs(&natural);
        adjacent_pairs(&expected).intersection(&found).count()
    }
}

fn adjacent_pairs<'a>(sequence: &[&'a str]) -> BTreeSet<(&'a str, &'a str)> {
    sequence
        .windows(2)
        .map(|pair| {
            if pair[0] <= pair[1] {
                (pair[0], pair[1])
            } else {
                (pair[1], pair[0])
            }
        })
        .collect()
}

impl PartialEq for Cluster {
    fn eq(&self, other: &Self) -> bool {
        self.indices == other.indices && self.subjects == other.subjects
    }
}

impl<'a> IntoIterator for &'a Cluster {
    type Item = &'a Subject;
    type IntoIter = std::slice::Iter<'a, Subject>;

    fn into_iter(self) -> Self::IntoIter {
        self.subjects.iter()
    }
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let start = self.start.map(|v| v.to_string()).unwrap_or_default();
        let end = self.end.map(|v| v.to_string()).unwrap_or_default();
        write!(
            f,
            "CLUSTER: {start}-{end} [{} subjects, score {:.4}]",
            self.subjects.len(),
            self.score
        )
    }
}

impl DictRecord for Cluster {
    /// The member subjects, in stored order.
    type Context = Vec<Subject>;

    fn to_dict(&self) -> Value {
        json!({
            "indices": self.indices,
            "score": self.score,
            "start": self.start,
            "end": self.end,
        })
    }

    fn from_dict(dict: &Value, subjects: Vec<Subject>) -> Result<Self, ClusterError> {
        let fields = ClusterFields::deserialize(dict)
            .map_err(|err| ClusterError::deserialize("Cluster", err))?;
        if subjects.is_empty() && !fields.indices.is_empty() {
            return Err(ClusterError::MissingClusterContext {
                indices: fields.indices,
            });
        }
        let mut cluster = Cluster::with_parts(
            fields.indices,
            subjects,
            0.0,
            fields.start,
            fields.end,
        );
        cluster.score = match fields.score {
            Some(score) => score,
            None => cluster.calculate_score(None),
        };
        Ok(cluster)
    }
}
