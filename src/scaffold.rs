use std::fmt;

use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

use crate::cluster::Cluster;
use crate::error::ClusterError;
use crate::serializer::DictRecord;
use crate::subject::Subject;
use crate::summary::{SummaryOptions, render, summary_header, summary_row};

/// A contiguous genomic sequence with every subject found on it and the
/// clusters derived from them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scaffold {
    pub accession: String,
    pub subjects: Vec<Subject>,
    pub clusters: Vec<Cluster>,
}

#[derive(Deserialize)]
struct ScaffoldFields {
    accession: String,
    #[serde(default)]
    subjects: Vec<Subject>,
    #[serde(default)]
    clusters: Vec<Value>,
}

impl Scaffold {
    pub fn new(accession: impl Into<String>) -> Self {
        Self {
            accession: accession.into(),
            subjects: Vec::new(),
            clusters: Vec::new(),
        }
    }

    pub fn with_subjects(accession: impl Into<String>, subjects: Vec<Subject>) -> Self {
        Self {
            accession: accession.into(),
            subjects,
            clusters: Vec::new(),
        }
    }

    /// Wrap each group of co-located subjects into a new cluster.
    ///
    /// Members are sorted by start and a cluster's indices are their positions
    /// in `self.subjects`. A member not yet on the scaffold is appended to it.
    /// With a `query_order` the score includes the synteny bonus.
    pub fn add_clusters<I>(&mut self, groups: I, query_order: Option<&[String]>)
    where
        I: IntoIterator<Item = Vec<Subject>>,
    {
        for mut group in groups {
            group.sort_by_key(|subject| subject.start);
            let mut indices: Vec<usize> = Vec::with_capacity(group.len());
            for subject in &group {
                let idx = self.position_of(subject, &indices);
                indices.push(idx);
            }
            let mut cluster = Cluster::new(indices, group);
            cluster.rescore(query_order);
            debug!(
                scaffold = %self.accession,
                subjects = cluster.len(),
                score = cluster.score,
                "added cluster"
            );
            self.clusters.push(cluster);
        }
    }

    /// First position of an equal subject not already in `taken`.
    fn position_of(&mut self, subject: &Subject, taken: &[usize]) -> usize {
        let found = self
            .subjects
            .iter()
            .enumerate()
            .find(|(idx, candidate)| !taken.contains(idx) && *candidate == subject)
            .map(|(idx, _)| idx);
        match found {
            Some(idx) => idx,
            None => {
                debug!(
                    scaffold = %self.accession,
                    subject = subject.name.as_deref().unwrap_or("unnamed"),
                    "appending cluster member to scaffold subjects"
                );
                self.subjects.push(subject.clone());
                self.subjects.len() - 1
            }
        }
    }

    pub fn summary(&self, queries: &[String], options: &SummaryOptions) -> String {
        let header = (!options.hide_headers).then(|| summary_header(&["Scaffold"], queries));
        let rows = self
            .clusters
            .iter()
            .map(|cluster| summary_row(vec![self.accession.clone()], cluster, queries, options))
            .collect();
        render(header, rows, options.delimiter.as_deref())
    }
}

impl fmt::Display for Scaffold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SCAFFOLD: {} [{} hits in {} clusters]",
            self.accession,
            self.subjects.len(),
            self.clusters.len()
        )
    }
}

impl DictRecord for Scaffold {
    type Context = ();

    fn to_dict(&self) -> Value {
        json!({
            "accession": self.accession,
            "subjects": self.subjects.iter().map(Subject::to_dict).collect::<Vec<_>>(),
            "clusters": self.clusters.iter().map(Cluster::to_dict).collect::<Vec<_>>(),
        })
    }

    /// Cluster members are the scaffold subjects at the cluster's indices.
    fn from_dict(dict: &Value, _context: ()) -> Result<Self, ClusterError> {
        let fields = ScaffoldFields::deserialize(dict)
            .map_err(|err| ClusterError::deserialize("Scaffold", err))?;
        let mut scaffold = Scaffold::with_subjects(fields.accession, fields.subjects);
        scaffold.clusters = fields
            .clusters
            .iter()
            .map(|cluster| Cluster::from_dict(cluster, members(cluster, &scaffold.subjects)?))
            .collect::<Result<Vec<_>, ClusterError>>()?;
        Ok(scaffold)
    }
}

#[derive(Deserialize)]
struct ClusterIndices {
    #[serde(default)]
    indices: Vec<usize>,
}

fn members(cluster: &Value, subjects: &[Subject]) -> Result<Vec<Subject>, ClusterError> {
    let ClusterIndices { indices } = ClusterIndices::deserialize(cluster)
        .map_err(|err| ClusterError::deserialize("Cluster", err))?;
    if subjects.is_empty() && !indices.is_empty() {
        return Err(ClusterError::MissingClusterContext { indices });
    }
    indices
        .iter()
        .map(|&idx| {
            subjects.get(idx).cloned().ok_or_else(|| {
                ClusterError::deserialize(
                    "Cluster",
                    format!("subject index {idx} out of range for {} subjects", subjects.len()),
                )
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::hit::Hit;

    fn subject(query: &str, start: u64, end: u64) -> Subject {
        Subject::new(
            vec![Hit::new(query, format!("{query}_{start}"), 60.0, 70.0, 1e-30, 250.0)],
            Some(format!("{query}_{start}")),
            None,
            Some(start),
            Some(end),
            None,
        )
    }

    fn queries() -> Vec<String> {
        ["q1", "q2", "q3"].iter().map(|q| q.to_string()).collect()
    }

    fn scaffold() -> Scaffold {
        let subjects = vec![
            subject("q1", 0, 100),
            subject("q2", 200, 400),
            subject("q3", 50_000, 51_000),
            subject("q1", 52_000, 53_000),
        ];
        let mut scaffold = Scaffold::with_subjects("scaffold1", subjects.clone());
        scaffold.add_clusters(
            vec![subjects[2..4].to_vec(), subjects[0..2].to_vec()],
            Some(queries().as_slice()),
        );
        scaffold
    }

    #[test]
    fn empty_scaffold() {
        let scaffold = Scaffold::new("test_name");
        assert_eq!(scaffold.accession, "test_name");
        assert!(scaffold.subjects.is_empty());
        assert!(scaffold.clusters.is_empty());
    }

    #[test]
    fn add_clusters_indexes_scaffold_subjects() {
        let scaffold = scaffold();
        assert_eq!(scaffold.clusters.len(), 2);
        assert_eq!(scaffold.clusters[0].indices, vec![2, 3]);
        assert_eq!(scaffold.clusters[1].indices, vec![0, 1]);
        assert_eq!(scaffold.clusters[1].start, Some(0));
        assert_eq!(scaffold.clusters[1].end, Some(400));
    }

    #[test]
    fn add_clusters_scores_with_synteny() {
        let scaffold = scaffold();
        // q1-q2 adjacent in both the cluster and the query order
        assert!((scaffold.clusters[1].score - 3.05).abs() < 1e-9);
        // q3-q1 is not an adjacency of the query order
        assert!((scaffold.clusters[0].score - 2.05).abs() < 1e-9);
    }

    #[test]
    fn display() {
        assert_eq!(
            scaffold().to_string(),
            "SCAFFOLD: scaffold1 [4 hits in 2 clusters]"
        );
    }

    #[test]
    fn summary_has_one_row_per_cluster() {
        let text = scaffold().summary(&queries(), &SummaryOptions::default().with_delimiter(","));
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "Scaffold,Start,End,Score,q1,q2,q3");
        assert_eq!(lines[1], "scaffold1,50000,53000,2.05,250,,250");
        assert_eq!(lines[2], "scaffold1,0,400,3.05,250,250,");

        let hidden = scaffold().summary(&queries(), &SummaryOptions::default().hide_headers(true));
        assert_eq!(hidden.lines().count(), 2);
    }

    #[test]
    fn add_clusters_without_order_still_counts_members() {
        let subjects = vec![subject("q1", 0, 100), subject("q2", 200, 400)];
        let mut scaffold = Scaffold::with_subjects("scaffold1", subjects.clone());
        scaffold.add_clusters(vec![subjects], None);
        assert_eq!(scaffold.clusters[0].indices, vec![0, 1]);
        assert!((scaffold.clusters[0].score - 2.05).abs() < 1e-9);
    }

    #[test]
    fn add_clusters_appends_unknown_members() {
        let mut scaffold = Scaffold::with_subjects("scaffold1", vec![subject("q1", 0, 100)]);
        scaffold.add_clusters(vec![vec![subject("q1", 0, 100), subject("q2", 200, 400)]], None);
        assert_eq!(scaffold.subjects.len(), 2);
        assert_eq!(scaffold.clusters[0].indices, vec![0, 1]);
    }

    #[test]
    fn equal_members_take_distinct_positions() {
        let twin = subject("q1", 0, 100);
        let mut scaffold = Scaffold::with_subjects("scaffold1", vec![twin.clone(), twin.clone()]);
        scaffold.add_clusters(vec![vec![twin.clone(), twin]], None);
        assert_eq!(scaffold.clusters[0].indices, vec![0, 1]);
        assert_eq!(scaffold.subjects.len(), 2);
    }

    #[test]
    fn from_dict_rejects_out_of_range_index() {
        let mut dict = scaffold().to_dict();
        dict["clusters"][0]["indices"] = json!([0, 9]);
        let err = Scaffold::from_dict(&dict, ()).unwrap_err();
        assert_matches!(err, ClusterError::Deserialize { entity: "Cluster", .. });
    }

    #[test]
    fn from_dict_without_subjects_has_no_context() {
        let mut dict = scaffold().to_dict();
        dict["subjects"] = json!([]);
        let err = Scaffold::from_dict(&dict, ()).unwrap_err();
        assert_matches!(err, ClusterError::MissingClusterContext { indices } if indices == vec![2, 3]);
    }

    #[test]
    fn dict_round_trip_recovers_members() {
        let scaffold = scaffold();
        let rebuilt = Scaffold::from_dict(&scaffold.to_dict(), ()).unwrap();
        assert_eq!(rebuilt, scaffold);
        assert_eq!(rebuilt.clusters[0].score, scaffold.clusters[0].score);
    }
}
