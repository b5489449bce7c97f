mod common;

use assert_matches::assert_matches;
use serde_json::json;

use hitclust::{Cluster, ClusterError, DictRecord, Hit, Scaffold, Subject, SummaryOptions};

use common::{clusters, queries, scaffolds, subjects};

#[test]
fn empty_scaffold() {
    let scaffold = Scaffold::new("test_name");
    assert_eq!(scaffold.accession, "test_name");
    assert!(scaffold.subjects.is_empty());
    assert!(scaffold.clusters.is_empty());
}

#[test]
fn display() {
    assert_eq!(
        scaffolds()[0].to_string(),
        "SCAFFOLD: scaffold1 [5 hits in 2 clusters]"
    );
}

#[test]
fn add_clusters_appends_one_cluster_per_group() {
    let mut scaffold = scaffolds().remove(0);
    let group = subjects()[1..4].to_vec();
    let order = queries(&["q1", "q2", "q3", "q4"]);
    scaffold.add_clusters(vec![group.clone()], Some(order.as_slice()));
    assert_eq!(scaffold.clusters.len(), 3);

    let added = &scaffold.clusters[2];
    assert!(added.subjects.iter().all(|subject| group.contains(subject)));
    let starts: Vec<_> = added.iter().map(|subject| subject.start).collect();
    assert_eq!(starts, vec![Some(0), Some(500), Some(1200)]);
    // subject1 twins resolve to the first free equal position
    assert_eq!(added.indices, vec![0, 3, 2]);
    let resolved: Vec<_> = added.indices.iter().map(|&i| &scaffold.subjects[i]).collect();
    assert_eq!(resolved, added.subjects.iter().collect::<Vec<_>>());
    assert_eq!(added.start, Some(0));
    assert_eq!(added.end, Some(6000));
}

#[test]
fn summary_rows_follow_cluster_order() {
    let scaffold = &scaffolds()[0];
    let options = SummaryOptions::default().with_delimiter("____");
    let text = scaffold.summary(&queries(&["q1", "q2", "q3", "q4"]), &options);
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines.len(), 1 + scaffold.clusters.len());
    assert_eq!(lines[0], "Scaffold____Start____End____Score____q1____q2____q3____q4");
    assert_eq!(
        lines[1],
        "scaffold1____0____8000____4.1701____500.3____200.3____500.3____500.3"
    );
    assert_eq!(lines[2], "scaffold1____0____100____2.1001____500.3____________");
}

#[test]
fn summary_without_headers_and_rounding() {
    let scaffold = &scaffolds()[0];
    let options = SummaryOptions::default().hide_headers(true).with_decimals(0);
    let text = scaffold.summary(&queries(&["q1", "q2", "q3", "q4"]), &options);
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "scaffold1  0  8000  4  500  200  500  500");
    assert_eq!(lines[1], "scaffold1  0  100   2  500");
}

#[test]
fn to_dict_nests_children() {
    let scaffold = &scaffolds()[1];
    let dict = scaffold.to_dict();
    assert_eq!(dict["accession"], "scaffold2");
    assert_eq!(
        dict["clusters"].as_array().unwrap(),
        &scaffold.clusters.iter().map(|c| c.to_dict()).collect::<Vec<_>>()
    );
    assert_eq!(
        dict["subjects"].as_array().unwrap(),
        &scaffold.subjects.iter().map(|s| s.to_dict()).collect::<Vec<_>>()
    );
}

#[test]
fn from_dict_resolves_cluster_members() {
    let rebuilt = Scaffold::from_dict(&scaffolds()[1].to_dict(), ()).unwrap();
    assert_eq!(rebuilt.accession, "scaffold2");
    assert_eq!(rebuilt.clusters, vec![clusters()[0].clone()]);
    assert_eq!(rebuilt.subjects, subjects()[..2].to_vec());
}

#[test]
fn round_trip_with_overlapping_clusters() {
    let scaffold = scaffolds().remove(0);
    let rebuilt = Scaffold::from_dict(&scaffold.to_dict(), ()).unwrap();
    assert_eq!(rebuilt, scaffold);
    assert_eq!(rebuilt.clusters[0].len(), 4);
    assert_eq!(rebuilt.clusters[1].len(), 2);
    for (rebuilt, original) in rebuilt.clusters.iter().zip(&scaffold.clusters) {
        assert_eq!(rebuilt.score, original.score);
        assert_eq!(rebuilt.start, original.start);
        assert_eq!(rebuilt.end, original.end);
    }
}

#[test]
fn round_trip_without_coordinates() {
    let subjects: Vec<Subject> = ["q1", "q2"]
        .iter()
        .map(|query| {
            Subject::new(
                vec![Hit::new(*query, "s1", 50.0, 50.0, 1e-10, 120.0)],
                Some(format!("gene_{query}")),
                None,
                None,
                None,
                None,
            )
        })
        .collect();
    let mut scaffold = Scaffold::with_subjects("contig_7", subjects.clone());
    scaffold.clusters.push(Cluster::new(vec![1], vec![subjects[1].clone()]));
    scaffold.add_clusters(vec![subjects], None);

    let dict = scaffold.to_dict();
    assert_eq!(dict["clusters"][0]["start"], json!(null));
    let rebuilt = Scaffold::from_dict(&dict, ()).unwrap();
    assert_eq!(rebuilt, scaffold);
    assert_eq!(rebuilt.clusters[1].indices, vec![0, 1]);
}

#[test]
fn from_dict_rejects_unknown_subject_index() {
    let mut dict = scaffolds()[1].to_dict();
    dict["clusters"][0]["indices"] = json!([0, 2]);
    let err = Scaffold::from_dict(&dict, ()).unwrap_err();
    assert_matches!(err, ClusterError::Deserialize { entity: "Cluster", message } if message.contains("index 2"));
}
