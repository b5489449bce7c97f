#![allow(dead_code)]

use hitclust::{Cluster, Hit, Organism, Scaffold, Subject};

pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

pub fn queries(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|id| id.to_string()).collect()
}

pub fn hits() -> Vec<Hit> {
    [
        ("q1", "s1", "70.90", "54.60", "0.0", "500.30"),
        ("q1", "s2", "5.90", "21.60", "1.06e-29", "100.30"),
        ("q2", "s3", "2.90", "34.60", "1.02e-30", "200.30"),
        ("q3", "s5", "1123.90", "12.60", "0.01", "500.30"),
        ("q4", "s1", "0.90", "1.60", "0.005", "500.30"),
        ("q1", "s1", "70.90", "54.60", "0.0", "500.30"),
    ]
    .into_iter()
    .map(|(q, s, i, c, e, b)| Hit::parse(q, s, i, c, e, b).unwrap())
    .collect()
}

pub fn subjects() -> Vec<Subject> {
    let h = hits();
    vec![
        Subject::parse(h[..2].to_vec(), Some("subject1"), Some("ipg1"), Some("0"), Some("100"), Some("-")).unwrap(),
        Subject::parse(vec![h[1].clone(), h[0].clone()], Some("subject1"), Some("ipg1"), Some("0"), Some("100"), Some("-")).unwrap(),
        Subject::parse(h[2..3].to_vec(), Some("subject2"), Some("ipg2"), Some("1200"), Some("6000"), Some("+")).unwrap(),
        Subject::parse(h[3..4].to_vec(), Some("subject3"), Some("ipg3"), Some("500"), Some("1000"), Some("+")).unwrap(),
        Subject::parse(h[4..5].to_vec(), Some("subject4"), Some("ipg4"), Some("6453"), Some("8000"), Some("+")).unwrap(),
    ]
}

pub fn clusters() -> Vec<Cluster> {
    let s = subjects();
    vec![
        Cluster::new(vec![0, 1], s[..2].to_vec()),
        Cluster::with_parts(vec![0, 1], s[..2].to_vec(), 100.0, Some(50), Some(200)),
        Cluster::new(
            vec![0, 2, 3, 4],
            vec![s[0].clone(), s[2].clone(), s[3].clone(), s[4].clone()],
        ),
        Cluster::new(vec![0, 1], vec![s[1].clone(), s[0].clone()]),
    ]
}

pub fn scaffolds() -> Vec<Scaffold> {
    let s = subjects();
    let c = clusters();
    vec![
        Scaffold {
            accession: "scaffold1".to_string(),
            subjects: s[..5].to_vec(),
            clusters: vec![c[2].clone(), c[0].clone()],
        },
        Scaffold {
            accession: "scaffold2".to_string(),
            subjects: s[..2].to_vec(),
            clusters: vec![c[0].clone()],
        },
    ]
}

pub fn organism() -> Organism {
    let mut organism = Organism::new(
        Some("organism1".to_string()),
        Some("strain_organism1".to_string()),
    );
    organism.insert_scaffold(scaffolds().remove(0));
    organism
}
