use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::coerce::{self, parse_optional_coord};
use crate::error::ClusterError;
use crate::hit::Hit;
use crate::serializer::DictRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strand {
    #[serde(rename = "+")]
    Plus,
    #[serde(rename = "-")]
    Minus,
}

impl Strand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strand::Plus => "+",
            Strand::Minus => "-",
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strand {
    type Err = ClusterError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "+" => Ok(Strand::Plus),
            "-" => Ok(Strand::Minus),
            other => Err(ClusterError::InvalidStrand(other.to_string())),
        }
    }
}

/// A genomic locus (protein/gene record) with every hit that landed on it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Subject {
    #[serde(default)]
    pub hits: Vec<Hit>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub ipg: Option<String>,
    #[serde(default, deserialize_with = "coerce::optional_coord")]
    pub start: Option<u64>,
    #[serde(default, deserialize_with = "coerce::optional_coord")]
    pub end: Option<u64>,
    #[serde(default)]
    pub strand: Option<Strand>,
}

impl Subject {
    pub fn new(
        hits: Vec<Hit>,
        name: Option<String>,
        ipg: Option<String>,
        start: Option<u64>,
        end: Option<u64>,
        strand: Option<Strand>,
    ) -> Self {
        Self {
            hits,
            name,
            ipg,
            start,
            end,
            strand,
        }
    }

    /// Build a subject from textual locus metadata.
    pub fn parse(
        hits: Vec<Hit>,
        name: Option<&str>,
        ipg: Option<&str>,
        start: Option<&str>,
        end: Option<&str>,
        strand: Option<&str>,
    ) -> Result<Self, ClusterError> {
        Ok(Self {
            hits,
            name: name.map(str::to_string),
            ipg: ipg.map(str::to_string),
            start: parse_optional_coord("start", start)?,
            end: parse_optional_coord("end", end)?,
            strand: strand.map(str::parse::<Strand>).transpose()?,
        })
    }

    /// The hit with the lowest e-value; the first one wins ties.
    pub fn best_hit(&self) -> Option<&Hit> {
        self.hits.iter().fold(None, |best: Option<&Hit>, hit| match best {
            Some(current) if current.evalue <= hit.evalue => Some(current),
            _ => Some(hit),
        })
    }

    /// One display row per hit: the hit values followed by start, end and
    /// strand. Missing locus fields render as empty strings.
    pub fn values(&self, decimals: usize) -> Vec<Vec<String>> {
        let start = self.start.map(|v| v.to_string()).unwrap_or_default();
        let end = self.end.map(|v| v.to_string()).unwrap_or_default();
        let strand = self.strand.map(|s| s.to_string()).unwrap_or_default();
        self.hits
            .iter()
            .map(|hit| {
                let mut row = hit.values(decimals);
                row.extend([start.clone(), end.clone(), strand.clone()]);
                row
            })
            .collect()
    }
}

impl PartialEq for Subject {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.ipg == other.ipg
            && self.start == other.start
            && self.end == other.end
            && self.strand == other.strand
            && same_hits(&self.hits, &other.hits)
    }
}

/// Multiset comparison: order is irrelevant, multiplicity is not.
fn same_hits(left: &[Hit], right: &[Hit]) -> bool {
    if left.len() != right.len() {
        return false;
    }
    let mut used = vec![false; right.len()];
    left.iter().all(|hit| {
        let found = right
            .iter()
            .enumerate()
            .find(|(idx, candidate)| !used[*idx] && *candidate == hit)
            .map(|(idx, _)| idx);
        match found {
            Some(idx) => {
                used[idx] = true;
                true
            }
            None => false,
        }
    })
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SUBJECT: {} [{} hits]",
            self.name.as_deref().unwrap_or("unnamed"),
            self.hits.len()
        )
    }
}

impl DictRecord for Subject {
    type Context = ();

    fn to_dict(&self) -> Value {
        json!({
            "hits": self.hits.iter().map(Hit::to_dict).collect::<Vec<_>>(),
            "name": self.name,
            "ipg": self.ipg,
            "start": self.start,
            "end": self.end,
            "strand": self.strand.map(|s| s.as_str()),
        })
    }

    fn from_dict(dict: &Value, _context: ()) -> Result<Self, ClusterError> {
        Subject::deserialize(dict).map_err(|err| ClusterError::deserialize("Subject", err))
    }
}
