//! Text tables over the entity tree.
//!
//! A summary has one row per cluster and one column per query; each cell holds
//! the aggregated value of the selected hit attribute among the cluster's hits
//! for that query, or nothing when the query has no hit there.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::cluster::Cluster;
use crate::error::ClusterError;
use crate::hit::{HitAttr, format_decimal, format_evalue};

/// Separator between columns of an aligned table.
const COLUMN_GAP: &str = "  ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Aggregate {
    /// Best value by the attribute's direction (lowest e-value, highest otherwise).
    #[default]
    Best,
    Sum,
    /// Number of hits.
    Count,
}

impl fmt::Display for Aggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Aggregate::Best => write!(f, "best"),
            Aggregate::Sum => write!(f, "sum"),
            Aggregate::Count => write!(f, "count"),
        }
    }
}

impl FromStr for Aggregate {
    type Err = ClusterError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "best" | "max" => Ok(Aggregate::Best),
            "sum" => Ok(Aggregate::Sum),
            "count" | "len" => Ok(Aggregate::Count),
            other => Err(ClusterError::InvalidParams(format!(
                "unknown aggregate: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryOptions {
    pub hide_headers: bool,
    /// `None` renders a whitespace-aligned table.
    pub delimiter: Option<String>,
    pub decimals: usize,
    pub attr: HitAttr,
    pub aggregate: Aggregate,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            hide_headers: false,
            delimiter: None,
            decimals: 4,
            attr: HitAttr::Bitscore,
            aggregate: Aggregate::Best,
        }
    }
}

impl SummaryOptions {
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = Some(delimiter.into());
        self
    }

    pub fn with_decimals(mut self, decimals: usize) -> Self {
        self.decimals = decimals;
        self
    }

    pub fn hide_headers(mut self, hide: bool) -> Self {
        self.hide_headers = hide;
        self
    }

    pub fn with_attr(mut self, attr: HitAttr) -> Self {
        self.attr = attr;
        self
    }

    pub fn with_aggregate(mut self, aggregate: Aggregate) -> Self {
        self.aggregate = aggregate;
        self
    }

    fn format_value(&self, value: f64) -> String {
        match self.attr {
            HitAttr::Evalue => format_evalue(value, self.decimals),
            _ => format_decimal(value, self.decimals),
        }
    }
}

pub(crate) fn summary_header(leading: &[&str], queries: &[String]) -> Vec<String> {
    leading
        .iter()
        .map(|label| label.to_string())
        .chain(["Start", "End", "Score"].map(String::from))
        .chain(queries.iter().cloned())
        .collect()
}

/// `leading` cells, then span, score and one cell per query.
pub(crate) fn summary_row(
    leading: Vec<String>,
    cluster: &Cluster,
    queries: &[String],
    options: &SummaryOptions,
) -> Vec<String> {
    let mut row = leading;
    row.push(cluster.start.map(|v| v.to_string()).unwrap_or_default());
    row.push(cluster.end.map(|v| v.to_string()).unwrap_or_default());
    row.push(format_decimal(cluster.score, options.decimals));
    row.extend(queries.iter().map(|query| cell(cluster, query, options)));
    row
}

fn cell(cluster: &Cluster, query: &str, options: &SummaryOptions) -> String {
    let values: Vec<f64> = cluster
        .hits_for(query)
        .map(|hit| hit.value_of(options.attr))
        .collect();
    if values.is_empty() {
        return String::new();
    }
    match options.aggregate {
        Aggregate::Count => values.len().to_string(),
        Aggregate::Sum => options.format_value(values.iter().sum()),
        Aggregate::Best => {
            let best = values.iter().copied().fold(values[0], |best, value| {
                if options.attr.is_better(value, best) {
                    value
                } else {
                    best
                }
            });
            options.format_value(best)
        }
    }
}

/// Join rows with `delimiter`, or align columns when it is `None`.
pub(crate) fn render(
    header: Option<Vec<String>>,
    rows: Vec<Vec<String>>,
    delimiter: Option<&str>,
) -> String {
    let lines: Vec<Vec<String>> = header.into_iter().chain(rows).collect();
    match delimiter {
        Some(delimiter) => lines
            .iter()
            .map(|line| line.join(delimiter))
            .collect::<Vec<_>>()
            .join("\n"),
        None => {
            let columns = lines.iter().map(Vec::len).max().unwrap_or(0);
            let widths: Vec<usize> = (0..columns)
                .map(|idx| {
                    lines
                        .iter()
                        .filter_map(|line| line.get(idx))
                        .map(|cell| cell.chars().count())
                        .max()
                        .unwrap_or(0)
                })
                .collect();
            lines
                .iter()
                .map(|line| {
                    line.iter()
                        .zip(&widths)
                        .map(|(cell, width)| format!("{cell:<width$}"))
                        .collect::<Vec<_>>()
                        .join(COLUMN_GAP)
                        .trim_end()
                        .to_string()
                })
                .collect::<Vec<_>>()
                .join("\n")
        }
    }
}
