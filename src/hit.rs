use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::coerce::{self, parse_float};
use crate::error::ClusterError;
use crate::serializer::DictRecord;

/// One query/subject similarity match.
///
/// `identity` and `coverage` are percentages as reported by the search tool.
#[derive(Debug, Clone, Deserialize)]
pub struct Hit {
    pub query: String,
    pub subject: String,
    #[serde(deserialize_with = "coerce::float")]
    pub identity: f64,
    #[serde(deserialize_with = "coerce::float")]
    pub coverage: f64,
    #[serde(deserialize_with = "coerce::float")]
    pub evalue: f64,
    #[serde(deserialize_with = "coerce::float")]
    pub bitscore: f64,
    #[serde(skip)]
    extra: BTreeMap<String, Value>,
}

/// A hit row exactly as a search collaborator hands it over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawHit {
    pub query: String,
    pub subject: String,
    pub identity: String,
    pub coverage: String,
    pub evalue: String,
    pub bitscore: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HitAttr {
    Identity,
    Coverage,
    Evalue,
    #[default]
    Bitscore,
}

impl HitAttr {
    /// Whether `candidate` beats `current` for this attribute.
    pub fn is_better(&self, candidate: f64, current: f64) -> bool {
        match self {
            HitAttr::Evalue => candidate < current,
            HitAttr::Identity | HitAttr::Coverage | HitAttr::Bitscore => candidate > current,
        }
    }
}

impl fmt::Display for HitAttr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HitAttr::Identity => write!(f, "identity"),
            HitAttr::Coverage => write!(f, "coverage"),
            HitAttr::Evalue => write!(f, "evalue"),
            HitAttr::Bitscore => write!(f, "bitscore"),
        }
    }
}

impl FromStr for HitAttr {
    type Err = ClusterError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "identity" => Ok(HitAttr::Identity),
            "coverage" => Ok(HitAttr::Coverage),
            "evalue" => Ok(HitAttr::Evalue),
            "bitscore" => Ok(HitAttr::Bitscore),
            other => Err(ClusterError::InvalidParams(format!(
                "unknown hit attribute: {other}"
            ))),
        }
    }
}

impl Hit {
    pub fn new(
        query: impl Into<String>,
        subject: impl Into<String>,
        identity: f64,
        coverage: f64,
        evalue: f64,
        bitscore: f64,
    ) -> Self {
        Self {
            query: query.into(),
            subject: subject.into(),
            identity,
            coverage,
            evalue,
            bitscore,
            extra: BTreeMap::new(),
        }
    }

    /// Build a hit from textual columns, failing on any non-numeric score.
    pub fn parse(
        query: impl Into<String>,
        subject: impl Into<String>,
        identity: &str,
        coverage: &str,
        evalue: &str,
        bitscore: &str,
    ) -> Result<Self, ClusterError> {
        Ok(Self::new(
            query,
            subject,
            parse_float("identity", identity)?,
            parse_float("coverage", coverage)?,
            parse_float("evalue", evalue)?,
            parse_float("bitscore", bitscore)?,
        ))
    }

    pub fn value_of(&self, attr: HitAttr) -> f64 {
        match attr {
            HitAttr::Identity => self.identity,
            HitAttr::Coverage => self.coverage,
            HitAttr::Evalue => self.evalue,
            HitAttr::Bitscore => self.bitscore,
        }
    }

    pub fn extra(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    /// Copy this hit, applying `overrides`.
    ///
    /// Core field names replace the core values (numeric ones are coerced),
    /// anything else is attached as an extra attribute.
    pub fn copy_with<K, V>(
        &self,
        overrides: impl IntoIterator<Item = (K, V)>,
    ) -> Result<Self, ClusterError>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let mut hit = self.clone();
        for (key, value) in overrides {
            let key = key.into();
            let value = value.into();
            match key.as_str() {
                "query" => hit.query = value_to_string(value),
                "subject" => hit.subject = value_to_string(value),
                "identity" => hit.identity = value_to_float("identity", &value)?,
                "coverage" => hit.coverage = value_to_float("coverage", &value)?,
                "evalue" => hit.evalue = value_to_float("evalue", &value)?,
                "bitscore" => hit.bitscore = value_to_float("bitscore", &value)?,
                _ => {
                    hit.extra.insert(key, value);
                }
            }
        }
        Ok(hit)
    }

    /// Display strings for query, subject, identity, coverage, e-value and
    /// bit-score, rounded to `decimals`.
    pub fn values(&self, decimals: usize) -> Vec<String> {
        vec![
            self.query.clone(),
            self.subject.clone(),
            format_decimal(self.identity, decimals),
            format_decimal(self.coverage, decimals),
            format_evalue(self.evalue, decimals),
            format_decimal(self.bitscore, decimals),
        ]
    }
}

impl TryFrom<RawHit> for Hit {
    type Error = ClusterError;

    fn try_from(raw: RawHit) -> Result<Self, Self::Error> {
        Hit::parse(
            raw.query,
            raw.subject,
            &raw.identity,
            &raw.coverage,
            &raw.evalue,
            &raw.bitscore,
        )
    }
}

impl PartialEq for Hit {
    fn eq(&self, other: &Self) -> bool {
        self.query == other.query
            && self.subject == other.subject
            && self.identity == other.identity
            && self.coverage == other.coverage
            && self.evalue == other.evalue
            && self.bitscore == other.bitscore
    }
}

impl fmt::Display for Hit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Hit: {} - {}: {:.2}%/{:.2}%",
            self.query,
            self.subject,
            self.identity * 100.0,
            self.coverage * 100.0
        )
    }
}

impl DictRecord for Hit {
    type Context = ();

    fn to_dict(&self) -> Value {
        json!({
            "query": self.query,
            "subject": self.subject,
            "identity": self.identity,
            "coverage": self.coverage,
            "evalue": self.evalue,
            "bitscore": self.bitscore,
        })
    }

    fn from_dict(dict: &Value, _context: ()) -> Result<Self, ClusterError> {
        Hit::deserialize(dict).map_err(|err| ClusterError::deserialize("Hit", err))
    }
}

fn value_to_string(value: Value) -> String {
    match value {
        Value::String(text) => text,
        other => other.to_string(),
    }
}

fn value_to_float(field: &'static str, value: &Value) -> Result<f64, ClusterError> {
    match value {
        Value::Number(number) => number.as_f64().ok_or_else(|| ClusterError::Coercion {
            field,
            value: number.to_string(),
        }),
        Value::String(text) => parse_float(field, text),
        other => Err(ClusterError::Coercion {
            field,
            value: other.to_string(),
        }),
    }
}

/// Round to `decimals` places, dropping trailing zeros and a bare point.
pub(crate) fn format_decimal(value: f64, decimals: usize) -> String {
    let text = format!("{value:.decimals$}");
    let text = if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    };
    if text == "-0" { "0".to_string() } else { text }
}

/// Like [`format_decimal`], but a non-zero e-value that would round to zero
/// keeps exponential form with `decimals` significant digits.
pub(crate) fn format_evalue(value: f64, decimals: usize) -> String {
    let fixed = format_decimal(value, decimals);
    if value == 0.0 || fixed != "0" {
        return fixed;
    }
    let precision = decimals.max(1) - 1;
    let text = format!("{value:.precision$e}");
    match text.split_once('e') {
        Some((mantissa, exponent)) if mantissa.contains('.') => {
            let mantissa = mantissa.trim_end_matches('0').trim_end_matches('.');
            format!("{mantissa}e{exponent}")
        }
        _ => text,
    }
}
