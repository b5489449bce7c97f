//! Numeric coercion for values that arrive as text.
//!
//! Search collaborators hand over tabular output where every column is a
//! string, and older session files occasionally store coordinates as strings.
//! Both paths funnel through the functions here so that a value which is not
//! a number fails loudly instead of being defaulted.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Number;

use crate::error::ClusterError;

pub fn parse_float(field: &'static str, value: &str) -> Result<f64, ClusterError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| ClusterError::Coercion {
            field,
            value: value.to_string(),
        })
}

pub fn parse_coord(field: &'static str, value: &str) -> Result<u64, ClusterError> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| ClusterError::Coercion {
            field,
            value: value.to_string(),
        })
}

pub fn parse_optional_coord(
    field: &'static str,
    value: Option<&str>,
) -> Result<Option<u64>, ClusterError> {
    value.map(|value| parse_coord(field, value)).transpose()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Numeric {
    Number(Number),
    Text(String),
}

fn number_to_coord(number: &Number) -> Option<u64> {
    number.as_u64().or_else(|| {
        number
            .as_f64()
            .filter(|value| *value >= 0.0 && value.fract() == 0.0 && *value <= u64::MAX as f64)
            .map(|value| value as u64)
    })
}

pub(crate) fn float<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Numeric::deserialize(deserializer)? {
        Numeric::Number(number) => number
            .as_f64()
            .ok_or_else(|| D::Error::custom(format!("{number} is not representable as f64"))),
        Numeric::Text(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| D::Error::custom(format!("{text:?} is not a number"))),
    }
}

pub(crate) fn optional_float<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Numeric>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Numeric::Number(number)) => number
            .as_f64()
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("{number} is not representable as f64"))),
        Some(Numeric::Text(text)) => text
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("{text:?} is not a number"))),
    }
}

pub(crate) fn optional_coord<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Numeric>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Numeric::Number(number)) => number_to_coord(&number)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("{number} is not a genomic coordinate"))),
        Some(Numeric::Text(text)) => text
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("{text:?} is not a genomic coordinate"))),
    }
}
