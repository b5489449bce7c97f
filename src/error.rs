use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum ClusterError {
    #[error("could not coerce {field} value {value:?} to a number")]
    Coercion { field: &'static str, value: String },

    #[error("invalid strand: {0} (expected \"+\" or \"-\")")]
    InvalidStrand(String),

    #[error("failed to deserialize {entity}: {message}")]
    Deserialize {
        entity: &'static str,
        message: String,
    },

    #[error("cluster with indices {indices:?} has no subject context")]
    MissingClusterContext { indices: Vec<usize> },

    #[error("cannot compare {left} with {right}")]
    IncomparableTypes {
        left: &'static str,
        right: &'static str,
    },

    #[error("no session files given")]
    NoSessionFiles,

    #[error("filesystem error: {0}")]
    Filesystem(String),

    #[error("failed to serialize session: {0}")]
    Serialize(String),

    #[error("invalid run parameters: {0}")]
    InvalidParams(String),
}

impl ClusterError {
    pub(crate) fn deserialize(entity: &'static str, err: impl std::fmt::Display) -> Self {
        ClusterError::Deserialize {
            entity,
            message: err.to_string(),
        }
    }
}
