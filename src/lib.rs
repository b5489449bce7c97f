//! Genomic hit clusters.
//!
//! Similarity search hits are modelled as a tree
//! `Session -> Organism -> Scaffold -> Cluster/Subject -> Hit`. Every entity
//! projects to and from a plain JSON dictionary ([`DictRecord`]), sessions
//! merge with `+`, and clusters are scored by member count, best
//! hit bit-scores and optional gene order agreement.

pub mod cluster;
pub mod coerce;
pub mod config;
pub mod error;
pub mod hit;
pub mod organism;
pub mod scaffold;
pub mod serializer;
pub mod session;
pub mod store;
pub mod subject;
pub mod summary;

pub use cluster::Cluster;
pub use error::ClusterError;
pub use hit::{Hit, HitAttr, RawHit};
pub use organism::Organism;
pub use scaffold::Scaffold;
pub use serializer::{DictRecord, Entity};
pub use session::Session;
pub use subject::{Strand, Subject};
pub use summary::{Aggregate, SummaryOptions};
