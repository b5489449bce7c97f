//! Dictionary projection shared by every entity of the session model.
//!
//! `to_dict` produces a plain `serde_json::Value` tree (strings, numbers,
//! arrays, objects) and `from_dict` rebuilds the entity from it. Containers
//! compose their children's projections, so a `Session` dict is exactly the
//! persisted JSON document.

use std::fmt;

use serde_json::Value;

use crate::cluster::Cluster;
use crate::error::ClusterError;
use crate::hit::Hit;
use crate::organism::Organism;
use crate::scaffold::Scaffold;
use crate::session::Session;
use crate::subject::Subject;

pub trait DictRecord: Sized {
    /// Extra input needed to rebuild the entity. `()` for everything except
    /// [`Cluster`], whose dict does not carry its subjects.
    type Context;

    fn to_dict(&self) -> Value;

    fn from_dict(dict: &Value, context: Self::Context) -> Result<Self, ClusterError>;
}

/// Borrowed view over any entity of the model.
///
/// Same-type comparisons go through each type's `PartialEq`. Comparing two
/// different entity types is a caller bug and reported as
/// [`ClusterError::IncomparableTypes`] instead of `false`.
#[derive(Debug, Clone, Copy)]
pub enum Entity<'a> {
    Hit(&'a Hit),
    Subject(&'a Subject),
    Cluster(&'a Cluster),
    Scaffold(&'a Scaffold),
    Organism(&'a Organism),
    Session(&'a Session),
}

impl Entity<'_> {
    pub fn kind(&self) -> &'static str {
        match self {
            Entity::Hit(_) => "Hit",
            Entity::Subject(_) => "Subject",
            Entity::Cluster(_) => "Cluster",
            Entity::Scaffold(_) => "Scaffold",
            Entity::Organism(_) => "Organism",
            Entity::Session(_) => "Session",
        }
    }

    pub fn try_eq(&self, other: &Entity<'_>) -> Result<bool, ClusterError> {
        match (self, other) {
            (Entity::Hit(a), Entity::Hit(b)) => Ok(a == b),
            (Entity::Subject(a), Entity::Subject(b)) => Ok(a == b),
            (Entity::Cluster(a), Entity::Cluster(b)) => Ok(a == b),
            (Entity::Scaffold(a), Entity::Scaffold(b)) => Ok(a == b),
            (Entity::Organism(a), Entity::Organism(b)) => Ok(a == b),
            (Entity::Session(a), Entity::Session(b)) => Ok(a == b),
            _ => Err(ClusterError::IncomparableTypes {
                left: self.kind(),
                right: other.kind(),
            }),
        }
    }

    pub fn to_dict(&self) -> Value {
        match self {
            Entity::Hit(hit) => hit.to_dict(),
            Entity::Subject(subject) => subject.to_dict(),
            Entity::Cluster(cluster) => cluster.to_dict(),
            Entity::Scaffold(scaffold) => scaffold.to_dict(),
            Entity::Organism(organism) => organism.to_dict(),
            Entity::Session(session) => session.to_dict(),
        }
    }
}

impl fmt::Display for Entity<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::Hit(hit) => write!(f, "{hit}"),
            Entity::Subject(subject) => write!(f, "{subject}"),
            Entity::Cluster(cluster) => write!(f, "{cluster}"),
            Entity::Scaffold(scaffold) => write!(f, "{scaffold}"),
            Entity::Organism(organism) => write!(f, "{organism}"),
            Entity::Session(session) => write!(f, "{session}"),
        }
    }
}

macro_rules! entity_from {
    ($($ty:ident),*) => {
        $(
            impl<'a> From<&'a $ty> for Entity<'a> {
                fn from(value: &'a $ty) -> Self {
                    Entity::$ty(value)
                }
            }
        )*
    };
}

entity_from!(Hit, Subject, Cluster, Scaffold, Organism, Session);
