//! Edge types for the code graph.
//!
//! Ownership edges tie a type to its methods; the remaining kinds mirror
//! the structural relationships the parser reports between types.

use grove_core::RelationKind;
use serde::{Deserialize, Serialize};

/// The type of relationship between two nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Type owns method.
    HasMember,

    /// Class A extends class B.
    Inheritance,

    /// Class implements interface.
    Implementation,

    /// Type references another type in a signature.
    Usage,
}

impl From<RelationKind> for EdgeKind {
    fn from(kind: RelationKind) -> Self {
        match kind {
            RelationKind::Inheritance => Self::Inheritance,
            RelationKind::Implementation => Self::Implementation,
            RelationKind::Usage => Self::Usage,
        }
    }
}

impl std::fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::HasMember => "has_member",
            Self::Inheritance => "inheritance",
            Self::Implementation => "implementation",
            Self::Usage => "usage",
        };
        write!(f, "{}", s)
    }
}

/// An edge in the code graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// The kind of relationship.
    pub kind: EdgeKind,
}

impl Edge {
    /// Creates a new edge.
    pub fn new(kind: EdgeKind) -> Self {
        Self { kind }
    }
}

/// A simplified edge for graph export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub kind: EdgeKind,
}
