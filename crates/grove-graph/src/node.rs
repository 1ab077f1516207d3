//! Node payloads stored in the graph.

use crate::identity::{member_key, type_key};
use grove_core::{MemberRecord, TypeRecord};
use serde::{Deserialize, Serialize};

/// A node in the code graph: a type or one of its methods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "label", rename_all = "snake_case")]
pub enum GraphNode {
    Type(TypeRecord),
    Member(MemberRecord),
}

impl GraphNode {
    /// The node's identity key.
    pub fn key(&self) -> String {
        match self {
            Self::Type(record) => type_key(&record.name, &record.namespace),
            Self::Member(record) => member_key(&record.owner, &record.name),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Type(record) => &record.name,
            Self::Member(record) => &record.name,
        }
    }

    pub fn as_type(&self) -> Option<&TypeRecord> {
        match self {
            Self::Type(record) => Some(record),
            Self::Member(_) => None,
        }
    }

    pub fn as_member(&self) -> Option<&MemberRecord> {
        match self {
            Self::Member(record) => Some(record),
            Self::Type(_) => None,
        }
    }

    pub fn is_type(&self) -> bool {
        matches!(self, Self::Type(_))
    }
}
