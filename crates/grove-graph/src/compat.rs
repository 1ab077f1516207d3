//! Legacy pattern-query compatibility.
//!
//! Older callers send pattern-style query text. Only two shapes are
//! understood: index creation, which is a no-op, and the aggregate
//! statistics query. The text is classified once into a [`LegacyRequest`]
//! and the store only ever sees the enum.

use crate::graph::CodeGraph;
use serde::{Deserialize, Serialize};
use tracing::debug;

const INDEX_CREATE_PREFIX: &str = "create index";
const STATS_MATCH: &str = "match (c:class)";
const STATS_RETURN: &str = "return count(distinct c) as classes";

/// A classified legacy request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LegacyRequest {
    /// `CREATE INDEX ...`; accepted and ignored.
    NoOpIndexCreate,
    /// Count of types and of ownership edges.
    StatsQuery,
    /// Anything else. Carries the normalized text for logging.
    Unrecognized(String),
}

impl LegacyRequest {
    /// Classifies raw query text.
    ///
    /// Whitespace runs collapse to one space and case is folded before
    /// matching, so formatting differences do not matter.
    pub fn parse(query: &str) -> Self {
        let normalized = normalize(query);

        if normalized.starts_with(INDEX_CREATE_PREFIX) {
            Self::NoOpIndexCreate
        } else if normalized.contains(STATS_MATCH) && normalized.contains(STATS_RETURN) {
            Self::StatsQuery
        } else {
            Self::Unrecognized(normalized)
        }
    }
}

impl From<&str> for LegacyRequest {
    fn from(query: &str) -> Self {
        Self::parse(query)
    }
}

fn normalize(query: &str) -> String {
    query
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// The single row returned by the statistics query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphCounts {
    pub classes: usize,
    pub methods: usize,
}

impl CodeGraph {
    /// Serves a classified legacy request.
    ///
    /// Never fails: unrecognized requests produce no rows.
    pub fn execute_legacy(&self, request: &LegacyRequest) -> Vec<GraphCounts> {
        match request {
            LegacyRequest::NoOpIndexCreate => {
                debug!("Ignoring index creation request");
                Vec::new()
            }
            LegacyRequest::StatsQuery => vec![GraphCounts {
                classes: self.class_count(),
                methods: self.method_count(),
            }],
            LegacyRequest::Unrecognized(text) => {
                debug!("Unsupported legacy query: {}", text);
                Vec::new()
            }
        }
    }
}
