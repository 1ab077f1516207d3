//! Shared handle to a code graph.

use std::sync::Arc;

use grove_core::{MemberRecord, RelationshipFact, TypeRecord};
use parking_lot::RwLock;
use tracing::info;

use crate::compat::{GraphCounts, LegacyRequest};
use crate::error::Result;
use crate::graph::{CodeGraph, GraphExport, GraphStats, NodeId};
use crate::traversal::{RelatedType, TypeContext};

/// Thread-safe store handle.
///
/// Clones share one graph. Each operation takes the lock exactly once, so
/// a node and its index entries, or a member and its ownership edge, are
/// always observed together.
#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    inner: Arc<RwLock<CodeGraph>>,
}

impl GraphStore {
    /// Creates a store over an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing graph.
    pub fn from_graph(graph: CodeGraph) -> Self {
        Self {
            inner: Arc::new(RwLock::new(graph)),
        }
    }

    pub fn upsert_type(&self, record: TypeRecord) -> Result<NodeId> {
        self.inner.write().upsert_type(record)
    }

    pub fn upsert_member(&self, record: MemberRecord) -> Result<NodeId> {
        self.inner.write().upsert_member(record)
    }

    pub fn add_relationship(&self, fact: &RelationshipFact) -> Result<()> {
        self.inner.write().add_relationship(fact)
    }

    pub fn find_related(&self, name: &str, max_depth: usize) -> Vec<RelatedType> {
        self.inner.read().find_related(name, max_depth)
    }

    pub fn list_members(&self, owner: &str, namespace: &str) -> Vec<MemberRecord> {
        self.inner.read().list_members(owner, namespace)
    }

    pub fn context(&self, name: &str, namespace: &str, max_depth: usize) -> TypeContext {
        self.inner.read().context(name, namespace, max_depth)
    }

    /// Exact lookup. Returns a copy of the stored record.
    pub fn find_type(&self, name: &str, namespace: &str) -> Option<TypeRecord> {
        self.inner.read().find_type(name, namespace).cloned()
    }

    pub fn contains_type(&self, name: &str, namespace: &str) -> bool {
        self.inner.read().contains_type(name, namespace)
    }

    pub fn namespaces_named(&self, name: &str) -> Vec<String> {
        self.inner.read().namespaces_named(name)
    }

    pub fn class_count(&self) -> usize {
        self.inner.read().class_count()
    }

    pub fn method_count(&self) -> usize {
        self.inner.read().method_count()
    }

    pub fn execute_legacy(&self, request: &LegacyRequest) -> Vec<GraphCounts> {
        self.inner.read().execute_legacy(request)
    }

    pub fn stats(&self) -> GraphStats {
        self.inner.read().stats()
    }

    pub fn export(&self) -> GraphExport {
        self.inner.read().export()
    }

    /// Runs a closure against the graph under the read lock.
    pub fn read<R>(&self, f: impl FnOnce(&CodeGraph) -> R) -> R {
        f(&self.inner.read())
    }

    /// Disposes this handle. Other clones stay valid until dropped.
    pub fn close(self) {
        let stats = self.stats();
        info!(
            "Closing graph store: {} types, {} members, {} edges",
            stats.types, stats.members, stats.edge_count
        );
    }
}
