//! Core graph data structure.
//!
//! The CodeGraph wraps petgraph and keeps the identity map and type indexes
//! in step with it. Every mutation goes through one of the upsert / add
//! methods below, which update the graph and its indexes together.

use crate::edge::{Edge, EdgeKind, GraphEdge};
use crate::error::{GraphError, Result};
use crate::identity::{member_key, type_key};
use crate::index::TypeIndex;
use crate::node::GraphNode;
use grove_core::{MemberRecord, RelationshipFact, TypeRecord};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Unique identifier for a node in the graph.
pub type NodeId = NodeIndex;

/// The code knowledge graph.
///
/// Types and methods are nodes; ownership and type relationships are
/// edges. Parallel edges are allowed: reporting the same dependency twice
/// stores it twice.
#[derive(Debug, Default)]
pub struct CodeGraph {
    /// The underlying petgraph graph.
    pub(crate) graph: DiGraph<GraphNode, Edge>,

    /// Maps identity keys to graph node indexes.
    id_index: HashMap<String, NodeId>,

    /// Exact and by-name lookups for type nodes.
    pub(crate) types: TypeIndex,
}

impl CodeGraph {
    /// Creates a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a type or overwrites the one with the same identity.
    pub fn upsert_type(&mut self, record: TypeRecord) -> Result<NodeId> {
        record.validate()?;

        let key = type_key(&record.name, &record.namespace);
        let namespace = record.namespace.clone();
        let name = record.name.clone();

        let id = self.upsert_node(key, GraphNode::Type(record));
        self.types.insert(&namespace, &name, id);

        Ok(id)
    }

    /// Inserts or overwrites a method and links it to its owner.
    ///
    /// The owner must already exist. Re-reporting a method does not add a
    /// second ownership edge.
    pub fn upsert_member(&mut self, record: MemberRecord) -> Result<NodeId> {
        record.validate()?;

        let Some(owner) = self.types.resolve(&record.namespace, &record.owner) else {
            warn!(
                "Owner type not found for method {}: {} (namespace: {:?})",
                record.name, record.owner, record.namespace
            );
            return Err(GraphError::MissingOwner {
                owner: record.owner,
                namespace: record.namespace,
            });
        };

        let key = member_key(&record.owner, &record.name);
        let id = self.upsert_node(key, GraphNode::Member(record));

        let linked = self
            .graph
            .edges_connecting(owner, id)
            .any(|edge| edge.weight().kind == EdgeKind::HasMember);
        if !linked {
            self.graph
                .add_edge(owner, id, Edge::new(EdgeKind::HasMember));
        }

        Ok(id)
    }

    /// Adds a typed edge between two existing types.
    ///
    /// Duplicates are not detected; each call adds one edge.
    pub fn add_relationship(&mut self, fact: &RelationshipFact) -> Result<()> {
        fact.validate()?;

        let from = self.types.resolve(&fact.from_namespace, &fact.from);
        let to = self.types.resolve(&fact.to_namespace, &fact.to);

        match (from, to) {
            (Some(from), Some(to)) => {
                self.graph.add_edge(from, to, Edge::new(fact.kind.into()));
                Ok(())
            }
            (from, to) => {
                let mut missing = Vec::new();
                if from.is_none() {
                    missing.push(type_key(&fact.from, &fact.from_namespace));
                }
                if to.is_none() {
                    missing.push(type_key(&fact.to, &fact.to_namespace));
                }
                debug!("Cannot create {} edge, missing nodes: {:?}", fact.kind, missing);
                Err(GraphError::MissingEndpoint { missing })
            }
        }
    }

    fn upsert_node(&mut self, key: String, node: GraphNode) -> NodeId {
        match self.id_index.get(&key) {
            Some(&id) => {
                self.graph[id] = node;
                id
            }
            None => {
                let id = self.graph.add_node(node);
                self.id_index.insert(key, id);
                id
            }
        }
    }

    /// Exact lookup of a type by namespace and name.
    pub fn find_type(&self, name: &str, namespace: &str) -> Option<&TypeRecord> {
        let id = self.types.resolve(namespace, name)?;
        self.graph.node_weight(id)?.as_type()
    }

    pub fn contains_type(&self, name: &str, namespace: &str) -> bool {
        self.types.resolve(namespace, name).is_some()
    }

    /// Every namespace that declares a type with this bare name, sorted.
    pub fn namespaces_named(&self, name: &str) -> Vec<String> {
        let mut namespaces: Vec<String> = self
            .types
            .named(name)
            .filter_map(|id| self.graph.node_weight(id)?.as_type())
            .map(|record| record.namespace.clone())
            .collect();
        namespaces.sort();
        namespaces
    }

    /// Gets a node by its identity key.
    pub fn get_by_key(&self, key: &str) -> Option<&GraphNode> {
        let index = self.id_index.get(key)?;
        self.graph.node_weight(*index)
    }

    /// Counts type nodes with a full scan.
    pub fn class_count(&self) -> usize {
        self.graph.node_weights().filter(|node| node.is_type()).count()
    }

    /// Counts ownership edges with a full scan.
    pub fn method_count(&self) -> usize {
        self.graph
            .edge_weights()
            .filter(|edge| edge.kind == EdgeKind::HasMember)
            .count()
    }

    /// Returns the number of nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Iterates over all nodes.
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.graph.node_weights()
    }

    /// Returns all nodes and edges keyed by identity, for export.
    pub fn export(&self) -> GraphExport {
        let nodes = self
            .graph
            .node_weights()
            .map(|node| ExportNode {
                id: node.key(),
                node: node.clone(),
            })
            .collect();

        let edges = self
            .graph
            .edge_references()
            .map(|edge_ref| GraphEdge {
                source: self.graph[edge_ref.source()].key(),
                target: self.graph[edge_ref.target()].key(),
                kind: edge_ref.weight().kind,
            })
            .collect();

        GraphExport { nodes, edges }
    }
}

/// A node with its identity, for export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportNode {
    pub id: String,
    pub node: GraphNode,
}

/// Full dump of the graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphExport {
    pub nodes: Vec<ExportNode>,
    pub edges: Vec<GraphEdge>,
}

/// Graph statistics for the info endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub types: usize,
    pub members: usize,
}

impl CodeGraph {
    /// Returns graph statistics.
    pub fn stats(&self) -> GraphStats {
        let types = self.class_count();
        GraphStats {
            node_count: self.node_count(),
            edge_count: self.edge_count(),
            types,
            members: self.node_count() - types,
        }
    }
}
