//! Read algorithms over the code graph.
//!
//! - relatedness: bounded BFS over the undirected view of the graph, seeded
//!   from every type that carries a given bare name
//! - members: the methods a type owns, ordered by name

use crate::edge::EdgeKind;
use crate::graph::{CodeGraph, NodeId};
use grove_core::MemberRecord;
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};

/// A type reachable from the search seed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedType {
    pub name: String,
    #[serde(rename = "package")]
    pub namespace: String,
    /// Fewest hops from any seed.
    pub distance: usize,
}

impl CodeGraph {
    /// Finds types within `max_depth` hops of any type named `name`.
    ///
    /// Edge direction is ignored and method nodes are walked through but
    /// never returned. Each result carries the shortest distance observed
    /// from any seed. Results are ordered by distance, then name, then
    /// namespace. An unknown name yields an empty list.
    pub fn find_related(&self, name: &str, max_depth: usize) -> Vec<RelatedType> {
        let mut best: HashMap<NodeId, usize> = HashMap::new();

        for seed in self.types.named(name) {
            for (node, distance) in self.bounded_bfs(seed, max_depth) {
                if !self.graph[node].is_type() {
                    continue;
                }
                best.entry(node)
                    .and_modify(|d| *d = (*d).min(distance))
                    .or_insert(distance);
            }
        }

        let mut related: Vec<RelatedType> = best
            .into_iter()
            .filter_map(|(node, distance)| {
                let record = self.graph.node_weight(node)?.as_type()?;
                Some(RelatedType {
                    name: record.name.clone(),
                    namespace: record.namespace.clone(),
                    distance,
                })
            })
            .collect();

        // (namespace, name) is unique per type, so this order is total.
        related.sort_by(|a, b| {
            a.distance
                .cmp(&b.distance)
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.namespace.cmp(&b.namespace))
        });

        related
    }

    /// BFS over the undirected view from `start`, excluding `start` itself.
    fn bounded_bfs(&self, start: NodeId, max_depth: usize) -> Vec<(NodeId, usize)> {
        let mut result = Vec::new();
        let mut visited: HashSet<NodeId> = HashSet::new();
        let mut queue: VecDeque<(NodeId, usize)> = VecDeque::new();

        visited.insert(start);
        queue.push_back((start, 0));

        while let Some((current, depth)) = queue.pop_front() {
            if current != start {
                result.push((current, depth));
            }

            // Continue BFS if not at max depth
            if depth >= max_depth {
                continue;
            }

            for neighbor in self.graph.neighbors_undirected(current) {
                if visited.insert(neighbor) {
                    queue.push_back((neighbor, depth + 1));
                }
            }
        }

        result
    }

    /// Lists the methods owned by a type, ordered by name.
    ///
    /// An unknown owner yields an empty list.
    pub fn list_members(&self, owner: &str, namespace: &str) -> Vec<MemberRecord> {
        let Some(owner_id) = self.types.resolve(namespace, owner) else {
            return Vec::new();
        };

        let mut members: Vec<MemberRecord> = self
            .graph
            .edges_directed(owner_id, Direction::Outgoing)
            .filter(|edge| edge.weight().kind == EdgeKind::HasMember)
            .filter_map(|edge| self.graph.node_weight(edge.target())?.as_member())
            .cloned()
            .collect();

        members.sort_by(|a, b| a.name.cmp(&b.name));
        members
    }

    /// Related types plus the type's own methods, answered in one read.
    pub fn context(&self, name: &str, namespace: &str, max_depth: usize) -> TypeContext {
        TypeContext {
            related: self.find_related(name, max_depth),
            members: self.list_members(name, namespace),
        }
    }
}

/// What a caller needs to describe one type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeContext {
    pub related: Vec<RelatedType>,
    pub members: Vec<MemberRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use grove_core::{RelationKind, RelationshipFact, TypeRecord};

    fn related(name: &str, namespace: &str, distance: usize) -> RelatedType {
        RelatedType {
            name: name.into(),
            namespace: namespace.into(),
            distance,
        }
    }

    fn link(graph: &mut CodeGraph, from: &str, to: &str, kind: RelationKind) {
        let fact = RelationshipFact::new(from, to, kind).with_namespaces("p", "p");
        graph.add_relationship(&fact).unwrap();
    }

    /// A → B → C → D → E, all in namespace `p`.
    fn chain() -> CodeGraph {
        let mut graph = CodeGraph::new();
        for name in ["A", "B", "C", "D", "E"] {
            graph.upsert_type(TypeRecord::new(name, "p")).unwrap();
        }
        link(&mut graph, "A", "B", RelationKind::Usage);
        link(&mut graph, "B", "C", RelationKind::Inheritance);
        link(&mut graph, "C", "D", RelationKind::Usage);
        link(&mut graph, "D", "E", RelationKind::Implementation);
        graph
    }

    #[test]
    fn test_single_usage_edge() {
        let mut graph = CodeGraph::new();
        graph.upsert_type(TypeRecord::new("A", "p")).unwrap();
        graph.upsert_type(TypeRecord::new("B", "p")).unwrap();
        link(&mut graph, "A", "B", RelationKind::Usage);

        assert_eq!(graph.find_related("A", 2), vec![related("B", "p", 1)]);
    }

    #[test]
    fn test_direction_is_ignored() {
        let graph = chain();
        let result = graph.find_related("C", 1);
        assert_eq!(result, vec![related("B", "p", 1), related("D", "p", 1)]);
    }

    #[test]
    fn test_zero_depth_is_empty() {
        let graph = chain();
        assert!(graph.find_related("A", 0).is_empty());
    }

    #[test]
    fn test_unknown_name_is_empty() {
        let graph = chain();
        assert!(graph.find_related("Missing", 5).is_empty());
    }

    #[test]
    fn test_max_depth_limit() {
        let graph = chain();
        let result = graph.find_related("A", 2);
        assert_eq!(result, vec![related("B", "p", 1), related("C", "p", 2)]);

        let all = graph.find_related("A", 10);
        let distances: Vec<usize> = all.iter().map(|r| r.distance).collect();
        assert_eq!(distances, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_distances_stable_as_depth_grows() {
        let graph = chain();
        let shallow = graph.find_related("A", 2);
        let deep = graph.find_related("A", 4);

        for found in &shallow {
            let again = deep.iter().find(|r| r.name == found.name).unwrap();
            assert_eq!(again.distance, found.distance);
        }
    }

    #[test]
    fn test_cycle_no_infinite_loop() {
        let mut graph = chain();
        link(&mut graph, "E", "A", RelationKind::Usage);

        let result = graph.find_related("A", 10);
        assert_eq!(
            result,
            vec![
                related("B", "p", 1),
                related("E", "p", 1),
                related("C", "p", 2),
                related("D", "p", 2),
            ]
        );
    }

    #[test]
    fn test_methods_are_traversed_not_returned() {
        let mut graph = CodeGraph::new();
        graph.upsert_type(TypeRecord::new("A", "p")).unwrap();
        graph.upsert_type(TypeRecord::new("B", "p")).unwrap();
        graph.upsert_member(MemberRecord::new("A", "p", "run")).unwrap();

        // No member of A is reported, and B stays unreachable.
        assert!(graph.find_related("A", 3).is_empty());
    }

    #[test]
    fn test_shared_member_node_connects_owners() {
        // Same-named owners in different namespaces share method nodes.
        let mut graph = CodeGraph::new();
        graph.upsert_type(TypeRecord::new("Config", "a")).unwrap();
        graph.upsert_type(TypeRecord::new("Config", "b")).unwrap();
        graph.upsert_member(MemberRecord::new("Config", "a", "load")).unwrap();
        graph.upsert_member(MemberRecord::new("Config", "b", "load")).unwrap();

        let result = graph.find_related("Config", 2);
        assert_eq!(result, vec![related("Config", "a", 2), related("Config", "b", 2)]);
    }

    #[test]
    fn test_multiple_seeds_keep_min_distance() {
        // a.Node → p.Hub, b.Node → p.Leaf → p.Hub
        let mut graph = CodeGraph::new();
        for (name, ns) in [("Node", "a"), ("Node", "b"), ("Hub", "p"), ("Leaf", "p")] {
            graph.upsert_type(TypeRecord::new(name, ns)).unwrap();
        }
        let facts = [
            RelationshipFact::new("Node", "Hub", RelationKind::Usage).with_namespaces("a", "p"),
            RelationshipFact::new("Node", "Leaf", RelationKind::Usage).with_namespaces("b", "p"),
            RelationshipFact::new("Leaf", "Hub", RelationKind::Usage).with_namespaces("p", "p"),
        ];
        for fact in &facts {
            graph.add_relationship(fact).unwrap();
        }

        let result = graph.find_related("Node", 3);
        assert_eq!(
            result,
            vec![
                related("Hub", "p", 1),
                related("Leaf", "p", 1),
                related("Node", "a", 3),
                related("Node", "b", 3),
            ]
        );
    }

    #[test]
    fn test_ordering_by_distance_then_name() {
        let mut graph = CodeGraph::new();
        for name in ["Root", "Zeta", "Alpha", "Mid"] {
            graph.upsert_type(TypeRecord::new(name, "p")).unwrap();
        }
        link(&mut graph, "Root", "Zeta", RelationKind::Usage);
        link(&mut graph, "Alpha", "Root", RelationKind::Usage);
        link(&mut graph, "Zeta", "Mid", RelationKind::Usage);

        let names: Vec<String> = graph
            .find_related("Root", 2)
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["Alpha", "Zeta", "Mid"]);
    }

    #[test]
    fn test_related_serializes_namespace_as_package() {
        let json = serde_json::to_value(related("B", "p", 1)).unwrap();
        assert_eq!(json, serde_json::json!({"name": "B", "package": "p", "distance": 1}));
    }

    #[test]
    fn test_list_members_sorted() {
        let mut graph = CodeGraph::new();
        graph.upsert_type(TypeRecord::new("Order", "shop")).unwrap();
        for name in ["total", "add", "remove", "cancel"] {
            graph
                .upsert_member(MemberRecord::new("Order", "shop", name))
                .unwrap();
        }

        let names: Vec<String> = graph
            .list_members("Order", "shop")
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, vec!["add", "cancel", "remove", "total"]);
    }

    #[test]
    fn test_list_members_ignores_structural_edges() {
        let mut graph = CodeGraph::new();
        graph.upsert_type(TypeRecord::new("A", "p")).unwrap();
        graph.upsert_type(TypeRecord::new("B", "p")).unwrap();
        graph.upsert_member(MemberRecord::new("A", "p", "run")).unwrap();
        link(&mut graph, "A", "B", RelationKind::Usage);

        let members = graph.list_members("A", "p");
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].name, "run");
    }

    #[test]
    fn test_context_bundle() {
        let mut graph = CodeGraph::new();
        graph.upsert_type(TypeRecord::new("A", "p")).unwrap();
        graph.upsert_type(TypeRecord::new("B", "p")).unwrap();
        graph.upsert_member(MemberRecord::new("A", "p", "run")).unwrap();
        link(&mut graph, "A", "B", RelationKind::Usage);

        let context = graph.context("A", "p", 2);
        assert_eq!(context.related, vec![related("B", "p", 1)]);
        assert_eq!(context.members.len(), 1);

        let unknown = graph.context("A", "q", 2);
        assert_eq!(unknown.related.len(), 1);
        assert!(unknown.members.is_empty());
    }

    #[test]
    fn test_member_identity_collides_across_namespaces() {
        // Member keys carry the owner's bare name only, so `a.Config.load`
        // and `b.Config.load` are one node with two owners.
        let mut graph = CodeGraph::new();
        graph.upsert_type(TypeRecord::new("Config", "a")).unwrap();
        graph.upsert_type(TypeRecord::new("Config", "b")).unwrap();

        let first = graph
            .upsert_member(MemberRecord::new("Config", "a", "load").with_return_type("A"))
            .unwrap();
        let second = graph
            .upsert_member(MemberRecord::new("Config", "b", "load").with_return_type("B"))
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.method_count(), 2);

        // Last write wins for both owners.
        let from_a = graph.list_members("Config", "a");
        let from_b = graph.list_members("Config", "b");
        assert_eq!(from_a, from_b);
        assert_eq!(from_a[0].return_type, "B");
        assert_eq!(from_a[0].namespace, "b");
    }

    #[test]
    fn test_list_members_empty_cases() {
        let mut graph = CodeGraph::new();
        graph.upsert_type(TypeRecord::new("C", "")).unwrap();

        assert!(graph.list_members("C", "").is_empty());
        assert!(graph.list_members("Unknown", "").is_empty());
        assert!(graph.list_members("C", "other").is_empty());
    }
}
