use crate::graph::NodeId;
use std::collections::{BTreeSet, HashMap};

/// Secondary indexes over type nodes.
///
/// - exact: `(namespace, name)` → node, overwritten on upsert
/// - by name: bare name → every node carrying that name, across namespaces
///
/// Both only grow; nodes are never removed from the graph.
#[derive(Debug, Default, Clone)]
pub struct TypeIndex {
    /// Map of (namespace, name) to NodeId
    exact: HashMap<(String, String), NodeId>,

    /// Map of bare name to the nodes sharing it. Ordered so seeds are
    /// visited in a stable order.
    by_name: HashMap<String, BTreeSet<NodeId>>,
}

impl TypeIndex {
    /// Creates a new empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a type node under both indexes.
    pub fn insert(&mut self, namespace: &str, name: &str, id: NodeId) {
        self.exact
            .insert((namespace.to_string(), name.to_string()), id);
        self.by_name.entry(name.to_string()).or_default().insert(id);
    }

    /// Resolves an exact `(namespace, name)` pair.
    pub fn resolve(&self, namespace: &str, name: &str) -> Option<NodeId> {
        self.exact
            .get(&(namespace.to_string(), name.to_string()))
            .copied()
    }

    /// Returns every node registered under a bare name.
    pub fn named(&self, name: &str) -> impl Iterator<Item = NodeId> + '_ {
        self.by_name.get(name).into_iter().flatten().copied()
    }

    /// Number of exact entries (one per type node).
    pub fn len(&self) -> usize {
        self.exact.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_resolve() {
        let mut index = TypeIndex::new();
        let id = NodeId::new(1);

        index.insert("com.example", "User", id);

        assert_eq!(index.resolve("com.example", "User"), Some(id));
        assert_eq!(index.resolve("", "User"), None);
        assert_eq!(index.named("User").collect::<Vec<_>>(), vec![id]);
        assert_eq!(index.named("Order").count(), 0);
    }

    #[test]
    fn test_reinsert_does_not_duplicate() {
        let mut index = TypeIndex::new();
        let id = NodeId::new(3);

        index.insert("p", "A", id);
        index.insert("p", "A", id);

        assert_eq!(index.len(), 1);
        assert_eq!(index.named("A").count(), 1);
    }

    #[test]
    fn test_same_name_across_namespaces() {
        let mut index = TypeIndex::new();
        index.insert("b", "Config", NodeId::new(7));
        index.insert("a", "Config", NodeId::new(2));

        let ids: Vec<NodeId> = index.named("Config").collect();
        assert_eq!(ids, vec![NodeId::new(2), NodeId::new(7)]);
        assert_eq!(index.len(), 2);
    }
}
