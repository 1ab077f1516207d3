//! Deterministic node identities.
//!
//! Every node in the graph is keyed by a string derived from the names that
//! describe it, so re-reporting the same entity always lands on the same
//! node.

/// Identity of a type node.
///
/// `class::<namespace>.<name>`, or `class::<name>` in the default package.
pub fn type_key(name: &str, namespace: &str) -> String {
    if namespace.is_empty() {
        format!("class::{}", name)
    } else {
        format!("class::{}.{}", namespace, name)
    }
}

/// Identity of a member node: `method::<owner>::<member>`.
///
/// The owner's namespace is not part of the key, so methods of same-named
/// types in different packages share one node.
pub fn member_key(owner: &str, member: &str) -> String {
    format!("method::{}::{}", owner, member)
}
