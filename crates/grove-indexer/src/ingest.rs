//! Batch ingestion of parsed files into a graph store.
//!
//! Ingestion runs in two passes. The first stores every type and its
//! methods; the second derives dependency facts and links them. Because all
//! types exist before any edge is attempted, file order does not matter.
//!
//! A record that the store rejects is counted and skipped. Nothing here
//! aborts a batch.

use grove_core::{derive_dependencies, ParsedFile, RelationshipFact};
use grove_graph::{CodeGraph, GraphError, GraphStore};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Records the store refused, by reason.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipCounts {
    pub validation: usize,
    pub missing_owner: usize,
    pub missing_endpoint: usize,
}

impl SkipCounts {
    fn record(&mut self, error: &GraphError) {
        match error {
            GraphError::Validation(_) => self.validation += 1,
            GraphError::MissingOwner { .. } => self.missing_owner += 1,
            GraphError::MissingEndpoint { .. } => self.missing_endpoint += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.validation + self.missing_owner + self.missing_endpoint
    }
}

/// Outcome of one ingestion run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReport {
    pub types_stored: usize,
    pub members_stored: usize,
    pub dependencies_created: usize,
    pub skipped: SkipCounts,
}

/// Loads parsed files into the store.
pub fn ingest(store: &GraphStore, files: &[ParsedFile]) -> IngestReport {
    let mut report = IngestReport::default();

    for file in files {
        for parsed in &file.types {
            match store.upsert_type(parsed.record.clone()) {
                Ok(_) => report.types_stored += 1,
                Err(e) => {
                    debug!("Skipping type {} in {}: {}", parsed.record.name, file.path, e);
                    report.skipped.record(&e);
                    continue;
                }
            }

            for member in &parsed.members {
                match store.upsert_member(member.clone()) {
                    Ok(_) => report.members_stored += 1,
                    Err(e) => {
                        debug!("Skipping method {}.{}: {}", member.owner, member.name, e);
                        report.skipped.record(&e);
                    }
                }
            }
        }
    }

    for file in files {
        for parsed in &file.types {
            for fact in derive_dependencies(parsed) {
                let fact = store.read(|graph| resolve_target(graph, file, fact));
                match store.add_relationship(&fact) {
                    Ok(()) => report.dependencies_created += 1,
                    Err(e) => {
                        debug!("Skipping {} {} -> {}: {}", fact.kind, fact.from, fact.to, e);
                        report.skipped.record(&e);
                    }
                }
            }
        }
    }

    info!(
        "Ingested {} types, {} methods, {} dependencies ({} skipped)",
        report.types_stored,
        report.members_stored,
        report.dependencies_created,
        report.skipped.total()
    );

    report
}

/// Fills in the target namespace of a fact derived from `file`.
///
/// First hit wins:
/// 1. the source type's own namespace, if it declares the target
/// 2. a single-type import ending in the target name
/// 3. a wildcard import whose package declares the target
/// 4. the only namespace known to declare the target
/// 5. the default package
fn resolve_target(
    graph: &CodeGraph,
    file: &ParsedFile,
    mut fact: RelationshipFact,
) -> RelationshipFact {
    if !fact.to_namespace.is_empty() {
        return fact;
    }

    fact.to_namespace = resolve_namespace(graph, file, &fact.from_namespace, &fact.to);
    fact
}

fn resolve_namespace(graph: &CodeGraph, file: &ParsedFile, source_ns: &str, name: &str) -> String {
    if graph.contains_type(name, source_ns) {
        return source_ns.to_string();
    }

    for import in &file.imports {
        if let Some((package, last)) = import.rsplit_once('.') {
            if last == name {
                return package.to_string();
            }
        }
    }

    for import in &file.imports {
        if let Some(package) = import.strip_suffix(".*") {
            if graph.contains_type(name, package) {
                return package.to_string();
            }
        }
    }

    let mut known = graph.namespaces_named(name);
    if known.len() == 1 {
        if let Some(only) = known.pop() {
            return only;
        }
    }

    String::new()
}
