//! Request handlers for protocol methods.
//!
//! Each handler implements one method. Store operations are short and
//! CPU-bound, so they run inline; only `index` moves to a blocking thread.

use crate::protocol::{
    ContextParams, IndexParams, LegacyQueryParams, MembersParams, RelatedParams, Response,
    INDEX_FAILED,
};
use grove_core::{MemberRecord, RelationshipFact, TypeRecord};
use grove_graph::{GraphStore, LegacyRequest};
use grove_indexer::{index_directory, IndexOptions};
use serde::Serialize;
use serde_json::Value;
use std::time::Instant;
use tracing::debug;

/// Handles the graph.info method.
pub fn handle_info(store: &GraphStore, id: Option<Value>) -> Response {
    let stats = store.stats();

    #[derive(Serialize)]
    struct InfoResult {
        #[serde(rename = "nodeCount")]
        node_count: usize,
        #[serde(rename = "edgeCount")]
        edge_count: usize,
        types: usize,
        members: usize,
        languages: Vec<&'static str>,
        version: &'static str,
    }

    Response::success(
        id,
        InfoResult {
            node_count: stats.node_count,
            edge_count: stats.edge_count,
            types: stats.types,
            members: stats.members,
            languages: vec!["java"],
            version: env!("CARGO_PKG_VERSION"),
        },
    )
}

/// Handles the health method.
pub fn handle_health(id: Option<Value>) -> Response {
    Response::success(
        id,
        serde_json::json!({
            "status": "ok",
            "timestamp": chrono::Utc::now().to_rfc3339(),
        }),
    )
}

/// Handles the types.upsert method.
pub fn handle_upsert_type(store: &GraphStore, id: Option<Value>, record: TypeRecord) -> Response {
    let key = grove_graph::type_key(&record.name, &record.namespace);
    match store.upsert_type(record) {
        Ok(_) => Response::success(id, serde_json::json!({ "id": key })),
        Err(e) => Response::graph_error(id, &e),
    }
}

/// Handles the members.upsert method.
pub fn handle_upsert_member(
    store: &GraphStore,
    id: Option<Value>,
    record: MemberRecord,
) -> Response {
    let key = grove_graph::member_key(&record.owner, &record.name);
    match store.upsert_member(record) {
        Ok(_) => Response::success(id, serde_json::json!({ "id": key })),
        Err(e) => Response::graph_error(id, &e),
    }
}

/// Handles the relationships.add method.
pub fn handle_add_relationship(
    store: &GraphStore,
    id: Option<Value>,
    fact: RelationshipFact,
) -> Response {
    match store.add_relationship(&fact) {
        Ok(()) => Response::success(id, serde_json::json!({ "created": true })),
        Err(e) => Response::graph_error(id, &e),
    }
}

/// Handles the related.find method.
pub fn handle_related(
    store: &GraphStore,
    id: Option<Value>,
    params: RelatedParams,
    default_depth: usize,
) -> Response {
    let start = Instant::now();
    let depth = params.depth.unwrap_or(default_depth);
    debug!("Related types for {} (depth {})", params.name, depth);

    let related = store.find_related(&params.name, depth);

    Response::success(
        id,
        serde_json::json!({
            "related": related,
            "queryTime": start.elapsed().as_millis() as u64,
        }),
    )
}

/// Handles the members.list method.
pub fn handle_members(store: &GraphStore, id: Option<Value>, params: MembersParams) -> Response {
    let members = store.list_members(&params.owner, &params.namespace);
    Response::success(id, serde_json::json!({ "members": members }))
}

/// Handles the context method.
pub fn handle_context(
    store: &GraphStore,
    id: Option<Value>,
    params: ContextParams,
    default_depth: usize,
) -> Response {
    let depth = params.depth.unwrap_or(default_depth);
    debug!("Context for {} in {:?}", params.name, params.namespace);

    Response::success(id, store.context(&params.name, &params.namespace, depth))
}

/// Handles the query.legacy method.
///
/// The text is classified here; the store only ever sees the enum.
pub fn handle_legacy_query(
    store: &GraphStore,
    id: Option<Value>,
    params: LegacyQueryParams,
) -> Response {
    let request = LegacyRequest::parse(&params.query);
    Response::success(id, store.execute_legacy(&request))
}

/// Handles the index method.
pub async fn handle_index(
    store: &GraphStore,
    id: Option<Value>,
    params: IndexParams,
    options: &IndexOptions,
) -> Response {
    let store = store.clone();
    let options = options.clone();
    let path = params.path;

    let outcome =
        tokio::task::spawn_blocking(move || index_directory(&path, &options, &store)).await;

    match outcome {
        Ok(Ok(report)) => Response::success(id, report),
        Ok(Err(e)) => Response::error(id, INDEX_FAILED, e.to_string()),
        Err(e) => Response::error(id, INDEX_FAILED, format!("Indexing task failed: {}", e)),
    }
}
