//! Grove Server - WebSocket JSON-RPC access to a code graph
//!
//! Every store operation is exposed as a JSON-RPC 2.0 method:
//!
//! - `graph.info`, `health`
//! - `types.upsert`, `members.upsert`, `relationships.add`
//! - `related.find`, `members.list`, `context`
//! - `query.legacy` for pattern-style statistics queries
//! - `index` to load a Java source tree
//!
//! Each connection runs on its own task against a shared [`GraphStore`].
//!
//! [`GraphStore`]: grove_graph::GraphStore

mod handlers;
mod protocol;
mod server;

pub use protocol::{Request, Response, RpcError};
pub use server::{GroveServer, ServerConfig, ServerError};
