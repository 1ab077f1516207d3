//! WebSocket server implementation.
//!
//! Handles client connections and routes messages to handlers.

use crate::handlers::{
    handle_add_relationship, handle_context, handle_health, handle_index, handle_info,
    handle_legacy_query, handle_members, handle_related, handle_upsert_member, handle_upsert_type,
};
use crate::protocol::{Request, Response};
use futures_util::{SinkExt, StreamExt};
use grove_graph::GraphStore;
use grove_indexer::IndexOptions;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::net::{Ipv4Addr, SocketAddr};
use thiserror::Error;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::{accept_async, tungstenite::Message};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Errors that end the accept loop or a single connection.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("Failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to.
    pub addr: SocketAddr,
    /// Depth used when a request does not name one.
    pub default_depth: usize,
    /// Options for the `index` method.
    pub index: IndexOptions,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 7432)),
            default_depth: 2,
            index: IndexOptions::default(),
        }
    }
}

/// The Grove WebSocket server.
pub struct GroveServer {
    config: ServerConfig,
    store: GraphStore,
}

impl GroveServer {
    /// Creates a server over the given store.
    pub fn new(store: GraphStore, config: ServerConfig) -> Self {
        Self { config, store }
    }

    /// Returns a handle to the shared store.
    pub fn store(&self) -> GraphStore {
        self.store.clone()
    }

    /// Runs the server, accepting connections forever.
    pub async fn run(&self) -> Result<(), ServerError> {
        let listener = TcpListener::bind(&self.config.addr).await?;
        info!("Grove server listening on {}", self.config.addr);

        loop {
            match listener.accept().await {
                Ok((stream, addr)) => {
                    let conn_id = Uuid::new_v4();
                    debug!("New connection {} from {}", conn_id, addr);
                    let store = self.store.clone();
                    let config = self.config.clone();
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(stream, conn_id, store, config).await {
                            error!("Connection {} error: {}", conn_id, e);
                        }
                    });
                }
                Err(e) => {
                    error!("Accept error: {}", e);
                }
            }
        }
    }
}

/// Handles a single WebSocket connection.
async fn handle_connection(
    stream: TcpStream,
    conn_id: Uuid,
    store: GraphStore,
    config: ServerConfig,
) -> Result<(), ServerError> {
    let ws_stream = accept_async(stream).await?;
    info!("WebSocket connection {} established", conn_id);

    let (mut write, mut read) = ws_stream.split();

    while let Some(msg) = read.next().await {
        let msg = match msg {
            Ok(m) => m,
            Err(e) => {
                warn!("Message error on {}: {}", conn_id, e);
                break;
            }
        };

        if msg.is_close() {
            debug!("Client {} disconnected", conn_id);
            break;
        }

        if msg.is_ping() {
            write.send(Message::Pong(msg.into_data())).await?;
            continue;
        }

        if msg.is_text() {
            let text = msg.to_text().unwrap_or("");
            let response = process_message(text, &store, &config).await;
            let json = serde_json::to_string(&response)?;
            write.send(Message::Text(json)).await?;
        }
    }

    info!("Connection closed: {}", conn_id);
    Ok(())
}

/// Processes a JSON-RPC message and returns a response.
pub(crate) async fn process_message(
    text: &str,
    store: &GraphStore,
    config: &ServerConfig,
) -> Response {
    let value: Value = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(_) => return Response::parse_error(),
    };

    let raw_id = value.get("id").cloned();
    let request: Request = match serde_json::from_value(value) {
        Ok(r) => r,
        Err(e) => return Response::invalid_request(raw_id, e.to_string()),
    };

    let id = request.id.clone();
    if request.jsonrpc != "2.0" {
        return Response::invalid_request(id, "jsonrpc must be \"2.0\"");
    }

    let method = request.method.as_str();
    debug!("Processing method: {}", method);

    // Route to handler
    match method {
        "graph.info" => handle_info(store, id),

        "health" => handle_health(id),

        "types.upsert" => match params(request.params) {
            Ok(record) => handle_upsert_type(store, id, record),
            Err(e) => Response::invalid_params(id, e.to_string()),
        },

        "members.upsert" => match params(request.params) {
            Ok(record) => handle_upsert_member(store, id, record),
            Err(e) => Response::invalid_params(id, e.to_string()),
        },

        "relationships.add" => match params(request.params) {
            Ok(fact) => handle_add_relationship(store, id, fact),
            Err(e) => Response::invalid_params(id, e.to_string()),
        },

        "related.find" => match params(request.params) {
            Ok(p) => handle_related(store, id, p, config.default_depth),
            Err(e) => Response::invalid_params(id, e.to_string()),
        },

        "members.list" => match params(request.params) {
            Ok(p) => handle_members(store, id, p),
            Err(e) => Response::invalid_params(id, e.to_string()),
        },

        "context" => match params(request.params) {
            Ok(p) => handle_context(store, id, p, config.default_depth),
            Err(e) => Response::invalid_params(id, e.to_string()),
        },

        "query.legacy" => match params(request.params) {
            Ok(p) => handle_legacy_query(store, id, p),
            Err(e) => Response::invalid_params(id, e.to_string()),
        },

        "index" => match params(request.params) {
            Ok(p) => handle_index(store, id, p, &config.index).await,
            Err(e) => Response::invalid_params(id, e.to_string()),
        },

        _ => Response::method_not_found(id, method),
    }
}

fn params<T: DeserializeOwned>(value: Value) -> Result<T, serde_json::Error> {
    serde_json::from_value(value)
}
