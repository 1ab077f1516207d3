//! JSON-RPC 2.0 message types.

use grove_graph::GraphError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;

pub const PARSE_ERROR: i32 = -32700;
pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const INTERNAL_ERROR: i32 = -32603;

pub const MISSING_OWNER: i32 = -32001;
pub const MISSING_ENDPOINT: i32 = -32002;
pub const VALIDATION_FAILED: i32 = -32003;
pub const INDEX_FAILED: i32 = -32004;

/// An incoming request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

/// An outgoing response. Exactly one of `result` and `error` is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub jsonrpc: String,
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Response {
    pub fn success(id: Option<Value>, result: impl Serialize) -> Self {
        match serde_json::to_value(result) {
            Ok(value) => Self {
                jsonrpc: "2.0".to_string(),
                id,
                result: Some(value),
                error: None,
            },
            Err(e) => Self::error(id, INTERNAL_ERROR, format!("Failed to encode result: {}", e)),
        }
    }

    pub fn error(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(RpcError {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }

    pub fn parse_error() -> Self {
        Self::error(None, PARSE_ERROR, "Parse error")
    }

    pub fn invalid_request(id: Option<Value>, reason: impl Into<String>) -> Self {
        Self::error(id, INVALID_REQUEST, format!("Invalid request: {}", reason.into()))
    }

    pub fn method_not_found(id: Option<Value>, method: &str) -> Self {
        Self::error(id, METHOD_NOT_FOUND, format!("Method not found: {}", method))
    }

    pub fn invalid_params(id: Option<Value>, reason: impl Into<String>) -> Self {
        Self::error(id, INVALID_PARAMS, format!("Invalid params: {}", reason.into()))
    }

    /// Maps a refused store write onto its error code. The error's fields
    /// travel in `data`.
    pub fn graph_error(id: Option<Value>, error: &GraphError) -> Self {
        let (code, data) = match error {
            GraphError::Validation(e) => (
                VALIDATION_FAILED,
                serde_json::json!({ "record": e.record, "field": e.field }),
            ),
            GraphError::MissingOwner { owner, namespace } => (
                MISSING_OWNER,
                serde_json::json!({ "owner": owner, "namespace": namespace }),
            ),
            GraphError::MissingEndpoint { missing } => {
                (MISSING_ENDPOINT, serde_json::json!({ "missing": missing }))
            }
        };

        let mut response = Self::error(id, code, error.to_string());
        if let Some(err) = response.error.as_mut() {
            err.data = Some(data);
        }
        response
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Parameters for `related.find`.
#[derive(Debug, Clone, Deserialize)]
pub struct RelatedParams {
    pub name: String,
    pub depth: Option<usize>,
}

/// Parameters for `members.list`.
#[derive(Debug, Clone, Deserialize)]
pub struct MembersParams {
    pub owner: String,
    #[serde(default, alias = "package")]
    pub namespace: String,
}

/// Parameters for `context`.
#[derive(Debug, Clone, Deserialize)]
pub struct ContextParams {
    pub name: String,
    #[serde(default, alias = "package")]
    pub namespace: String,
    pub depth: Option<usize>,
}

/// Parameters for `query.legacy`.
#[derive(Debug, Clone, Deserialize)]
pub struct LegacyQueryParams {
    pub query: String,
}

/// Parameters for `index`.
#[derive(Debug, Clone, Deserialize)]
pub struct IndexParams {
    pub path: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use grove_core::{MemberRecord, TypeRecord};
    use grove_graph::GraphStore;

    #[test]
    fn test_success_shape() {
        let response = Response::success(Some(Value::from(1)), vec![1, 2]);
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json, serde_json::json!({"jsonrpc": "2.0", "id": 1, "result": [1, 2]}));
    }

    #[test]
    fn test_error_shape() {
        let response = Response::method_not_found(Some(Value::from("a")), "nope");
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["error"]["code"], -32601);
        assert_eq!(json["error"]["message"], "Method not found: nope");
        assert!(json.get("result").is_none());
        assert!(json["error"].get("data").is_none());
    }

    #[test]
    fn test_graph_error_codes() {
        let store = GraphStore::new();

        let owner = store
            .upsert_member(MemberRecord::new("Ghost", "p", "run"))
            .unwrap_err();
        let response = Response::graph_error(None, &owner);
        let error = response.error.unwrap();
        assert_eq!(error.code, MISSING_OWNER);
        assert_eq!(error.data.unwrap()["owner"], "Ghost");

        let invalid = store.upsert_type(TypeRecord::new("", "p")).unwrap_err();
        let error = Response::graph_error(None, &invalid).error.unwrap();
        assert_eq!(error.code, VALIDATION_FAILED);
        assert_eq!(error.data.unwrap()["field"], "name");
    }

    #[test]
    fn test_params_defaults() {
        let params: MembersParams = serde_json::from_value(serde_json::json!({"owner": "C"})).unwrap();
        assert_eq!(params.namespace, "");

        let params: ContextParams =
            serde_json::from_value(serde_json::json!({"name": "C", "package": "p"})).unwrap();
        assert_eq!(params.namespace, "p");
        assert_eq!(params.depth, None);
    }
}
