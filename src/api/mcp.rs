//! JSON-RPC 2.0 endpoint speaking the tool protocol agents use to discover and
//! call tools.
//!
//! Supported requests: `initialize`, `tools/list`, `tools/call` and `ping`.
//! Notifications (messages without an `id`) are acknowledged with
//! `202 Accepted` and no body.

use std::sync::Arc;

use axum::{
    Extension,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::tools::{ToolOutput, ToolSet};

pub const PROTOCOL_VERSION: &str = "2025-03-26";
pub const SERVER_NAME: &str = "spotify-mcp";

const JSONRPC_VERSION: &str = "2.0";

/// Standard JSON-RPC error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    ParseError = -32700,
    InvalidRequest = -32600,
    MethodNotFound = -32601,
    InvalidParams = -32602,
}

#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    #[serde(default)]
    pub jsonrpc: Option<String>,
    #[serde(default)]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: &'static str,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        JsonRpcResponse {
            jsonrpc: JSONRPC_VERSION,
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: Value, code: ErrorCode, message: impl Into<String>) -> Self {
        JsonRpcResponse {
            jsonrpc: JSONRPC_VERSION,
            id,
            result: None,
            error: Some(JsonRpcError {
                code: code as i32,
                message: message.into(),
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ToolCallParams {
    name: String,
    #[serde(default)]
    arguments: Value,
}

/// `{"content": [{"type": "text", "text": ...}], "isError": ...}`
pub fn tool_result(output: &ToolOutput) -> Value {
    json!({
        "content": [{ "type": "text", "text": output.text }],
        "isError": output.is_error,
    })
}

pub async fn mcp(Extension(tools): Extension<Arc<ToolSet>>, body: String) -> Response {
    let message: Value = match serde_json::from_str(&body) {
        Ok(message) => message,
        Err(e) => {
            tracing::warn!(error = %e, "malformed JSON-RPC message");
            let response =
                JsonRpcResponse::error(Value::Null, ErrorCode::ParseError, format!("Parse error: {e}"));
            return Json(response).into_response();
        }
    };

    let request: JsonRpcRequest = match serde_json::from_value(message) {
        Ok(request) => request,
        Err(e) => {
            let response = JsonRpcResponse::error(
                Value::Null,
                ErrorCode::InvalidRequest,
                format!("Invalid request: {e}"),
            );
            return Json(response).into_response();
        }
    };

    if request
        .jsonrpc
        .as_deref()
        .is_some_and(|v| v != JSONRPC_VERSION)
    {
        tracing::debug!(jsonrpc = ?request.jsonrpc, "unexpected JSON-RPC version");
    }

    let Some(id) = request.id.clone() else {
        tracing::debug!(method = %request.method, "notification received");
        return StatusCode::ACCEPTED.into_response();
    };

    Json(dispatch(&tools, id, request).await).into_response()
}

pub async fn dispatch(tools: &ToolSet, id: Value, request: JsonRpcRequest) -> JsonRpcResponse {
    match request.method.as_str() {
        "initialize" => JsonRpcResponse::success(
            id,
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": { "tools": { "listChanged": false } },
                "serverInfo": {
                    "name": SERVER_NAME,
                    "version": env!("CARGO_PKG_VERSION"),
                },
            }),
        ),
        "tools/list" => JsonRpcResponse::success(id, json!({ "tools": tools.definitions() })),
        "tools/call" => {
            let params = request
                .params
                .ok_or_else(|| "Missing tool call params".to_string())
                .and_then(|p| {
                    serde_json::from_value::<ToolCallParams>(p)
                        .map_err(|e| format!("Invalid tool call params: {e}"))
                });

            match params {
                Ok(params) => {
                    tracing::info!(tool = %params.name, "tool call");
                    let output = tools.call(&params.name, params.arguments).await;
                    JsonRpcResponse::success(id, tool_result(&output))
                }
                Err(message) => JsonRpcResponse::error(id, ErrorCode::InvalidParams, message),
            }
        }
        "ping" => JsonRpcResponse::success(id, json!({})),
        other => JsonRpcResponse::error(
            id,
            ErrorCode::MethodNotFound,
            format!("Method not found: {other}"),
        ),
    }
}
