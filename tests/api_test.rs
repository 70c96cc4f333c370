mod common;

use std::{collections::HashMap, sync::Arc};

use axum::{
    Extension,
    extract::Query,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use common::{FakeApi, tool_set};
use serde_json::{Value, json};
use spotify_mcp::{
    api::{self, mcp::JsonRpcRequest},
    management::TokenManager,
    spotify::auth::OAuthConfig,
};
use tokio::sync::Mutex;

fn oauth() -> OAuthConfig {
    OAuthConfig {
        client_id: "id".into(),
        client_secret: "secret".into(),
        redirect_uri: "http://127.0.0.1:8080/callback".into(),
        scope: "user-read-playback-state".into(),
        auth_url: "https://accounts.spotify.com/authorize".into(),
        token_url: "http://127.0.0.1:9/api/token".into(),
    }
}

fn request(method: &str, params: Option<Value>) -> JsonRpcRequest {
    JsonRpcRequest {
        jsonrpc: Some("2.0".into()),
        id: Some(json!(1)),
        method: method.into(),
        params,
    }
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_callback_without_code_is_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    let session = Arc::new(Mutex::new(TokenManager::new(
        oauth(),
        dir.path().join("token.json"),
    )));

    let (status, Json(body)) =
        api::callback(Query(HashMap::new()), Extension(session.clone())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "detail": "No code provided" }));
    assert!(!session.lock().await.has_token());
}

#[tokio::test]
async fn test_health_reports_version() {
    let Json(body) = api::health().await;

    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_initialize_advertises_tools() {
    let (_api, tools) = tool_set(FakeApi::default());

    let response = api::mcp::dispatch(&tools, json!(1), request("initialize", Some(json!({})))).await;
    let response = serde_json::to_value(&response).unwrap();

    assert_eq!(response["jsonrpc"], "2.0");
    assert_eq!(response["id"], 1);
    assert_eq!(response["result"]["protocolVersion"], api::mcp::PROTOCOL_VERSION);
    assert!(response["result"]["capabilities"]["tools"].is_object());
    assert_eq!(response["result"]["serverInfo"]["name"], "spotify-mcp");
}

#[tokio::test]
async fn test_tools_list() {
    let (_api, tools) = tool_set(FakeApi::default());

    let response = api::mcp::dispatch(&tools, json!(2), request("tools/list", None)).await;
    let response = serde_json::to_value(&response).unwrap();

    let listed = response["result"]["tools"].as_array().unwrap();
    assert_eq!(listed.len(), 8);
    assert!(listed[0]["inputSchema"].is_object());
}

#[tokio::test]
async fn test_tools_call_wraps_text_content() {
    let (_api, tools) = tool_set(FakeApi::default());

    let params = json!({ "name": "SpotifyQueue", "arguments": { "action": "add" } });
    let response = api::mcp::dispatch(&tools, json!(3), request("tools/call", Some(params))).await;
    let response = serde_json::to_value(&response).unwrap();

    assert_eq!(response["result"]["isError"], true);
    assert_eq!(response["result"]["content"][0]["type"], "text");
    assert_eq!(
        response["result"]["content"][0]["text"],
        "track_id is required for add action"
    );
}

#[tokio::test]
async fn test_rpc_errors() {
    let (_api, tools) = tool_set(FakeApi::default());

    let response = api::mcp::dispatch(&tools, json!(4), request("resources/list", None)).await;
    let response = serde_json::to_value(&response).unwrap();
    assert_eq!(response["error"]["code"], -32601);

    let response = api::mcp::dispatch(&tools, json!(5), request("tools/call", None)).await;
    let response = serde_json::to_value(&response).unwrap();
    assert_eq!(response["error"]["code"], -32602);
}

#[tokio::test]
async fn test_endpoint_parse_error_and_notification() {
    let (_api, tools) = tool_set(FakeApi::default());
    let tools = Arc::new(tools);

    let response = api::mcp(Extension(tools.clone()), "{not json".to_string())
        .await
        .into_response();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["error"]["code"], -32700);

    let notification = json!({ "jsonrpc": "2.0", "method": "notifications/initialized" });
    let response = api::mcp(Extension(tools.clone()), notification.to_string())
        .await
        .into_response();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let ping = json!({ "jsonrpc": "2.0", "id": "p", "method": "ping" });
    let response = api::mcp(Extension(tools), ping.to_string()).await;
    let body = body_json(response).await;
    assert_eq!(body["id"], "p");
    assert_eq!(body["result"], json!({}));
}

#[tokio::test]
async fn test_endpoint_rejects_request_without_method() {
    let (_api, tools) = tool_set(FakeApi::default());

    let response = api::mcp(Extension(Arc::new(tools)), json!({ "id": 9 }).to_string()).await;

    let body = body_json(response).await;
    assert_eq!(body["id"], Value::Null);
    assert_eq!(body["error"]["code"], -32600);
}
