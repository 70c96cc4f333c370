use std::{collections::HashMap, sync::Arc};

use axum::{Extension, extract::Query, http::StatusCode, response::Json};
use serde_json::{Value, json};
use tokio::sync::Mutex;

use crate::management::TokenManager;

/// Completes the authorization-code flow: exchanges `code` for a token and
/// stores it in the shared session.
pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(session): Extension<Arc<Mutex<TokenManager>>>,
) -> (StatusCode, Json<Value>) {
    let Some(code) = params.get("code").filter(|c| !c.is_empty()) else {
        tracing::error!("no code provided in callback");
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "detail": "No code provided" })),
        );
    };

    tracing::info!("received OAuth callback");

    let mut session = session.lock().await;
    let exchanged = session.oauth().exchange_code(code).await;
    let result = match exchanged {
        Ok(token) => session.store(token).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => {
            tracing::info!("OAuth callback handled");
            (
                StatusCode::OK,
                Json(json!({ "status": "Authentication successful" })),
            )
        }
        Err(e) => {
            tracing::error!(error = %e, error_kind = e.kind(), "error in OAuth callback");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "detail": e.to_string() })),
            )
        }
    }
}
