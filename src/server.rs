use std::{future::Future, net::SocketAddr, str::FromStr, sync::Arc};

use axum::{
    Extension, Router,
    routing::{get, post},
};
use tokio::{net::TcpListener, sync::Mutex};

use crate::{
    api,
    error::{Res, SpotifyError},
    management::TokenManager,
    tools::ToolSet,
};

pub fn router(session: Arc<Mutex<TokenManager>>, tools: Arc<ToolSet>) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/callback", get(api::callback))
        .route("/mcp", post(api::mcp))
        .layer(Extension(session))
        .layer(Extension(tools))
}

pub async fn bind(addr: &str) -> Res<TcpListener> {
    let addr = SocketAddr::from_str(addr)
        .map_err(|e| SpotifyError::Config(format!("invalid server address {addr}: {e}")))?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");
    Ok(listener)
}

/// Serves `app` until `shutdown` resolves, then lets in-flight requests finish.
pub async fn start_api_server<F>(listener: TcpListener, app: Router, shutdown: F) -> Res<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

/// Resolves on Ctrl-C.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "cannot listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
