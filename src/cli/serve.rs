use std::sync::Arc;

use crate::{
    cli::{App, auth::authorize},
    config,
    error::Res,
    info, server, success, warning,
};

/// Starts the HTTP server, makes sure a verified token exists, then serves
/// until Ctrl-C. The token is written back to the cache on shutdown.
pub async fn serve() -> Res<()> {
    let app = App::bootstrap().await?;
    let addr = config::server_addr();
    let listener = server::bind(&addr).await?;
    let router = server::router(Arc::clone(&app.session), Arc::clone(&app.tools));

    let server_task = tokio::spawn(server::start_api_server(
        listener,
        router,
        server::shutdown_signal(),
    ));

    if !app.session.lock().await.has_token() {
        info!("No cached token found, starting authorization");
        if let Err(e) = authorize(&app.session).await {
            server_task.abort();
            return Err(e);
        }
    }

    match app.client.ensure_username().await {
        Ok(username) => success!("Authenticated as {}", username),
        Err(e) => {
            server_task.abort();
            return Err(e);
        }
    }

    info!("Serving tools on http://{}/mcp", addr);
    let served = match server_task.await {
        Ok(result) => result,
        Err(e) => {
            warning!("Server task ended unexpectedly: {}", e);
            Ok(())
        }
    };

    if let Err(e) = app.session.lock().await.persist().await {
        warning!("Failed to save token to cache: {}", e);
    }
    served
}
