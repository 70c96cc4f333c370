use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::{Mutex, oneshot};

use crate::{
    cli::App,
    config,
    error::{Res, SpotifyError},
    management::TokenManager,
    server, success, warning,
};

const AUTH_TIMEOUT: Duration = Duration::from_secs(120);
const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Runs the OAuth flow on its own: starts the callback server, waits for the
/// token, verifies it and exits.
pub async fn auth() -> Res<()> {
    let app = App::bootstrap().await?;
    let listener = server::bind(&config::server_addr()).await?;
    let router = server::router(Arc::clone(&app.session), Arc::clone(&app.tools));

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let server_task = tokio::spawn(server::start_api_server(listener, router, async move {
        let _ = stop_rx.await;
    }));

    let result = authorize(&app.session).await;
    let _ = stop_tx.send(());
    if let Err(e) = server_task.await {
        warning!("Callback server did not stop cleanly: {}", e);
    }
    result?;

    let username = app.client.ensure_username().await?;
    success!("Authenticated as {}", username);
    Ok(())
}

/// Opens the authorize URL and waits (bounded) for `/callback` to store a
/// token in `session`.
pub(crate) async fn authorize(session: &Arc<Mutex<TokenManager>>) -> Res<()> {
    let auth_url = session.lock().await.oauth().authorize_url()?;

    println!("\nSpotify setup:");
    println!("1. Open this URL in your browser to authenticate:");
    println!("   {auth_url}");
    println!("2. After authenticating you will be redirected to the callback URL");
    println!("3. The server is ready to handle requests once the token arrives\n");

    if webbrowser::open(&auth_url).is_err() {
        warning!("Failed to open browser. Please navigate to the URL above manually.");
    }

    if wait_for_token(session).await {
        success!("Authentication successful!");
        Ok(())
    } else {
        Err(SpotifyError::NotAuthenticated(
            "authentication failed or timed out".into(),
        ))
    }
}

async fn wait_for_token(session: &Arc<Mutex<TokenManager>>) -> bool {
    let pb = ProgressBar::new_spinner();
    pb.set_message("Waiting for Spotify authorization...");
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }

    let start = Instant::now();
    while start.elapsed() < AUTH_TIMEOUT {
        if session.lock().await.has_token() {
            pb.finish_and_clear();
            return true;
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }

    pb.finish_and_clear();
    false
}
