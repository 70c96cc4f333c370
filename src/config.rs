//! Configuration management.
//!
//! Values come from the process environment, optionally seeded from `.env`
//! files. Lookup order, highest priority first:
//! 1. Environment variables
//! 2. `.env` in the working directory
//! 3. `.env` in the local data directory (`<data_local_dir>/spotify-mcp/.env`)
//! 4. Built-in defaults (optional keys only)
//!
//! Required keys: `SPOTIFY_CLIENT_ID`, `SPOTIFY_CLIENT_SECRET`,
//! `SPOTIFY_REDIRECT_URI`.

use std::{env, path::PathBuf};

use crate::{
    error::{Res, SpotifyError},
    logging::LogFormat,
    spotify::auth::{OAuthConfig, SCOPES},
    utils,
};

pub const APP_DIR: &str = "spotify-mcp";

const DEFAULT_SERVER_ADDRESS: &str = "0.0.0.0:8080";
const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

/// Platform data directory of the application, e.g.
/// `~/.local/share/spotify-mcp` on Linux.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(APP_DIR);
    path
}

/// Loads `.env` files. Missing files are skipped; already set variables are
/// never overwritten.
pub async fn load_env() -> Res<()> {
    let dir = data_dir();
    async_fs::create_dir_all(&dir).await?;

    let data_env = dir.join(".env");
    match dotenv::from_path(&data_env) {
        Ok(()) => tracing::debug!(path = %data_env.display(), "loaded environment file"),
        Err(e) if e.not_found() => {}
        Err(e) => {
            return Err(SpotifyError::Config(format!(
                "cannot read {}: {e}",
                data_env.display()
            )));
        }
    }

    match dotenv::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded environment file"),
        Err(e) if e.not_found() => {}
        Err(e) => return Err(SpotifyError::Config(format!("cannot read .env: {e}"))),
    }

    Ok(())
}

fn required(key: &str) -> Res<String> {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| SpotifyError::Config(format!("{key} must be set")))
}

fn optional(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Address the HTTP server binds to.
pub fn server_addr() -> String {
    optional("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS)
}

pub fn spotify_api_url() -> String {
    optional("SPOTIFY_API_URL", DEFAULT_API_URL)
}

pub fn spotify_client_id() -> Res<String> {
    required("SPOTIFY_CLIENT_ID")
}

pub fn spotify_client_secret() -> Res<String> {
    required("SPOTIFY_CLIENT_SECRET")
}

/// The redirect URI with `localhost` rewritten to `127.0.0.1`, which is what
/// Spotify accepts for loopback redirects.
pub fn spotify_redirect_uri() -> Res<String> {
    required("SPOTIFY_REDIRECT_URI").map(|uri| utils::normalize_callback_host(&uri))
}

pub fn token_cache_path() -> PathBuf {
    env::var("SPOTIFY_TOKEN_CACHE")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| data_dir().join("cache").join("token.json"))
}

/// Unknown values fall back to the pretty format.
pub fn log_format() -> LogFormat {
    optional("SPOTIFY_MCP_LOG_FORMAT", "pretty")
        .parse()
        .unwrap_or_default()
}

/// OAuth settings assembled from the environment.
pub fn oauth() -> Res<OAuthConfig> {
    Ok(OAuthConfig {
        client_id: spotify_client_id()?,
        client_secret: spotify_client_secret()?,
        redirect_uri: spotify_redirect_uri()?,
        scope: SCOPES.join(" "),
        auth_url: optional("SPOTIFY_API_AUTH_URL", DEFAULT_AUTH_URL),
        token_url: optional("SPOTIFY_API_TOKEN_URL", DEFAULT_TOKEN_URL),
    })
}
