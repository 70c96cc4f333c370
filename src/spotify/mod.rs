//! # Spotify Integration Module
//!
//! The transport layer between the account facade and the Spotify Web API.
//!
//! ```text
//! Tool surface
//!      ↓
//! AccountClient (normalizers, guards)
//!      ↓
//! SpotifyApi trait  ← implemented by SpotifyClient (reqwest) or test fakes
//!      ↓
//! Spotify Web API
//! ```
//!
//! - [`auth`] - OAuth 2.0 authorization-code flow: authorize URL, code exchange, refresh
//! - [`client`] - [`client::SpotifyClient`], the reqwest implementation of [`SpotifyApi`]
//!
//! Every endpoint method returns the raw JSON payload; shaping it is the job of
//! [`crate::normalize`].

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Res;

pub mod auth;
pub mod client;

/// Parameters of a start/resume playback request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaybackRequest {
    pub device_id: Option<String>,
    pub context_uri: Option<String>,
    pub uris: Option<Vec<String>>,
}

/// One async method per Spotify endpoint used by the facade.
///
/// Methods returning `Option<Value>` map an empty (204) response to `None`.
#[async_trait]
pub trait SpotifyApi: Send + Sync {
    /// Whether the cached token is present and not expired.
    async fn token_valid(&self) -> bool;

    /// Exchanges the stored refresh token for a new access token.
    async fn refresh_token(&self) -> Res<()>;

    async fn current_user(&self) -> Res<Value>;

    async fn search(&self, query: &str, kinds: &str, limit: u32) -> Res<Option<Value>>;

    async fn recommendations(
        &self,
        seed_artists: &[String],
        seed_tracks: &[String],
        limit: u32,
    ) -> Res<Value>;

    async fn track(&self, id: &str) -> Res<Value>;

    async fn album(&self, id: &str) -> Res<Value>;

    async fn artist(&self, id: &str) -> Res<Value>;

    async fn artist_albums(&self, id: &str) -> Res<Value>;

    async fn artist_top_tracks(&self, id: &str) -> Res<Value>;

    async fn playlist(&self, id: &str) -> Res<Option<Value>>;

    async fn currently_playing(&self) -> Res<Option<Value>>;

    async fn current_playback(&self) -> Res<Option<Value>>;

    async fn start_playback(&self, request: PlaybackRequest) -> Res<()>;

    async fn pause_playback(&self, device_id: Option<&str>) -> Res<()>;

    async fn next_track(&self, device_id: Option<&str>) -> Res<()>;

    async fn previous_track(&self, device_id: Option<&str>) -> Res<()>;

    async fn seek(&self, position_ms: u64, device_id: Option<&str>) -> Res<()>;

    async fn set_volume(&self, volume_percent: u8, device_id: Option<&str>) -> Res<()>;

    async fn add_to_queue(&self, uri: &str, device_id: Option<&str>) -> Res<()>;

    async fn queue(&self) -> Res<Value>;

    async fn current_user_playlists(&self, limit: u32) -> Res<Option<Value>>;

    async fn playlist_add_items(
        &self,
        playlist_id: &str,
        items: &[String],
        position: Option<u32>,
    ) -> Res<()>;

    async fn playlist_remove_items(&self, playlist_id: &str, items: &[String]) -> Res<()>;

    async fn playlist_change_details(
        &self,
        playlist_id: &str,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Res<()>;

    async fn devices(&self) -> Res<Value>;

    async fn saved_tracks(&self, limit: u32) -> Res<Value>;
}
