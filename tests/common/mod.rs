#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Value, json};
use spotify_mcp::{
    account::AccountClient,
    error::{Res, SpotifyError},
    spotify::{PlaybackRequest, SpotifyApi},
    tools::ToolSet,
};

pub const TRACK_ID: &str = "4iV5W9uYEdYUVa79Axb7Rh";
pub const ALBUM_ID: &str = "1A2GTWGtFfWp7KSQTwWOyo";
pub const PLAYLIST_ID: &str = "37i9dQZF1DXcBWIGoYBM5M";

/// Recording stand-in for the Spotify Web API.
pub struct FakeApi {
    pub calls: Mutex<Vec<String>>,
    pub playback_requests: Mutex<Vec<PlaybackRequest>>,
    pub queued: Mutex<Vec<(String, Option<String>)>>,
    pub searches: Mutex<Vec<(String, String, u32)>>,
    pub token_valid: bool,
    pub refresh_fails: bool,
    pub user: Value,
    pub devices: Value,
    pub devices_fail: bool,
    pub currently_playing: Option<Value>,
    pub playback: Option<Value>,
    pub search_result: Option<Value>,
    pub album: Value,
    pub service_error: Option<(u16, String)>,
}

impl Default for FakeApi {
    fn default() -> Self {
        FakeApi {
            calls: Mutex::new(Vec::new()),
            playback_requests: Mutex::new(Vec::new()),
            queued: Mutex::new(Vec::new()),
            searches: Mutex::new(Vec::new()),
            token_valid: true,
            refresh_fails: false,
            user: json!({ "display_name": "tester", "id": "tester-id" }),
            devices: json!({
                "devices": [
                    { "id": "dev-1", "name": "Laptop", "is_active": true, "type": "Computer", "volume_percent": 50 }
                ]
            }),
            devices_fail: false,
            currently_playing: None,
            playback: None,
            search_result: None,
            album: json!({}),
            service_error: None,
        }
    }
}

impl FakeApi {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, name: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == name).count()
    }

    /// Calls other than the session checks every operation runs first.
    pub fn endpoint_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| !matches!(c.as_str(), "token_valid" | "refresh_token" | "devices"))
            .collect()
    }

    fn record(&self, name: &str) {
        self.calls.lock().unwrap().push(name.to_string());
    }

    fn fail_if_configured(&self) -> Res<()> {
        match &self.service_error {
            Some((status, message)) => Err(SpotifyError::Service {
                status: *status,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

pub fn playing_track(is_playing: bool) -> Value {
    json!({
        "currently_playing_type": "track",
        "is_playing": is_playing,
        "item": {
            "name": "Song",
            "id": TRACK_ID,
            "artists": [{ "name": "Band", "id": "a1" }],
        }
    })
}

pub fn client(api: FakeApi) -> (Arc<FakeApi>, AccountClient) {
    let api = Arc::new(api);
    let client = AccountClient::new(api.clone());
    (api, client)
}

pub fn tool_set(api: FakeApi) -> (Arc<FakeApi>, ToolSet) {
    let (api, client) = client(api);
    (api, ToolSet::new(Arc::new(client)))
}

#[async_trait]
impl SpotifyApi for FakeApi {
    async fn token_valid(&self) -> bool {
        self.record("token_valid");
        self.token_valid
    }

    async fn refresh_token(&self) -> Res<()> {
        self.record("refresh_token");
        if self.refresh_fails {
            return Err(SpotifyError::NotAuthenticated("refresh rejected".into()));
        }
        Ok(())
    }

    async fn current_user(&self) -> Res<Value> {
        self.record("current_user");
        Ok(self.user.clone())
    }

    async fn search(&self, query: &str, kinds: &str, limit: u32) -> Res<Option<Value>> {
        self.record("search");
        self.searches
            .lock()
            .unwrap()
            .push((query.to_string(), kinds.to_string(), limit));
        self.fail_if_configured()?;
        Ok(self.search_result.clone())
    }

    async fn recommendations(
        &self,
        _seed_artists: &[String],
        _seed_tracks: &[String],
        _limit: u32,
    ) -> Res<Value> {
        self.record("recommendations");
        Ok(json!({ "tracks": [{ "name": "Rec", "id": "r1" }] }))
    }

    async fn track(&self, id: &str) -> Res<Value> {
        self.record("track");
        Ok(json!({ "name": "Song", "id": id, "duration_ms": 225000 }))
    }

    async fn album(&self, _id: &str) -> Res<Value> {
        self.record("album");
        Ok(self.album.clone())
    }

    async fn artist(&self, id: &str) -> Res<Value> {
        self.record("artist");
        Ok(json!({ "name": "Band", "id": id, "followers": { "total": 10 } }))
    }

    async fn artist_albums(&self, _id: &str) -> Res<Value> {
        self.record("artist_albums");
        Ok(json!({ "items": [{ "name": "Record", "id": "al1" }] }))
    }

    async fn artist_top_tracks(&self, _id: &str) -> Res<Value> {
        self.record("artist_top_tracks");
        Ok(json!({ "tracks": [{ "name": "Hit", "id": "t1" }] }))
    }

    async fn playlist(&self, id: &str) -> Res<Option<Value>> {
        self.record("playlist");
        Ok(Some(json!({
            "name": "Mix",
            "id": id,
            "owner": { "display_name": "tester" },
            "tracks": {
                "total": 2,
                "items": [
                    { "track": { "name": "One", "id": "t1" } },
                    { "track": null },
                ]
            }
        })))
    }

    async fn currently_playing(&self) -> Res<Option<Value>> {
        self.record("currently_playing");
        Ok(self.currently_playing.clone())
    }

    async fn current_playback(&self) -> Res<Option<Value>> {
        self.record("current_playback");
        Ok(self.playback.clone())
    }

    async fn start_playback(&self, request: PlaybackRequest) -> Res<()> {
        self.record("start_playback");
        self.fail_if_configured()?;
        self.playback_requests.lock().unwrap().push(request);
        Ok(())
    }

    async fn pause_playback(&self, _device_id: Option<&str>) -> Res<()> {
        self.record("pause_playback");
        Ok(())
    }

    async fn next_track(&self, _device_id: Option<&str>) -> Res<()> {
        self.record("next_track");
        Ok(())
    }

    async fn previous_track(&self, _device_id: Option<&str>) -> Res<()> {
        self.record("previous_track");
        Ok(())
    }

    async fn seek(&self, _position_ms: u64, _device_id: Option<&str>) -> Res<()> {
        self.record("seek");
        Ok(())
    }

    async fn set_volume(&self, _volume_percent: u8, _device_id: Option<&str>) -> Res<()> {
        self.record("set_volume");
        Ok(())
    }

    async fn add_to_queue(&self, uri: &str, device_id: Option<&str>) -> Res<()> {
        self.record("add_to_queue");
        self.queued
            .lock()
            .unwrap()
            .push((uri.to_string(), device_id.map(str::to_string)));
        Ok(())
    }

    async fn queue(&self) -> Res<Value> {
        self.record("queue");
        Ok(json!({ "queue": [{ "name": "Next", "id": "n1" }, null] }))
    }

    async fn current_user_playlists(&self, _limit: u32) -> Res<Option<Value>> {
        self.record("current_user_playlists");
        Ok(Some(json!({
            "items": [{
                "name": "Mine",
                "id": PLAYLIST_ID,
                "owner": { "display_name": "tester" },
                "tracks": { "total": 3 }
            }]
        })))
    }

    async fn playlist_add_items(
        &self,
        _playlist_id: &str,
        _items: &[String],
        _position: Option<u32>,
    ) -> Res<()> {
        self.record("playlist_add_items");
        self.fail_if_configured()
    }

    async fn playlist_remove_items(&self, _playlist_id: &str, _items: &[String]) -> Res<()> {
        self.record("playlist_remove_items");
        self.fail_if_configured()
    }

    async fn playlist_change_details(
        &self,
        _playlist_id: &str,
        _name: Option<&str>,
        _description: Option<&str>,
    ) -> Res<()> {
        self.record("playlist_change_details");
        self.fail_if_configured()
    }

    async fn devices(&self) -> Res<Value> {
        self.record("devices");
        if self.devices_fail {
            return Err(SpotifyError::Service {
                status: 503,
                message: "unavailable".into(),
            });
        }
        Ok(self.devices.clone())
    }

    async fn saved_tracks(&self, _limit: u32) -> Res<Value> {
        self.record("saved_tracks");
        Ok(json!({ "items": [{ "added_at": "2024-01-01", "track": { "name": "Fav", "id": "f1" } }] }))
    }
}
