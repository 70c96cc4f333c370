//! The account facade: one method per capability exposed to agents.
//!
//! Each method delegates to a [`SpotifyApi`] transport, runs the raw payload
//! through [`crate::normalize`] and applies the session checks of
//! [`guard::Guard`] where the operation needs a playback device.

use std::sync::Arc;

use serde_json::{Value, json};
use tokio::sync::RwLock;

use crate::{
    error::{Res, SpotifyError},
    normalize,
    spotify::{PlaybackRequest, SpotifyApi},
    types::{Device, ItemKind, SearchKind},
    utils::{self, SpotifyUri},
};

pub mod guard;

pub use guard::Guard;

pub struct AccountClient {
    api: Arc<dyn SpotifyApi>,
    username: RwLock<Option<String>>,
}

fn device_id(device: &Option<Device>) -> Option<&str> {
    device.as_ref().and_then(|d| d.id.as_deref())
}

fn items_of<'a>(value: &'a Value, pointer: &str) -> &'a [Value] {
    value
        .pointer(pointer)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn is_empty_payload(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(obj) => obj.is_empty(),
        _ => false,
    }
}

impl AccountClient {
    pub fn new(api: Arc<dyn SpotifyApi>) -> Self {
        AccountClient {
            api,
            username: RwLock::new(None),
        }
    }

    fn guard(&self) -> Guard<'_> {
        Guard::new(self.api.as_ref())
    }

    /// Resolves the current user's display name once per client.
    pub async fn ensure_username(&self) -> Res<String> {
        if let Some(username) = self.username.read().await.as_ref() {
            return Ok(username.clone());
        }

        self.guard().ensure_fresh_token().await;
        let user = self.api.current_user().await?;
        let username = user["display_name"]
            .as_str()
            .or_else(|| user["id"].as_str())
            .unwrap_or_default()
            .to_string();

        *self.username.write().await = Some(username.clone());
        Ok(username)
    }

    pub async fn username(&self) -> Option<String> {
        self.username.read().await.clone()
    }

    /// The playing track with `is_playing` folded in; `None` when nothing
    /// plays or the item is not a track (e.g. a podcast episode).
    pub async fn current_track(&self) -> Res<Option<Value>> {
        let Some(current) = self.api.currently_playing().await? else {
            tracing::info!("no playback session found");
            return Ok(None);
        };

        let playing_type = current["currently_playing_type"].as_str();
        if playing_type != Some("track") {
            tracing::info!(
                currently_playing_type = playing_type.unwrap_or("unknown"),
                "current playback is not a track"
            );
            return Ok(None);
        }

        let Some(mut track) = normalize::parse_track(&current["item"], false) else {
            return Ok(None);
        };
        if let Some(is_playing) = current.get("is_playing") {
            track["is_playing"] = is_playing.clone();
        }

        tracing::info!(
            track_name = track["name"].as_str().unwrap_or("Unknown"),
            is_playing = track["is_playing"].as_bool().unwrap_or(false),
            "current track retrieved"
        );
        Ok(Some(track))
    }

    pub async fn is_track_playing(&self) -> Res<bool> {
        Ok(self
            .current_track()
            .await?
            .and_then(|t| t["is_playing"].as_bool())
            .unwrap_or(false))
    }

    /// Plays `uri` (tracks directly, anything else as a context) or resumes
    /// the current playback when `uri` is `None`.
    pub async fn start_playback(&self, uri: Option<&str>) -> Res<()> {
        let uri = uri.filter(|u| !u.is_empty());

        self.guard()
            .run("start_playback", |device| async move {
                if uri.is_none() {
                    if self.is_track_playing().await? {
                        tracing::info!("no uri provided and playback already active");
                        return Ok(());
                    }
                    if self.current_track().await?.is_none() {
                        return Err(SpotifyError::NoResumableState);
                    }
                }

                let mut request = PlaybackRequest {
                    device_id: device_id(&device).map(str::to_string),
                    ..Default::default()
                };
                match uri {
                    Some(uri) if uri.starts_with("spotify:track:") => {
                        request.uris = Some(vec![uri.to_string()]);
                    }
                    Some(uri) => request.context_uri = Some(uri.to_string()),
                    None => {}
                }

                tracing::info!(
                    context_uri = ?request.context_uri,
                    uris = ?request.uris,
                    device_id = ?request.device_id,
                    "starting playback"
                );
                self.api.start_playback(request).await
            })
            .await
    }

    /// Pauses only when something is actually playing.
    pub async fn pause_playback(&self) -> Res<()> {
        self.guard()
            .run("pause_playback", |device| async move {
                let playback = self.api.current_playback().await?;
                let playing = playback
                    .as_ref()
                    .and_then(|p| p["is_playing"].as_bool())
                    .unwrap_or(false);
                if playing {
                    self.api.pause_playback(device_id(&device)).await?;
                }
                Ok(())
            })
            .await
    }

    /// Advances `n` tracks one call at a time. A failure part way leaves the
    /// earlier skips in place.
    pub async fn skip_track(&self, n: u32) -> Res<()> {
        self.guard()
            .run("skip_track", |device| async move {
                for _ in 0..n {
                    self.api.next_track(device_id(&device)).await?;
                }
                Ok(())
            })
            .await
    }

    pub async fn previous_track(&self) -> Res<()> {
        self.guard()
            .run("previous_track", |device| async move {
                self.api.previous_track(device_id(&device)).await
            })
            .await
    }

    pub async fn seek(&self, position_ms: u64) -> Res<()> {
        self.guard()
            .run("seek", |device| async move {
                self.api.seek(position_ms, device_id(&device)).await
            })
            .await
    }

    pub async fn set_volume(&self, volume_percent: u32) -> Res<()> {
        let volume = u8::try_from(volume_percent)
            .ok()
            .filter(|v| *v <= 100)
            .ok_or_else(|| {
                SpotifyError::InvalidParameter("volume_percent must be between 0 and 100".into())
            })?;

        self.guard()
            .run("set_volume", |device| async move {
                self.api.set_volume(volume, device_id(&device)).await
            })
            .await
    }

    /// Queues a track id, a track URI, or every track of an album URI in
    /// album order.
    pub async fn add_to_queue(&self, track_id: &str) -> Res<()> {
        if track_id.is_empty() {
            return Err(SpotifyError::MissingParameter(
                "track_id is required for add action".into(),
            ));
        }

        let uri = if !track_id.starts_with("spotify:") && !track_id.contains(':') {
            utils::build_uri(ItemKind::Track.as_str(), track_id)
        } else {
            track_id.to_string()
        };

        self.guard()
            .run("add_to_queue", |device| async move {
                tracing::info!(uri = %uri, "adding to queue");

                if uri.starts_with("spotify:album:") {
                    let album = self.item_info(&uri).await?;
                    for track in items_of(&album, "/tracks") {
                        if let Some(id) = track["id"].as_str() {
                            let track_uri = utils::build_uri(ItemKind::Track.as_str(), id);
                            self.api.add_to_queue(&track_uri, device_id(&device)).await?;
                        }
                    }
                    return Ok(());
                }

                self.api.add_to_queue(&uri, device_id(&device)).await
            })
            .await
    }

    /// `{"currently_playing": <track or null>, "queue": [<track>, ...]}`
    pub async fn queue(&self) -> Res<Value> {
        self.guard()
            .run("queue", |_device| async move {
                let raw = self.api.queue().await?;
                let upcoming: Vec<Value> = items_of(&raw, "/queue")
                    .iter()
                    .filter_map(|t| normalize::parse_track(t, false))
                    .collect();
                let currently_playing = self.current_track().await?;

                Ok(json!({
                    "currently_playing": currently_playing,
                    "queue": upcoming,
                }))
            })
            .await
    }

    pub async fn search(&self, query: &str, qtype: &str, limit: u32) -> Res<Value> {
        let kinds = utils::parse_search_kinds(qtype)?;
        let type_param = kinds
            .iter()
            .map(SearchKind::as_str)
            .collect::<Vec<_>>()
            .join(",");

        self.guard()
            .run("search", |_device| async move {
                let username = self.ensure_username().await?;
                let raw = self.api.search(query, &type_param, limit).await?;
                let raw = raw
                    .filter(|r| !is_empty_payload(r))
                    .ok_or_else(|| SpotifyError::EmptyResult("No search results found.".into()))?;

                Ok(Value::Object(normalize::parse_search_sections(
                    &raw,
                    &kinds,
                    Some(&username),
                )))
            })
            .await
    }

    /// Detailed projection of a track, album, artist or playlist.
    pub async fn item_info(&self, item_uri: &str) -> Res<Value> {
        let uri = SpotifyUri::parse(item_uri)?;
        let id = uri.id.as_str();
        let missing = || SpotifyError::EmptyResult(format!("No information found for {item_uri}."));

        match uri.kind {
            ItemKind::Track => {
                let raw = self.api.track(id).await?;
                normalize::parse_track(&raw, true).ok_or_else(missing)
            }
            ItemKind::Album => {
                let raw = self.api.album(id).await?;
                normalize::parse_album(&raw, true).ok_or_else(missing)
            }
            ItemKind::Artist => {
                let raw = self.api.artist(id).await?;
                let mut info = normalize::parse_artist(&raw, true).ok_or_else(missing)?;

                let albums = self.api.artist_albums(id).await?;
                let top_tracks = self.api.artist_top_tracks(id).await?;
                let combined = json!({
                    "albums": albums,
                    "tracks": { "items": top_tracks["tracks"] },
                });
                let mut parsed = normalize::parse_search_sections(
                    &combined,
                    &[SearchKind::Album, SearchKind::Track],
                    None,
                );

                info["top_tracks"] = parsed.remove("tracks").unwrap_or_else(|| json!([]));
                info["albums"] = parsed.remove("albums").unwrap_or_else(|| json!([]));
                Ok(info)
            }
            ItemKind::Playlist => {
                let username = self.ensure_username().await?;
                let playlist = self
                    .api
                    .playlist(id)
                    .await?
                    .ok_or_else(|| SpotifyError::EmptyResult("No playlist found.".into()))?;
                tracing::info!(
                    playlist_id = id,
                    playlist_name = playlist["name"].as_str().unwrap_or("unknown"),
                    "retrieved playlist info"
                );
                normalize::parse_playlist(&playlist, &username, true).ok_or_else(missing)
            }
            other => Err(SpotifyError::UnsupportedKind(other.to_string())),
        }
    }

    pub async fn playlists(&self, limit: u32) -> Res<Vec<Value>> {
        let username = self.ensure_username().await?;
        let raw = self
            .api
            .current_user_playlists(limit)
            .await?
            .ok_or_else(|| SpotifyError::EmptyResult("No playlists found.".into()))?;

        Ok(items_of(&raw, "/items")
            .iter()
            .filter_map(|p| normalize::parse_playlist(p, &username, false))
            .collect())
    }

    pub async fn playlist_tracks(&self, playlist_id: &str) -> Res<Vec<Value>> {
        if playlist_id.is_empty() {
            return Err(SpotifyError::MissingParameter(
                "playlist_id is required for get_tracks action.".into(),
            ));
        }

        self.ensure_username().await?;
        let playlist = self
            .api
            .playlist(playlist_id)
            .await?
            .ok_or_else(|| SpotifyError::EmptyResult("No playlist found.".into()))?;

        Ok(normalize::parse_tracks_list(items_of(
            &playlist,
            "/tracks/items",
        )))
    }

    pub async fn add_tracks(
        &self,
        playlist_id: &str,
        track_ids: &[String],
        position: Option<u32>,
    ) -> Res<()> {
        if playlist_id.is_empty() || track_ids.is_empty() {
            return Err(SpotifyError::MissingParameter(
                "playlist_id and track_ids are required for add_tracks action.".into(),
            ));
        }

        self.ensure_username().await?;
        self.api
            .playlist_add_items(playlist_id, track_ids, position)
            .await?;
        tracing::info!(playlist_id, track_count = track_ids.len(), "tracks added to playlist");
        Ok(())
    }

    pub async fn remove_tracks(&self, playlist_id: &str, track_ids: &[String]) -> Res<()> {
        if playlist_id.is_empty() || track_ids.is_empty() {
            return Err(SpotifyError::MissingParameter(
                "playlist_id and track_ids are required for remove_tracks action.".into(),
            ));
        }

        self.ensure_username().await?;
        self.api.playlist_remove_items(playlist_id, track_ids).await?;
        tracing::info!(playlist_id, track_count = track_ids.len(), "tracks removed from playlist");
        Ok(())
    }

    pub async fn change_details(
        &self,
        playlist_id: &str,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Res<()> {
        if playlist_id.is_empty() {
            return Err(SpotifyError::MissingParameter(
                "playlist_id is required for change_details action.".into(),
            ));
        }
        let name = name.filter(|n| !n.is_empty());
        let description = description.filter(|d| !d.is_empty());
        if name.is_none() && description.is_none() {
            return Err(SpotifyError::MissingParameter(
                "At least one of name or description is required.".into(),
            ));
        }

        self.ensure_username().await?;
        self.api
            .playlist_change_details(playlist_id, name, description)
            .await?;
        tracing::info!(
            playlist_id,
            changed_name = name.is_some(),
            changed_description = description.is_some(),
            "playlist details changed"
        );
        Ok(())
    }

    /// The raw device list; it is already flat.
    pub async fn devices(&self) -> Res<Vec<Value>> {
        self.guard().ensure_fresh_token().await;
        let raw = self.api.devices().await?;
        Ok(guard::parse_devices(&raw))
    }

    pub async fn recommendations(
        &self,
        seed_artists: &[String],
        seed_tracks: &[String],
        limit: u32,
    ) -> Res<Vec<Value>> {
        if seed_artists.is_empty() && seed_tracks.is_empty() {
            return Err(SpotifyError::MissingParameter(
                "At least one seed artist or track is required".into(),
            ));
        }

        let raw = self
            .api
            .recommendations(seed_artists, seed_tracks, limit)
            .await?;
        Ok(normalize::parse_tracks_list(items_of(&raw, "/tracks")))
    }

    pub async fn liked_songs(&self, limit: u32) -> Res<Vec<Value>> {
        let raw = self.api.saved_tracks(limit).await?;
        Ok(normalize::parse_tracks_list(items_of(&raw, "/items")))
    }
}
