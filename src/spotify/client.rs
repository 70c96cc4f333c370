use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, Method, Response, StatusCode};
use serde_json::{Map, Value, json};
use tokio::{sync::Mutex, time::sleep};

use crate::{
    error::{Res, SpotifyError},
    management::TokenManager,
    spotify::{PlaybackRequest, SpotifyApi},
    utils,
};

const MAX_ATTEMPTS: u32 = 3;
const MAX_RETRY_AFTER_SECS: u64 = 120;
const BAD_GATEWAY_DELAY: Duration = Duration::from_secs(2);
const TOP_TRACKS_MARKET: &str = "US";

type Query = Vec<(&'static str, String)>;

/// reqwest implementation of [`SpotifyApi`] against the Spotify Web API.
#[derive(Clone)]
pub struct SpotifyClient {
    http: Client,
    api_url: String,
    session: Arc<Mutex<TokenManager>>,
}

impl SpotifyClient {
    pub fn new(api_url: impl Into<String>, session: Arc<Mutex<TokenManager>>) -> Self {
        SpotifyClient {
            http: Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            session,
        }
    }

    /// Sends one API request. Rate-limited (429) and bad-gateway (502)
    /// responses are retried a bounded number of times; any other
    /// non-success status becomes [`SpotifyError::Service`].
    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &Query,
        body: Option<Value>,
    ) -> Res<Option<Value>> {
        let url = format!("{}{}", self.api_url, path);
        let mut attempt = 0;

        loop {
            attempt += 1;
            let token = self.session.lock().await.get_valid_token().await?;

            let mut request = self
                .http
                .request(method.clone(), &url)
                .bearer_auth(token)
                .query(query);
            if let Some(body) = &body {
                request = request.json(body);
            } else if method != Method::GET {
                request = request.header(reqwest::header::CONTENT_LENGTH, 0);
            }

            let response = request.send().await?;
            let status = response.status();

            if attempt < MAX_ATTEMPTS && status == StatusCode::TOO_MANY_REQUESTS {
                let retry_after = retry_after_secs(&response);
                if retry_after <= MAX_RETRY_AFTER_SECS {
                    tracing::warn!(path, retry_after, "rate limited, retrying");
                    sleep(Duration::from_secs(retry_after)).await;
                    continue;
                }
                tracing::warn!(
                    path,
                    retry_after,
                    "retry-after is abnormally high, giving up"
                );
            }

            if attempt < MAX_ATTEMPTS && status == StatusCode::BAD_GATEWAY {
                tracing::warn!(path, attempt, "bad gateway, retrying");
                sleep(BAD_GATEWAY_DELAY).await;
                continue;
            }

            if !status.is_success() {
                return Err(service_error(status, response).await);
            }

            let bytes = response.bytes().await?;
            if bytes.is_empty() {
                return Ok(None);
            }
            return match serde_json::from_slice(&bytes) {
                Ok(value) => Ok(Some(value)),
                Err(e) => {
                    tracing::debug!(path, error = %e, "ignoring non-JSON response body");
                    Ok(None)
                }
            };
        }
    }

    async fn get_optional(&self, path: &str, query: Query) -> Res<Option<Value>> {
        self.send(Method::GET, path, &query, None).await
    }

    async fn get(&self, path: &str, query: Query) -> Res<Value> {
        self.get_optional(path, query).await?.ok_or_else(|| {
            SpotifyError::EmptyResult(format!("empty response from {path}"))
        })
    }

    async fn execute(&self, method: Method, path: &str, query: Query, body: Option<Value>) -> Res<()> {
        self.send(method, path, &query, body).await.map(|_| ())
    }
}

fn retry_after_secs(response: &Response) -> u64 {
    response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(1)
}

async fn service_error(status: StatusCode, response: Response) -> SpotifyError {
    let fallback = status
        .canonical_reason()
        .unwrap_or("request failed")
        .to_string();

    let message = match response.json::<Value>().await {
        Ok(json) => json
            .pointer("/error/message")
            .and_then(Value::as_str)
            .or_else(|| json["error_description"].as_str())
            .or_else(|| json["error"].as_str())
            .map(str::to_string)
            .unwrap_or(fallback),
        Err(_) => fallback,
    };

    SpotifyError::Service {
        status: status.as_u16(),
        message,
    }
}

fn device_query(device_id: Option<&str>) -> Query {
    device_id
        .map(|id| vec![("device_id", id.to_string())])
        .unwrap_or_default()
}

/// Accepts bare track ids as well as full identifiers.
fn to_track_uris(items: &[String]) -> Vec<String> {
    items
        .iter()
        .map(|item| {
            if item.starts_with("spotify:") {
                item.clone()
            } else {
                utils::build_uri("track", item)
            }
        })
        .collect()
}

#[async_trait]
impl SpotifyApi for SpotifyClient {
    async fn token_valid(&self) -> bool {
        !self.session.lock().await.is_expired()
    }

    async fn refresh_token(&self) -> Res<()> {
        self.session.lock().await.refresh().await
    }

    async fn current_user(&self) -> Res<Value> {
        self.get("/me", Vec::new()).await
    }

    async fn search(&self, query: &str, kinds: &str, limit: u32) -> Res<Option<Value>> {
        self.get_optional(
            "/search",
            vec![
                ("q", query.to_string()),
                ("type", kinds.to_string()),
                ("limit", limit.to_string()),
            ],
        )
        .await
    }

    async fn recommendations(
        &self,
        seed_artists: &[String],
        seed_tracks: &[String],
        limit: u32,
    ) -> Res<Value> {
        let mut query: Query = vec![("limit", limit.to_string())];
        if !seed_artists.is_empty() {
            query.push(("seed_artists", seed_artists.join(",")));
        }
        if !seed_tracks.is_empty() {
            query.push(("seed_tracks", seed_tracks.join(",")));
        }
        self.get("/recommendations", query).await
    }

    async fn track(&self, id: &str) -> Res<Value> {
        self.get(&format!("/tracks/{id}"), Vec::new()).await
    }

    async fn album(&self, id: &str) -> Res<Value> {
        self.get(&format!("/albums/{id}"), Vec::new()).await
    }

    async fn artist(&self, id: &str) -> Res<Value> {
        self.get(&format!("/artists/{id}"), Vec::new()).await
    }

    async fn artist_albums(&self, id: &str) -> Res<Value> {
        self.get(&format!("/artists/{id}/albums"), Vec::new())
            .await
    }

    async fn artist_top_tracks(&self, id: &str) -> Res<Value> {
        self.get(
            &format!("/artists/{id}/top-tracks"),
            vec![("market", TOP_TRACKS_MARKET.to_string())],
        )
        .await
    }

    async fn playlist(&self, id: &str) -> Res<Option<Value>> {
        self.get_optional(&format!("/playlists/{id}"), Vec::new())
            .await
    }

    async fn currently_playing(&self) -> Res<Option<Value>> {
        self.get_optional("/me/player/currently-playing", Vec::new())
            .await
    }

    async fn current_playback(&self) -> Res<Option<Value>> {
        self.get_optional("/me/player", Vec::new()).await
    }

    async fn start_playback(&self, request: PlaybackRequest) -> Res<()> {
        let mut body = Map::new();
        if let Some(context_uri) = request.context_uri {
            body.insert("context_uri".into(), Value::String(context_uri));
        }
        if let Some(uris) = request.uris {
            body.insert("uris".into(), json!(uris));
        }

        self.execute(
            Method::PUT,
            "/me/player/play",
            device_query(request.device_id.as_deref()),
            Some(Value::Object(body)),
        )
        .await
    }

    async fn pause_playback(&self, device_id: Option<&str>) -> Res<()> {
        self.execute(Method::PUT, "/me/player/pause", device_query(device_id), None)
            .await
    }

    async fn next_track(&self, device_id: Option<&str>) -> Res<()> {
        self.execute(Method::POST, "/me/player/next", device_query(device_id), None)
            .await
    }

    async fn previous_track(&self, device_id: Option<&str>) -> Res<()> {
        self.execute(
            Method::POST,
            "/me/player/previous",
            device_query(device_id),
            None,
        )
        .await
    }

    async fn seek(&self, position_ms: u64, device_id: Option<&str>) -> Res<()> {
        let mut query = device_query(device_id);
        query.push(("position_ms", position_ms.to_string()));
        self.execute(Method::PUT, "/me/player/seek", query, None).await
    }

    async fn set_volume(&self, volume_percent: u8, device_id: Option<&str>) -> Res<()> {
        let mut query = device_query(device_id);
        query.push(("volume_percent", volume_percent.to_string()));
        self.execute(Method::PUT, "/me/player/volume", query, None)
            .await
    }

    async fn add_to_queue(&self, uri: &str, device_id: Option<&str>) -> Res<()> {
        let mut query = device_query(device_id);
        query.push(("uri", uri.to_string()));
        self.execute(Method::POST, "/me/player/queue", query, None)
            .await
    }

    async fn queue(&self) -> Res<Value> {
        self.get("/me/player/queue", Vec::new()).await
    }

    async fn current_user_playlists(&self, limit: u32) -> Res<Option<Value>> {
        self.get_optional("/me/playlists", vec![("limit", limit.to_string())])
            .await
    }

    async fn playlist_add_items(
        &self,
        playlist_id: &str,
        items: &[String],
        position: Option<u32>,
    ) -> Res<()> {
        let mut body = json!({ "uris": to_track_uris(items) });
        if let Some(position) = position {
            body["position"] = json!(position);
        }
        self.execute(
            Method::POST,
            &format!("/playlists/{playlist_id}/tracks"),
            Vec::new(),
            Some(body),
        )
        .await
    }

    async fn playlist_remove_items(&self, playlist_id: &str, items: &[String]) -> Res<()> {
        let tracks: Vec<Value> = to_track_uris(items)
            .into_iter()
            .map(|uri| json!({ "uri": uri }))
            .collect();
        self.execute(
            Method::DELETE,
            &format!("/playlists/{playlist_id}/tracks"),
            Vec::new(),
            Some(json!({ "tracks": tracks })),
        )
        .await
    }

    async fn playlist_change_details(
        &self,
        playlist_id: &str,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Res<()> {
        let mut body = Map::new();
        if let Some(name) = name {
            body.insert("name".into(), Value::String(name.to_string()));
        }
        if let Some(description) = description {
            body.insert("description".into(), Value::String(description.to_string()));
        }
        self.execute(
            Method::PUT,
            &format!("/playlists/{playlist_id}"),
            Vec::new(),
            Some(Value::Object(body)),
        )
        .await
    }

    async fn devices(&self) -> Res<Value> {
        self.get("/me/player/devices", Vec::new()).await
    }

    async fn saved_tracks(&self, limit: u32) -> Res<Value> {
        self.get("/me/tracks", vec![("limit", limit.to_string())])
            .await
    }
}
