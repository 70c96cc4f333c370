use serde::Deserialize;
use serde_json::json;

use super::{ToolDefinition, ToolOutput};
use crate::account::AccountClient;

pub const NAME: &str = "SpotifyPlaylist";
const ERROR_PREFIX: &str = "Playlist operation error";
const PLAYLIST_PAGE_LIMIT: u32 = 50;

#[derive(Debug, Deserialize)]
pub struct PlaylistArgs {
    pub action: String,
    #[serde(default)]
    pub playlist_id: Option<String>,
    #[serde(default)]
    pub track_ids: Option<Vec<String>>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub position: Option<u32>,
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: NAME,
        description: "Manage Spotify playlists.\n\
            - get: Get a list of user's playlists.\n\
            - get_tracks: Get tracks in a specific playlist.\n\
            - add_tracks: Add tracks to a specific playlist.\n\
            - remove_tracks: Remove tracks from a specific playlist.\n\
            - change_details: Change details of a specific playlist.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "action": {
                    "type": "string",
                    "enum": ["get", "get_tracks", "add_tracks", "remove_tracks", "change_details"],
                    "description": "Action to perform."
                },
                "playlist_id": { "type": "string", "description": "ID of the playlist to manage." },
                "track_ids": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "List of track IDs to add/remove."
                },
                "name": { "type": "string", "description": "New name for the playlist." },
                "description": { "type": "string", "description": "New description for the playlist." },
                "position": {
                    "type": "integer",
                    "minimum": 0,
                    "description": "Zero-based insert position for 'add_tracks'. Appends when omitted."
                }
            },
            "required": ["action"]
        }),
    }
}

pub async fn handle(client: &AccountClient, args: PlaylistArgs) -> ToolOutput {
    let playlist_id = args.playlist_id.as_deref().unwrap_or_default();
    let track_ids = args.track_ids.as_deref().unwrap_or_default();
    tracing::info!(
        action = %args.action,
        playlist_id,
        track_count = track_ids.len(),
        "playlist operation requested"
    );

    let result = match args.action.as_str() {
        "get" => {
            return match client.playlists(PLAYLIST_PAGE_LIMIT).await {
                Ok(playlists) => ToolOutput::pretty(&playlists),
                Err(e) => ToolOutput::failure(ERROR_PREFIX, &e),
            };
        }
        "get_tracks" => {
            return match client.playlist_tracks(playlist_id).await {
                Ok(tracks) => ToolOutput::pretty(&tracks),
                Err(e) => ToolOutput::failure(ERROR_PREFIX, &e),
            };
        }
        "add_tracks" => client
            .add_tracks(playlist_id, track_ids, args.position)
            .await
            .map(|_| "Tracks added to playlist."),
        "remove_tracks" => client
            .remove_tracks(playlist_id, track_ids)
            .await
            .map(|_| "Tracks removed from playlist."),
        "change_details" => client
            .change_details(
                playlist_id,
                args.name.as_deref(),
                args.description.as_deref(),
            )
            .await
            .map(|_| "Playlist details changed."),
        other => return ToolOutput::error(format!("Unknown playlist action: {other}.")),
    };

    match result {
        Ok(message) => ToolOutput::ok(message),
        Err(e) => {
            tracing::error!(action = %args.action, playlist_id, error = %e, "playlist operation failed");
            ToolOutput::failure(ERROR_PREFIX, &e)
        }
    }
}
