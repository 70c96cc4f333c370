use serde::Deserialize;
use serde_json::json;

use super::{ToolDefinition, ToolOutput};
use crate::account::AccountClient;

pub const NAME: &str = "SpotifyPlayback";
const ERROR_PREFIX: &str = "Unexpected error occurred";

#[derive(Debug, Deserialize)]
pub struct PlaybackArgs {
    pub action: String,
    #[serde(default)]
    pub spotify_uri: Option<String>,
    #[serde(default = "default_num_skips")]
    pub num_skips: u32,
    #[serde(default)]
    pub position_ms: Option<u64>,
    #[serde(default)]
    pub volume_percent: Option<u32>,
}

fn default_num_skips() -> u32 {
    1
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: NAME,
        description: "Manages the current playback with the following actions:\n\
            - get: Get information about user's current track.\n\
            - start: Starts playing new item or resumes current playback if called with no uri.\n\
            - pause: Pauses current playback.\n\
            - skip: Skips current track.\n\
            - previous: Goes back to the previous track.\n\
            - seek: Seeks to a position in the current track.\n\
            - volume: Sets the playback volume.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "action": {
                    "type": "string",
                    "enum": ["get", "start", "pause", "skip", "previous", "seek", "volume"],
                    "description": "Action to perform."
                },
                "spotify_uri": {
                    "type": "string",
                    "description": "Spotify uri of item to play for 'start' action. If omitted, resumes current playback."
                },
                "num_skips": {
                    "type": "integer",
                    "default": 1,
                    "minimum": 0,
                    "description": "Number of tracks to skip for 'skip' action."
                },
                "position_ms": {
                    "type": "integer",
                    "minimum": 0,
                    "description": "Position in milliseconds for 'seek' action."
                },
                "volume_percent": {
                    "type": "integer",
                    "minimum": 0,
                    "maximum": 100,
                    "description": "Volume between 0 and 100 for 'volume' action."
                }
            },
            "required": ["action"]
        }),
    }
}

pub async fn handle(client: &AccountClient, args: PlaybackArgs) -> ToolOutput {
    tracing::info!(
        action = %args.action,
        spotify_uri = ?args.spotify_uri,
        num_skips = args.num_skips,
        "playback action requested"
    );

    let result = match args.action.as_str() {
        "get" => {
            return match client.current_track().await {
                Ok(Some(track)) => ToolOutput::pretty(&track),
                Ok(None) => ToolOutput::ok("No track playing."),
                Err(e) => ToolOutput::failure(ERROR_PREFIX, &e),
            };
        }
        "start" => client
            .start_playback(args.spotify_uri.as_deref())
            .await
            .map(|_| "Playback starting."),
        "pause" => client.pause_playback().await.map(|_| "Playback paused."),
        "skip" => client
            .skip_track(args.num_skips)
            .await
            .map(|_| "Skipped to next track."),
        "previous" => client
            .previous_track()
            .await
            .map(|_| "Skipped to previous track."),
        "seek" => {
            let Some(position_ms) = args.position_ms else {
                return ToolOutput::error("position_ms is required for seek action.");
            };
            client.seek(position_ms).await.map(|_| "Seeked to position.")
        }
        "volume" => {
            let Some(volume_percent) = args.volume_percent else {
                return ToolOutput::error("volume_percent is required for volume action.");
            };
            client.set_volume(volume_percent).await.map(|_| "Volume set.")
        }
        other => return ToolOutput::error(format!("Unknown action: {other}")),
    };

    match result {
        Ok(message) => ToolOutput::ok(message),
        Err(e) => ToolOutput::failure(ERROR_PREFIX, &e),
    }
}
