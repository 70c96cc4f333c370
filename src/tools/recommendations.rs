use serde::Deserialize;
use serde_json::json;

use super::{ToolDefinition, ToolOutput};
use crate::{account::AccountClient, utils};

pub const NAME: &str = "SpotifyRecommendations";
const ERROR_PREFIX: &str = "Recommendations error";

#[derive(Debug, Deserialize)]
pub struct RecommendationsArgs {
    #[serde(default)]
    pub seed_artists: Vec<String>,
    #[serde(default)]
    pub seed_tracks: Vec<String>,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    20
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: NAME,
        description: "Get track recommendations based on seed artists and/or tracks.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "seed_artists": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Artist IDs or URIs to seed recommendations."
                },
                "seed_tracks": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Track IDs or URIs to seed recommendations."
                },
                "limit": {
                    "type": "integer",
                    "default": 20,
                    "minimum": 1,
                    "maximum": 100,
                    "description": "Number of tracks to return"
                }
            }
        }),
    }
}

pub async fn handle(client: &AccountClient, args: RecommendationsArgs) -> ToolOutput {
    let seed_artists: Vec<String> = args
        .seed_artists
        .iter()
        .map(|s| utils::extract_id(s).to_string())
        .collect();
    let seed_tracks: Vec<String> = args
        .seed_tracks
        .iter()
        .map(|s| utils::extract_id(s).to_string())
        .collect();

    match client
        .recommendations(&seed_artists, &seed_tracks, args.limit)
        .await
    {
        Ok(tracks) => ToolOutput::pretty(&tracks),
        Err(e) => ToolOutput::failure(ERROR_PREFIX, &e),
    }
}
