use serde::Deserialize;
use serde_json::json;

use super::{ToolDefinition, ToolOutput};
use crate::account::AccountClient;

pub const NAME: &str = "SpotifyLikedSongs";
const ERROR_PREFIX: &str = "Liked songs error";

#[derive(Debug, Deserialize)]
pub struct LikedArgs {
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    50
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: NAME,
        description: "Get the tracks saved in the user's library.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "limit": {
                    "type": "integer",
                    "default": 50,
                    "minimum": 1,
                    "maximum": 50,
                    "description": "Maximum number of tracks to return"
                }
            }
        }),
    }
}

pub async fn handle(client: &AccountClient, args: LikedArgs) -> ToolOutput {
    match client.liked_songs(args.limit).await {
        Ok(tracks) => ToolOutput::pretty(&tracks),
        Err(e) => ToolOutput::failure(ERROR_PREFIX, &e),
    }
}
