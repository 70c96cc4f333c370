use serde::Deserialize;
use serde_json::json;

use super::{ToolDefinition, ToolOutput};
use crate::account::AccountClient;

pub const NAME: &str = "SpotifyGetInfo";
const ERROR_PREFIX: &str = "Get info error";

#[derive(Debug, Deserialize)]
pub struct InfoArgs {
    pub item_uri: String,
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: NAME,
        description: "Get detailed information about a Spotify item (track, album, artist, or playlist).",
        input_schema: json!({
            "type": "object",
            "properties": {
                "item_uri": {
                    "type": "string",
                    "description": "URI of the item to get information about. If 'playlist' or 'album', returns its tracks. If 'artist', returns albums and top tracks."
                }
            },
            "required": ["item_uri"]
        }),
    }
}

pub async fn handle(client: &AccountClient, args: InfoArgs) -> ToolOutput {
    match client.item_info(&args.item_uri).await {
        Ok(info) => {
            tracing::info!(item_uri = %args.item_uri, "item info retrieved");
            ToolOutput::pretty(&info)
        }
        Err(e) => ToolOutput::failure(ERROR_PREFIX, &e),
    }
}
