use serde::Deserialize;
use serde_json::json;

use super::{ToolDefinition, ToolOutput};
use crate::account::AccountClient;

pub const NAME: &str = "SpotifyQueue";
const ERROR_PREFIX: &str = "Queue operation error";

#[derive(Debug, Deserialize)]
pub struct QueueArgs {
    pub action: String,
    #[serde(default)]
    pub track_id: Option<String>,
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: NAME,
        description: "Manage the playback queue - get the queue or add tracks.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "action": {
                    "type": "string",
                    "enum": ["add", "get"],
                    "description": "Action to perform: 'add' or 'get'."
                },
                "track_id": {
                    "type": "string",
                    "description": "Track ID to add to queue (required for add action)"
                }
            },
            "required": ["action"]
        }),
    }
}

pub async fn handle(client: &AccountClient, args: QueueArgs) -> ToolOutput {
    tracing::info!(action = %args.action, track_id = ?args.track_id, "queue operation requested");

    match args.action.as_str() {
        "add" => {
            let track_id = args.track_id.as_deref().unwrap_or_default();
            match client.add_to_queue(track_id).await {
                Ok(()) => ToolOutput::ok("Track added to queue."),
                Err(e) => ToolOutput::failure(ERROR_PREFIX, &e),
            }
        }
        "get" => match client.queue().await {
            Ok(queue) => {
                tracing::info!(
                    queue_length = queue["queue"].as_array().map_or(0, Vec::len),
                    "queue retrieved"
                );
                ToolOutput::pretty(&queue)
            }
            Err(e) => ToolOutput::failure(ERROR_PREFIX, &e),
        },
        other => ToolOutput::error(format!(
            "Unknown queue action: {other}. Supported actions are: add and get."
        )),
    }
}
