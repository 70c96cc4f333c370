use serde_json::json;

use super::{ToolDefinition, ToolOutput};
use crate::account::AccountClient;

pub const NAME: &str = "SpotifyDevices";
const ERROR_PREFIX: &str = "Error getting devices";

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: NAME,
        description: "Get available Spotify devices",
        input_schema: json!({ "type": "object", "properties": {} }),
    }
}

pub async fn handle(client: &AccountClient) -> ToolOutput {
    match client.devices().await {
        Ok(devices) => {
            tracing::info!(device_count = devices.len(), "devices retrieved");
            ToolOutput::compact(&devices)
        }
        Err(e) => ToolOutput::failure(ERROR_PREFIX, &e),
    }
}
