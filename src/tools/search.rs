use serde::Deserialize;
use serde_json::json;

use super::{ToolDefinition, ToolOutput};
use crate::{account::AccountClient, types::SearchFilters, utils};

pub const NAME: &str = "SpotifySearch";
const ERROR_PREFIX: &str = "Search error occurred";

#[derive(Debug, Deserialize)]
pub struct SearchArgs {
    pub query: String,
    #[serde(default = "default_qtype")]
    pub qtype: String,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(flatten)]
    pub filters: SearchFilters,
}

fn default_qtype() -> String {
    "track".to_string()
}

fn default_limit() -> u32 {
    10
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: NAME,
        description: "Search for tracks, albums, artists, or playlists on Spotify.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "query": { "type": "string", "description": "query term" },
                "qtype": {
                    "type": "string",
                    "default": "track",
                    "description": "Type of items to search for (track, album, artist, playlist, or comma-separated combination)"
                },
                "limit": {
                    "type": "integer",
                    "default": 10,
                    "minimum": 1,
                    "maximum": 50,
                    "description": "Maximum number of items to return"
                },
                "artist": { "type": "string", "description": "Only match items by this artist" },
                "track": { "type": "string", "description": "Only match items with this track name" },
                "album": { "type": "string", "description": "Only match items from this album" },
                "year": { "type": "string", "description": "Release year or range, e.g. 1999 or 1990-1999" },
                "year_range": {
                    "type": "array",
                    "items": { "type": "integer" },
                    "minItems": 2,
                    "maxItems": 2,
                    "description": "Inclusive [start, end] release year range"
                },
                "genre": { "type": "string", "description": "Only match items in this genre" },
                "is_hipster": {
                    "type": "boolean",
                    "default": false,
                    "description": "Only match albums in the lowest 10% of popularity"
                },
                "is_new": {
                    "type": "boolean",
                    "default": false,
                    "description": "Only match albums released in the past two weeks"
                }
            },
            "required": ["query"]
        }),
    }
}

pub async fn handle(client: &AccountClient, args: SearchArgs) -> ToolOutput {
    let query = utils::build_search_query(&args.query, &args.filters);
    tracing::info!(query = %query, qtype = %args.qtype, limit = args.limit, "performing search");

    match client.search(&query, &args.qtype, args.limit).await {
        Ok(results) => {
            let result_count: usize = results
                .as_object()
                .map(|sections| {
                    sections
                        .values()
                        .map(|v| v.as_array().map_or(1, Vec::len))
                        .sum()
                })
                .unwrap_or_default();
            tracing::info!(result_count, "search completed");
            ToolOutput::pretty(&results)
        }
        Err(e) => {
            tracing::error!(query = %query, qtype = %args.qtype, error = %e, error_kind = e.kind(), "search failed");
            ToolOutput::failure(ERROR_PREFIX, &e)
        }
    }
}
