//! # Tool Surface
//!
//! The named tools exposed to agents. Each tool module declares a static
//! [`ToolDefinition`] (name, description, JSON schema), a typed argument struct
//! and a handler that turns an [`AccountClient`] call into a [`ToolOutput`].
//!
//! | Tool | Module |
//! |---|---|
//! | `SpotifyPlayback` | [`playback`] |
//! | `SpotifySearch` | [`search`] |
//! | `SpotifyQueue` | [`queue`] |
//! | `SpotifyGetInfo` | [`info`] |
//! | `SpotifyPlaylist` | [`playlist`] |
//! | `SpotifyDevices` | [`devices`] |
//! | `SpotifyRecommendations` | [`recommendations`] |
//! | `SpotifyLikedSongs` | [`liked`] |
//!
//! This is the only layer that renders [`SpotifyError`] as text.
//! [`ToolSet::call`] never fails: unknown tools, bad arguments and facade
//! errors all come back as error outputs.

use std::sync::Arc;

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{account::AccountClient, error::SpotifyError};

pub mod devices;
pub mod info;
pub mod liked;
pub mod playback;
pub mod playlist;
pub mod queue;
pub mod recommendations;
pub mod search;

/// Prefix used for every error reported by the remote API.
pub const SERVICE_ERROR_PREFIX: &str = "Spotify Client error occurred";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
}

/// Text answer of a tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub text: String,
    pub is_error: bool,
}

impl ToolOutput {
    pub fn ok(text: impl Into<String>) -> Self {
        ToolOutput {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        ToolOutput {
            text: text.into(),
            is_error: true,
        }
    }

    /// Renders a facade error. Remote failures share one prefix, argument
    /// problems are reported as is, anything else gets the tool's prefix.
    pub fn failure(prefix: &str, err: &SpotifyError) -> Self {
        let text = match err {
            SpotifyError::Service { .. } => format!("{SERVICE_ERROR_PREFIX}: {err}"),
            SpotifyError::MissingParameter(msg) => msg.clone(),
            _ => format!("{prefix}: {err}"),
        };
        ToolOutput::error(text)
    }

    pub fn pretty(value: &impl Serialize) -> Self {
        match serde_json::to_string_pretty(value) {
            Ok(text) => ToolOutput::ok(text),
            Err(e) => ToolOutput::error(format!("Failed to serialize result: {e}")),
        }
    }

    pub fn compact(value: &impl Serialize) -> Self {
        match serde_json::to_string(value) {
            Ok(text) => ToolOutput::ok(text),
            Err(e) => ToolOutput::error(format!("Failed to serialize result: {e}")),
        }
    }
}

/// Deserializes tool arguments; a missing argument object counts as `{}`.
fn parse_args<T: DeserializeOwned>(arguments: Value) -> Result<T, ToolOutput> {
    let arguments = match arguments {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };
    serde_json::from_value(arguments)
        .map_err(|e| ToolOutput::error(format!("Invalid arguments: {e}")))
}

pub struct ToolSet {
    client: Arc<AccountClient>,
}

impl ToolSet {
    pub fn new(client: Arc<AccountClient>) -> Self {
        ToolSet { client }
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        vec![
            playback::definition(),
            search::definition(),
            queue::definition(),
            info::definition(),
            playlist::definition(),
            devices::definition(),
            recommendations::definition(),
            liked::definition(),
        ]
    }

    pub async fn call(&self, name: &str, arguments: Value) -> ToolOutput {
        let client = self.client.as_ref();

        let output = match name {
            playback::NAME => match parse_args(arguments) {
                Ok(args) => playback::handle(client, args).await,
                Err(out) => out,
            },
            search::NAME => match parse_args(arguments) {
                Ok(args) => search::handle(client, args).await,
                Err(out) => out,
            },
            queue::NAME => match parse_args(arguments) {
                Ok(args) => queue::handle(client, args).await,
                Err(out) => out,
            },
            info::NAME => match parse_args(arguments) {
                Ok(args) => info::handle(client, args).await,
                Err(out) => out,
            },
            playlist::NAME => match parse_args(arguments) {
                Ok(args) => playlist::handle(client, args).await,
                Err(out) => out,
            },
            devices::NAME => devices::handle(client).await,
            recommendations::NAME => match parse_args(arguments) {
                Ok(args) => recommendations::handle(client, args).await,
                Err(out) => out,
            },
            liked::NAME => match parse_args(arguments) {
                Ok(args) => liked::handle(client, args).await,
                Err(out) => out,
            },
            _ => ToolOutput::error(format!("Unknown tool: {name}")),
        };

        if output.is_error {
            tracing::warn!(tool = name, message = %output.text, "tool call failed");
        }
        output
    }
}
