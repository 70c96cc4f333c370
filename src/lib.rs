//! Spotify account tools for automated agents.
//!
//! The crate exposes a Spotify account (playback, search, queue, playlists,
//! devices) as a small set of named tools served over HTTP.
//!
//! # Modules
//!
//! - `account` - Account facade and the session guard around its operations
//! - `api` - HTTP endpoints: tool protocol, OAuth callback, health
//! - `cli` - Command implementations behind the binary
//! - `config` - Configuration from environment variables and `.env` files
//! - `error` - [`SpotifyError`](error::SpotifyError) and the [`Res`] alias
//! - `logging` - tracing subscriber setup
//! - `management` - Token session with persistence and refresh
//! - `normalize` - Compact projections of Spotify payloads
//! - `server` - axum router and server lifecycle
//! - `spotify` - Spotify Web API transport and OAuth
//! - `tools` - Tool definitions and handlers
//! - `types` - Data structures and type definitions
//! - `utils` - Identifier helpers, query building, formatting

pub mod account;
pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod management;
pub mod normalize;
pub mod server;
pub mod spotify;
pub mod tools;
pub mod types;
pub mod utils;

pub use error::Res;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Serving tools on http://{}/mcp", addr);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program
/// with code 1. Only for fatal errors.
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
