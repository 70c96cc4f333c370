//! # API Module
//!
//! HTTP endpoints served by the local axum server:
//!
//! - [`callback`] - `GET /callback`, completes the OAuth authorization-code flow
//! - [`health`] - `GET /health`, status and version for monitoring
//! - [`mcp`] - `POST /mcp`, JSON-RPC tool protocol ([`mcp::dispatch`])
//!
//! Shared state (the token session and the tool set) is injected with
//! [`axum::Extension`] layers, see [`crate::server::router`].

mod callback;
mod health;
pub mod mcp;

pub use callback::callback;
pub use health::health;
pub use mcp::mcp;
