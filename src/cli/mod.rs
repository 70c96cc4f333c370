//! # CLI Module
//!
//! Command implementations behind the `spotify-mcp` binary:
//!
//! - [`serve`] - run the HTTP server (tool endpoint, OAuth callback, health)
//! - [`auth`] - run only the OAuth flow and cache the token
//! - [`devices`] - print the available playback devices as a table
//!
//! Every command starts from [`App::bootstrap`], which wires the token
//! session, the HTTP transport, the account facade and the tool set together.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{
    account::AccountClient, config, error::Res, management::TokenManager,
    spotify::client::SpotifyClient, tools::ToolSet,
};

mod auth;
mod devices;
mod serve;

pub use auth::auth;
pub use devices::devices;
pub use serve::serve;

/// The wired-up application.
pub struct App {
    pub session: Arc<Mutex<TokenManager>>,
    pub client: Arc<AccountClient>,
    pub tools: Arc<ToolSet>,
}

impl App {
    pub async fn bootstrap() -> Res<Self> {
        let oauth = config::oauth()?;
        let cache_path = config::token_cache_path();
        let session = Arc::new(Mutex::new(TokenManager::load(oauth, cache_path).await));

        let api = Arc::new(SpotifyClient::new(
            config::spotify_api_url(),
            Arc::clone(&session),
        ));
        let client = Arc::new(AccountClient::new(api));
        let tools = Arc::new(ToolSet::new(Arc::clone(&client)));

        Ok(App {
            session,
            client,
            tools,
        })
    }
}
