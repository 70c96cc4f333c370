use std::path::PathBuf;

use chrono::Utc;

use crate::{
    error::{Res, SpotifyError},
    spotify::auth::OAuthConfig,
    types::Token,
};

/// Seconds before the real expiry at which a token already counts as expired.
const EXPIRY_MARGIN_SECS: u64 = 60;

/// The single cached OAuth credential of the process.
///
/// Built once at startup, shared behind `Arc<Mutex<_>>` by the HTTP transport
/// and the `/callback` route, and persisted on every change.
pub struct TokenManager {
    oauth: OAuthConfig,
    path: PathBuf,
    token: Option<Token>,
}

impl TokenManager {
    pub fn new(oauth: OAuthConfig, path: PathBuf) -> Self {
        TokenManager {
            oauth,
            path,
            token: None,
        }
    }

    /// Creates the manager and loads a previously cached token, if any.
    pub async fn load(oauth: OAuthConfig, path: PathBuf) -> Self {
        let mut manager = Self::new(oauth, path);
        match manager.read_cache().await {
            Ok(token) => manager.token = Some(token),
            Err(e) => tracing::debug!(error = %e, path = %manager.path.display(), "no usable token cache"),
        }
        manager
    }

    async fn read_cache(&self) -> Res<Token> {
        let content = async_fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&content)?)
    }

    pub async fn persist(&self) -> Res<()> {
        match &self.token {
            Some(token) => self.write_cache(token).await,
            None => Ok(()),
        }
    }

    async fn write_cache(&self, token: &Token) -> Res<()> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(token)?;
        async_fs::write(&self.path, json).await?;
        Ok(())
    }

    /// Writes the token to disk, then makes it the current one. On a failed
    /// write the previous token stays in place.
    pub async fn store(&mut self, token: Token) -> Res<()> {
        self.write_cache(&token).await?;
        self.token = Some(token);
        Ok(())
    }

    pub fn oauth(&self) -> &OAuthConfig {
        &self.oauth
    }

    pub fn current_token(&self) -> Option<&Token> {
        self.token.as_ref()
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// A missing token counts as expired.
    pub fn is_expired(&self) -> bool {
        let Some(token) = &self.token else {
            return true;
        };
        let now = Utc::now().timestamp() as u64;
        now + EXPIRY_MARGIN_SECS >= token.expires_at()
    }

    pub async fn refresh(&mut self) -> Res<()> {
        let refresh_token = self
            .token
            .as_ref()
            .map(|t| t.refresh_token.clone())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| SpotifyError::NotAuthenticated("no refresh token cached".into()))?;

        let new_token = self.oauth.refresh(&refresh_token).await?;
        self.store(new_token).await
    }

    /// Returns an access token, refreshing it first when expired. A failed
    /// refresh is logged and the stale token is returned; the API will reject
    /// it with a proper error.
    pub async fn get_valid_token(&mut self) -> Res<String> {
        if self.token.is_none() {
            return Err(SpotifyError::NotAuthenticated(
                "no cached token, authenticate first".into(),
            ));
        }

        if self.is_expired() {
            if let Err(e) = self.refresh().await {
                tracing::warn!(error = %e, "token refresh failed");
            }
        }

        self.token
            .as_ref()
            .map(|t| t.access_token.clone())
            .ok_or_else(|| SpotifyError::NotAuthenticated("no cached token".into()))
    }
}
