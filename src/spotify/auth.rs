use chrono::Utc;
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::Value;

use crate::{
    error::{Res, SpotifyError},
    types::Token,
};

pub const SCOPES: [&str; 13] = [
    "user-read-currently-playing",
    "user-read-playback-state",
    "user-modify-playback-state",
    "app-remote-control",
    "streaming",
    "playlist-read-private",
    "playlist-read-collaborative",
    "playlist-modify-private",
    "playlist-modify-public",
    "user-read-playback-position",
    "user-top-read",
    "user-read-recently-played",
    "user-library-read",
];

/// Everything needed to talk to the Spotify accounts service.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scope: String,
    pub auth_url: String,
    pub token_url: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    scope: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
}

impl OAuthConfig {
    /// The URL the user opens to grant access.
    pub fn authorize_url(&self) -> Res<String> {
        let url = Url::parse_with_params(
            &self.auth_url,
            &[
                ("client_id", self.client_id.as_str()),
                ("response_type", "code"),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("scope", self.scope.as_str()),
            ],
        )
        .map_err(|e| SpotifyError::Config(format!("invalid authorize url: {e}")))?;
        Ok(url.to_string())
    }

    pub async fn exchange_code(&self, code: &str) -> Res<Token> {
        let response = self
            .request_token(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.redirect_uri.as_str()),
            ])
            .await?;

        Ok(Token {
            access_token: response.access_token,
            refresh_token: response.refresh_token.unwrap_or_default(),
            scope: response.scope.unwrap_or_default(),
            expires_in: response.expires_in.unwrap_or(3600),
            obtained_at: Utc::now().timestamp() as u64,
        })
    }

    /// Spotify may omit the refresh token on refresh; the old one stays valid then.
    pub async fn refresh(&self, refresh_token: &str) -> Res<Token> {
        let response = self
            .request_token(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .await?;

        Ok(Token {
            access_token: response.access_token,
            refresh_token: response
                .refresh_token
                .unwrap_or_else(|| refresh_token.to_string()),
            scope: response.scope.unwrap_or_default(),
            expires_in: response.expires_in.unwrap_or(3600),
            obtained_at: Utc::now().timestamp() as u64,
        })
    }

    async fn request_token(&self, form: &[(&str, &str)]) -> Res<TokenResponse> {
        let client = Client::new();
        let res = client
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(form)
            .send()
            .await?;

        let status = res.status();
        let json: Value = res.json().await?;

        if !status.is_success() {
            let message = json["error_description"]
                .as_str()
                .or_else(|| json["error"].as_str())
                .unwrap_or("token request failed")
                .to_string();
            return Err(SpotifyError::Service {
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_value(json)?)
    }
}
