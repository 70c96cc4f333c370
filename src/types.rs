use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::error::SpotifyError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

impl Token {
    pub fn expires_at(&self) -> u64 {
        self.obtained_at + self.expires_in
    }
}

/// A Spotify Connect playback endpoint as reported by `/me/player/devices`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Device {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default, rename = "type")]
    pub device_type: Option<String>,
    #[serde(default)]
    pub volume_percent: Option<u32>,
}

#[derive(Tabled)]
pub struct DeviceTableRow {
    pub name: String,
    pub kind: String,
    pub active: String,
    pub id: String,
}

impl From<&Device> for DeviceTableRow {
    fn from(device: &Device) -> Self {
        DeviceTableRow {
            name: device.name.clone(),
            kind: device.device_type.clone().unwrap_or_default(),
            active: if device.is_active { "yes" } else { "" }.to_string(),
            id: device.id.clone().unwrap_or_default(),
        }
    }
}

/// Entity category of a `spotify:kind:id` identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ItemKind {
    Track,
    Album,
    Artist,
    Playlist,
    Show,
    Episode,
}

impl ItemKind {
    pub const ALL: [ItemKind; 6] = [
        ItemKind::Track,
        ItemKind::Album,
        ItemKind::Artist,
        ItemKind::Playlist,
        ItemKind::Show,
        ItemKind::Episode,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Track => "track",
            ItemKind::Album => "album",
            ItemKind::Artist => "artist",
            ItemKind::Playlist => "playlist",
            ItemKind::Show => "show",
            ItemKind::Episode => "episode",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemKind {
    type Err = SpotifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ItemKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| SpotifyError::UnsupportedKind(s.to_string()))
    }
}

/// The item kinds the search endpoint can be asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SearchKind {
    Track,
    Artist,
    Album,
    Playlist,
}

impl SearchKind {
    pub const ALL: [SearchKind; 4] = [
        SearchKind::Track,
        SearchKind::Artist,
        SearchKind::Album,
        SearchKind::Playlist,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchKind::Track => "track",
            SearchKind::Artist => "artist",
            SearchKind::Album => "album",
            SearchKind::Playlist => "playlist",
        }
    }

    /// Key of the section holding this kind in a search response.
    pub fn section(&self) -> &'static str {
        match self {
            SearchKind::Track => "tracks",
            SearchKind::Artist => "artists",
            SearchKind::Album => "albums",
            SearchKind::Playlist => "playlists",
        }
    }
}

impl fmt::Display for SearchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchKind {
    type Err = SpotifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SearchKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| SpotifyError::UnsupportedKind(s.to_string()))
    }
}

/// Optional field filters appended to a free-text search query.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchFilters {
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub track: Option<String>,
    #[serde(default)]
    pub album: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub year_range: Option<(u32, u32)>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub is_hipster: bool,
    #[serde(default)]
    pub is_new: bool,
}
