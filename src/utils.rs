use crate::{
    error::{Res, SpotifyError},
    types::{ItemKind, SearchFilters, SearchKind},
};

pub const URI_NAMESPACE: &str = "spotify";
pub const ID_LENGTH: usize = 22;
const LOOPBACK_HOST: &str = "127.0.0.1";

/// Returns the id part of a `spotify:kind:id` identifier, or the input itself
/// when it is not an identifier.
pub fn extract_id(uri_or_id: &str) -> &str {
    if uri_or_id.starts_with("spotify:") {
        return uri_or_id.rsplit(':').next().unwrap_or(uri_or_id);
    }
    uri_or_id
}

pub fn build_uri(kind: &str, id: &str) -> String {
    format!("{URI_NAMESPACE}:{kind}:{id}")
}

pub fn validate_uri(uri: &str) -> bool {
    let parts: Vec<&str> = uri.split(':').collect();
    let [namespace, kind, id] = parts.as_slice() else {
        return false;
    };

    *namespace == URI_NAMESPACE
        && kind.parse::<ItemKind>().is_ok()
        && id.len() == ID_LENGTH
        && id.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Rewrites a `localhost` callback host to `127.0.0.1`, which is the only
/// loopback form Spotify accepts for redirect URIs. Everything around the host
/// (scheme, port, path, query, fragment) is kept byte for byte.
pub fn normalize_callback_host(url: &str) -> String {
    let Some(scheme_end) = url.find("://") else {
        return url.to_string();
    };
    let authority_start = scheme_end + 3;
    let rest = &url[authority_start..];
    let authority_end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let authority = &rest[..authority_end];

    let port = if authority == "localhost" {
        ""
    } else if let Some(port) = authority.strip_prefix("localhost:") {
        port
    } else {
        return url.to_string();
    };

    let mut normalized = String::with_capacity(url.len());
    normalized.push_str(&url[..authority_start]);
    normalized.push_str(LOOPBACK_HOST);
    if authority.contains(':') {
        normalized.push(':');
        normalized.push_str(port);
    }
    normalized.push_str(&rest[authority_end..]);
    normalized
}

/// Formats milliseconds as `m:ss`, or `h:mm:ss` once an hour is reached.
pub fn format_duration(duration_ms: i64) -> String {
    if duration_ms <= 0 {
        return "0:00".to_string();
    }

    let total_seconds = duration_ms / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

/// Appends Spotify field filters to a free-text query. The result is left
/// unencoded; reqwest encodes it as a query parameter.
pub fn build_search_query(base_query: &str, filters: &SearchFilters) -> String {
    let mut parts = vec![base_query.to_string()];

    if let Some(artist) = non_empty(&filters.artist) {
        parts.push(format!("artist:{artist}"));
    }
    if let Some(track) = non_empty(&filters.track) {
        parts.push(format!("track:{track}"));
    }
    if let Some(album) = non_empty(&filters.album) {
        parts.push(format!("album:{album}"));
    }
    if let Some(year) = non_empty(&filters.year) {
        parts.push(format!("year:{year}"));
    }
    if let Some((start, end)) = filters.year_range {
        parts.push(format!("year:{start}-{end}"));
    }
    if let Some(genre) = non_empty(&filters.genre) {
        parts.push(format!("genre:{genre}"));
    }
    if filters.is_hipster {
        parts.push("tag:hipster".to_string());
    }
    if filters.is_new {
        parts.push("tag:new".to_string());
    }

    parts.join(" ")
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Parses a comma separated list of search kinds, e.g. `"track, album"`.
///
/// Every entry is checked before anything is returned, so callers never act on
/// a partially valid list.
pub fn parse_search_kinds(qtype: &str) -> Res<Vec<SearchKind>> {
    let mut kinds = Vec::new();
    for raw in qtype.split(',') {
        let kind: SearchKind = raw.trim().parse()?;
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }
    Ok(kinds)
}

/// A full identifier split into its kind and id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpotifyUri {
    pub kind: ItemKind,
    pub id: String,
}

impl SpotifyUri {
    pub fn parse(uri: &str) -> Res<Self> {
        let parts: Vec<&str> = uri.split(':').collect();
        let [namespace, kind, id] = parts.as_slice() else {
            return Err(SpotifyError::InvalidUri(uri.to_string()));
        };
        if *namespace != URI_NAMESPACE || id.is_empty() {
            return Err(SpotifyError::InvalidUri(uri.to_string()));
        }

        Ok(SpotifyUri {
            kind: kind.parse()?,
            id: id.to_string(),
        })
    }
}

impl std::fmt::Display for SpotifyUri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&build_uri(self.kind.as_str(), &self.id))
    }
}
