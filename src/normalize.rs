//! Flattens raw Spotify Web API payloads into the small, stable shapes handed
//! to agents.
//!
//! Every parser takes the raw JSON and returns `None` for an absent item (null,
//! non-object or empty object). Optional upstream fields are only copied when
//! present; `name` and `id` are always emitted.

use serde_json::{Map, Value};

use crate::{error::Res, types::SearchKind, utils};

const TRACK_DETAIL_KEYS: [&str; 4] = ["track_number", "duration_ms", "popularity", "explicit"];
const ARTIST_DETAIL_KEYS: [&str; 3] = ["genres", "popularity", "followers"];
const ALBUM_DETAIL_KEYS: [&str; 5] = [
    "total_tracks",
    "release_date",
    "genres",
    "popularity",
    "album_type",
];

fn as_item(item: &Value) -> Option<&Map<String, Value>> {
    item.as_object().filter(|obj| !obj.is_empty())
}

fn base_projection(obj: &Map<String, Value>) -> Map<String, Value> {
    let mut narrowed = Map::new();
    narrowed.insert("name".into(), obj.get("name").cloned().unwrap_or(Value::Null));
    narrowed.insert("id".into(), obj.get("id").cloned().unwrap_or(Value::Null));
    narrowed
}

fn copy_present(from: &Map<String, Value>, to: &mut Map<String, Value>, keys: &[&str]) {
    for key in keys {
        if let Some(value) = from.get(*key) {
            to.insert((*key).to_string(), value.clone());
        }
    }
}

fn nested_items<'a>(obj: &'a Map<String, Value>, key: &str) -> &'a [Value] {
    obj.get(key)
        .and_then(|v| v.get("items"))
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Zero artists leave no field, one becomes `artist`, more become `artists`.
fn insert_artists(obj: &Map<String, Value>, narrowed: &mut Map<String, Value>, detailed: bool) {
    let raw = obj
        .get("artists")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[]);

    let mut artists: Vec<Value> = if detailed {
        raw.iter()
            .map(|a| parse_artist(a, false).unwrap_or(Value::Null))
            .collect()
    } else {
        raw.iter()
            .map(|a| a.get("name").cloned().unwrap_or(Value::Null))
            .collect()
    };

    match artists.len() {
        0 => {}
        1 => {
            narrowed.insert("artist".into(), artists.remove(0));
        }
        _ => {
            narrowed.insert("artists".into(), Value::Array(artists));
        }
    }
}

pub fn parse_track(item: &Value, detailed: bool) -> Option<Value> {
    let obj = as_item(item)?;
    let mut narrowed = base_projection(obj);

    if let Some(is_playing) = obj.get("is_playing") {
        narrowed.insert("is_playing".into(), is_playing.clone());
    }

    if detailed {
        let album = obj
            .get("album")
            .and_then(|a| parse_album(a, false))
            .unwrap_or(Value::Null);
        narrowed.insert("album".into(), album);
        copy_present(obj, &mut narrowed, &TRACK_DETAIL_KEYS);

        let duration_ms = obj.get("duration_ms").and_then(Value::as_i64).unwrap_or(0);
        narrowed.insert(
            "duration".into(),
            Value::String(utils::format_duration(duration_ms)),
        );
    }

    if matches!(obj.get("is_playable"), Some(Value::Bool(false) | Value::Null)) {
        narrowed.insert("is_playable".into(), Value::Bool(false));
    }

    insert_artists(obj, &mut narrowed, detailed);

    Some(Value::Object(narrowed))
}

pub fn parse_artist(item: &Value, detailed: bool) -> Option<Value> {
    let obj = as_item(item)?;
    let mut narrowed = base_projection(obj);

    if detailed {
        for key in ARTIST_DETAIL_KEYS {
            let Some(value) = obj.get(key) else {
                continue;
            };
            let value = match (key, value) {
                ("followers", Value::Object(followers)) => {
                    followers.get("total").cloned().unwrap_or(Value::from(0))
                }
                _ => value.clone(),
            };
            narrowed.insert(key.to_string(), value);
        }
    }

    Some(Value::Object(narrowed))
}

pub fn parse_album(item: &Value, detailed: bool) -> Option<Value> {
    let obj = as_item(item)?;
    let mut narrowed = base_projection(obj);

    if detailed {
        let tracks: Vec<Value> = nested_items(obj, "tracks")
            .iter()
            .filter_map(|t| parse_track(t, false))
            .collect();
        narrowed.insert("tracks".into(), Value::Array(tracks));
        copy_present(obj, &mut narrowed, &ALBUM_DETAIL_KEYS);
    }

    insert_artists(obj, &mut narrowed, detailed);

    Some(Value::Object(narrowed))
}

pub fn parse_playlist(item: &Value, username: &str, detailed: bool) -> Option<Value> {
    let obj = as_item(item)?;
    let mut narrowed = base_projection(obj);

    let owner = item
        .pointer("/owner/display_name")
        .cloned()
        .unwrap_or(Value::Null);
    let user_is_owner = owner.as_str() == Some(username);
    narrowed.insert("owner".into(), owner);
    narrowed.insert("user_is_owner".into(), Value::Bool(user_is_owner));
    narrowed.insert(
        "total_tracks".into(),
        item.pointer("/tracks/total").cloned().unwrap_or(Value::Null),
    );

    if detailed {
        for key in ["description", "public", "collaborative"] {
            narrowed.insert(key.into(), obj.get(key).cloned().unwrap_or(Value::Null));
        }

        let tracks: Vec<Value> = nested_items(obj, "tracks")
            .iter()
            .filter_map(|wrapper| wrapper.get("track"))
            .filter_map(|t| parse_track(t, false))
            .collect();
        narrowed.insert("tracks".into(), Value::Array(tracks));
    }

    Some(Value::Object(narrowed))
}

/// Groups a multi-section search payload by kind.
///
/// `qtype` is a comma separated list (`"track,album"`). All kinds are checked
/// before any section is read, so an unknown kind fails the whole call. Only
/// sections that yielded at least one item appear in the result.
pub fn parse_search_results(
    results: &Value,
    qtype: &str,
    username: Option<&str>,
) -> Res<Map<String, Value>> {
    let kinds = utils::parse_search_kinds(qtype)?;
    Ok(parse_search_sections(results, &kinds, username))
}

pub fn parse_search_sections(
    results: &Value,
    kinds: &[SearchKind],
    username: Option<&str>,
) -> Map<String, Value> {
    let mut parsed = Map::new();

    for kind in kinds {
        let items = results
            .get(kind.section())
            .and_then(|s| s.get("items"))
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        for item in items {
            let parsed_item = match kind {
                SearchKind::Track => parse_track(item, false),
                SearchKind::Artist => parse_artist(item, false),
                SearchKind::Album => parse_album(item, false),
                SearchKind::Playlist => parse_playlist(item, username.unwrap_or_default(), false),
            };
            let Some(parsed_item) = parsed_item else {
                continue;
            };

            if let Value::Array(section) = parsed
                .entry(kind.section())
                .or_insert_with(|| Value::Array(Vec::new()))
            {
                section.push(parsed_item);
            }
        }
    }

    parsed
}

/// Parses bare tracks and `{"track": {...}}` wrappers alike.
pub fn parse_tracks_list(items: &[Value]) -> Vec<Value> {
    items
        .iter()
        .filter_map(|item| match item.get("track") {
            Some(inner @ Value::Object(_)) => parse_track(inner, false),
            Some(Value::Null) => None,
            _ => parse_track(item, false),
        })
        .collect()
}
