use spotify_mcp::error::SpotifyError;
use spotify_mcp::types::{ItemKind, SearchFilters, SearchKind};
use spotify_mcp::utils::*;

const TRACK_ID: &str = "4iV5W9uYEdYUVa79Axb7Rh";

#[test]
fn test_validate_uri_accepts_every_kind() {
    for kind in ItemKind::ALL {
        let uri = build_uri(kind.as_str(), TRACK_ID);
        assert!(validate_uri(&uri), "{uri} should be valid");
    }
}

#[test]
fn test_validate_uri_rejects_malformed() {
    // Empty input
    assert!(!validate_uri(""));

    // Wrong number of parts
    assert!(!validate_uri("spotify:track"));
    assert!(!validate_uri(&format!("spotify:track:{TRACK_ID}:extra")));

    // Wrong namespace or kind
    assert!(!validate_uri(&format!("deezer:track:{TRACK_ID}")));
    assert!(!validate_uri(&format!("spotify:podcast:{TRACK_ID}")));

    // Wrong id length or alphabet
    assert!(!validate_uri("spotify:track:short"));
    assert!(!validate_uri("spotify:track:4iV5W9uYEdYUVa79Axb7R!"));
}

#[test]
fn test_build_then_extract_round_trips() {
    let uri = build_uri("album", TRACK_ID);

    assert_eq!(uri, format!("spotify:album:{TRACK_ID}"));
    assert_eq!(extract_id(&uri), TRACK_ID);
}

#[test]
fn test_extract_id_passes_bare_ids_through() {
    assert_eq!(extract_id(TRACK_ID), TRACK_ID);
    assert_eq!(extract_id(""), "");
}

#[test]
fn test_normalize_callback_host() {
    assert_eq!(
        normalize_callback_host("http://localhost:8080/callback"),
        "http://127.0.0.1:8080/callback"
    );
    assert_eq!(
        normalize_callback_host("http://localhost/callback?x=1"),
        "http://127.0.0.1/callback?x=1"
    );

    // Other hosts stay untouched, including ones merely containing "localhost"
    assert_eq!(
        normalize_callback_host("https://example.com/localhost"),
        "https://example.com/localhost"
    );
    assert_eq!(
        normalize_callback_host("http://localhost.example.com:8080/cb"),
        "http://localhost.example.com:8080/cb"
    );
    assert_eq!(normalize_callback_host("not a url"), "not a url");
}

#[test]
fn test_normalize_callback_host_is_idempotent() {
    for url in [
        "http://localhost:8080/callback",
        "http://127.0.0.1:8080/callback",
        "https://example.com/cb",
    ] {
        let once = normalize_callback_host(url);
        assert_eq!(normalize_callback_host(&once), once);
    }
}

#[test]
fn test_format_duration() {
    assert_eq!(format_duration(45_000), "0:45");
    assert_eq!(format_duration(225_000), "3:45");
    assert_eq!(format_duration(4_425_000), "1:13:45");
    assert_eq!(format_duration(0), "0:00");
    assert_eq!(format_duration(-1_000), "0:00");
}

#[test]
fn test_build_search_query_with_filters() {
    let filters = SearchFilters {
        artist: Some("Radiohead".into()),
        album: Some("".into()),
        year_range: Some((1995, 2000)),
        genre: Some("rock".into()),
        is_new: true,
        ..Default::default()
    };

    assert_eq!(
        build_search_query("karma", &filters),
        "karma artist:Radiohead year:1995-2000 genre:rock tag:new"
    );
    assert_eq!(
        build_search_query("karma", &SearchFilters::default()),
        "karma"
    );
}

#[test]
fn test_parse_search_kinds() {
    assert_eq!(
        parse_search_kinds("track, album,track").unwrap(),
        vec![SearchKind::Track, SearchKind::Album]
    );

    let err = parse_search_kinds("track,show").unwrap_err();
    assert!(matches!(err, SpotifyError::UnsupportedKind(ref k) if k == "show"));
}

#[test]
fn test_spotify_uri_parse() {
    let uri = SpotifyUri::parse(&format!("spotify:playlist:{TRACK_ID}")).unwrap();
    assert_eq!(uri.kind, ItemKind::Playlist);
    assert_eq!(uri.id, TRACK_ID);
    assert_eq!(uri.to_string(), format!("spotify:playlist:{TRACK_ID}"));

    assert!(matches!(
        SpotifyUri::parse("spotify:track:"),
        Err(SpotifyError::InvalidUri(_))
    ));
    assert!(matches!(
        SpotifyUri::parse("spotify:station:abc"),
        Err(SpotifyError::UnsupportedKind(_))
    ));
}
