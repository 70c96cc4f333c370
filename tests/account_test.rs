mod common;

use common::{ALBUM_ID, FakeApi, PLAYLIST_ID, TRACK_ID, client, playing_track};
use serde_json::json;
use spotify_mcp::{error::SpotifyError, spotify::PlaybackRequest};

fn inactive_devices() -> serde_json::Value {
    json!({
        "devices": [
            { "id": "d1", "name": "Phone", "is_active": false },
            { "id": "d2", "name": "Speaker", "is_active": false }
        ]
    })
}

#[tokio::test]
async fn test_active_device_is_left_alone() {
    let (api, client) = client(FakeApi::default());
    let uri = format!("spotify:track:{TRACK_ID}");

    client.start_playback(Some(&uri)).await.unwrap();

    let requests = api.playback_requests.lock().unwrap().clone();
    assert_eq!(
        requests,
        vec![PlaybackRequest {
            device_id: None,
            context_uri: None,
            uris: Some(vec![uri.clone()]),
        }]
    );
}

#[tokio::test]
async fn test_first_device_is_used_when_none_active() {
    let (api, client) = client(FakeApi {
        devices: inactive_devices(),
        ..Default::default()
    });

    client
        .start_playback(Some("spotify:album:1A2GTWGtFfWp7KSQTwWOyo"))
        .await
        .unwrap();

    let requests = api.playback_requests.lock().unwrap().clone();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].device_id.as_deref(), Some("d1"));
    assert_eq!(
        requests[0].context_uri.as_deref(),
        Some("spotify:album:1A2GTWGtFfWp7KSQTwWOyo")
    );
    assert!(requests[0].uris.is_none());
}

#[tokio::test]
async fn test_no_devices_fails_before_operation() {
    let (api, client) = client(FakeApi {
        devices: json!({ "devices": [] }),
        ..Default::default()
    });

    let err = client.skip_track(1).await.unwrap_err();

    assert!(matches!(err, SpotifyError::NoDevice));
    assert_eq!(api.count("next_track"), 0);
}

#[tokio::test]
async fn test_device_list_failure_surfaces_error() {
    let (api, client) = client(FakeApi {
        devices_fail: true,
        ..Default::default()
    });

    let err = client.previous_track().await.unwrap_err();

    assert!(err.is_service());
    assert_eq!(api.count("previous_track"), 0);
}

#[tokio::test]
async fn test_expired_token_is_refreshed_and_failure_not_escalated() {
    let (api, client) = client(FakeApi {
        token_valid: false,
        refresh_fails: true,
        ..Default::default()
    });

    client.seek(30_000).await.unwrap();

    assert_eq!(api.count("refresh_token"), 1);
    assert_eq!(api.count("seek"), 1);
}

#[tokio::test]
async fn test_username_is_resolved_once() {
    let (api, client) = client(FakeApi {
        search_result: Some(json!({ "tracks": { "items": [{ "name": "Song", "id": "t1" }] } })),
        ..Default::default()
    });

    client.search("song", "track", 10).await.unwrap();
    client.search("song", "track", 10).await.unwrap();

    assert_eq!(api.count("current_user"), 1);
    assert_eq!(client.username().await.as_deref(), Some("tester"));
}

#[tokio::test]
async fn test_search_groups_sections() {
    let (_api, client) = client(FakeApi {
        search_result: Some(json!({
            "tracks": { "items": [{ "name": "Song", "id": "t1", "artists": [{ "name": "Band" }] }] },
            "albums": { "items": [] }
        })),
        ..Default::default()
    });

    let results = client.search("song", "track,album", 5).await.unwrap();

    assert_eq!(
        results,
        json!({ "tracks": [{ "name": "Song", "id": "t1", "artist": "Band" }] })
    );
}

#[tokio::test]
async fn test_search_empty_response_is_empty_result() {
    let (_api, client) = client(FakeApi {
        search_result: Some(json!({})),
        ..Default::default()
    });

    let err = client.search("nothing", "track", 10).await.unwrap_err();

    assert!(matches!(err, SpotifyError::EmptyResult(_)));
    assert_eq!(err.to_string(), "No search results found.");
}

#[tokio::test]
async fn test_search_unknown_kind_makes_no_calls() {
    let (api, client) = client(FakeApi::default());

    let err = client.search("song", "track,podcast", 10).await.unwrap_err();

    assert!(matches!(err, SpotifyError::UnsupportedKind(ref k) if k == "podcast"));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_resume_is_noop_when_already_playing() {
    let (api, client) = client(FakeApi {
        currently_playing: Some(playing_track(true)),
        ..Default::default()
    });

    client.start_playback(None).await.unwrap();

    assert_eq!(api.count("start_playback"), 0);
}

#[tokio::test]
async fn test_resume_without_playback_state_fails() {
    let (api, client) = client(FakeApi::default());

    let err = client.start_playback(None).await.unwrap_err();

    assert!(matches!(err, SpotifyError::NoResumableState));
    assert_eq!(api.count("start_playback"), 0);
}

#[tokio::test]
async fn test_resume_paused_track() {
    let (api, client) = client(FakeApi {
        currently_playing: Some(playing_track(false)),
        ..Default::default()
    });

    client.start_playback(None).await.unwrap();

    let requests = api.playback_requests.lock().unwrap().clone();
    assert_eq!(requests, vec![PlaybackRequest::default()]);
}

#[tokio::test]
async fn test_pause_only_when_playing() {
    let (api, client) = client(FakeApi {
        playback: Some(json!({ "is_playing": false })),
        ..Default::default()
    });
    client.pause_playback().await.unwrap();
    assert_eq!(api.count("pause_playback"), 0);

    let (api, client) = common::client(FakeApi {
        playback: Some(json!({ "is_playing": true })),
        ..Default::default()
    });
    client.pause_playback().await.unwrap();
    assert_eq!(api.count("pause_playback"), 1);
}

#[tokio::test]
async fn test_skip_issues_one_call_per_track() {
    let (api, client) = client(FakeApi::default());

    client.skip_track(3).await.unwrap();

    assert_eq!(api.count("next_track"), 3);
}

#[tokio::test]
async fn test_volume_out_of_range_is_rejected() {
    let (api, client) = client(FakeApi::default());

    let err = client.set_volume(101).await.unwrap_err();

    assert!(matches!(err, SpotifyError::InvalidParameter(_)));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_queue_bare_id_becomes_track_uri() {
    let (api, client) = client(FakeApi::default());

    client.add_to_queue(TRACK_ID).await.unwrap();

    let queued = api.queued.lock().unwrap().clone();
    assert_eq!(queued, vec![(format!("spotify:track:{TRACK_ID}"), None)]);
}

#[tokio::test]
async fn test_queue_album_in_album_order() {
    let (api, client) = client(FakeApi {
        album: json!({
            "name": "Record",
            "id": ALBUM_ID,
            "tracks": { "items": [
                { "name": "A", "id": "t1" },
                { "name": "B", "id": "t2" },
                { "name": "C", "id": "t3" }
            ]}
        }),
        ..Default::default()
    });

    client
        .add_to_queue(&format!("spotify:album:{ALBUM_ID}"))
        .await
        .unwrap();

    let queued: Vec<String> = api
        .queued
        .lock()
        .unwrap()
        .iter()
        .map(|(uri, _)| uri.clone())
        .collect();
    assert_eq!(
        queued,
        vec!["spotify:track:t1", "spotify:track:t2", "spotify:track:t3"]
    );
}

#[tokio::test]
async fn test_queue_empty_id_makes_no_calls() {
    let (api, client) = client(FakeApi::default());

    let err = client.add_to_queue("").await.unwrap_err();

    assert!(matches!(err, SpotifyError::MissingParameter(_)));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_queue_listing_skips_absent_items() {
    let (_api, client) = client(FakeApi {
        currently_playing: Some(playing_track(true)),
        ..Default::default()
    });

    let queue = client.queue().await.unwrap();

    assert_eq!(queue["currently_playing"]["name"], "Song");
    assert_eq!(queue["currently_playing"]["is_playing"], true);
    assert_eq!(queue["queue"], json!([{ "name": "Next", "id": "n1" }]));
}

#[tokio::test]
async fn test_current_track_ignores_episodes() {
    let (_api, client) = client(FakeApi {
        currently_playing: Some(json!({
            "currently_playing_type": "episode",
            "is_playing": true,
            "item": { "name": "Pod", "id": "e1" }
        })),
        ..Default::default()
    });

    assert!(client.current_track().await.unwrap().is_none());
    assert!(!client.is_track_playing().await.unwrap());
}

#[tokio::test]
async fn test_item_info_track_has_duration() {
    let (_api, client) = client(FakeApi::default());

    let info = client
        .item_info(&format!("spotify:track:{TRACK_ID}"))
        .await
        .unwrap();

    assert_eq!(info["duration"], "3:45");
    assert_eq!(info["duration_ms"], 225000);
}

#[tokio::test]
async fn test_item_info_artist_merges_albums_and_top_tracks() {
    let (api, client) = client(FakeApi::default());

    let info = client.item_info("spotify:artist:a1").await.unwrap();

    assert_eq!(info["followers"], 10);
    assert_eq!(info["top_tracks"], json!([{ "name": "Hit", "id": "t1" }]));
    assert_eq!(info["albums"], json!([{ "name": "Record", "id": "al1" }]));
    assert_eq!(api.count("artist_albums"), 1);
    assert_eq!(api.count("artist_top_tracks"), 1);
}

#[tokio::test]
async fn test_item_info_rejects_unsupported_and_malformed() {
    let (api, client) = client(FakeApi::default());

    let err = client.item_info("spotify:show:abc").await.unwrap_err();
    assert!(matches!(err, SpotifyError::UnsupportedKind(_)));

    let err = client.item_info("not-a-uri").await.unwrap_err();
    assert!(matches!(err, SpotifyError::InvalidUri(_)));

    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_playlist_info_marks_owner() {
    let (_api, client) = client(FakeApi::default());

    let info = client
        .item_info(&format!("spotify:playlist:{PLAYLIST_ID}"))
        .await
        .unwrap();

    assert_eq!(info["user_is_owner"], true);
    assert_eq!(info["total_tracks"], 2);
    assert_eq!(info["tracks"], json!([{ "name": "One", "id": "t1" }]));
}

#[tokio::test]
async fn test_playlists_and_tracks() {
    let (_api, client) = client(FakeApi::default());

    let playlists = client.playlists(50).await.unwrap();
    assert_eq!(playlists.len(), 1);
    assert_eq!(playlists[0]["total_tracks"], 3);

    let tracks = client.playlist_tracks(PLAYLIST_ID).await.unwrap();
    assert_eq!(tracks, vec![json!({ "name": "One", "id": "t1" })]);
}

#[tokio::test]
async fn test_playlist_mutations_validate_before_network() {
    let (api, client) = client(FakeApi::default());

    assert!(matches!(
        client.add_tracks(PLAYLIST_ID, &[], None).await,
        Err(SpotifyError::MissingParameter(_))
    ));
    assert!(matches!(
        client.remove_tracks("", &["t1".to_string()]).await,
        Err(SpotifyError::MissingParameter(_))
    ));
    assert!(matches!(
        client.change_details(PLAYLIST_ID, None, Some("")).await,
        Err(SpotifyError::MissingParameter(_))
    ));
    assert!(matches!(
        client.playlist_tracks("").await,
        Err(SpotifyError::MissingParameter(_))
    ));

    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_playlist_mutation_errors_propagate() {
    let (_api, client) = client(FakeApi {
        service_error: Some((403, "Forbidden".into())),
        ..Default::default()
    });

    let err = client
        .add_tracks(PLAYLIST_ID, &["t1".to_string()], Some(0))
        .await
        .unwrap_err();

    assert!(err.is_service());
    assert_eq!(err.to_string(), "http status: 403 - Forbidden");
}

#[tokio::test]
async fn test_recommendations_need_a_seed() {
    let (api, client) = client(FakeApi::default());

    let err = client.recommendations(&[], &[], 20).await.unwrap_err();
    assert!(matches!(err, SpotifyError::MissingParameter(_)));
    assert!(api.calls().is_empty());

    let tracks = client
        .recommendations(&["a1".to_string()], &[], 20)
        .await
        .unwrap();
    assert_eq!(tracks, vec![json!({ "name": "Rec", "id": "r1" })]);
}

#[tokio::test]
async fn test_liked_songs_unwraps_saved_items() {
    let (_api, client) = client(FakeApi::default());

    let tracks = client.liked_songs(50).await.unwrap();

    assert_eq!(tracks, vec![json!({ "name": "Fav", "id": "f1" })]);
}

#[tokio::test]
async fn test_devices_returns_raw_list() {
    let (api, client) = client(FakeApi::default());

    let devices = client.devices().await.unwrap();

    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0]["name"], "Laptop");
    assert_eq!(api.endpoint_calls(), Vec::<String>::new());
}
