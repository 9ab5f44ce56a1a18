use liked_library_sync::api::lidarr::LidarrClient;
use liked_library_sync::api::musicbrainz::MusicBrainzClient;
use liked_library_sync::config::Config;
use liked_library_sync::genres::GenreMap;
use liked_library_sync::tasks::artists::register_artists;
use liked_library_sync::tasks::root_folders::register_root_folders;
use liked_library_sync::tasks::RegistrationReport;
use mockito::{Matcher, Server};
use serde_json::json;
use std::fs;
use tempfile::tempdir;

fn test_cfg(url: &str, base: &std::path::Path) -> Config {
    Config {
        base_path: base.to_path_buf(),
        lidarr_url: url.to_string(),
        lidarr_api_key: "secret".into(),
        lidarr_base_path: "/data/music".into(),
        musicbrainz_url: url.to_string(),
        user_agent: "liked-library-sync-tests/0.1".into(),
        ..Config::default()
    }
}

#[test]
fn root_folders_registered_per_bucket_and_failures_continue() {
    let mut server = Server::new();
    let td = tempdir().unwrap();
    let cfg = test_cfg(&server.url(), td.path());

    let jazz = server
        .mock("POST", "/rootFolder")
        .match_query(Matcher::UrlEncoded("apikey".into(), "secret".into()))
        .match_body(Matcher::PartialJson(json!({
            "path": "/data/music/Jazz",
            "defaultQualityProfileId": 1,
            "defaultMetadataProfileId": 1,
            "defaultMonitor": "all",
            "defaultNewItemMonitor": "all"
        })))
        .with_status(201)
        .with_body("{}")
        .create();
    let other = server
        .mock("POST", "/rootFolder")
        .match_query(Matcher::Any)
        .match_body(Matcher::PartialJson(json!({"path": "/data/music/Other"})))
        .with_status(400)
        .with_body(r#"[{"errorMessage":"Path is already configured as a root folder"}]"#)
        .create();
    let rock = server
        .mock("POST", "/rootFolder")
        .match_query(Matcher::Any)
        .match_body(Matcher::PartialJson(json!({"path": "/data/music/Rock"})))
        .with_status(201)
        .with_body("{}")
        .create();

    let genres = GenreMap::from_pairs(vec![
        ("rock".to_string(), "Rock".to_string()),
        ("jazz".to_string(), "Jazz".to_string()),
    ]);
    let lidarr = LidarrClient::new(&cfg.lidarr_url, &cfg.lidarr_api_key);
    let rt = tokio::runtime::Runtime::new().unwrap();
    let report = rt.block_on(register_root_folders(&lidarr, &cfg, &genres)).unwrap();

    jazz.assert();
    other.assert();
    rock.assert();
    assert_eq!(report, RegistrationReport { added: 2, skipped: 0, failed: 1 });
    for bucket in ["Jazz", "Other", "Rock"] {
        assert!(td.path().join(bucket).is_dir());
    }
}

#[test]
fn artists_registered_with_skip_and_failure_handling() {
    let mut server = Server::new();
    let td = tempdir().unwrap();
    let cfg = test_cfg(&server.url(), td.path());

    // <base>/Rock/{ACDC,Queen,Muse}, <base>/Jazz/Miles (no root), a stray file
    for dir in ["Rock/ACDC/__EMPTY__", "Rock/Queen/__EMPTY__", "Rock/Muse/__EMPTY__", "Jazz/Miles/__EMPTY__"] {
        fs::create_dir_all(td.path().join(dir)).unwrap();
    }
    fs::write(td.path().join("notes.txt"), "x").unwrap();
    fs::write(td.path().join("Rock").join("cover.jpg"), "x").unwrap();

    let _roots = server
        .mock("GET", "/rootFolder")
        .match_query(Matcher::UrlEncoded("apikey".into(), "secret".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!([{"id": 7, "name": "/data/music/Rock", "path": "/data/music/Rock"}]).to_string())
        .create();

    let _mb_queen = server
        .mock("GET", "/ws/2/artist/")
        .match_query(Matcher::UrlEncoded("query".into(), "Queen".into()))
        .with_status(200)
        .with_body(json!({"artists":[{"id":"0383dadf-2a4e-4d10-a46a-e9e041da8eb3","name":"Queen"}]}).to_string())
        .create();
    let _mb_other = server
        .mock("GET", "/ws/2/artist/")
        .match_query(Matcher::Any)
        .with_status(503)
        .create();

    let queen = server
        .mock("POST", "/artist")
        .match_query(Matcher::UrlEncoded("apikey".into(), "secret".into()))
        .match_body(Matcher::PartialJson(json!({
            "artistName": "Queen",
            "foreignArtistId": "0383dadf-2a4e-4d10-a46a-e9e041da8eb3",
            "rootFolderId": 7,
            "rootFolderPath": "/data/music/Rock",
            "path": "/data/music/Rock/Queen",
            "monitored": true,
            "monitorNewItems": "all",
            "addOptions": {"monitor": "all", "searchForMissingAlbums": true}
        })))
        .with_status(201)
        .with_body("{}")
        .create();
    let acdc = server
        .mock("POST", "/artist")
        .match_query(Matcher::Any)
        .match_body(Matcher::PartialJson(json!({"artistName": "ACDC", "foreignArtistId": null})))
        .with_status(400)
        .with_body(r#"[{"propertyName":"ForeignArtistId","errorMessage":"This artist is already configured for an existing artist"}]"#)
        .create();
    let muse = server
        .mock("POST", "/artist")
        .match_query(Matcher::Any)
        .match_body(Matcher::PartialJson(json!({"artistName": "Muse"})))
        .with_status(500)
        .with_body(r#"{"message":"database is locked"}"#)
        .create();

    let lidarr = LidarrClient::new(&cfg.lidarr_url, &cfg.lidarr_api_key);
    let mb = MusicBrainzClient::new(&cfg.musicbrainz_url, &cfg.user_agent).unwrap();
    let rt = tokio::runtime::Runtime::new().unwrap();
    let report = rt.block_on(register_artists(&lidarr, &mb, &cfg)).unwrap();

    queen.assert();
    acdc.assert();
    muse.assert();
    assert_eq!(report, RegistrationReport { added: 1, skipped: 1, failed: 1 });
}

#[test]
fn artist_registration_fails_when_root_folders_unavailable() {
    let mut server = Server::new();
    let td = tempdir().unwrap();
    let cfg = test_cfg(&server.url(), td.path());
    let _roots = server
        .mock("GET", "/rootFolder")
        .match_query(Matcher::Any)
        .with_status(401)
        .create();

    let lidarr = LidarrClient::new(&cfg.lidarr_url, &cfg.lidarr_api_key);
    let mb = MusicBrainzClient::new(&cfg.musicbrainz_url, &cfg.user_agent).unwrap();
    let rt = tokio::runtime::Runtime::new().unwrap();
    assert!(rt.block_on(register_artists(&lidarr, &mb, &cfg)).is_err());
}

#[test]
fn artist_registration_fails_when_base_path_missing() {
    let mut server = Server::new();
    let td = tempdir().unwrap();
    let cfg = test_cfg(&server.url(), &td.path().join("not-there"));
    let _roots = server
        .mock("GET", "/rootFolder")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(json!([{"id": 7, "path": "/data/music/Rock"}]).to_string())
        .create();
    let add = server.mock("POST", "/artist").match_query(Matcher::Any).expect(0).create();

    let lidarr = LidarrClient::new(&cfg.lidarr_url, &cfg.lidarr_api_key);
    let mb = MusicBrainzClient::new(&cfg.musicbrainz_url, &cfg.user_agent).unwrap();
    let rt = tokio::runtime::Runtime::new().unwrap();
    let err = rt.block_on(register_artists(&lidarr, &mb, &cfg)).unwrap_err();

    assert!(format!("{:#}", err).contains("not-there"));
    add.assert();
}
