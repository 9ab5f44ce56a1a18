use liked_library_sync::api::yandex::YandexMusicClient;
use liked_library_sync::api::TrackSource;
use liked_library_sync::config::Config;
use liked_library_sync::db;
use liked_library_sync::tasks::import::import_liked_tracks;
use mockito::Server;
use rusqlite::Connection;
use serde_json::json;

fn mock_account(server: &mut Server) -> mockito::Mock {
    server
        .mock("GET", "/account/status")
        .match_header("authorization", "OAuth tok")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"result": {"account": {"uid": 1234, "login": "me"}}}).to_string())
        .create()
}

#[test]
fn liked_tracks_resolves_uid_once_and_lists_refs() {
    let mut server = Server::new();
    let account = mock_account(&mut server);
    let likes = server
        .mock("GET", "/users/1234/likes/tracks")
        .match_header("authorization", "OAuth tok")
        .with_status(200)
        .with_body(
            json!({"result": {"library": {"uid": 1234, "tracks": [
                {"id": "11", "albumId": "21", "timestamp": "2024-01-01T00:00:00+00:00"},
                {"id": "12", "timestamp": "2024-01-02T00:00:00+00:00"}
            ]}}})
            .to_string(),
        )
        .expect(2)
        .create();

    let client = YandexMusicClient::new(&server.url(), "tok");
    let rt = tokio::runtime::Runtime::new().unwrap();
    let (first, second) = rt.block_on(async {
        let a = client.liked_tracks().await.unwrap();
        let b = client.liked_tracks().await.unwrap();
        (a, b)
    });

    account.assert();
    likes.assert();
    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
    assert_eq!(first[0].track_id(), "11:21");
    assert_eq!(first[1].track_id(), "12");
}

#[test]
fn import_against_mock_service_skips_failed_track() {
    let mut server = Server::new();
    let _account = mock_account(&mut server);
    let _likes = server
        .mock("GET", "/users/1234/likes/tracks")
        .with_status(200)
        .with_body(
            json!({"result": {"library": {"tracks": [
                {"id": "1", "albumId": "10"},
                {"id": "2", "albumId": "20"},
                {"id": "3", "albumId": "30"}
            ]}}})
            .to_string(),
        )
        .create();
    let _t1 = server
        .mock("GET", "/tracks/1:10")
        .with_status(200)
        .with_body(
            json!({"result": [{"id": 1, "title": "Angel",
                "artists": [{"id": 5, "name": "Massive Attack"}],
                "albums": [{"id": 10, "title": "Mezzanine", "genre": "electronics"}]}]})
            .to_string(),
        )
        .create();
    let _t2 = server
        .mock("GET", "/tracks/2:20")
        .with_status(500)
        .with_body("oops")
        .create();
    let _t3 = server
        .mock("GET", "/tracks/3:30")
        .with_status(200)
        .with_body(
            json!({"result": [{"id": "3", "title": "Teardrop",
                "artists": [{"name": "Massive Attack"}, {"name": "Elizabeth Fraser"}],
                "albums": [{"id": "31", "genre": "trip-hop"}]}]})
            .to_string(),
        )
        .create();

    let cfg = Config { import_delay_ms: 0, ..Config::default() };
    let client = YandexMusicClient::new(&server.url(), "tok");
    let mut conn = Connection::open_in_memory().unwrap();
    db::ensure_schema(&conn).unwrap();

    let rt = tokio::runtime::Runtime::new().unwrap();
    let report = rt.block_on(import_liked_tracks(&client, &mut conn, &cfg)).unwrap();

    assert_eq!(report.tracks_seen, 3);
    assert_eq!(report.tracks_failed, 1);
    assert_eq!(report.artists_added, 1);
    let artist = db::get_artist(&conn, "Massive Attack").unwrap().unwrap();
    assert_eq!(artist.yandex_genre.as_deref(), Some("electronics"));
    assert!(!artist.mb_present);
    assert_eq!(db::count_albums(&conn).unwrap(), 2);
}
