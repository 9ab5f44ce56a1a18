use std::fs::File;
use std::io::Write;
use tempfile::tempdir;

use liked_library_sync::config::Config;
use liked_library_sync::db;

#[test]
fn config_from_path_parses_toml() {
    let td = tempdir().unwrap();
    let cfg_path = td.path().join("cfg.toml");
    let mut f = File::create(&cfg_path).unwrap();
    let toml = r#"
yandex_token = "t"
db_path = "/tmp/catalog.db"
user_agent = "liked-library-sync/0.1 (me@example.org)"
base_path = "/srv/music"
lidarr_url = "http://lidarr:8686/api/v1"
lidarr_api_key = "k"
lidarr_base_path = "/music"
log_dir = "/tmp"
enrich_delay_ms = 0
"#;
    f.write_all(toml.as_bytes()).unwrap();
    let cfg = Config::from_path(&cfg_path).expect("parse config");
    cfg.validate().expect("valid config");
    assert_eq!(cfg.base_path.to_str().unwrap(), "/srv/music");
    assert_eq!(cfg.db_path.to_str().unwrap(), "/tmp/catalog.db");
    assert_eq!(cfg.enrich_delay_ms, 0);
    assert_eq!(cfg.import_delay_ms, 2000);
    assert_eq!(cfg.quality_profile_id, 1);
    assert!(cfg.genre_map_path.is_none());
}

#[test]
fn config_missing_required_fails_validation() {
    let td = tempdir().unwrap();
    let cfg_path = td.path().join("cfg.toml");
    std::fs::write(&cfg_path, "db_path = \"/tmp/x.db\"\n").unwrap();
    let cfg = Config::from_path(&cfg_path).unwrap();
    let err = cfg.validate().unwrap_err().to_string();
    assert!(err.contains("YANDEX_TOKEN"));
    assert!(err.contains("BASE_PATH_LIDARR"));
    assert!(!err.contains("DB_PATH"));
}

#[test]
fn open_or_create_creates_both_tables() {
    let td = tempdir().unwrap();
    let db_path = td.path().join("nested").join("catalog.db");
    let conn = db::open_or_create(&db_path).expect("open catalog");
    for table in ["artists", "albums"] {
        let found: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
                [table],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(found, 1, "{} table should exist", table);
    }
}

#[test]
fn catalog_survives_reopen() {
    let td = tempdir().unwrap();
    let db_path = td.path().join("catalog.db");
    {
        let conn = db::open_or_create(&db_path).unwrap();
        db::insert_artist_if_absent(&conn, "Queen", Some("rock")).unwrap();
    }
    let conn = db::open_or_create(&db_path).unwrap();
    assert!(!db::insert_artist_if_absent(&conn, "Queen", None).unwrap());
    assert_eq!(db::artist_names(&conn).unwrap(), vec!["Queen"]);
}

#[test]
fn shipped_example_files_parse() {
    let cfg = Config::from_path(std::path::Path::new("config/example-config.toml")).unwrap();
    cfg.validate().unwrap();
    let genres = liked_library_sync::genres::GenreMap::from_path(std::path::Path::new(
        "config/genres.example.toml",
    ))
    .unwrap();
    assert_eq!(genres.bucket_for("Hard Rock"), "Rock");
    assert!(genres.buckets().contains(&"Other".to_string()));
}
