use crate::models::{Album, Artist};
use anyhow::Result;
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS artists (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    yandex_genre TEXT,
    mb_genre TEXT,
    mb_present INTEGER NOT NULL DEFAULT 0,
    path_artist TEXT,
    added_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
);
CREATE TABLE IF NOT EXISTS albums (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    artist_name TEXT NOT NULL,
    album_id TEXT NOT NULL UNIQUE,
    album_name TEXT,
    added_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
);
";

pub fn open_or_create(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let conn = Connection::open(path)?;
    ensure_schema(&conn)?;
    Ok(conn)
}

/// Create both tables if they do not exist yet. Never drops or alters.
pub fn ensure_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

/// Insert an artist unless a row with exactly this name exists.
///
/// `name` is unique in the table and the insert is `INSERT OR IGNORE`, so
/// concurrent callers can never create duplicates and a duplicate is never
/// an error. Returns true when a row was created.
pub fn insert_artist_if_absent(conn: &Connection, name: &str, yandex_genre: Option<&str>) -> Result<bool> {
    let n = conn.execute(
        "INSERT OR IGNORE INTO artists (name, yandex_genre) VALUES (?1, ?2)",
        params![name, yandex_genre],
    )?;
    Ok(n > 0)
}

/// Batch form of [`insert_artist_if_absent`], in a single transaction.
/// Returns the number of rows actually created.
pub fn insert_new_artists(conn: &mut Connection, artists: &[(String, String)]) -> Result<usize> {
    let tx = conn.transaction()?;
    let mut inserted = 0;
    {
        let mut stmt = tx.prepare("INSERT OR IGNORE INTO artists (name, yandex_genre) VALUES (?1, ?2)")?;
        for (name, genre) in artists {
            inserted += stmt.execute(params![name, genre])?;
        }
    }
    tx.commit()?;
    Ok(inserted)
}

pub fn artist_names(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM artists")?;
    let rows = stmt.query_map([], |r| r.get::<_, String>(0))?;
    let mut v = Vec::new();
    for r in rows {
        v.push(r?);
    }
    Ok(v)
}

/// Names of artists that have not been resolved against MusicBrainz yet.
pub fn artists_needing_enrichment(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM artists WHERE mb_present = 0 ORDER BY id ASC")?;
    let rows = stmt.query_map([], |r| r.get::<_, String>(0))?;
    let mut v = Vec::new();
    for r in rows {
        v.push(r?);
    }
    Ok(v)
}

/// Record a finished MusicBrainz lookup. `genre` is the chosen tag or
/// `"unknown"`; the artist is never queried again afterwards.
pub fn set_enrichment_result(conn: &Connection, name: &str, genre: &str) -> Result<()> {
    conn.execute(
        "UPDATE artists SET mb_genre = ?1, mb_present = 1 WHERE name = ?2",
        params![genre, name],
    )?;
    Ok(())
}

pub fn set_assigned_path(conn: &Connection, name: &str, path: &str) -> Result<()> {
    conn.execute(
        "UPDATE artists SET path_artist = ?1 WHERE name = ?2",
        params![path, name],
    )?;
    Ok(())
}

/// (name, yandex_genre, mb_genre) for every artist.
pub fn all_artists_with_genres(conn: &Connection) -> Result<Vec<(String, Option<String>, Option<String>)>> {
    let mut stmt = conn.prepare("SELECT name, yandex_genre, mb_genre FROM artists ORDER BY id ASC")?;
    let rows = stmt.query_map([], |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)))?;
    let mut v = Vec::new();
    for r in rows {
        v.push(r?);
    }
    Ok(v)
}

pub fn get_artist(conn: &Connection, name: &str) -> Result<Option<Artist>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, yandex_genre, mb_genre, mb_present, path_artist, added_at FROM artists WHERE name = ?1 LIMIT 1",
    )?;
    let row = stmt
        .query_row(params![name], |r| {
            let added_at: Option<String> = r.get(6)?;
            Ok(Artist {
                id: r.get(0)?,
                name: r.get(1)?,
                yandex_genre: r.get(2)?,
                mb_genre: r.get(3)?,
                mb_present: r.get::<_, i64>(4)? != 0,
                path_artist: r.get(5)?,
                added_at: added_at
                    .and_then(|s| NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M:%S").ok()),
            })
        })
        .optional()?;
    Ok(row)
}

/// (total artists, resolved against MusicBrainz, with an assigned folder)
pub fn artist_counts(conn: &Connection) -> Result<(i64, i64, i64)> {
    let counts = conn.query_row(
        "SELECT COUNT(*), COALESCE(SUM(mb_present != 0), 0), COUNT(path_artist) FROM artists",
        [],
        |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
    )?;
    Ok(counts)
}

/// Record an album unless its external id is already known. Nothing reads
/// this table yet.
pub fn insert_album_if_absent(conn: &Connection, album: &Album) -> Result<bool> {
    let n = conn.execute(
        "INSERT OR IGNORE INTO albums (artist_name, album_id, album_name) VALUES (?1, ?2, ?3)",
        params![album.artist_name, album.album_id, album.album_name],
    )?;
    Ok(n > 0)
}

pub fn count_albums(conn: &Connection) -> Result<i64> {
    Ok(conn.query_row("SELECT COUNT(*) FROM albums", [], |r| r.get(0))?)
}
