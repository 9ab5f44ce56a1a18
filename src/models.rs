use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Sentinel stored when a genre lookup finished without a usable answer.
pub const UNKNOWN_GENRE: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    pub id: i64,
    pub name: String,
    pub yandex_genre: Option<String>,
    pub mb_genre: Option<String>,
    pub mb_present: bool,
    pub path_artist: Option<String>,
    pub added_at: Option<NaiveDateTime>,
}

/// Row of the albums table, keyed by the streaming service's album id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Album {
    pub artist_name: String,
    pub album_id: String,
    pub album_name: Option<String>,
}

/// Short reference from the liked-tracks list, resolved later into a [`Track`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackRef {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    #[serde(rename = "albumId", default, deserialize_with = "opt_id_as_string")]
    pub album_id: Option<String>,
}

impl TrackRef {
    /// Identifier in the `track:album` form the tracks endpoint accepts.
    pub fn track_id(&self) -> String {
        match &self.album_id {
            Some(album) if !album.is_empty() => format!("{}:{}", self.id, album),
            _ => self.id.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackArtist {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackAlbum {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub artists: Vec<TrackArtist>,
    #[serde(default)]
    pub albums: Vec<TrackAlbum>,
}

impl Track {
    /// Name of the first credited artist; other artists are ignored.
    pub fn primary_artist(&self) -> Option<&str> {
        self.artists.first().map(|a| a.name.as_str())
    }

    /// Catalog row for the first album, credited to `artist_name`.
    pub fn primary_album(&self, artist_name: &str) -> Option<Album> {
        self.albums.first().map(|a| Album {
            artist_name: artist_name.to_string(),
            album_id: a.id.clone(),
            album_name: a.title.clone(),
        })
    }

    /// Genre of the first album, or [`UNKNOWN_GENRE`] when there is none.
    pub fn primary_genre(&self) -> String {
        self.albums
            .first()
            .and_then(|a| a.genre.clone())
            .filter(|g| !g.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_GENRE.to_string())
    }
}

// Yandex returns ids as numbers in some payloads and strings in others.
fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let v = serde_json::Value::deserialize(deserializer)?;
    match v {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!("unexpected id: {}", other))),
    }
}

fn opt_id_as_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let v = Option::<serde_json::Value>::deserialize(deserializer)?;
    match v {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!("unexpected id: {}", other))),
    }
}
