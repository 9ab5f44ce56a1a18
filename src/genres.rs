//! Genre normalization: free-text genre tokens from Yandex Music and
//! MusicBrainz collapse into a small set of canonical bucket names, one
//! directory (and one Lidarr root folder) per bucket.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use crate::models::UNKNOWN_GENRE;

/// Bucket for every token the table does not know.
pub const OTHER_BUCKET: &str = "Other";

const DEFAULT_GENRES: &[(&str, &str)] = &[
    // Rock
    ("rock", "Rock"),
    ("rusrock", "Rock"),
    ("hardrock", "Rock"),
    ("hard rock", "Rock"),
    ("classic rock", "Rock"),
    ("alternative", "Rock"),
    ("alternative rock", "Rock"),
    ("indie", "Rock"),
    ("indie rock", "Rock"),
    ("punk", "Rock"),
    ("punk rock", "Rock"),
    ("post-punk", "Rock"),
    ("grunge", "Rock"),
    // Metal
    ("metal", "Metal"),
    ("heavy metal", "Metal"),
    ("thrash metal", "Metal"),
    ("death metal", "Metal"),
    ("black metal", "Metal"),
    ("metalcore", "Metal"),
    ("numetal", "Metal"),
    ("nu metal", "Metal"),
    // Pop
    ("pop", "Pop"),
    ("ruspop", "Pop"),
    ("estrada", "Pop"),
    ("synth-pop", "Pop"),
    ("k-pop", "Pop"),
    ("disco", "Pop"),
    // Electronic
    ("electronics", "Electronic"),
    ("electronic", "Electronic"),
    ("dance", "Electronic"),
    ("house", "Electronic"),
    ("techno", "Electronic"),
    ("trance", "Electronic"),
    ("dnb", "Electronic"),
    ("drum and bass", "Electronic"),
    ("dubstep", "Electronic"),
    ("ambient", "Electronic"),
    ("idm", "Electronic"),
    ("industrial", "Electronic"),
    // Hip-Hop
    ("rap", "Hip-Hop"),
    ("rusrap", "Hip-Hop"),
    ("foreignrap", "Hip-Hop"),
    ("hiphop", "Hip-Hop"),
    ("hip hop", "Hip-Hop"),
    ("hip-hop", "Hip-Hop"),
    ("trap", "Hip-Hop"),
    // Jazz & Blues
    ("jazz", "Jazz"),
    ("blues", "Jazz"),
    ("soul", "Jazz"),
    ("funk", "Jazz"),
    ("rnb", "Jazz"),
    ("r&b", "Jazz"),
    // Classical
    ("classical", "Classical"),
    ("classicalmusic", "Classical"),
    ("modern classical", "Classical"),
    ("opera", "Classical"),
    // Folk
    ("folk", "Folk"),
    ("folkgenre", "Folk"),
    ("country", "Folk"),
    ("bard", "Folk"),
    ("singer-songwriter", "Folk"),
    // Soundtrack
    ("soundtrack", "Soundtrack"),
    ("films", "Soundtrack"),
    ("videogame", "Soundtrack"),
    ("tvseries", "Soundtrack"),
    // Reggae
    ("reggae", "Reggae"),
    ("ska", "Reggae"),
    ("dub", "Reggae"),
];

/// Static genre token -> bucket table.
#[derive(Debug, Clone)]
pub struct GenreMap {
    mappings: HashMap<String, String>,
}

#[derive(Deserialize)]
struct GenreMapFile {
    genres: HashMap<String, String>,
}

impl Default for GenreMap {
    fn default() -> Self {
        Self::from_pairs(DEFAULT_GENRES.iter().map(|(k, v)| (k.to_string(), v.to_string())))
    }
}

impl GenreMap {
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mappings = pairs
            .into_iter()
            .map(|(token, bucket)| (token.trim().to_lowercase(), bucket.trim().to_string()))
            .filter(|(token, bucket)| !token.is_empty() && !bucket.is_empty())
            .collect();
        Self { mappings }
    }

    /// Load a table from a TOML file with a single `[genres]` section:
    ///
    /// ```toml
    /// [genres]
    /// "rock" = "Rock"
    /// "shoegaze" = "Rock"
    /// ```
    pub fn from_path(path: &Path) -> Result<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("reading genre map {}", path.display()))?;
        let file: GenreMapFile = toml::from_str(&s)
            .with_context(|| format!("parsing genre map {}", path.display()))?;
        Ok(Self::from_pairs(file.genres))
    }

    /// Configured table if a path is given, built-in table otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_path(p),
            None => Ok(Self::default()),
        }
    }

    /// Map a genre token to its bucket. Case-insensitive and total: unknown
    /// tokens land in [`OTHER_BUCKET`].
    pub fn bucket_for(&self, genre: &str) -> &str {
        self.mappings
            .get(&genre.trim().to_lowercase())
            .map(String::as_str)
            .unwrap_or(OTHER_BUCKET)
    }

    /// Every bucket an artist can land in, sorted. Always includes `Other`.
    pub fn buckets(&self) -> Vec<String> {
        let mut set: BTreeSet<String> = self.mappings.values().cloned().collect();
        set.insert(OTHER_BUCKET.to_string());
        set.into_iter().collect()
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

/// Pick the genre to file an artist under: the MusicBrainz genre unless it
/// is missing or `unknown`, then the Yandex genre, then `unknown`.
pub fn preferred_genre<'a>(yandex: Option<&'a str>, musicbrainz: Option<&'a str>) -> &'a str {
    let usable = |g: Option<&'a str>| g.filter(|g| !g.trim().is_empty() && *g != UNKNOWN_GENRE);
    usable(musicbrainz)
        .or_else(|| yandex.filter(|g| !g.trim().is_empty()))
        .unwrap_or(UNKNOWN_GENRE)
}
