use anyhow::Result;
use log::{debug, warn};
use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct MbTag {
    pub name: String,
    #[serde(default)]
    pub count: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MbArtist {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tags: Vec<MbTag>,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    artists: Vec<MbArtist>,
}

/// Outcome of one artist search request that reached the server.
#[derive(Debug)]
pub enum ArtistSearch {
    Found(MbArtist),
    NotFound,
    /// HTTP 503: MusicBrainz is shedding load, worth retrying.
    Overloaded,
    /// Any other non-success status.
    Rejected(StatusCode),
}

/// Read-only MusicBrainz web service client. Every request carries the
/// configured `User-Agent`, which MusicBrainz requires to identify clients.
#[derive(Clone)]
pub struct MusicBrainzClient {
    client: Client,
    base_url: String,
}

impl MusicBrainzClient {
    pub fn new(base_url: &str, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Search for the best matching artist by name.
    ///
    /// Transport failures and undecodable bodies are returned as `Err`;
    /// every HTTP status is mapped onto [`ArtistSearch`].
    pub async fn search_artist(&self, name: &str) -> Result<ArtistSearch> {
        let url = format!("{}/ws/2/artist/", self.base_url);
        let resp = self
            .client
            .get(&url)
            .query(&[("query", name), ("fmt", "json"), ("limit", "1")])
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        let status = resp.status();
        debug!("MusicBrainz search for {}: {}", name, status);
        if status == StatusCode::SERVICE_UNAVAILABLE {
            return Ok(ArtistSearch::Overloaded);
        }
        if status != StatusCode::OK {
            return Ok(ArtistSearch::Rejected(status));
        }
        let body: SearchResponse = resp.json().await?;
        Ok(match body.artists.into_iter().next() {
            Some(artist) => ArtistSearch::Found(artist),
            None => ArtistSearch::NotFound,
        })
    }

    /// Single-attempt MBID lookup. Any failure is logged and yields `None`.
    pub async fn lookup_artist_id(&self, name: &str) -> Option<String> {
        match self.search_artist(name).await {
            Ok(ArtistSearch::Found(artist)) => Some(artist.id),
            Ok(ArtistSearch::NotFound) => {
                warn!("Artist {} not found in MusicBrainz", name);
                None
            }
            Ok(ArtistSearch::Overloaded) => {
                warn!("MusicBrainz overloaded while looking up {}", name);
                None
            }
            Ok(ArtistSearch::Rejected(status)) => {
                warn!("MusicBrainz lookup for {} failed: {}", name, status);
                None
            }
            Err(e) => {
                warn!("MusicBrainz lookup for {} failed: {}", name, e);
                None
            }
        }
    }
}

/// Most frequent tag, lowercased. Ties go to the tag listed first.
pub fn top_tag(tags: &[MbTag]) -> Option<String> {
    let mut sorted: Vec<&MbTag> = tags.iter().collect();
    // sort_by is stable, so equal counts keep their original order
    sorted.sort_by(|a, b| b.count.cmp(&a.count));
    sorted.first().map(|t| t.name.to_lowercase())
}
