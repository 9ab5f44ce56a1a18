use super::TrackSource;
use crate::models::{Track, TrackRef};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::debug;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::Client;
use serde::Deserialize;

/// Yandex Music client authenticated by an OAuth access token.
/// The base URL is configurable so tests can point it at a local mock.
pub struct YandexMusicClient {
    client: Client,
    base_url: String,
    token: String,
    uid: tokio::sync::Mutex<Option<String>>,
}

#[derive(Deserialize)]
struct Envelope<T> {
    result: T,
}

#[derive(Deserialize)]
struct AccountStatus {
    account: Account,
}

#[derive(Deserialize)]
struct Account {
    uid: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct LikesResult {
    library: Library,
}

#[derive(Deserialize)]
struct Library {
    #[serde(default)]
    tracks: Vec<TrackRef>,
}

impl YandexMusicClient {
    pub fn new(base_url: &str, token: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            uid: tokio::sync::Mutex::new(None),
        }
    }

    fn auth_header(&self) -> String {
        format!("OAuth {}", self.token)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .client
            .get(&url)
            .header(AUTHORIZATION, self.auth_header())
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let txt = resp.text().await.unwrap_or_default();
            return Err(anyhow!("GET {} failed: {} => {}", path, status, txt));
        }
        let env: Envelope<T> = resp.json().await?;
        Ok(env.result)
    }

    async fn get_uid(&self) -> Result<String> {
        {
            let g = self.uid.lock().await;
            if let Some(u) = g.as_ref() {
                return Ok(u.clone());
            }
        }
        let status: AccountStatus = self.get_json("/account/status").await?;
        let uid = match status.account.uid {
            Some(serde_json::Value::Number(n)) => n.to_string(),
            Some(serde_json::Value::String(s)) if !s.is_empty() => s,
            _ => return Err(anyhow!("account status has no uid; is the token valid?")),
        };
        debug!("Yandex Music account uid resolved");
        let mut g = self.uid.lock().await;
        *g = Some(uid.clone());
        Ok(uid)
    }
}

#[async_trait]
impl TrackSource for YandexMusicClient {
    fn name(&self) -> &str {
        "yandex"
    }

    async fn liked_tracks(&self) -> Result<Vec<TrackRef>> {
        let uid = self.get_uid().await?;
        let likes: LikesResult = self.get_json(&format!("/users/{}/likes/tracks", uid)).await?;
        debug!("Yandex Music returned {} liked tracks", likes.library.tracks.len());
        Ok(likes.library.tracks)
    }

    async fn fetch_track(&self, track: &TrackRef) -> Result<Track> {
        let tracks: Vec<Track> = self.get_json(&format!("/tracks/{}", track.track_id())).await?;
        tracks
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("track {} not found", track.track_id()))
    }
}
