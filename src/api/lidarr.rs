use anyhow::{anyhow, Result};
use log::debug;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

/// Lidarr v1 REST client. Authenticates with the `apikey` query parameter.
/// `base_url` includes the API prefix, e.g. `http://lidarr:8686/api/v1`.
pub struct LidarrClient {
    client: Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootFolder {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    pub path: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRootFolder {
    pub name: String,
    pub path: String,
    pub default_quality_profile_id: u32,
    pub default_metadata_profile_id: u32,
    pub default_monitor: String,
    pub default_new_item_monitor: String,
    pub default_tags: Vec<i64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddOptions {
    pub monitor: String,
    pub search_for_missing_albums: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewArtist {
    pub artist_name: String,
    pub foreign_artist_id: Option<String>,
    pub root_folder_id: i64,
    pub root_folder_path: String,
    pub path: String,
    pub quality_profile_id: u32,
    pub metadata_profile_id: u32,
    pub monitored: bool,
    pub monitor_new_items: String,
    pub add_options: AddOptions,
    pub tags: Vec<i64>,
}

/// Raw status and body of a write call; callers decide what counts as
/// success.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: String,
}

impl LidarrClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub async fn root_folders(&self) -> Result<Vec<RootFolder>> {
        let url = format!("{}/rootFolder", self.base_url);
        let resp = self
            .client
            .get(&url)
            .query(&[("apikey", &self.api_key)])
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let txt = resp.text().await.unwrap_or_default();
            return Err(anyhow!("list root folders failed: {} => {}", status, txt));
        }
        let folders: Vec<RootFolder> = resp.json().await?;
        debug!("Lidarr has {} root folders", folders.len());
        Ok(folders)
    }

    pub async fn add_root_folder(&self, folder: &NewRootFolder) -> Result<ApiResponse> {
        self.post("rootFolder", folder).await
    }

    pub async fn add_artist(&self, artist: &NewArtist) -> Result<ApiResponse> {
        self.post("artist", artist).await
    }

    async fn post<T: Serialize>(&self, endpoint: &str, body: &T) -> Result<ApiResponse> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let resp = self
            .client
            .post(&url)
            .query(&[("apikey", &self.api_key)])
            .json(body)
            .send()
            .await?;
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        Ok(ApiResponse { status, body })
    }
}
