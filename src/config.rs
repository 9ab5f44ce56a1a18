use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use url::Url;

/// Runtime configuration shared by every task.
///
/// Loaded once at startup either from a TOML file or from the process
/// environment, then checked with [`Config::validate`] before any task runs.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Yandex Music OAuth token.
    #[serde(default)]
    pub yandex_token: String,
    #[serde(default = "default_yandex_url")]
    pub yandex_url: String,

    // path to the catalog database file
    #[serde(default)]
    pub db_path: PathBuf,

    /// Client signature sent as `User-Agent` to MusicBrainz.
    #[serde(default)]
    pub user_agent: String,
    #[serde(default = "default_musicbrainz_url")]
    pub musicbrainz_url: String,

    /// Local root of the genre/artist tree.
    #[serde(default)]
    pub base_path: PathBuf,

    // Lidarr
    #[serde(default)]
    pub lidarr_url: String,
    #[serde(default)]
    pub lidarr_api_key: String,
    /// The same tree as `base_path`, as seen from the Lidarr host.
    #[serde(default)]
    pub lidarr_base_path: String,
    #[serde(default = "default_profile_id")]
    pub quality_profile_id: u32,
    #[serde(default = "default_profile_id")]
    pub metadata_profile_id: u32,

    /// Optional TOML file replacing the built-in genre table.
    #[serde(default)]
    pub genre_map_path: Option<PathBuf>,

    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,

    // Pacing, all in milliseconds
    #[serde(default = "default_import_delay")]
    pub import_delay_ms: u64,
    #[serde(default = "default_enrich_delay")]
    pub enrich_delay_ms: u64,
    #[serde(default = "default_retry_base")]
    pub retry_base_ms: u64,
    #[serde(default = "default_retry_step")]
    pub retry_step_ms: u64,
    #[serde(default = "default_max_attempts")]
    pub max_enrich_attempts: u32,
}

fn default_yandex_url() -> String { "https://api.music.yandex.net".into() }
fn default_musicbrainz_url() -> String { "https://musicbrainz.org".into() }
fn default_profile_id() -> u32 { 1 }
fn default_import_delay() -> u64 { 2000 }
fn default_enrich_delay() -> u64 { 500 }
fn default_retry_base() -> u64 { 500 }
fn default_retry_step() -> u64 { 1000 }
fn default_max_attempts() -> u32 { 3 }

fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("liked-library-sync")
        .join("logs")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            yandex_token: String::new(),
            yandex_url: default_yandex_url(),
            db_path: PathBuf::new(),
            user_agent: String::new(),
            musicbrainz_url: default_musicbrainz_url(),
            base_path: PathBuf::new(),
            lidarr_url: String::new(),
            lidarr_api_key: String::new(),
            lidarr_base_path: String::new(),
            quality_profile_id: default_profile_id(),
            metadata_profile_id: default_profile_id(),
            genre_map_path: None,
            log_dir: default_log_dir(),
            import_delay_ms: default_import_delay(),
            enrich_delay_ms: default_enrich_delay(),
            retry_base_ms: default_retry_base(),
            retry_step_ms: default_retry_step(),
            max_enrich_attempts: default_max_attempts(),
        }
    }
}

impl Config {
    pub fn from_path(path: &Path) -> Result<Self> {
        let s = std::fs::read_to_string(path)?;
        let cfg: Config = toml::from_str(&s)?;
        Ok(cfg)
    }

    /// Build a config from environment variables, using defaults for
    /// everything that is not set.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::from_env`] with an injectable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut cfg = Config::default();
        if let Some(v) = get("YANDEX_TOKEN") { cfg.yandex_token = v; }
        if let Some(v) = get("YANDEX_URL") { cfg.yandex_url = v; }
        if let Some(v) = get("DB_PATH") { cfg.db_path = v.into(); }
        if let Some(v) = get("USER_AGENT") { cfg.user_agent = v; }
        if let Some(v) = get("MUSICBRAINZ_URL") { cfg.musicbrainz_url = v; }
        if let Some(v) = get("BASE_PATH") { cfg.base_path = v.into(); }
        if let Some(v) = get("LIDARR_URL") { cfg.lidarr_url = v; }
        if let Some(v) = get("API_KEY") { cfg.lidarr_api_key = v; }
        if let Some(v) = get("BASE_PATH_LIDARR") { cfg.lidarr_base_path = v; }
        if let Some(v) = get("GENRE_MAP_PATH") { cfg.genre_map_path = Some(v.into()); }
        if let Some(v) = get("LOG_DIR") { cfg.log_dir = v.into(); }
        cfg
    }

    /// Check that every required value is present and every URL parses.
    /// The error lists all problems at once and never echoes secret values.
    pub fn validate(&self) -> Result<()> {
        let mut missing = Vec::new();
        if self.yandex_token.is_empty() { missing.push("YANDEX_TOKEN"); }
        if self.db_path.as_os_str().is_empty() { missing.push("DB_PATH"); }
        if self.user_agent.is_empty() { missing.push("USER_AGENT"); }
        if self.base_path.as_os_str().is_empty() { missing.push("BASE_PATH"); }
        if self.lidarr_url.is_empty() { missing.push("LIDARR_URL"); }
        if self.lidarr_api_key.is_empty() { missing.push("API_KEY"); }
        if self.lidarr_base_path.is_empty() { missing.push("BASE_PATH_LIDARR"); }
        if !missing.is_empty() {
            return Err(anyhow!("missing required configuration: {}", missing.join(", ")));
        }

        for (name, value) in [
            ("yandex_url", &self.yandex_url),
            ("musicbrainz_url", &self.musicbrainz_url),
            ("lidarr_url", &self.lidarr_url),
        ] {
            Url::parse(value).with_context(|| format!("invalid {}: {}", name, value))?;
        }
        if self.max_enrich_attempts == 0 {
            return Err(anyhow!("max_enrich_attempts must be at least 1"));
        }
        Ok(())
    }
}
