//! Operator tasks. Each task takes its configuration and handles explicitly
//! so it can run from the interactive menu, a subcommand, or a test.
//!
//! The tasks are independent and are meant to be run in order:
//! import -> enrich -> rebuild folders -> register roots -> register artists.

pub mod artists;
pub mod enrich;
pub mod folders;
pub mod import;
pub mod root_folders;

use crate::api::lidarr::LidarrClient;
use crate::api::musicbrainz::MusicBrainzClient;
use crate::api::yandex::YandexMusicClient;
use crate::config::Config;
use crate::db;
use crate::genres::GenreMap;
use anyhow::{Context, Result};
use rusqlite::Connection;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    InitCatalog,
    ImportLikes,
    EnrichGenres,
    RebuildFolders,
    RegisterRootFolders,
    RegisterArtists,
}

impl Task {
    /// Menu order.
    pub const ALL: [Task; 6] = [
        Task::InitCatalog,
        Task::ImportLikes,
        Task::EnrichGenres,
        Task::RebuildFolders,
        Task::RegisterRootFolders,
        Task::RegisterArtists,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Task::InitCatalog => "Initialize catalog and show summary",
            Task::ImportLikes => "Import liked tracks from Yandex Music",
            Task::EnrichGenres => "Update genres from MusicBrainz",
            Task::RebuildFolders => "Rebuild genre/artist folders",
            Task::RegisterRootFolders => "Register root folders in Lidarr",
            Task::RegisterArtists => "Register artists in Lidarr",
        }
    }

    /// Menu key, "1" through "6".
    pub fn menu_key(&self) -> String {
        let idx = Task::ALL.iter().position(|t| t == self).unwrap_or(0);
        (idx + 1).to_string()
    }

    pub fn from_menu_key(key: &str) -> Option<Task> {
        Task::ALL.iter().copied().find(|t| t.menu_key() == key.trim())
    }
}

/// Counters shared by the two Lidarr registrars.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RegistrationReport {
    pub added: usize,
    pub skipped: usize,
    pub failed: usize,
}

fn open_catalog(cfg: &Config) -> Result<Connection> {
    db::open_or_create(&cfg.db_path)
        .with_context(|| format!("opening catalog {}", cfg.db_path.display()))
}

/// Run one task against the real services described by `cfg`.
pub async fn run(task: Task, cfg: &Config) -> Result<()> {
    info!("Running task: {}", task.label());
    match task {
        Task::InitCatalog => {
            let conn = open_catalog(cfg)?;
            let (total, resolved, placed) = db::artist_counts(&conn)?;
            let albums = db::count_albums(&conn)?;
            println!("Catalog: {}", cfg.db_path.display());
            println!("  artists:             {}", total);
            println!("  MusicBrainz checked: {}", resolved);
            println!("  with folder:         {}", placed);
            println!("  albums:              {}", albums);
        }
        Task::ImportLikes => {
            let mut conn = open_catalog(cfg)?;
            let source = YandexMusicClient::new(&cfg.yandex_url, &cfg.yandex_token);
            let report = import::import_liked_tracks(&source, &mut conn, cfg).await?;
            println!(
                "Unique artists added: {} ({} tracks, {} failed)",
                report.artists_added, report.tracks_seen, report.tracks_failed
            );
        }
        Task::EnrichGenres => {
            let conn = open_catalog(cfg)?;
            let mb = MusicBrainzClient::new(&cfg.musicbrainz_url, &cfg.user_agent)?;
            let report = enrich::enrich_genres(&mb, &conn, cfg).await?;
            println!(
                "MusicBrainz: {} with genre, {} unknown, {} left for a later run",
                report.with_genre, report.unknown, report.unresolved
            );
        }
        Task::RebuildFolders => {
            let conn = open_catalog(cfg)?;
            let genres = GenreMap::load(cfg.genre_map_path.as_deref())?;
            let placed = folders::rebuild_folders(&conn, &cfg.base_path, &genres)?;
            println!("Folders assigned for {} artists", placed.len());
        }
        Task::RegisterRootFolders => {
            let genres = GenreMap::load(cfg.genre_map_path.as_deref())?;
            let lidarr = LidarrClient::new(&cfg.lidarr_url, &cfg.lidarr_api_key);
            let report = root_folders::register_root_folders(&lidarr, cfg, &genres).await?;
            println!("Root folders: {} added, {} failed", report.added, report.failed);
        }
        Task::RegisterArtists => {
            let lidarr = LidarrClient::new(&cfg.lidarr_url, &cfg.lidarr_api_key);
            let mb = MusicBrainzClient::new(&cfg.musicbrainz_url, &cfg.user_agent)?;
            let report = artists::register_artists(&lidarr, &mb, cfg).await?;
            println!(
                "Artists: {} added, {} already present, {} failed",
                report.added, report.skipped, report.failed
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_keys_round_trip() {
        for t in Task::ALL {
            assert_eq!(Task::from_menu_key(&t.menu_key()), Some(t));
        }
        assert_eq!(Task::from_menu_key("1"), Some(Task::InitCatalog));
        assert_eq!(Task::from_menu_key(" 6 "), Some(Task::RegisterArtists));
        assert_eq!(Task::from_menu_key("0"), None);
        assert_eq!(Task::from_menu_key("x"), None);
    }
}
