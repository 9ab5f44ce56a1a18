use crate::api::TrackSource;
use crate::config::Config;
use crate::db;
use crate::models::Track;
use crate::util::{is_usable_folder_name, sanitize_name};
use anyhow::{anyhow, Result};
use futures::future::join_all;
use rusqlite::Connection;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub tracks_seen: usize,
    pub tracks_failed: usize,
    pub artists_added: usize,
}

/// Pull every liked track from `source` and record artists the catalog has
/// not seen yet.
///
/// All track lookups are issued at once and awaited as one batch. A lookup
/// that fails only drops its own track. New artists are written in a single
/// insert-many at the end; names already present are ignored.
pub async fn import_liked_tracks(
    source: &dyn TrackSource,
    conn: &mut Connection,
    cfg: &Config,
) -> Result<ImportReport> {
    let liked = source.liked_tracks().await?;
    info!("{}: {} liked tracks", source.name(), liked.len());

    let tracks = join_all(liked.iter().map(|r| source.fetch_track(r))).await;

    let mut seen: HashSet<String> = db::artist_names(conn)?.into_iter().collect();
    let mut new_artists: Vec<(String, String)> = Vec::new();
    let mut report = ImportReport { tracks_seen: liked.len(), ..Default::default() };
    let delay = Duration::from_millis(cfg.import_delay_ms);

    for (r, fetched) in liked.iter().zip(tracks) {
        let track = match fetched.and_then(usable_track) {
            Ok(t) => t,
            Err(e) => {
                warn!("Skipping track {}: {:#}", r.track_id(), e);
                report.tracks_failed += 1;
                continue;
            }
        };
        let Some(artist) = track.primary_artist() else { continue };
        let name = sanitize_name(artist);

        if let Some(album) = track.primary_album(&name) {
            db::insert_album_if_absent(conn, &album)?;
        }

        if !seen.insert(name.clone()) {
            continue;
        }
        let genre = track.primary_genre();
        info!("New artist: {} ({})", name, genre);
        new_artists.push((name, genre));
        tokio::time::sleep(delay).await;
    }

    if !new_artists.is_empty() {
        report.artists_added = db::insert_new_artists(conn, &new_artists)?;
    }
    info!("Unique artists added: {}", report.artists_added);
    Ok(report)
}

// A track is only useful if its first artist's sanitized name can serve as
// a folder name.
fn usable_track(track: Track) -> Result<Track> {
    match track.primary_artist() {
        None => Err(anyhow!("track {} has no artists", track.id)),
        Some(name) if !is_usable_folder_name(&sanitize_name(name)) => {
            Err(anyhow!("track {} has an unusable artist name {:?}", track.id, name))
        }
        Some(_) => Ok(track),
    }
}
