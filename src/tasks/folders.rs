use crate::db;
use crate::genres::{preferred_genre, GenreMap};
use crate::util::{is_usable_folder_name, sanitize_name};
use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Marker directory created inside each artist folder so tools that drop
/// empty directories keep the artist folder.
pub const EMPTY_MARKER: &str = "__EMPTY__";

/// `<base>/<bucket>/<artist>` for one artist's genre fields.
pub fn artist_folder(
    base: &Path,
    genres: &GenreMap,
    name: &str,
    yandex_genre: Option<&str>,
    mb_genre: Option<&str>,
) -> PathBuf {
    let genre = preferred_genre(yandex_genre, mb_genre);
    let bucket = genres.bucket_for(genre);
    base.join(sanitize_name(bucket)).join(sanitize_name(name))
}

/// Recompute every artist's folder, create it, and store the path.
///
/// Pure recomputation from the catalog: running it again with the same data
/// produces the same paths, and existing directories are left alone. Names
/// that cannot be a folder (empty or dots only) are logged and skipped.
pub fn rebuild_folders(conn: &Connection, base: &Path, genres: &GenreMap) -> Result<Vec<(String, PathBuf)>> {
    let artists = db::all_artists_with_genres(conn)?;
    let mut placed = Vec::with_capacity(artists.len());
    for (name, yandex, mb) in artists {
        if !is_usable_folder_name(&sanitize_name(&name)) {
            warn!("Artist name {:?} cannot be a folder name, skipping", name);
            continue;
        }
        let folder = artist_folder(base, genres, &name, yandex.as_deref(), mb.as_deref());
        std::fs::create_dir_all(folder.join(EMPTY_MARKER))
            .with_context(|| format!("creating {}", folder.display()))?;
        db::set_assigned_path(conn, &name, &folder.to_string_lossy())?;
        debug!("{} -> {}", name, folder.display());
        placed.push((name, folder));
    }
    info!("Assigned folders for {} artists under {}", placed.len(), base.display());
    Ok(placed)
}
