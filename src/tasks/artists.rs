use super::RegistrationReport;
use crate::api::lidarr::{AddOptions, LidarrClient, NewArtist, RootFolder};
use crate::api::musicbrainz::MusicBrainzClient;
use crate::config::Config;
use crate::util::{join_remote_path, last_path_segment};
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;
use tracing::{error, info, warn};
use walkdir::WalkDir;

const ALREADY_CONFIGURED: &str = "is already configured for an existing artist";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddArtistOutcome {
    Added,
    AlreadyExists,
    Failed(String),
}

/// Interpret Lidarr's answer to `POST /artist`.
pub fn classify_add_artist(status: u16, body: &str) -> AddArtistOutcome {
    match status {
        200 | 201 => AddArtistOutcome::Added,
        400 if body.contains(ALREADY_CONFIGURED) => AddArtistOutcome::AlreadyExists,
        _ => AddArtistOutcome::Failed(error_message(body)),
    }
}

// Lidarr errors are usually `{"message": "..."}`; anything else is shown raw.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::Object(map)) => map
            .get("message")
            .and_then(|m| m.as_str())
            .map(String::from)
            .unwrap_or_else(|| body.to_string()),
        _ => body.to_string(),
    }
}

/// Bucket name (final path segment) -> Lidarr root folder id.
pub fn root_folder_ids(folders: &[RootFolder]) -> HashMap<String, i64> {
    folders
        .iter()
        .filter_map(|f| last_path_segment(&f.path).map(|seg| (seg.to_string(), f.id)))
        .collect()
}

// Direct children of `dir` as (name, is_dir), sorted by name. Fails on the
// first entry that cannot be read.
fn subdirectories(dir: &Path) -> Result<Vec<(String, bool)>> {
    let mut out = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.with_context(|| format!("reading {}", dir.display()))?;
        out.push((entry.file_name().to_string_lossy().to_string(), entry.file_type().is_dir()));
    }
    Ok(out)
}

/// Register every `<base>/<bucket>/<artist>` directory with Lidarr.
///
/// A single artist's failure is logged and never stops the walk.
pub async fn register_artists(
    lidarr: &LidarrClient,
    mb: &MusicBrainzClient,
    cfg: &Config,
) -> Result<RegistrationReport> {
    let roots = root_folder_ids(&lidarr.root_folders().await.context("fetching Lidarr root folders")?);
    let mut report = RegistrationReport::default();

    for (bucket, is_dir) in subdirectories(&cfg.base_path)? {
        if !is_dir {
            info!("{} is not a folder, skipping", cfg.base_path.join(&bucket).display());
            continue;
        }
        let Some(&root_id) = roots.get(&bucket) else {
            warn!("No Lidarr root folder for {}, skipping", bucket);
            continue;
        };
        let root_path = join_remote_path(&cfg.lidarr_base_path, &[&bucket]);

        let artists = match subdirectories(&cfg.base_path.join(&bucket)) {
            Ok(artists) => artists,
            Err(e) => {
                warn!("Skipping bucket {}: {:#}", bucket, e);
                continue;
            }
        };
        for (artist, is_dir) in artists {
            if !is_dir {
                continue;
            }
            let body = NewArtist {
                artist_name: artist.clone(),
                foreign_artist_id: mb.lookup_artist_id(&artist).await,
                root_folder_id: root_id,
                root_folder_path: root_path.clone(),
                path: join_remote_path(&root_path, &[&artist]),
                quality_profile_id: cfg.quality_profile_id,
                metadata_profile_id: cfg.metadata_profile_id,
                monitored: true,
                monitor_new_items: "all".into(),
                add_options: AddOptions { monitor: "all".into(), search_for_missing_albums: true },
                tags: Vec::new(),
            };

            let resp = match lidarr.add_artist(&body).await {
                Ok(resp) => resp,
                Err(e) => {
                    error!("Adding {} failed: {:#}", artist, e);
                    report.failed += 1;
                    continue;
                }
            };
            match classify_add_artist(resp.status.as_u16(), &resp.body) {
                AddArtistOutcome::Added => {
                    info!("Artist added: {}", artist);
                    report.added += 1;
                }
                AddArtistOutcome::AlreadyExists => {
                    info!("Artist {} already exists in Lidarr, skipping", artist);
                    report.skipped += 1;
                }
                AddArtistOutcome::Failed(msg) => {
                    error!("Adding {} failed: {}, {}", artist, resp.status.as_u16(), msg);
                    report.failed += 1;
                }
            }
        }
    }
    Ok(report)
}
