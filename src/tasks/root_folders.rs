use super::RegistrationReport;
use crate::api::lidarr::{LidarrClient, NewRootFolder};
use crate::config::Config;
use crate::genres::GenreMap;
use crate::util::{join_remote_path, sanitize_name};
use anyhow::{Context, Result};
use tracing::{error, info};

/// Register one Lidarr root folder per genre bucket.
///
/// No existence check is made first: re-running produces duplicate errors
/// from Lidarr, which are logged like any other failure.
pub async fn register_root_folders(
    lidarr: &LidarrClient,
    cfg: &Config,
    genres: &GenreMap,
) -> Result<RegistrationReport> {
    let mut report = RegistrationReport::default();
    for bucket in genres.buckets() {
        let bucket = sanitize_name(&bucket);
        let local = cfg.base_path.join(&bucket);
        std::fs::create_dir_all(&local).with_context(|| format!("creating {}", local.display()))?;

        let path = join_remote_path(&cfg.lidarr_base_path, &[&bucket]);
        let body = NewRootFolder {
            name: path.clone(),
            path: path.clone(),
            default_quality_profile_id: cfg.quality_profile_id,
            default_metadata_profile_id: cfg.metadata_profile_id,
            default_monitor: "all".into(),
            default_new_item_monitor: "all".into(),
            default_tags: Vec::new(),
        };

        match lidarr.add_root_folder(&body).await {
            Ok(resp) if resp.status.is_success() => {
                info!("Root folder {} added to Lidarr", path);
                report.added += 1;
            }
            Ok(resp) => {
                error!("Adding root folder {} failed: {} {}", path, resp.status, resp.body);
                report.failed += 1;
            }
            Err(e) => {
                error!("Adding root folder {} failed: {:#}", path, e);
                report.failed += 1;
            }
        }
    }
    Ok(report)
}
