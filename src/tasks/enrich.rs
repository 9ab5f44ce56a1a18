use crate::api::musicbrainz::{top_tag, ArtistSearch, MusicBrainzClient};
use crate::config::Config;
use crate::db;
use crate::models::UNKNOWN_GENRE;
use anyhow::Result;
use rusqlite::Connection;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EnrichReport {
    pub with_genre: usize,
    pub unknown: usize,
    pub unresolved: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrichOutcome {
    Genre(String),
    Unknown,
    /// Every attempt hit overload or a transport error; retried next run.
    Unresolved,
}

/// Look up a genre for every artist not yet checked against MusicBrainz.
///
/// Artists are processed one at a time with `enrich_delay_ms` between them.
pub async fn enrich_genres(mb: &MusicBrainzClient, conn: &Connection, cfg: &Config) -> Result<EnrichReport> {
    let pending = db::artists_needing_enrichment(conn)?;
    let mut report = EnrichReport::default();
    if pending.is_empty() {
        info!("No artists waiting for MusicBrainz");
        return Ok(report);
    }
    info!("{} artists waiting for MusicBrainz", pending.len());

    for name in &pending {
        match enrich_artist(mb, conn, name, cfg).await? {
            EnrichOutcome::Genre(g) => {
                info!("Updated {} -> {}", name, g);
                report.with_genre += 1;
            }
            EnrichOutcome::Unknown => {
                info!("Updated {} -> {}", name, UNKNOWN_GENRE);
                report.unknown += 1;
            }
            EnrichOutcome::Unresolved => {
                warn!(
                    "Could not update {} after {} attempts",
                    name, cfg.max_enrich_attempts
                );
                report.unresolved += 1;
            }
        }
        tokio::time::sleep(Duration::from_millis(cfg.enrich_delay_ms)).await;
    }
    Ok(report)
}

/// Resolve one artist with bounded retries.
///
/// 503 and transport errors are retried after `retry_base_ms + attempt *
/// retry_step_ms`. Any other non-200 status is a definitive "unknown".
/// Nothing is written when attempts run out.
pub async fn enrich_artist(
    mb: &MusicBrainzClient,
    conn: &Connection,
    name: &str,
    cfg: &Config,
) -> Result<EnrichOutcome> {
    let attempts = cfg.max_enrich_attempts.max(1);
    for attempt in 0..attempts {
        let outcome = match mb.search_artist(name).await {
            Ok(ArtistSearch::Found(artist)) => match top_tag(&artist.tags) {
                Some(genre) => EnrichOutcome::Genre(genre),
                None => EnrichOutcome::Unknown,
            },
            Ok(ArtistSearch::NotFound) => EnrichOutcome::Unknown,
            Ok(ArtistSearch::Rejected(status)) => {
                info!("MusicBrainz answered {} for {}, recording unknown", status, name);
                EnrichOutcome::Unknown
            }
            Ok(ArtistSearch::Overloaded) => {
                warn!("MusicBrainz overloaded (503), attempt {}/{} for {}", attempt + 1, attempts, name);
                backoff(cfg, attempt, attempts).await;
                continue;
            }
            Err(e) => {
                warn!("MusicBrainz request for {} failed: {:#}", name, e);
                backoff(cfg, attempt, attempts).await;
                continue;
            }
        };

        let genre = match &outcome {
            EnrichOutcome::Genre(g) => g.as_str(),
            _ => UNKNOWN_GENRE,
        };
        db::set_enrichment_result(conn, name, genre)?;
        return Ok(outcome);
    }
    Ok(EnrichOutcome::Unresolved)
}

async fn backoff(cfg: &Config, attempt: u32, attempts: u32) {
    if attempt + 1 >= attempts {
        return;
    }
    let ms = cfg.retry_base_ms + u64::from(attempt) * cfg.retry_step_ms;
    tokio::time::sleep(Duration::from_millis(ms)).await;
}
