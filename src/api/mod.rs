pub mod yandex;
pub mod mock;
pub mod musicbrainz;
pub mod lidarr;

use crate::models::{Track, TrackRef};
use anyhow::Result;

/// Source of the user's liked tracks.
/// Implementations: yandex::YandexMusicClient and mock::MockTrackSource.
#[async_trait::async_trait]
pub trait TrackSource: Send + Sync {
    /// Short references for every liked track of the authenticated user.
    async fn liked_tracks(&self) -> Result<Vec<TrackRef>>;

    /// Resolve a reference into full track details (artists, albums, genre).
    async fn fetch_track(&self, track: &TrackRef) -> Result<Track>;

    /// Return the source's name (for logging)
    fn name(&self) -> &str;
}
