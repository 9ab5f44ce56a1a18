use super::TrackSource;
use crate::models::{Track, TrackRef};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::info;

/// In-memory track source used in tests and dry runs.
/// Liked references without a registered track fail to resolve, which is how
/// callers exercise the per-track error path.
#[derive(Default)]
pub struct MockTrackSource {
    liked: Vec<TrackRef>,
    tracks: HashMap<String, Track>,
    fetches: AtomicUsize,
}

impl MockTrackSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a liked track that resolves to `track`.
    pub fn with_track(mut self, track: Track) -> Self {
        let r = TrackRef { id: track.id.clone(), album_id: None };
        self.tracks.insert(r.track_id(), track);
        self.liked.push(r);
        self
    }

    /// Add a liked reference that fails to resolve.
    pub fn with_broken_ref(mut self, id: &str) -> Self {
        self.liked.push(TrackRef { id: id.to_string(), album_id: None });
        self
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TrackSource for MockTrackSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn liked_tracks(&self) -> Result<Vec<TrackRef>> {
        info!("MockTrackSource: {} liked tracks", self.liked.len());
        Ok(self.liked.clone())
    }

    async fn fetch_track(&self, track: &TrackRef) -> Result<Track> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.tracks
            .get(&track.track_id())
            .cloned()
            .ok_or_else(|| anyhow!("mock track {} not found", track.track_id()))
    }
}
