//! The remote catalog as seen by the rest of the application

use anyhow::Result;
use async_trait::async_trait;

use super::content::SearchPayload;
use super::types::{AccountTier, AlbumInfo, EpisodeInfo, PlaylistInfo, SavedTrack, TrackInfo};

/// Read-only queries against the remote catalog.
///
/// Implementations perform exactly one logical request per call and never retry.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Search tracks, albums, artists and playlists with a single logical query
    async fn search(&self, query: &str, limit: u32, offset: u32) -> Result<SearchPayload>;

    async fn playlist_info(&self, playlist_id: &str) -> Result<PlaylistInfo>;

    /// Ids of the tracks in a playlist, in playlist order. Non-track entries are left out.
    async fn playlist_tracks(&self, playlist_id: &str) -> Result<Vec<String>>;

    /// Ids of every episode of a show
    async fn show_episodes(&self, show_id: &str) -> Result<Vec<String>>;

    async fn album(&self, album_id: &str) -> Result<AlbumInfo>;

    /// Ids of every album released by an artist
    async fn artist_albums(&self, artist_id: &str) -> Result<Vec<String>>;

    async fn track(&self, track_id: &str) -> Result<TrackInfo>;

    async fn episode(&self, episode_id: &str) -> Result<EpisodeInfo>;

    async fn saved_tracks(&self) -> Result<Vec<SavedTrack>>;

    async fn user_playlists(&self) -> Result<Vec<PlaylistInfo>>;

    async fn account_tier(&self) -> Result<AccountTier>;

    /// Renews credentials that are about to expire. Returns whether anything was renewed.
    async fn refresh_session(&self) -> Result<bool> {
        Ok(false)
    }
}
