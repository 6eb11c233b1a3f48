//! Spotify Web API client wrapper implementing [`Catalog`]

use std::sync::Arc;
use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;
use rspotify::{
    model::{
        AlbumId, ArtistId, EpisodeId, Market, PlayableItem, PlaylistId, SearchResult, SearchType,
        ShowId, SubscriptionLevel, TrackId,
    },
    prelude::*,
    AuthCodeSpotify,
};

use super::catalog::Catalog;
use super::content::{CatalogItem, SearchPayload};
use super::types::{AccountTier, AlbumInfo, EpisodeInfo, PlaylistInfo, SavedTrack, TrackInfo};

/// Spotify API client with token refresh support
#[derive(Clone)]
pub struct SpotifyClient {
    client: Arc<AuthCodeSpotify>,
    refresh_token: Arc<RwLock<String>>,
    token_expires_at: Arc<RwLock<Option<chrono::DateTime<chrono::Utc>>>>,
}

impl SpotifyClient {
    pub fn new(
        client: AuthCodeSpotify,
        refresh_token: String,
        expires_at: Option<chrono::DateTime<chrono::Utc>>,
    ) -> Self {
        Self {
            client: Arc::new(client),
            refresh_token: Arc::new(RwLock::new(refresh_token)),
            token_expires_at: Arc::new(RwLock::new(expires_at)),
        }
    }

    pub async fn token_needs_refresh(&self) -> bool {
        let expires_at = self.token_expires_at.read().await;
        if let Some(exp) = *expires_at {
            let remaining = exp - chrono::Utc::now();
            // Refresh if less than 5 minutes remaining
            remaining.num_seconds() < 300
        } else {
            false
        }
    }

    pub async fn refresh_token_if_needed(&self) -> Result<bool> {
        if !self.token_needs_refresh().await {
            return Ok(false);
        }

        let refresh_token = self.refresh_token.read().await.clone();

        tracing::info!("Token expiring soon, refreshing...");

        match crate::auth::refresh_access_token(&refresh_token).await {
            Ok(refreshed) => {
                let new_token = crate::auth::rspotify_token(
                    refreshed.access_token,
                    refreshed.expires_at,
                );

                // a poisoned token mutex means the client is unusable anyway
                if let Ok(mut token) = self.client.token.lock().await {
                    *token = Some(new_token);
                }

                *self.refresh_token.write().await = refreshed.refresh_token;
                *self.token_expires_at.write().await = Some(refreshed.expires_at);

                tracing::info!("Token refreshed successfully");
                Ok(true)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to refresh token");
                Err(e)
            }
        }
    }
}

#[async_trait]
impl Catalog for SpotifyClient {
    async fn search(&self, query: &str, limit: u32, offset: u32) -> Result<SearchPayload> {
        // Use None for market to let Spotify use the user's account country
        let market: Option<Market> = None;

        let (track_result, album_result, artist_result, playlist_result) = futures::join!(
            self.client.search(query, SearchType::Track, market, None, Some(limit), Some(offset)),
            self.client.search(query, SearchType::Album, market, None, Some(limit), Some(offset)),
            self.client.search(query, SearchType::Artist, market, None, Some(limit), Some(offset)),
            self.client.search(query, SearchType::Playlist, market, None, Some(limit), Some(offset))
        );

        let mut payload = SearchPayload::default();

        if let SearchResult::Tracks(page) = track_result? {
            payload.tracks = Some(
                page.items
                    .into_iter()
                    .map(|track| {
                        let track_id = track.id.as_ref().map(|id| id.id().to_string()).unwrap_or_default();
                        CatalogItem::new(track_id, track.name)
                            .with_explicit(track.explicit)
                            .with_artists(track.artists.into_iter().map(|a| a.name))
                    })
                    .collect(),
            );
        }

        if let SearchResult::Albums(page) = album_result? {
            payload.albums = Some(
                page.items
                    .into_iter()
                    .map(|album| {
                        let album_id = album.id.as_ref().map(|id| id.id().to_string()).unwrap_or_default();
                        CatalogItem::new(album_id, album.name)
                            .with_artists(album.artists.into_iter().map(|a| a.name))
                    })
                    .collect(),
            );
        }

        if let SearchResult::Artists(page) = artist_result? {
            payload.artists = Some(
                page.items
                    .into_iter()
                    .map(|artist| CatalogItem::new(artist.id.id().to_string(), artist.name))
                    .collect(),
            );
        }

        if let SearchResult::Playlists(page) = playlist_result? {
            payload.playlists = Some(
                page.items
                    .into_iter()
                    .map(|playlist| {
                        let owner = playlist
                            .owner
                            .display_name
                            .unwrap_or_else(|| playlist.owner.id.id().to_string());
                        CatalogItem::new(playlist.id.id().to_string(), playlist.name).with_owner(owner)
                    })
                    .collect(),
            );
        }

        Ok(payload)
    }

    async fn playlist_info(&self, playlist_id: &str) -> Result<PlaylistInfo> {
        let id = PlaylistId::from_id(playlist_id)?;
        let playlist = self.client.playlist(id, None, None).await?;

        Ok(PlaylistInfo {
            id: playlist_id.to_string(),
            name: playlist.name,
            owner: playlist
                .owner
                .display_name
                .clone()
                .unwrap_or_else(|| playlist.owner.id.id().to_string()),
            total_tracks: playlist.tracks.total,
        })
    }

    async fn playlist_tracks(&self, playlist_id: &str) -> Result<Vec<String>> {
        use futures::TryStreamExt;

        let id = PlaylistId::from_id(playlist_id)?;
        let items: Vec<_> = self.client.playlist_items(id, None, None).try_collect().await?;

        let track_ids = items
            .into_iter()
            .filter_map(|item| match item.track {
                Some(PlayableItem::Track(track)) => track.id.map(|id| id.id().to_string()),
                _ => None,
            })
            .collect();

        Ok(track_ids)
    }

    async fn show_episodes(&self, show_id: &str) -> Result<Vec<String>> {
        use futures::TryStreamExt;

        let id = ShowId::from_id(show_id)?;
        let episodes: Vec<_> = self.client.get_shows_episodes(id, None).try_collect().await?;

        Ok(episodes
            .into_iter()
            .map(|episode| episode.id.id().to_string())
            .collect())
    }

    async fn album(&self, album_id: &str) -> Result<AlbumInfo> {
        use futures::TryStreamExt;

        let id = AlbumId::from_id(album_id)?;
        let album = self.client.album(id.clone(), None).await?;

        // the album response embeds only the first page of tracks
        let tracks: Vec<_> = self.client.album_track(id, None).try_collect().await?;
        let track_ids = tracks
            .into_iter()
            .filter_map(|track| track.id.map(|id| id.id().to_string()))
            .collect();

        Ok(AlbumInfo {
            id: album_id.to_string(),
            name: album.name,
            artist: album.artists.first().map(|a| a.name.clone()).unwrap_or_default(),
            track_ids,
        })
    }

    async fn artist_albums(&self, artist_id: &str) -> Result<Vec<String>> {
        use futures::TryStreamExt;

        let id = ArtistId::from_id(artist_id)?;
        let albums: Vec<_> = self.client.artist_albums(id, None, None).try_collect().await?;

        Ok(albums
            .into_iter()
            .filter_map(|album| album.id.map(|id| id.id().to_string()))
            .collect())
    }

    async fn track(&self, track_id: &str) -> Result<TrackInfo> {
        let id = TrackId::from_id(track_id)?;
        let track = self.client.track(id, None).await?;

        Ok(TrackInfo {
            id: track_id.to_string(),
            name: track.name,
            artists: track.artists.into_iter().map(|a| a.name).collect(),
            album: track.album.name,
            playable: track.is_playable.unwrap_or(true),
        })
    }

    async fn episode(&self, episode_id: &str) -> Result<EpisodeInfo> {
        let id = EpisodeId::from_id(episode_id)?;
        let episode = self.client.get_an_episode(id, None).await?;

        Ok(EpisodeInfo {
            id: episode_id.to_string(),
            name: episode.name,
            show: episode.show.name,
        })
    }

    async fn saved_tracks(&self) -> Result<Vec<SavedTrack>> {
        use futures::TryStreamExt;

        let saved: Vec<_> = self.client.current_user_saved_tracks(None).try_collect().await?;
        tracing::debug!(count = saved.len(), "Fetched liked songs");

        Ok(saved
            .into_iter()
            .map(|saved| SavedTrack {
                id: saved.track.id.map(|id| id.id().to_string()),
                name: saved.track.name,
            })
            .collect())
    }

    async fn user_playlists(&self) -> Result<Vec<PlaylistInfo>> {
        use futures::TryStreamExt;

        let playlists: Vec<_> = self.client.current_user_playlists().try_collect().await?;

        Ok(playlists
            .into_iter()
            .map(|playlist| PlaylistInfo {
                id: playlist.id.id().to_string(),
                owner: playlist
                    .owner
                    .display_name
                    .unwrap_or_else(|| playlist.owner.id.id().to_string()),
                name: playlist.name,
                total_tracks: playlist.tracks.total,
            })
            .collect())
    }

    async fn account_tier(&self) -> Result<AccountTier> {
        let user = self.client.me().await?;
        Ok(match user.product {
            Some(SubscriptionLevel::Premium) => AccountTier::Premium,
            _ => AccountTier::Free,
        })
    }

    async fn refresh_session(&self) -> Result<bool> {
        self.refresh_token_if_needed().await
    }
}
